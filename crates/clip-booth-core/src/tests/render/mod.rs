mod engine;
mod trim;
