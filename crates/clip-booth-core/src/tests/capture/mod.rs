mod controller;
mod session;
