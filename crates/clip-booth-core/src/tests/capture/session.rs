use crate::{RecordingSession, SessionState};

/// WHAT: Fresh sessions start idle with nothing elapsed
/// WHY: The timer must read 00:00 before recording begins
#[test]
fn given_new_session_when_queried_then_idle_and_zero_elapsed() {
    // Given: A brand new session
    let session = RecordingSession::new();

    // When/Then: Idle, no chunks, no time
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.chunks().is_empty());
    assert_eq!(session.elapsed_ms(10_000), 0);
    assert_eq!(session.accumulated_pause_ms(10_000), 0);
}

/// WHAT: Empty chunks are never appended
/// WHY: Backends can emit zero-length buffers that carry no audio
#[test]
fn given_recording_session_when_empty_chunk_appended_then_rejected() {
    // Given: A recording session
    let mut session = RecordingSession::new();
    session.begin(0);

    // When: Appending an empty and a non-empty chunk
    let empty = session.append_chunk(Vec::new());
    let full = session.append_chunk(vec![1, 2, 3, 4]);

    // Then: Only the non-empty chunk is kept
    assert!(!empty);
    assert!(full);
    assert_eq!(session.chunks().len(), 1);
}

/// WHAT: Chunks keep their arrival order
/// WHY: Finalized audio is the concatenation of chunks in order
#[test]
fn given_chunks_when_finished_then_returned_in_arrival_order() {
    // Given: Three chunks appended in order
    let mut session = RecordingSession::new();
    session.begin(0);
    for b in 1..=3u8 {
        session.append_chunk(vec![b; 4]);
    }

    // When: Finishing the session
    let chunks = session.finish(1_000);

    // Then: Same order, and the session no longer holds them
    assert_eq!(chunks, vec![vec![1; 4], vec![2; 4], vec![3; 4]]);
    assert!(session.chunks().is_empty());
    assert_eq!(session.state(), SessionState::Stopped);
}

/// WHAT: Elapsed time stops advancing after finish
/// WHY: The published duration must not grow once recording has ended
#[test]
fn given_finished_session_when_time_passes_then_elapsed_frozen() {
    // Given: A session started at 500 and finished at 4_500
    let mut session = RecordingSession::new();
    session.begin(500);
    session.finish(4_500);

    // When: Reading long after finish
    let elapsed = session.elapsed_ms(60_000);

    // Then: Exactly the recorded span
    assert_eq!(elapsed, 4_000);
}

/// WHAT: An open pause counts toward the pause total
/// WHY: The displayed timer stays still for the whole pause
#[test]
fn given_open_pause_when_queried_then_open_interval_counted() {
    // Given: 1s recorded, then paused
    let mut session = RecordingSession::new();
    session.begin(0);
    session.pause(1_000);

    // When: Querying 2.5s into the pause
    let paused = session.accumulated_pause_ms(3_500);
    let elapsed = session.elapsed_ms(3_500);

    // Then: Open interval counted, elapsed unchanged
    assert_eq!(paused, 2_500);
    assert_eq!(elapsed, 1_000);
}

/// WHAT: Begin clears the previous attempt's bookkeeping
/// WHY: Pause totals must not carry across attempts
#[test]
fn given_used_session_when_begun_again_then_bookkeeping_cleared() {
    // Given: A session with pauses and chunks
    let mut session = RecordingSession::new();
    session.begin(0);
    session.append_chunk(vec![9; 8]);
    session.pause(100);
    session.resume(900);

    // When: Beginning again
    session.begin(5_000);

    // Then: Clean slate from the new start
    assert!(session.chunks().is_empty());
    assert_eq!(session.accumulated_pause_ms(6_000), 0);
    assert_eq!(session.elapsed_ms(6_000), 1_000);
    assert_eq!(session.started_at_ms(), 5_000);
}
