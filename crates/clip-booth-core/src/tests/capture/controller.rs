use crate::{
    BoothError, CaptureController, CaptureEvent, CaptureFormat, SessionState, TrimSelection,
    decode_blob,
    tests::support::{ManualClock, STUB_FORMAT, StubControl, StubDevice, tone},
};

use std::sync::Arc;

const TICK_MS: u64 = 250;
const FRAMES_PER_TICK: usize = 11_025;

fn ticking(
    controller: &mut CaptureController<StubDevice>,
    clock: &ManualClock,
    ms: u64,
    feed: Option<&StubControl>,
) {
    for _ in 0..ms / TICK_MS {
        clock.advance(TICK_MS);
        if let Some(control) = feed {
            control.push_samples(&tone(FRAMES_PER_TICK, 1));
        }
        controller.tick_timer();
    }
}

/// WHAT: Denied device leaves the controller idle
/// WHY: A failed start must not leave a half-open session behind
#[test]
fn given_denied_device_when_starting_then_device_unavailable_and_idle() {
    // Given: A device that refuses access
    let (device, control) = StubDevice::denied();
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));

    // When: Starting a recording
    let result = controller.start();

    // Then: DeviceUnavailable, still Idle, nothing captured
    assert!(matches!(result, Err(BoothError::DeviceUnavailable { .. })));
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.session().chunks().is_empty());
    assert!(controller.signal_tap().is_none());
    assert_eq!(control.acquisitions(), 0);
}

/// WHAT: Record 10s with a 2s pause publishes ~8s
/// WHY: Paused wall-clock time must be excluded from the recorded duration
#[test]
fn given_pause_at_3s_for_2s_when_stopping_at_10s_then_duration_excludes_pause() {
    // Given: A recording started at t=0 on a stub device
    let clock = ManualClock::at(0);
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, clock.clone());
    controller.start().unwrap();

    // When: Recording 3s, pausing 2s, recording 5s more, then stopping
    ticking(&mut controller, &clock, 3_000, Some(&*control));
    controller.pause().unwrap();
    ticking(&mut controller, &clock, 2_000, Some(&*control));
    assert_eq!(controller.accumulated_pause_ms(), 2_000);
    controller.resume().unwrap();
    ticking(&mut controller, &clock, 5_000, Some(&*control));
    let recording = controller.stop().unwrap().clone();

    // Then: 2s paused, ~8s recorded, only recorded audio captured
    assert_eq!(controller.accumulated_pause_ms(), 2_000);
    assert!(recording.recorded_duration_ms.abs_diff(8_000) <= TICK_MS);
    assert_eq!(controller.last_reading().unwrap().display, "00:08");

    let decoded = decode_blob(&recording.blob).unwrap();
    assert_eq!(decoded.sample_rate(), 44_100);
    assert_eq!(decoded.channel_count(), 1);
    assert_eq!(decoded.frames(), 8 * 44_100);
}

/// WHAT: Pause total equals the sum of real paused intervals
/// WHY: Bookkeeping must not depend on how many timer ticks fell inside a pause
#[test]
fn given_repeated_pause_cycles_when_ticks_vary_then_pause_total_is_sum_of_intervals() {
    // Given: A running recording
    let clock = ManualClock::at(1_000);
    let (device, _control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, clock.clone());
    controller.start().unwrap();

    // When: Three pause cycles of different lengths, with 0..N ticks inside
    let pauses = [700u64, 1_250, 3_000];
    let mut expected = 0;
    for (cycle, &pause_ms) in pauses.iter().enumerate() {
        clock.advance(500);
        controller.pause().unwrap();
        let ticks = cycle as u64 * 3;
        for _ in 0..ticks {
            clock.advance(pause_ms / (ticks + 1));
            assert!(controller.tick_timer().is_none());
        }
        clock.advance(pause_ms - (pause_ms / (ticks + 1)) * ticks);
        controller.resume().unwrap();
        expected += pause_ms;
    }

    // Then: Accumulated pause equals the sum, and elapsed excludes it
    assert_eq!(controller.accumulated_pause_ms(), expected);
    assert_eq!(controller.elapsed_ms(), 3 * 500);
}

/// WHAT: Pause is committed synchronously
/// WHY: A tick or resume right after pause must already see the pause
#[test]
fn given_recording_when_paused_then_elapsed_freezes_immediately() {
    // Given: 1.5s of recording
    let clock = ManualClock::at(0);
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, clock.clone());
    controller.start().unwrap();
    clock.advance(1_500);

    // When: Pausing, then letting wall-clock time pass
    controller.pause().unwrap();
    clock.advance(4_000);

    // Then: Elapsed stays at pause time and device delivery is paused
    assert_eq!(controller.elapsed_ms(), 1_500);
    assert_eq!(controller.accumulated_pause_ms(), 4_000);
    assert!(control.is_paused());
    assert!(controller.tick_timer().is_none());
}

/// WHAT: Chunks are only accepted while recording
/// WHY: Late device events during a pause must not leak into the capture
#[test]
fn given_paused_session_when_chunk_arrives_then_chunk_dropped() {
    // Given: A paused recording with one accepted chunk
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();
    control.push_samples(&tone(64, 1));
    controller.pause().unwrap();

    // When: The device delivers anyway
    control.push_event(CaptureEvent::DataAvailable(vec![0u8; 256]));
    let accepted = controller.pump_events();

    // Then: Nothing new is appended
    assert_eq!(accepted, 0);
    assert_eq!(controller.session().chunks().len(), 1);
}

/// WHAT: A buffer still in flight when pausing is kept
/// WHY: Audio recorded before the pause must not be lost to the drain order
#[test]
fn given_callback_mid_send_when_pausing_then_chunk_kept() {
    // Given: A recording whose device completes one more send while pausing
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();
    control.push_samples(&tone(64, 1));
    control.set_in_flight(tone(32, 1));

    // When: Pausing, then pumping again while paused
    controller.pause().unwrap();
    controller.pump_events();

    // Then: Both chunks were accepted
    assert_eq!(controller.session().chunks().len(), 2);
}

/// WHAT: The blob carries the stream's native layout
/// WHY: Decoding must see the channel count and rate the device delivered
#[test]
fn given_stereo_stream_when_stopped_then_blob_decodes_as_stereo() {
    // Given: A 48 kHz stereo device delivering 100 frames
    let format = CaptureFormat {
        sample_rate: 48_000,
        channels: 2,
    };
    let (device, control) = StubDevice::new(format);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();
    control.push_samples(&tone(100, 2));

    // When: Stopping and decoding
    let recording = controller.stop().unwrap().clone();
    let decoded = decode_blob(&recording.blob).unwrap();

    // Then: Same layout as the stream
    assert_eq!(decoded.sample_rate(), 48_000);
    assert_eq!(decoded.channel_count(), 2);
    assert_eq!(decoded.frames(), 100);
}

/// WHAT: Stream faults are logged without changing state
/// WHY: A transient device glitch must not end the session
#[test]
fn given_recording_when_fault_event_arrives_then_state_unchanged() {
    // Given: A running recording
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();

    // When: The backend reports a fault
    control.push_event(CaptureEvent::Fault("buffer overrun".to_string()));
    controller.pump_events();

    // Then: Still recording
    assert_eq!(controller.state(), SessionState::Recording);
}

/// WHAT: Stop releases the device and closes the meter tap
/// WHY: Hardware capture indicators must turn off once recording ends
#[test]
fn given_recording_when_stopped_then_device_released_and_tap_closed() {
    // Given: A running recording with a meter tap
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();
    let tap = controller.signal_tap().unwrap();

    // When: Stopping
    controller.stop().unwrap();

    // Then: Device released, tap closed, no tap handed out any more
    assert!(control.is_released());
    assert!(tap.is_closed());
    assert!(controller.signal_tap().is_none());
    assert_eq!(controller.state(), SessionState::Stopped);
}

/// WHAT: Dropping the controller mid-capture releases the device
/// WHY: Release is guaranteed on every exit path, not only on stop
#[test]
fn given_recording_when_controller_dropped_then_device_released() {
    // Given: A running recording
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();

    // When: The controller goes away without stop
    drop(controller);

    // Then: The stream was released
    assert!(control.is_released());
}

/// WHAT: Stop while paused finalizes the capture
/// WHY: Stop is valid from both Recording and Paused
#[test]
fn given_paused_when_stopped_then_pause_committed_and_finalized() {
    // Given: 2s recorded then 1s paused
    let clock = ManualClock::at(0);
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, clock.clone());
    controller.start().unwrap();
    control.push_samples(&tone(44_100 * 2, 1));
    clock.advance(2_000);
    controller.pause().unwrap();
    clock.advance(1_000);

    // When: Stopping from Paused
    let recording = controller.stop().unwrap().clone();

    // Then: Duration excludes the open pause
    assert_eq!(recording.recorded_duration_ms, 2_000);
    assert_eq!(recording.chunk_count, 1);
    assert_eq!(controller.accumulated_pause_ms(), 1_000);
}

/// WHAT: Out-of-state operations are rejected
/// WHY: The state machine must not silently accept invalid transitions
#[test]
fn given_each_state_when_invalid_operation_then_invalid_transition() {
    let (device, _control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));

    // Idle
    assert!(matches!(
        controller.pause(),
        Err(BoothError::InvalidTransition { from: SessionState::Idle, .. })
    ));
    assert!(matches!(
        controller.stop(),
        Err(BoothError::InvalidTransition { .. })
    ));

    // Recording
    controller.start().unwrap();
    assert!(matches!(
        controller.resume(),
        Err(BoothError::InvalidTransition { from: SessionState::Recording, .. })
    ));
    assert!(matches!(
        controller.start(),
        Err(BoothError::InvalidTransition { .. })
    ));
    assert!(matches!(
        controller.re_record(),
        Err(BoothError::InvalidTransition { .. })
    ));

    // Stopped
    controller.stop().unwrap();
    assert!(matches!(
        controller.pause(),
        Err(BoothError::InvalidTransition { from: SessionState::Stopped, .. })
    ));
    assert_eq!(controller.state(), SessionState::Stopped);
}

/// WHAT: Re-record discards the recording and trim
/// WHY: A new attempt must start from a clean session
#[test]
fn given_stopped_with_trim_when_re_recording_then_clean_idle_session() {
    // Given: A finalized recording with a custom trim
    let (device, control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));
    controller.start().unwrap();
    control.push_samples(&tone(1_000, 1));
    let first_session = controller.stop().unwrap().session_id;
    controller
        .set_trim(TrimSelection::new(0.2, 0.6).unwrap())
        .unwrap();

    // When: Re-recording and starting again
    controller.re_record().unwrap();
    assert_eq!(controller.state(), SessionState::Idle);
    assert!(controller.finalized().is_none());
    assert_eq!(controller.trim(), TrimSelection::FULL);
    controller.start().unwrap();

    // Then: Fresh session on a freshly acquired stream
    assert_ne!(controller.session().id(), first_session);
    assert!(controller.session().chunks().is_empty());
    assert_eq!(control.acquisitions(), 2);
}

/// WHAT: Trim cannot be set before a recording exists
/// WHY: Trim bounds apply to the decoded finalized recording only
#[test]
fn given_no_recording_when_setting_trim_then_no_recording_error() {
    let (device, _control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, ManualClock::at(0));

    let result = controller.set_trim(TrimSelection::FULL);

    assert!(matches!(result, Err(BoothError::NoRecording { .. })));
}

/// WHAT: Stop resets the trim to the whole recording
/// WHY: A previous attempt's trim must not carry over
#[test]
fn given_new_recording_when_stopped_then_trim_is_full() {
    let clock = Arc::new(ManualClock::default());
    let (device, _control) = StubDevice::new(STUB_FORMAT);
    let mut controller = CaptureController::with_clock(device, clock);
    controller.start().unwrap();

    controller.stop().unwrap();

    assert_eq!(controller.trim(), TrimSelection::FULL);
}
