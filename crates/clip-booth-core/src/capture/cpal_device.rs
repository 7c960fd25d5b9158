use crate::{
    BoothError, CoreResult,
    capture::{CaptureDevice, CaptureEvent, CaptureFormat, CaptureStream, EncodedBlob, SignalTap},
    codec::{WAV_MIME_TYPE, encode_float32, float32_payload},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
    },
};

use cpal::{
    BuildStreamError, DefaultStreamConfigError, Device, FromSample, Sample, SampleFormat,
    SizedSample, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Default system input device via cpal.
///
/// The device is looked up on every `acquire`, so a microphone plugged in
/// after construction is picked up by the next recording.
#[derive(Debug, Default)]
pub struct CpalDevice;

impl CpalDevice {
    /// Backend for the default host's default input device.
    pub fn new() -> Self {
        Self
    }
}

impl CaptureDevice for CpalDevice {
    type Stream = CpalStream;

    #[track_caller]
    #[instrument(skip(self))]
    fn acquire(&mut self) -> CoreResult<(CpalStream, Receiver<CaptureEvent>)> {
        let location = Location::caller();
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| BoothError::DeviceUnavailable {
                reason: "No input device found".to_string(),
                location: ErrorLocation::from(location),
            })?;

        let supported = device.default_input_config().map_err(|e| match e {
            DefaultStreamConfigError::DeviceNotAvailable => BoothError::DeviceUnavailable {
                reason: format!("Input device not available: {}", e),
                location: ErrorLocation::from(location),
            },
            other => BoothError::DeviceError {
                reason: format!("Failed to get config: {}", other),
                location: ErrorLocation::from(location),
            },
        })?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let format = CaptureFormat {
            sample_rate: config.sample_rate,
            channels: config.channels,
        };

        info!(
            device_id = ?device.id(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            sample_format = ?sample_format,
            "Capture device acquired"
        );

        let (event_tx, event_rx) = mpsc::channel();
        let shared = CallbackShared {
            events: event_tx,
            tap: SignalTap::default(),
            paused: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
        };

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, shared.clone()),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, shared.clone()),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, shared.clone()),
            SampleFormat::I32 => build_stream::<i32>(&device, &config, shared.clone()),
            other => Err(BoothError::DeviceError {
                reason: format!("Unsupported sample format: {:?}", other),
                location: ErrorLocation::from(location),
            }),
        }?;

        stream.play().map_err(|e| BoothError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(location),
        })?;

        info!("Audio capture started");

        Ok((
            CpalStream {
                stream: Some(stream),
                format,
                shared,
            },
            event_rx,
        ))
    }
}

/// State shared between the stream handle and the audio callback.
#[derive(Clone)]
struct CallbackShared {
    events: Sender<CaptureEvent>,
    tap: SignalTap,
    paused: Arc<AtomicBool>,
    /// Set before the stream is dropped so a late callback writes nothing.
    shutdown: Arc<AtomicBool>,
}

#[track_caller]
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    shared: CallbackShared,
) -> CoreResult<Stream>
where
    T: SizedSample + Send + 'static,
    f32: FromSample<T>,
{
    let location = Location::caller();
    let fault_tx = shared.events.clone();
    let mut converted: Vec<f32> = Vec::new();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if shared.shutdown.load(Ordering::Acquire) {
                    return;
                }
                converted.clear();
                converted.extend(data.iter().map(|&s| f32::from_sample(s)));

                // Metering continues while paused.
                shared.tap.write(&converted);

                if shared.paused.load(Ordering::Acquire) {
                    return;
                }
                // Receiver gone means the controller dropped the session.
                let _ = shared
                    .events
                    .send(CaptureEvent::DataAvailable(float32_payload(&converted)));
            },
            move |err| {
                error!("Audio stream error: {}", err);
                let _ = fault_tx.send(CaptureEvent::Fault(err.to_string()));
            },
            None,
        )
        .map_err(|e| match e {
            BuildStreamError::DeviceNotAvailable => BoothError::DeviceUnavailable {
                reason: format!("Input device not available: {}", e),
                location: ErrorLocation::from(location),
            },
            other => BoothError::DeviceError {
                reason: format!("Failed to build stream: {}", other),
                location: ErrorLocation::from(location),
            },
        })
}

/// Live cpal input stream. Native capture format is 32-bit float WAV.
pub struct CpalStream {
    stream: Option<Stream>,
    format: CaptureFormat,
    shared: CallbackShared,
}

impl CaptureStream for CpalStream {
    fn format(&self) -> CaptureFormat {
        self.format
    }

    fn pause(&mut self) -> CoreResult<()> {
        self.shared.paused.store(true, Ordering::Release);
        debug!("Chunk delivery paused");
        Ok(())
    }

    fn resume(&mut self) -> CoreResult<()> {
        self.shared.paused.store(false, Ordering::Release);
        debug!("Chunk delivery resumed");
        Ok(())
    }

    fn release(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.tap.close();

        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!(error = %e, "Failed to pause stream before release");
            }
            drop(stream);
            // Let any in-flight callback observe the shutdown flag.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped, device released");
        }
    }

    fn signal_tap(&self) -> SignalTap {
        self.shared.tap.clone()
    }

    fn finalize(&self, chunks: &[Vec<u8>]) -> CoreResult<EncodedBlob> {
        let bytes = encode_float32(self.format(), chunks)?;
        Ok(EncodedBlob::new(WAV_MIME_TYPE, bytes))
    }
}
