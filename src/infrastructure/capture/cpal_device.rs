//! Cross-platform capture adapter using cpal
//!
//! Speech-oriented settings: mono, 16 kHz where the device supports it,
//! 16-bit PCM in a streaming WAV container. cpal exposes no echo-cancel or
//! noise-suppression knobs; those capture settings are honored by the OS
//! input pipeline where available.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use tokio::sync::{mpsc, oneshot, watch, Notify};

use super::wav_stream::{pcm16_bytes, streaming_wav_header};
use crate::application::ports::{CaptureDevice, CaptureError, CaptureSession, CaptureSettings};
use crate::domain::notes::AudioMimeType;

/// Preferred capture sample rate (speech band, keeps uploads small)
const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Samples retained for the analysis tap
const ANALYSIS_WINDOW: usize = 1024;

/// Thread poll step; chunk delivery still follows the configured interval
const TICK: Duration = Duration::from_millis(20);

/// Capture device adapter backed by cpal.
///
/// The stream lives on a dedicated thread because cpal streams are not Send;
/// the session communicates with it through atomics and channels.
pub struct CpalCaptureDevice;

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn acquire(
        &self,
        settings: CaptureSettings,
    ) -> Result<Box<dyn CaptureSession>, CaptureError> {
        let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();
        let (analysis_tx, analysis_rx) = watch::channel(Vec::new());
        let (ready_tx, ready_rx) = oneshot::channel();

        let running = Arc::new(AtomicBool::new(true));
        let flush_requested = Arc::new(AtomicBool::new(false));
        let flush_done = Arc::new(Notify::new());

        {
            let running = Arc::clone(&running);
            let flush_requested = Arc::clone(&flush_requested);
            let flush_done = Arc::clone(&flush_done);
            std::thread::spawn(move || {
                run_capture(
                    settings,
                    chunk_tx,
                    analysis_tx,
                    ready_tx,
                    running,
                    flush_requested,
                    flush_done,
                );
            });
        }

        match ready_rx.await {
            Ok(Ok(())) => Ok(Box::new(CpalCaptureSession {
                chunks: Some(chunk_rx),
                analysis: analysis_rx,
                running,
                flush_requested,
                flush_done,
            })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CaptureError::StartFailed("capture thread exited".into())),
        }
    }
}

struct CpalCaptureSession {
    chunks: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    analysis: watch::Receiver<Vec<f32>>,
    running: Arc<AtomicBool>,
    flush_requested: Arc<AtomicBool>,
    flush_done: Arc<Notify>,
}

#[async_trait]
impl CaptureSession for CpalCaptureSession {
    fn take_chunks(&mut self) -> Option<mpsc::UnboundedReceiver<Vec<u8>>> {
        self.chunks.take()
    }

    fn analysis(&self) -> watch::Receiver<Vec<f32>> {
        self.analysis.clone()
    }

    async fn flush(&mut self) -> Result<(), CaptureError> {
        self.flush_requested.store(true, Ordering::SeqCst);
        self.flush_done.notified().await;
        Ok(())
    }

    fn has_flush_signal(&self) -> bool {
        true
    }

    async fn release(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Wav
    }
}

impl Drop for CpalCaptureSession {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Get the default input device
fn get_input_device() -> Result<cpal::Device, CaptureError> {
    let host = cpal::default_host();
    host.default_input_device()
        .ok_or(CaptureError::PermissionDenied)
}

/// Get a suitable input configuration, preferring mono at the target rate
fn get_input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
    let supported_configs = device
        .supported_input_configs()
        .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

    let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

    for config in supported_configs {
        if config.sample_format() != SampleFormat::I16
            && config.sample_format() != SampleFormat::F32
        {
            continue;
        }

        let includes_target = config.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && config.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

        let is_better = match &best_config {
            None => true,
            Some(current) => {
                let fewer_channels = config.channels() < current.channels();
                let better_rate =
                    includes_target && current.min_sample_rate().0 > TARGET_SAMPLE_RATE;
                fewer_channels || better_rate
            }
        };
        if is_better {
            best_config = Some(config);
        }
    }

    let config_range =
        best_config.ok_or(CaptureError::StartFailed("No suitable config found".into()))?;

    let sample_rate = if config_range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
        && config_range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
    {
        SampleRate(TARGET_SAMPLE_RATE)
    } else {
        config_range.min_sample_rate()
    };

    let sample_format = config_range.sample_format();
    let config = StreamConfig {
        channels: config_range.channels(),
        sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };

    Ok((config, sample_format))
}

/// Mix interleaved frames down to mono
fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels == 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn run_capture(
    settings: CaptureSettings,
    chunk_tx: mpsc::UnboundedSender<Vec<u8>>,
    analysis_tx: watch::Sender<Vec<f32>>,
    ready_tx: oneshot::Sender<Result<(), CaptureError>>,
    running: Arc<AtomicBool>,
    flush_requested: Arc<AtomicBool>,
    flush_done: Arc<Notify>,
) {
    let device = match get_input_device() {
        Ok(device) => device,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let (config, sample_format) = match get_input_config(&device) {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let sample_rate = config.sample_rate.0;
    let channels = config.channels;

    let pending: Arc<StdMutex<Vec<i16>>> = Arc::new(StdMutex::new(Vec::new()));

    let stream_result = match sample_format {
        SampleFormat::I16 => {
            let pending = Arc::clone(&pending);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mono = stereo_to_mono(data, channels);
                    if let Ok(mut buffer) = pending.lock() {
                        buffer.extend_from_slice(&mono);
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
        }
        SampleFormat::F32 => {
            let pending = Arc::clone(&pending);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let i16_data: Vec<i16> = data.iter().map(|&s| (s * 32767.0) as i16).collect();
                    let mono = stereo_to_mono(&i16_data, channels);
                    if let Ok(mut buffer) = pending.lock() {
                        buffer.extend_from_slice(&mono);
                    }
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
        }
        _ => {
            let _ = ready_tx.send(Err(CaptureError::StartFailed(
                "Unsupported sample format".into(),
            )));
            return;
        }
    };

    let stream = match stream_result {
        Ok(stream) => stream,
        Err(e) => {
            // Acquisition rejected at the device layer reads as a denial
            let _ = ready_tx.send(Err(CaptureError::PermissionDenied));
            eprintln!("Failed to open input stream: {}", e);
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(CaptureError::StartFailed(e.to_string())));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    let mut wrote_header = false;
    let mut last_delivery = Instant::now();

    let deliver = |pending: &Arc<StdMutex<Vec<i16>>>, wrote_header: &mut bool| {
        let samples = {
            let mut buffer = match pending.lock() {
                Ok(buffer) => buffer,
                Err(_) => return,
            };
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            return;
        }

        let tail = samples.len().saturating_sub(ANALYSIS_WINDOW);
        let window: Vec<f32> = samples[tail..]
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect();
        let _ = analysis_tx.send(window);

        let mut chunk = Vec::new();
        if !*wrote_header {
            chunk = streaming_wav_header(sample_rate, 1, 16);
            *wrote_header = true;
        }
        chunk.extend_from_slice(&pcm16_bytes(&samples));
        let _ = chunk_tx.send(chunk);
    };

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(TICK);

        if flush_requested.swap(false, Ordering::SeqCst) {
            deliver(&pending, &mut wrote_header);
            flush_done.notify_one();
            last_delivery = Instant::now();
            continue;
        }

        if last_delivery.elapsed() >= settings.chunk_interval {
            deliver(&pending, &mut wrote_header);
            last_delivery = Instant::now();
        }
    }

    // Final drain in case the session was released without a flush
    deliver(&pending, &mut wrote_header);
    flush_done.notify_one();

    drop(stream);
    // chunk_tx drops here, closing the receiver once drained
}
