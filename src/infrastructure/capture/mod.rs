//! Capture adapters

pub mod cpal_device;
pub mod wav_stream;

pub use cpal_device::CpalCaptureDevice;
