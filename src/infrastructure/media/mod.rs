//! Media probe adapters

pub mod wav_probe;

pub use wav_probe::WavProbe;
