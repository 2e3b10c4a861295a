//! Playback adapters

pub mod rodio_player;

pub use rodio_player::{RodioPlayer, RodioPlayerFactory};
