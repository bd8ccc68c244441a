//! Audio control core: playback state, transitions and the lazily
//! initialized live stream.

mod controller;
mod media;
#[cfg(not(target_arch = "wasm32"))]
mod native_media;
mod state;
#[cfg(target_arch = "wasm32")]
mod web_media;

pub use controller::AudioCore;
#[cfg(not(target_arch = "wasm32"))]
pub use native_media::BridgeMedia as PlatformMedia;
pub use state::{Gesture, PlaybackState};
#[cfg(target_arch = "wasm32")]
pub use web_media::WebMedia as PlatformMedia;

use crate::db::PlatformStore;

/// The audio core as wired for the running platform.
pub type PlatformAudioCore = AudioCore<PlatformMedia, PlatformStore>;
