//! The components module contains the widget UI and its glue to the cores.

mod app;
mod audio_controller;
mod icons;
mod now_playing;
mod volume_control;

pub use app::*;
pub use audio_controller::*;
pub use icons::*;
pub use now_playing::*;
pub use volume_control::*;
