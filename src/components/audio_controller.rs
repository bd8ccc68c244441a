use crate::config::WidgetConfig;
use crate::db::PlatformStore;
use crate::playback::{Gesture, PlatformAudioCore, PlatformMedia, PlaybackState};
use crate::utils::cache_buster;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to the page's single audio core, provided as context.
#[derive(Clone)]
pub struct AudioController {
    core: Rc<RefCell<PlatformAudioCore>>,
    wheel_step: i32,
}

impl AudioController {
    pub fn new(config: &WidgetConfig) -> Self {
        let media = PlatformMedia::new(&config.stream_url(&cache_buster()));
        let core = PlatformAudioCore::new(media, PlatformStore::open());
        Self {
            core: Rc::new(RefCell::new(core)),
            wheel_step: config.wheel_step,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.core.borrow().state()
    }

    /// Run one user gesture through the core and return the committed state.
    pub fn gesture(&self, gesture: Gesture) -> PlaybackState {
        self.core
            .borrow_mut()
            .update(gesture.into_transform(self.wheel_step))
    }
}
