/// Logical playback state of the widget.
///
/// `volume` is kept as a plain integer so transforms can overshoot the valid
/// range; [`AudioCore::update`](super::AudioCore::update) clamps before the
/// state is stored or returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub paused: bool,
    pub volume: i32,
}

pub const MIN_VOLUME: i32 = 0;
pub const MAX_VOLUME: i32 = 100;

impl PlaybackState {
    /// Startup state: always paused, whatever volume was persisted.
    pub fn new(volume: u8) -> Self {
        Self {
            paused: true,
            volume: i32::from(volume),
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            volume: self.volume.clamp(MIN_VOLUME, MAX_VOLUME),
            ..self
        }
    }

    /// Volume actually applied to the media element.
    pub fn applied_volume(&self) -> i32 {
        if self.paused {
            0
        } else {
            self.volume.clamp(MIN_VOLUME, MAX_VOLUME)
        }
    }

    pub fn gain(&self) -> f64 {
        f64::from(self.applied_volume()) / 100.0
    }

    pub fn is_audible(&self) -> bool {
        self.applied_volume() > 0
    }

    /// Volume in storage representation. Only meaningful on clamped states.
    pub fn persisted_volume(&self) -> u8 {
        self.volume.clamp(MIN_VOLUME, MAX_VOLUME) as u8
    }
}

pub fn toggle_pause(state: PlaybackState) -> PlaybackState {
    PlaybackState {
        paused: !state.paused,
        ..state
    }
}

/// Relative volume change. Adjusting the volume also unmutes.
pub fn nudge_volume(delta: i32) -> impl FnOnce(PlaybackState) -> PlaybackState {
    move |state| PlaybackState {
        paused: false,
        volume: state.volume.saturating_add(delta),
    }
}

/// Absolute volume, as set by the slider. Also unmutes.
pub fn set_volume(volume: i32) -> impl FnOnce(PlaybackState) -> PlaybackState {
    move |_| PlaybackState {
        paused: false,
        volume,
    }
}

/// Discrete user input on the volume controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click,
    /// Raw vertical wheel delta; positive means scrolling down.
    Wheel { delta_y: f64 },
    Drag { value: i32 },
}

impl Gesture {
    pub fn apply(self, state: PlaybackState, wheel_step: i32) -> PlaybackState {
        match self {
            Gesture::Click => toggle_pause(state),
            Gesture::Wheel { delta_y } => {
                if delta_y == 0.0 || delta_y.is_nan() {
                    return state;
                }
                let direction = if delta_y > 0.0 { -1 } else { 1 };
                nudge_volume(direction * wheel_step)(state)
            }
            Gesture::Drag { value } => set_volume(value)(state),
        }
    }

    pub fn into_transform(self, wheel_step: i32) -> impl FnOnce(PlaybackState) -> PlaybackState {
        move |state| self.apply(state, wheel_step)
    }
}
