use std::time::Duration;
use tracing::info;

/// Media events after which the live buffer is stale and is fetched again
/// right away.
pub const RELOAD_EVENTS: [&str; 3] = ["pause", "ended", "stalled"];

/// A media `error` reloads after this delay, so an unreachable stream is
/// retried at the same pace as the live channel.
pub const ERROR_RELOAD_DELAY: Duration = Duration::from_millis(5000);

/// Platform side of the streaming audio resource.
///
/// Implementations are constructed dormant: source assigned, nothing
/// fetched, zero gain.
pub trait MediaBackend {
    /// Begin buffering and attach the recovery listeners: auto-play once
    /// ready, reload on [`RELOAD_EVENTS`] and after [`ERROR_RELOAD_DELAY`]
    /// on `error`.
    fn initialize(&mut self);
    fn set_gain(&mut self, gain: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Dormant,
    Initialized,
}

/// Single owner of the media backend with a one-way initialization gate.
pub struct MediaHandle<B> {
    backend: B,
    gate: Gate,
}

impl<B: MediaBackend> MediaHandle<B> {
    pub fn dormant(backend: B) -> Self {
        Self {
            backend,
            gate: Gate::Dormant,
        }
    }

    /// Initialize the backend unless that already happened. Returns `true`
    /// only for the call that performed the initialization.
    pub fn ensure_initialized(&mut self) -> bool {
        if self.gate == Gate::Initialized {
            return false;
        }
        self.gate = Gate::Initialized;
        info!("starting live stream");
        self.backend.initialize();
        true
    }

    #[cfg(test)]
    pub fn is_initialized(&self) -> bool {
        self.gate == Gate::Initialized
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.backend.set_gain(gain.clamp(0.0, 1.0));
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingMedia {
    pub initializations: usize,
    pub gains: Vec<f64>,
    /// Whether the backend was initialized when each gain was applied.
    pub gains_while_live: Vec<bool>,
}

#[cfg(test)]
impl MediaBackend for RecordingMedia {
    fn initialize(&mut self) {
        self.initializations += 1;
    }

    fn set_gain(&mut self, gain: f64) {
        self.gains.push(gain);
        self.gains_while_live.push(self.initializations > 0);
    }
}
