use super::media::{MediaBackend, MediaHandle};
use super::state::PlaybackState;
use crate::db::{load_volume, VolumeStore};
use tracing::{debug, warn};

/// Owns the playback state, the media handle and the volume store.
pub struct AudioCore<B: MediaBackend, S: VolumeStore> {
    state: PlaybackState,
    media: MediaHandle<B>,
    store: S,
}

impl<B: MediaBackend, S: VolumeStore> AudioCore<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        let volume = load_volume(&store);
        debug!(volume, "restored volume");
        Self {
            state: PlaybackState::new(volume),
            media: MediaHandle::dormant(backend),
            store,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The single state transition entry point.
    ///
    /// The returned state is clamped and is what the UI should render.
    pub fn update<F>(&mut self, transform: F) -> PlaybackState
    where
        F: FnOnce(PlaybackState) -> PlaybackState,
    {
        let next = transform(self.state).clamped();

        if let Err(err) = self.store.write_volume(next.persisted_volume()) {
            warn!("failed to persist volume: {err}");
        }

        if next.is_audible() {
            self.media.ensure_initialized();
        }
        self.media.set_gain(next.gain());

        self.state = next;
        next
    }

    #[cfg(test)]
    fn media(&self) -> &MediaHandle<B> {
        &self.media
    }

    #[cfg(test)]
    fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::playback::media::RecordingMedia;
    use crate::playback::state::{nudge_volume, set_volume, toggle_pause, Gesture};

    fn core_with(store: MemoryStore) -> AudioCore<RecordingMedia, MemoryStore> {
        AudioCore::new(RecordingMedia::default(), store)
    }

    #[test]
    fn out_of_range_volumes_are_clamped() {
        let mut core = core_with(MemoryStore::default());
        for v in [-1000, -1, 101, 250, i32::MAX, i32::MIN] {
            let next = core.update(|s| PlaybackState { volume: v, ..s });
            assert!((0..=100).contains(&next.volume), "volume {v} not clamped");
            assert_eq!(core.state(), next);
        }
    }

    #[test]
    fn gain_tracks_applied_volume() {
        let mut core = core_with(MemoryStore::with_value("80"));
        let steps: Vec<Box<dyn FnOnce(PlaybackState) -> PlaybackState>> = vec![
            Box::new(toggle_pause),
            Box::new(nudge_volume(-30)),
            Box::new(toggle_pause),
            Box::new(set_volume(120)),
            Box::new(toggle_pause),
            Box::new(nudge_volume(-200)),
        ];

        let mut expected = Vec::new();
        for step in steps {
            let next = core.update(step);
            let applied = if next.paused { 0 } else { next.volume };
            assert_eq!(next.applied_volume(), applied);
            expected.push(f64::from(applied) / 100.0);
        }
        assert_eq!(core.media().backend().gains, expected);
    }

    #[test]
    fn silent_transitions_do_not_initialize() {
        let mut core = core_with(MemoryStore::default());
        core.update(|s| s);
        core.update(set_volume(0));
        core.update(|s| PlaybackState { paused: true, ..s });
        assert!(!core.media().is_initialized());
        assert_eq!(core.media().backend().initializations, 0);
    }

    #[test]
    fn initializes_once_on_first_audible_transition() {
        let mut core = core_with(MemoryStore::default());
        core.update(|s| s);
        core.update(toggle_pause);
        core.update(toggle_pause);
        core.update(toggle_pause);
        core.update(nudge_volume(-10));

        let backend = core.media().backend();
        assert_eq!(backend.initializations, 1);
        // first gain was applied while still dormant, second already live
        assert_eq!(backend.gains_while_live, vec![false, true, true, true, true]);
    }

    #[test]
    fn volume_persisted_every_transition() {
        let mut core = core_with(MemoryStore::default());
        core.update(toggle_pause);
        core.update(nudge_volume(-25));
        core.update(nudge_volume(500));
        core.update(toggle_pause);

        let store = core.into_store();
        assert_eq!(store.writes, vec![100, 75, 100, 100]);
    }

    #[test]
    fn restart_restores_volume_but_not_pause() {
        let mut core = core_with(MemoryStore::default());
        core.update(Gesture::Drag { value: 42 }.into_transform(5));
        assert!(!core.state().paused);

        let restarted = core_with(core.into_store());
        assert_eq!(
            restarted.state(),
            PlaybackState {
                paused: true,
                volume: 42
            }
        );
    }

    #[test]
    fn unavailable_storage_does_not_block_playback() {
        let store = MemoryStore {
            unavailable: true,
            ..MemoryStore::default()
        };
        let mut core = core_with(store);
        assert_eq!(core.state().volume, 100);

        let next = core.update(toggle_pause);
        assert!(!next.paused);
        assert_eq!(core.media().backend().initializations, 1);
        assert_eq!(core.media().backend().gains, vec![1.0]);
    }
}
