// Browser media backend built on a detached `HtmlAudioElement`.
use super::media::{MediaBackend, ERROR_RELOAD_DELAY, RELOAD_EVENTS};
use gloo_timers::callback::Timeout;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::HtmlAudioElement;

pub struct WebMedia {
    audio: Option<HtmlAudioElement>,
}

impl WebMedia {
    /// Create the element in its dormant configuration: source assigned,
    /// nothing preloaded, silent.
    pub fn new(src: &str) -> Self {
        let audio = match HtmlAudioElement::new() {
            Ok(audio) => audio,
            Err(err) => {
                warn!("failed to create audio element: {err:?}");
                return Self { audio: None };
            }
        };

        audio.set_cross_origin(Some("anonymous"));
        audio.set_preload("none");
        audio.set_volume(0.0);
        audio.set_src(src);

        Self { audio: Some(audio) }
    }
}

fn try_play(audio: &HtmlAudioElement) {
    match audio.play() {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    debug!("play() rejected: {err:?}");
                }
            });
        }
        Err(err) => debug!("play() threw: {err:?}"),
    }
}

fn listen(audio: &HtmlAudioElement, event: &str, callback: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
    if let Err(err) = audio.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        warn!("failed to attach `{event}` listener: {err:?}");
    }
    // Listeners live as long as the page; the element is never re-created.
    closure.forget();
}

impl MediaBackend for WebMedia {
    fn initialize(&mut self) {
        let Some(audio) = self.audio.as_ref() else {
            return;
        };

        let audio_for_play = audio.clone();
        listen(audio, "canplay", move || try_play(&audio_for_play));

        for event in RELOAD_EVENTS {
            let audio_for_reload = audio.clone();
            listen(audio, event, move || {
                info!(event, "live stream interrupted, reloading");
                audio_for_reload.load();
            });
        }

        // at most one delayed retry in flight
        let retry_pending = Rc::new(Cell::new(false));
        let audio_for_retry = audio.clone();
        listen(audio, "error", move || {
            if retry_pending.replace(true) {
                return;
            }
            warn!(
                delay_ms = ERROR_RELOAD_DELAY.as_millis() as u64,
                "live stream failed, retrying"
            );
            let audio = audio_for_retry.clone();
            let pending = retry_pending.clone();
            let delay_ms = ERROR_RELOAD_DELAY.as_millis() as u32;
            Timeout::new(delay_ms, move || {
                pending.set(false);
                audio.load();
            })
            .forget();
        });

        audio.load();
    }

    fn set_gain(&mut self, gain: f64) {
        if let Some(audio) = self.audio.as_ref() {
            audio.set_volume(gain);
        }
    }
}
