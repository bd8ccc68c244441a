// Desktop media backend: drives an <audio> element inside the webview
// through a small JavaScript bridge.
use super::media::{MediaBackend, ERROR_RELOAD_DELAY, RELOAD_EVENTS};
use dioxus::prelude::*;
use serde::Serialize;
use tracing::warn;

// Idempotent: evaluating it again keeps the existing bridge and element.
const AUDIO_BRIDGE_JS: &str = r#"
(() => {
  if (window.__qaaAudioBridge) {
    return true;
  }

  let audio = null;
  let errorReload = null;

  const safePlay = async () => {
    try {
      await audio.play();
    } catch (_err) {}
  };

  const reload = () => {
    if (errorReload !== null) {
      clearTimeout(errorReload);
      errorReload = null;
    }
    audio.load();
  };

  const reloadAfterError = (delayMs) => {
    if (errorReload !== null) return;
    errorReload = setTimeout(() => {
      errorReload = null;
      audio.load();
    }, delayMs);
  };

  window.__qaaAudioBridge = {
    apply(cmd) {
      if (!cmd || typeof cmd.type !== "string") return;
      switch (cmd.type) {
        case "initialize":
          if (audio) return;
          audio = new Audio();
          audio.crossOrigin = "anonymous";
          audio.preload = "none";
          audio.volume = 0;
          audio.src = cmd.src;
          audio.addEventListener("canplay", safePlay);
          for (const event of cmd.reload_events) {
            audio.addEventListener(event, reload);
          }
          audio.addEventListener("error", () => reloadAfterError(cmd.error_reload_ms));
          audio.load();
          break;
        case "gain":
          if (!audio) return;
          audio.volume = Math.max(0, Math.min(1, Number(cmd.value) || 0));
          break;
      }
    },
  };
  return true;
})();
"#;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BridgeCommand<'a> {
    /// Creates the element on first use and starts buffering.
    Initialize {
        src: &'a str,
        reload_events: &'a [&'a str],
        error_reload_ms: u64,
    },
    Gain { value: f64 },
}

/// Script for one command. The bridge bootstrap runs first, so a command
/// still lands after the document was (re)loaded behind our back.
fn command_script(command: &BridgeCommand<'_>) -> Option<String> {
    let payload = match serde_json::to_string(command) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("failed to encode audio bridge command: {err}");
            return None;
        }
    };
    Some(format!(
        r#"{AUDIO_BRIDGE_JS}
        (function () {{
            const bridge = window.__qaaAudioBridge;
            if (!bridge) return false;
            bridge.apply({payload});
            return true;
        }})();"#
    ))
}

fn send(command: &BridgeCommand<'_>) {
    if let Some(script) = command_script(command) {
        let _ = document::eval(&script);
    }
}

pub struct BridgeMedia {
    src: String,
}

impl BridgeMedia {
    /// Nothing reaches the webview until the first command.
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
        }
    }
}

impl MediaBackend for BridgeMedia {
    fn initialize(&mut self) {
        send(&BridgeCommand::Initialize {
            src: &self.src,
            reload_events: &RELOAD_EVENTS,
            error_reload_ms: ERROR_RELOAD_DELAY.as_millis() as u64,
        });
    }

    fn set_gain(&mut self, gain: f64) {
        send(&BridgeCommand::Gain { value: gain });
    }
}
