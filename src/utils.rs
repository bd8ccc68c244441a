//! Utility helpers shared by the playback and live-update cores.
use once_cell::sync::Lazy;
use rand::Rng;
use std::time::Duration;

pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base36 token used to defeat caching of the audio stream.
pub fn cache_buster() -> String {
    let mut rng = rand::thread_rng();
    (0..11)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    let ms = duration.as_millis().min(u32::MAX as u128) as u32;
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_buster_is_base36() {
        let token = cache_buster();
        assert_eq!(token.len(), 11);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn cache_busters_differ() {
        assert_ne!(cache_buster(), cache_buster());
    }
}
