//! Live update channel: server-sent now-playing updates with reconnection.

mod channel;
mod field;
#[cfg(not(target_arch = "wasm32"))]
mod sse;
mod transport;

pub use channel::DisplayDispatcher;
pub use field::DisplayUpdate;

use channel::{run, LiveChannel};
use transport::PlatformTransport;

use crate::config::WidgetConfig;
use crate::utils::sleep;

/// Run the channel against the configured endpoint for the lifetime of the
/// page, feeding `dispatcher`.
pub async fn run_platform<D: DisplayDispatcher>(config: WidgetConfig, mut dispatcher: D) {
    let mut channel = LiveChannel::new(config.reconnect_delay);
    let mut transport = PlatformTransport::new(config.events_url());
    run(&mut channel, &mut transport, &mut dispatcher, sleep).await;
}
