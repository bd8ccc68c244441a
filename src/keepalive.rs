//! Periodic status ping that keeps idle proxies from dropping the page's
//! long-lived connections. Responses are ignored.

use crate::utils::{sleep, HTTP_CLIENT};
use std::time::Duration;
use tracing::debug;

pub async fn run(url: String, interval: Duration) {
    loop {
        sleep(interval).await;
        match HTTP_CLIENT.get(&url).send().await {
            Ok(response) => debug!(status = response.status().as_u16(), "keep-alive ping"),
            Err(err) => debug!("keep-alive ping failed: {err}"),
        }
    }
}
