//! Platform-appropriate async sleep for polling loops.

use std::time::Duration;

/// Suspends the current task for `duration`.
///
/// WASM rides a browser timeout; native builds use tokio's timer.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    gloo_timers::future::TimeoutFuture::new(duration.as_millis() as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}
