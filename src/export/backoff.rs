//! Retry with exponential backoff for track-add calls.
//!
//! Platform add endpoints fail transiently under rate pressure. Each
//! add gets a small fixed budget of attempts with a doubling delay
//! between them; what happens after the budget is exhausted is the
//! caller's decision (Spotify aborts the export, YouTube and SoundCloud
//! count the track failed and move on).

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::domain::ExportError;

/// Run `op` up to `attempts` times, sleeping `first_delay`, then twice
/// that, and so on between attempts. Returns the first success or the
/// last error.
pub(crate) async fn with_backoff<T, F, Fut>(
    attempts: u32,
    first_delay: Duration,
    mut op: F,
) -> Result<T, ExportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExportError>>,
{
    let attempts = attempts.max(1);
    let mut delay = first_delay;

    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying after failure");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
