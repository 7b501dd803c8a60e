pub mod fixtures;
pub mod mocks;

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Wait for an async condition to become true
pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();

    while start.elapsed() < max_wait {
        if condition().await {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }

    false
}
