use anyhow::{Error, anyhow};
use std::future::Future;
use tracing::debug;

/// Runs an async operation against each endpoint in turn until one succeeds
///
/// # Parameters
/// - `endpoints`: Candidates, tried in order
/// - `operation`: Closure returning a future for one endpoint
///
/// # Returns
/// The first successful result, or the last error once every endpoint failed
pub async fn with_fallback<'a, E, F, Fut, T>(endpoints: &'a [E], mut operation: F) -> Result<T, Error>
where
    F: FnMut(&'a E) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let total = endpoints.len();
    let mut last_err = None;
    for (attempt, endpoint) in endpoints.iter().enumerate() {
        match operation(endpoint).await {
            Ok(val) => return Ok(val),
            Err(err) => {
                debug!(
                    "Endpoint {}/{} failed: {:#}. Trying next...",
                    attempt + 1,
                    total,
                    err
                );
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => Err(err.context(format!("All {total} endpoints failed"))),
        None => Err(anyhow!("No endpoints configured")),
    }
}
