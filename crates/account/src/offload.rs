//! Blocking-pool offload for the async account operations

use ecsign_crypto::{CryptoError, CryptoResult};

/// Run a synchronous operation on tokio's blocking pool.
///
/// A task that panics or is cancelled surfaces as `PrimitiveFailure`.
pub(crate) async fn run_blocking<F, T>(operation: F) -> CryptoResult<T>
where
    F: FnOnce() -> CryptoResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| CryptoError::PrimitiveFailure(format!("blocking task failed: {}", e)))?
}
