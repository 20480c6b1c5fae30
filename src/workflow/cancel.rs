//! Cancellation signal for in-flight calls
//!
//! The caller keeps the [`CancelHandle`]; the flow receives a [`CancelToken`].
//! Cancelling aborts the awaited request; nothing is retried.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{AppError, AppResult};

/// Caller side; cancelling is idempotent
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Flow side
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Creates a linked handle/token pair
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token that never fires
    pub fn never() -> Self {
        let (_, token) = cancel_pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled; pends forever if the handle is gone
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Races `future` against the token
///
/// # Arguments
/// - `token`: cancellation signal
/// - `endpoint`: reported in the `Cancelled` error
/// - `future`: the request
pub async fn run_cancellable<T, F>(token: &CancelToken, endpoint: &str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    if token.is_cancelled() {
        return Err(AppError::cancelled(endpoint));
    }
    let mut token = token.clone();
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::cancelled(endpoint)),
        result = future => result,
    }
}
