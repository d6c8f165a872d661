//! A minimal cooperative cancellation signal built on `tokio::sync::watch`,
//! shared by every stage that can suspend (EchoRipple/Posterior sleeps,
//! Consent waits, adapter calls).

use tokio::sync::watch;

/// `Never` avoids pairing every cancellation-less call (e.g. `submit`'s
/// convenience wrapper) with a `watch` channel and its sender; `Watch` is the
/// real cooperative-cancellation path paired with a `CancelHandle`.
#[derive(Clone)]
pub enum CancelToken {
    Never,
    Watch(watch::Receiver<bool>),
}

impl CancelToken {
    /// A token with no paired handle; `cancelled()` never resolves. Useful
    /// for call sites (and tests) that don't need cooperative cancellation.
    pub fn never() -> Self {
        CancelToken::Never
    }

    /// Resolves once the paired `CancelHandle::cancel()` has been called.
    /// A dropped handle (no more senders) is treated as "never cancels".
    pub async fn cancelled(&self) {
        match self {
            CancelToken::Never => std::future::pending::<()>().await,
            CancelToken::Watch(rx) => {
                let mut rx = rx.clone();
                if *rx.borrow() {
                    return;
                }
                while rx.changed().await.is_ok() {
                    if *rx.borrow() {
                        return;
                    }
                }
                std::future::pending::<()>().await;
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            CancelToken::Never => false,
            CancelToken::Watch(rx) => *rx.borrow(),
        }
    }
}

pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self(tx), CancelToken::Watch(rx))
    }

    pub fn cancel(&self) {
        let _ = self.0.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_resolves_after_cancel_is_called() {
        let (handle, token) = CancelHandle::new();
        assert!(!token.is_cancelled());
        handle.cancel();
        token.cancelled().await;
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn uncancelled_token_never_resolves_within_a_short_window() {
        let (_handle, token) = CancelHandle::new();
        let result = tokio::time::timeout(std::time::Duration::from_millis(20), token.cancelled()).await;
        assert!(result.is_err());
    }
}
