/*!
    Future handles for scheduled operations.
*/

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use beam_types::{Error, Result};

/**
    The settling half of a future handle.

    Settling consumes the deferred, so an operation resolves or rejects at
    most once.
*/
#[derive(Debug)]
pub struct Deferred<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> Deferred<T> {
    /**
        Settle the future. Returns false if the caller already dropped it.
    */
    pub fn settle(self, result: Result<T>) -> bool {
        self.tx.send(result).is_ok()
    }

    pub fn resolve(self, value: T) -> bool {
        self.settle(Ok(value))
    }

    pub fn reject(self, error: Error) -> bool {
        self.settle(Err(error))
    }
}

/**
    Create a connected deferred and future handle.
*/
pub fn deferred<T>() -> (Deferred<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Deferred { tx },
        Pending {
            state: State::Waiting(rx),
        },
    )
}

#[derive(Debug)]
enum State<T> {
    Waiting(oneshot::Receiver<Result<T>>),
    Rejected(Option<Error>),
}

/**
    A future handle for a scheduled operation.

    Resolves with the operation's output or rejects with an [`Error`]
    carrying a status code and the location the failure was detected.
    Dropping the handle does not cancel the operation.
*/
#[must_use = "a pending operation settles whether or not it is awaited"]
#[derive(Debug)]
pub struct Pending<T> {
    state: State<T>,
}

impl<T> Pending<T> {
    /**
        A handle that is already rejected, for requests refused before any
        work was scheduled.
    */
    pub fn rejected(error: Error) -> Self {
        Self {
            state: State::Rejected(Some(error)),
        }
    }

    /**
        Returns true if this handle was rejected without scheduling work.
    */
    pub fn is_rejected_early(&self) -> bool {
        matches!(self.state, State::Rejected(_))
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Waiting(rx) => Pin::new(rx).poll(cx).map(|received| {
                received.unwrap_or_else(|_| Err(Error::runtime("Operation was dropped before it settled.")))
            }),
            State::Rejected(error) => Poll::Ready(Err(error
                .take()
                .unwrap_or_else(|| Error::runtime("Operation was already awaited.")))),
        }
    }
}

#[cfg(test)]
mod tests {
    use beam_types::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn resolves_with_value() {
        let (deferred, pending) = deferred();
        assert!(deferred.resolve(7));
        assert_eq!(pending.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn rejects_with_error() {
        let (deferred, pending) = deferred::<()>();
        assert!(deferred.reject(Error::encode("nope")));
        assert_eq!(pending.await.unwrap_err().kind(), ErrorKind::Encode);
    }

    #[tokio::test]
    async fn dropped_deferred_is_a_runtime_error() {
        let (deferred, pending) = deferred::<()>();
        drop(deferred);
        let err = pending.await.unwrap_err();
        assert!(err.status().is_runtime());
    }

    #[tokio::test]
    async fn early_rejection() {
        let pending = Pending::<()>::rejected(Error::invalid_request("bad"));
        assert!(pending.is_rejected_early());
        assert_eq!(pending.await.unwrap_err().message(), "bad");
    }

    #[test]
    fn settling_after_drop_reports_false() {
        let (deferred, pending) = deferred::<()>();
        drop(pending);
        assert!(!deferred.resolve(()));
    }
}
