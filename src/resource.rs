// Result envelope emitted by repository operations.
// A Loading value followed by exactly one Success or Error, delivered as an async stream.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::error;

use crate::error::Result;

/// State of a fetch operation as seen by a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_))
    }

    /// Success and Error end a stream; Loading does not.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Resource::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}

impl<T> From<Result<T>> for Resource<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Resource::Success(data),
            Err(err) => Resource::Error(err.to_string()),
        }
    }
}

/// Stream of [`Resource`] values for one invocation.
///
/// Yields `Loading` first, then exactly one terminal value, then ends.
/// Dropping the stream or calling [`ResourceStream::cancel`] aborts the
/// underlying task; nothing is yielded after cancellation.
#[derive(Debug)]
pub struct ResourceStream<T> {
    rx: mpsc::Receiver<Resource<T>>,
    task: AbortHandle,
    cancelled: bool,
}

impl<T: Send + 'static> ResourceStream<T> {
    /// Queue `Loading`, then run `work` on a new task and emit its outcome.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        // Room for Loading plus the terminal value, so neither send waits.
        let (tx, rx) = mpsc::channel(2);
        let _ = tx.try_send(Resource::Loading);

        let handle = tokio::spawn(async move {
            let terminal = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => Resource::from(result),
                Err(_) => {
                    error!("fetch task panicked");
                    Resource::Error("Internal error while fetching data".to_string())
                }
            };
            let _ = tx.send(terminal).await;
        });

        Self {
            rx,
            task: handle.abort_handle(),
            cancelled: false,
        }
    }
}

impl<T> ResourceStream<T> {
    /// Receive the next value, or `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<Resource<T>> {
        if self.cancelled {
            return None;
        }
        self.rx.recv().await
    }

    /// Wait for the terminal value, skipping `Loading`.
    pub async fn terminal(mut self) -> Option<Resource<T>> {
        while let Some(value) = self.next().await {
            if value.is_terminal() {
                return Some(value);
            }
        }
        None
    }

    /// Abort the in-flight work. No further values are yielded.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.task.abort();
        self.rx.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl<T> Stream for ResourceStream<T> {
    type Item = Resource<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancelled {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

impl<T> Drop for ResourceStream<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DlightError;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_loading_then_success() {
        let stream = ResourceStream::spawn(async { Ok(7) });
        let values: Vec<_> = stream.collect().await;
        assert_eq!(values, vec![Resource::Loading, Resource::Success(7)]);
    }

    #[tokio::test]
    async fn test_loading_then_error() {
        let stream = ResourceStream::<u32>::spawn(async {
            Err(DlightError::NotFound("user zzz_unused".into()))
        });
        let values: Vec<_> = stream.collect().await;
        assert_eq!(
            values,
            vec![
                Resource::Loading,
                Resource::Error("Resource not found: user zzz_unused".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_loading_available_before_work_runs() {
        let mut stream = ResourceStream::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });
        let first = tokio::time::timeout(Duration::from_millis(100), stream.next()).await;
        assert_eq!(first.unwrap(), Some(Resource::Loading));
    }

    #[tokio::test]
    async fn test_cancel_stops_emission_and_work() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let mut stream = ResourceStream::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(1)
        });

        assert_eq!(stream.next().await, Some(Resource::Loading));
        stream.cancel();
        assert!(stream.is_cancelled());
        assert_eq!(stream.next().await, None);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panic_becomes_error() {
        let stream = ResourceStream::<u8>::spawn(async {
            if true {
                panic!("boom");
            }
            Ok(0)
        });
        let terminal = stream.terminal().await.unwrap();
        assert!(terminal.is_error());
    }

    #[test]
    fn test_resource_accessors() {
        let ok: Resource<u8> = Resource::Success(3);
        assert_eq!(ok.data(), Some(&3));
        assert!(ok.is_terminal());
        assert_eq!(ok.map(|v| v * 2), Resource::Success(6));

        let err: Resource<u8> = Resource::Error("nope".into());
        assert_eq!(err.error_message(), Some("nope"));
        assert!(err.into_data().is_none());

        assert!(!Resource::<u8>::Loading.is_terminal());
    }
}
