//! Values that may or may not be available yet.
//!
//! Collaborators (transformers, caches, error handlers) can answer either
//! immediately or later. [`Deferred`] lets them do both behind one return
//! type, so the embed pipeline is written once as an `async fn` and the
//! caller picks the scheduler.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt};

/// A value that is either ready now or produced by a boxed future.
///
/// Awaiting a [`Deferred::Ready`] value completes on the first poll without
/// suspending, so fully synchronous collaborators never yield.
///
/// # Example
///
/// ```
/// use embedder::Deferred;
///
/// let now: Deferred<'_, u32> = Deferred::ready(1);
/// let later: Deferred<'_, u32> = Deferred::pending(async { 2 });
///
/// assert!(now.is_ready());
/// assert_eq!(futures::executor::block_on(async { now.await + later.await }), 3);
/// ```
pub enum Deferred<'a, T> {
    /// Value computed synchronously.
    Ready(future::Ready<T>),
    /// Value produced asynchronously.
    Pending(BoxFuture<'a, T>),
}

impl<'a, T> Deferred<'a, T> {
    /// Wrap an already computed value.
    pub fn ready(value: T) -> Self {
        Deferred::Ready(future::ready(value))
    }

    /// Wrap a future.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'a,
    {
        Deferred::Pending(future.boxed())
    }

    /// Whether the value is available without polling a future.
    pub fn is_ready(&self) -> bool {
        matches!(self, Deferred::Ready(_))
    }
}

impl<T> Future for Deferred<'_, T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        match self.get_mut() {
            Deferred::Ready(ready) => Pin::new(ready).poll(cx),
            Deferred::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

impl<T> std::fmt::Debug for Deferred<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Deferred::Ready(_) => f.write_str("Deferred::Ready"),
            Deferred::Pending(_) => f.write_str("Deferred::Pending"),
        }
    }
}
