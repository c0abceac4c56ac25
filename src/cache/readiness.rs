//! Backend Readiness Module
//!
//! Two-state connection lifecycle (Connecting -> Ready | Failed) that every
//! cache operation waits on before touching the backend.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{CacheError, Result};

/// Observable connection state of a cache backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Connecting,
    Ready,
    /// Terminal. Carries the reason setup failed.
    Failed(String),
}

enum State<T> {
    Connecting,
    Ready(Arc<T>),
    Failed(String),
}

// == Readiness ==
/// Readiness gate around a backend handle of type `T`.
///
/// Operations issued while connecting queue behind the same setup; once the
/// state is terminal they either get the handle or fail fast with `NotReady`.
pub struct Readiness<T> {
    state: watch::Sender<State<T>>,
}

impl<T> Readiness<T> {
    /// Starts in `Connecting`.
    pub fn connecting() -> Self {
        let (state, _) = watch::channel(State::Connecting);
        Self { state }
    }

    /// Starts already `Ready` with `handle`.
    pub fn ready(handle: T) -> Self {
        Self::ready_shared(Arc::new(handle))
    }

    pub fn ready_shared(handle: Arc<T>) -> Self {
        let (state, _) = watch::channel(State::Ready(handle));
        Self { state }
    }

    pub fn mark_ready(&self, handle: Arc<T>) {
        self.state.send_replace(State::Ready(handle));
    }

    pub fn mark_failed(&self, reason: impl Into<String>) {
        self.state.send_replace(State::Failed(reason.into()));
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match &*self.state.borrow() {
            State::Connecting => Lifecycle::Connecting,
            State::Ready(_) => Lifecycle::Ready,
            State::Failed(reason) => Lifecycle::Failed(reason.clone()),
        }
    }

    /// Suspends until setup finishes, then hands out the backend.
    pub async fn wait(&self) -> Result<Arc<T>> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, State::Connecting))
            .await
            .map_err(|_| CacheError::NotReady("connection setup abandoned".to_string()))?;
        Self::resolve(&state)
    }

    /// Backend handle without waiting. Fails loudly when called before readiness.
    pub fn handle(&self) -> Result<Arc<T>> {
        Self::resolve(&self.state.borrow())
    }

    fn resolve(state: &State<T>) -> Result<Arc<T>> {
        match state {
            State::Ready(handle) => Ok(Arc::clone(handle)),
            State::Failed(reason) => Err(CacheError::NotReady(reason.clone())),
            State::Connecting => Err(CacheError::NotReady(
                "backend is still connecting".to_string(),
            )),
        }
    }
}

impl<T> std::fmt::Debug for Readiness<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Readiness")
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ready_immediately() {
        let readiness = Readiness::ready(7u32);
        assert_eq!(readiness.lifecycle(), Lifecycle::Ready);
        assert_eq!(*readiness.wait().await.unwrap(), 7);
        assert_eq!(*readiness.handle().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_handle_before_ready_fails_loudly() {
        let readiness: Readiness<u32> = Readiness::connecting();
        assert!(matches!(readiness.handle(), Err(CacheError::NotReady(_))));
    }

    #[tokio::test]
    async fn test_waiters_queue_until_ready() {
        let readiness = Arc::new(Readiness::connecting());

        let waiter = {
            let readiness = Arc::clone(&readiness);
            tokio::spawn(async move { readiness.wait().await.map(|h| *h) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        readiness.mark_ready(Arc::new(5u32));
        assert_eq!(waiter.await.unwrap().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_failure_releases_waiters() {
        let readiness: Arc<Readiness<u32>> = Arc::new(Readiness::connecting());

        let waiter = {
            let readiness = Arc::clone(&readiness);
            tokio::spawn(async move { readiness.wait().await.map(|h| *h) })
        };

        readiness.mark_failed("connection refused");
        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(CacheError::NotReady(reason)) if reason == "connection refused"));
        assert_eq!(
            readiness.lifecycle(),
            Lifecycle::Failed("connection refused".to_string())
        );
    }
}
