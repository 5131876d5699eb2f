//! Observable state wrapper for fallible operations.
//!
//! # Design
//! A [`Tracker`] runs an operation and mirrors its outcome into
//! `{data, loading, error}` state that consumers can poll. The outcome is
//! returned from `execute` as a plain `Result` — the single source of truth;
//! state is the observable copy of it, never a second channel carrying
//! different information.
//!
//! Every `execute` claims a generation. `reset` and any newer `execute` bump
//! it, so a settlement that arrives after it has been superseded is discarded
//! instead of racing: stale operations cannot overwrite newer state. The
//! operation itself is never interrupted — only its settlement is dropped.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Observable snapshot of an operation's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsyncState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> AsyncState<T> {
    fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Default for AsyncState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

struct Inner<T> {
    state: AsyncState<T>,
    generation: u64,
}

/// Shared handle around tracked state. Clones observe and drive the same
/// state; independent trackers are fully independent.
pub struct Tracker<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Tracker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Default for Tracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Tracker<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: AsyncState::idle(),
                generation: 0,
            })),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AsyncState<T> {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn data(&self) -> Option<T> {
        self.lock().state.data.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    /// Run `operation`, mirroring its outcome into state.
    ///
    /// Raises `loading` (clearing any previous error, keeping previous data
    /// visible) before the operation starts. On settlement the state becomes
    /// either `{data: Some(value), ..}` or `{error: Some(message), ..}` —
    /// unless this call was superseded by a newer `execute` or a `reset`
    /// while in flight, in which case the settlement is discarded and only
    /// the returned `Result` carries the outcome.
    pub fn execute<F, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };

        let result = operation();

        let mut inner = self.lock();
        if inner.generation == generation {
            inner.state = match &result {
                Ok(value) => AsyncState {
                    data: Some(value.clone()),
                    loading: false,
                    error: None,
                },
                Err(error) => AsyncState {
                    data: None,
                    loading: false,
                    error: Some(error.to_string()),
                },
            };
        } else {
            tracing::debug!("discarding superseded settlement");
        }
        result
    }

    /// Restore the idle state. An operation in flight is not interrupted,
    /// but its settlement will be discarded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = AsyncState::idle();
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
