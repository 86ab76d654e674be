use std::sync::{Arc, Mutex};

use crate::error::{Attempt, Error};

type PushHandler<T> = Box<dyn FnOnce(Attempt<T>) + Send>;

struct State<T> {
    retained: Option<Attempt<T>>,
    handler: Option<PushHandler<T>>,
}

/// Single-slot rendezvous cell between a result producer and a one-shot
/// consumer handler.
///
/// The slot holds either a retained result (pushed before any consumer
/// registered) or a push handler, never both. Pushing with a handler
/// installed invokes it exactly once; installing a handler with a result
/// retained invokes it immediately and empties the retention slot. Handles
/// are cheap clones of the same underlying state.
///
/// Handlers run after the internal lock is released, so a handler may call
/// back into the state it was installed on.
pub struct SharedState<T> {
    inner: Arc<Mutex<State<T>>>,
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        SharedState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedState<T> {
    pub fn new() -> Self {
        SharedState {
            inner: Arc::new(Mutex::new(State {
                retained: None,
                handler: None,
            })),
        }
    }

    /// Installs `handler`, replacing any previous one. If a result is
    /// already retained it is moved out and the handler runs with it right
    /// away.
    pub fn set_push_handler<F>(&self, handler: F)
    where
        F: FnOnce(Attempt<T>) + Send + 'static,
    {
        let mut state = self.inner.lock().unwrap();
        if let Some(result) = state.retained.take() {
            drop(state);
            handler(result);
        } else {
            state.handler = Some(Box::new(handler));
        }
    }

    /// Drops any installed handler without touching the retention slot.
    pub fn clear_push_handler(&self) {
        self.inner.lock().unwrap().handler = None;
    }

    /// Delivers a result: to the installed handler if there is one
    /// (consuming it), otherwise into the retention slot.
    pub fn push(&self, result: Attempt<T>) {
        let mut state = self.inner.lock().unwrap();
        if let Some(handler) = state.handler.take() {
            drop(state);
            handler(result);
        } else {
            state.retained = Some(result);
        }
    }

    pub fn push_success(&self, value: T) {
        self.push(Ok(value));
    }

    pub fn push_failure(&self, error: Error) {
        self.push(Err(error));
    }
}

impl<T> Default for SharedState<T> {
    fn default() -> Self {
        Self::new()
    }
}
