use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use crate::concurrent::promise::Promise;
use crate::concurrent::shared_state::SharedState;
use crate::error::{Attempt, Error, Result};

struct Cell<T> {
    result: Option<Attempt<T>>,
    waker: Option<Waker>,
}

type SharedCell<T> = Arc<(Mutex<Cell<T>>, Condvar)>;

/// Consumer half of a one-shot asynchronous result.
///
/// A future is obtained from a [`Promise`] and completes exactly once, with
/// either a value, a failure, or a broken-promise failure if the producer
/// goes away. The result can be consumed three ways:
///
/// - `await` it (the future integrates with any async runtime),
/// - block on it with [`get`](Future::get) / [`wait`](Future::wait) /
///   [`wait_for`](Future::wait_for) from outside the reactor thread,
/// - compose it with [`then`](Future::then), [`and_then`](Future::and_then)
///   or [`finally`](Future::finally), which consume the future and run the
///   continuation on whatever thread delivers the result.
pub struct Future<T> {
    state: Option<SharedState<T>>,
    cell: SharedCell<T>,
}

impl<T: Send + 'static> Future<T> {
    /// Binds a future to `state`, installing the default push handler that
    /// stores the result locally and wakes any waiter.
    pub(crate) fn attach(state: SharedState<T>) -> Self {
        let cell: SharedCell<T> = Arc::new((
            Mutex::new(Cell {
                result: None,
                waker: None,
            }),
            Condvar::new(),
        ));
        let handler_cell = Arc::clone(&cell);
        state.set_push_handler(move |result| {
            let (lock, condvar) = &*handler_cell;
            let mut cell = lock.lock().unwrap();
            cell.result = Some(result);
            if let Some(waker) = cell.waker.take() {
                waker.wake();
            }
            condvar.notify_all();
        });
        Future {
            state: Some(state),
            cell,
        }
    }

    /// A future that is already completed with `value`.
    pub fn ready(value: T) -> Self {
        let (mut promise, future) = Promise::pair();
        let _ = promise.set_value(value);
        future
    }

    /// A future that is already completed with `error`.
    pub fn failed(error: Error) -> Self {
        let (mut promise, future) = Promise::pair();
        let _ = promise.set_failure(error);
        future
    }

    pub fn is_completed(&self) -> bool {
        let (lock, _) = &*self.cell;
        lock.lock().unwrap().result.is_some()
    }

    /// Blocks until the result arrives and moves it out, consuming the
    /// future. Must not be called on the thread expected to deliver the
    /// result.
    pub fn get(self) -> Attempt<T> {
        let (lock, condvar) = &*self.cell;
        let mut cell = lock.lock().unwrap();
        loop {
            if let Some(result) = cell.result.take() {
                return result;
            }
            cell = condvar.wait(cell).unwrap();
        }
    }

    /// Blocks until the result arrives, leaving it in place for `get`.
    pub fn wait(&self) {
        let (lock, condvar) = &*self.cell;
        let mut cell = lock.lock().unwrap();
        while cell.result.is_none() {
            cell = condvar.wait(cell).unwrap();
        }
    }

    /// Blocks until the result arrives or `timeout` elapses.
    pub fn wait_for(&self, timeout: Duration) -> Result<()> {
        let (lock, condvar) = &*self.cell;
        let cell = lock.lock().unwrap();
        let (cell, wait_result) = condvar
            .wait_timeout_while(cell, timeout, |cell| cell.result.is_none())
            .unwrap();
        if wait_result.timed_out() && cell.result.is_none() {
            Err(Error::FutureTimeout)
        } else {
            Ok(())
        }
    }

    /// Maps the successful result through `f` when it arrives, producing a
    /// new future. An incoming failure bypasses `f`; a failure returned by
    /// `f` fails the new future. Consumes this future.
    pub fn then<U, F>(mut self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Attempt<U> + Send + 'static,
    {
        let (mut downstream, future) = Promise::pair();
        if let Some(state) = self.state.take() {
            state.set_push_handler(move |result| {
                let _ = downstream.set(result.and_then(f));
            });
            self.redeliver(&state);
        }
        future
    }

    /// Chains `f`, which produces a further future; the returned future
    /// completes when the inner one does. Consumes this future.
    pub fn and_then<U, F>(mut self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
    {
        let (downstream, future) = Promise::pair();
        if let Some(state) = self.state.take() {
            state.set_push_handler(move |result| {
                let mut downstream = downstream;
                match result {
                    Ok(value) => f(value).finally(move |inner| {
                        let _ = downstream.set(inner);
                    }),
                    Err(error) => {
                        let _ = downstream.set(Err(error));
                    }
                }
            });
            self.redeliver(&state);
        }
        future
    }

    /// Runs `f` with the final result when it arrives, successful or not.
    /// Consumes this future; no further value is produced.
    pub fn finally<F>(mut self, f: F)
    where
        F: FnOnce(Attempt<T>) + Send + 'static,
    {
        if let Some(state) = self.state.take() {
            state.set_push_handler(f);
            self.redeliver(&state);
        }
    }

    /// A result that already landed in the local cell (the default handler
    /// consumed the push) is fed back through the state so a freshly
    /// installed continuation still sees it.
    fn redeliver(&self, state: &SharedState<T>) {
        let stored = {
            let (lock, _) = &*self.cell;
            lock.lock().unwrap().result.take()
        };
        if let Some(result) = stored {
            state.push(result);
        }
    }
}

impl<T> Drop for Future<T> {
    fn drop(&mut self) {
        // an abandoned future must not keep its result sink installed
        if let Some(state) = self.state.take() {
            state.clear_push_handler();
        }
    }
}

impl<T: Send + 'static> std::future::Future for Future<T> {
    type Output = Attempt<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let (lock, _) = &*this.cell;
        let mut cell = lock.lock().unwrap();
        match cell.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                cell.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
