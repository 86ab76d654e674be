use crate::concurrent::future::Future;
use crate::concurrent::shared_state::SharedState;
use crate::error::{Attempt, Error, Result};

/// Producer half of a one-shot asynchronous result.
///
/// A promise delivers exactly one result to its paired [`Future`], created
/// eagerly on construction. Delivering a second time fails with
/// [`Error::BadPromise`]; dropping a promise that never delivered pushes an
/// [`Error::BrokenPromise`] failure so the consumer is never left hanging.
pub struct Promise<T> {
    state: Option<SharedState<T>>,
    future: Option<Future<T>>,
}

impl<T: Send + 'static> Promise<T> {
    pub fn new() -> Self {
        let (mut promise, future) = Self::pair();
        promise.future = Some(future);
        promise
    }

    /// Creates a promise together with its future, for the common case
    /// where both ends are wired up immediately.
    pub fn pair() -> (Self, Future<T>) {
        let state = SharedState::new();
        let future = Future::attach(state.clone());
        (
            Promise {
                state: Some(state),
                future: None,
            },
            future,
        )
    }

    /// True until a result has been delivered.
    pub fn valid(&self) -> bool {
        self.state.is_some()
    }

    /// Returns the paired future. Callable once; a second call fails with
    /// [`Error::FutureAlreadyRetrieved`].
    pub fn future(&mut self) -> Result<Future<T>> {
        self.future.take().ok_or(Error::FutureAlreadyRetrieved)
    }

    /// Delivers `result` and invalidates the promise.
    pub fn set(&mut self, result: Attempt<T>) -> Result<()> {
        let state = self.state.take().ok_or(Error::BadPromise)?;
        state.push(result);
        Ok(())
    }

    pub fn set_value(&mut self, value: T) -> Result<()> {
        self.set(Ok(value))
    }

    pub fn set_failure(&mut self, error: Error) -> Result<()> {
        self.set(Err(error))
    }
}

impl<T: Send + 'static> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.push(Err(Error::BrokenPromise));
        }
    }
}
