use std::sync::Arc;

use tokio::sync::Notify;

/// Single-threaded event loop that tasks and I/O completions are posted to.
///
/// The reactor wraps a current-thread runtime: every task posted through
/// [`execute`](Reactor::execute) runs on the one driving thread, in FIFO
/// order, while [`run`](Reactor::run) or [`block_on`](Reactor::block_on) is
/// pumping it. Sessions pinned to a reactor therefore never race each other.
pub struct Reactor {
    runtime: tokio::runtime::Runtime,
    shutdown: Arc<Notify>,
}

/// Cheap handle for posting work or stopping the reactor from inside a
/// task or from another thread.
#[derive(Clone)]
pub struct ReactorHandle {
    runtime: tokio::runtime::Handle,
    shutdown: Arc<Notify>,
}

impl Reactor {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        Ok(Reactor {
            runtime,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Posts a task. It runs once the reactor is being driven.
    pub fn execute<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(task);
    }

    /// Drives posted tasks until [`stop`](Reactor::stop) is called.
    pub fn run(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        self.runtime.block_on(async move {
            shutdown.notified().await;
        });
    }

    /// Makes the next (or current) `run` return.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }

    /// Drives a single future to completion, pumping posted tasks while it
    /// is pending.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn handle(&self) -> ReactorHandle {
        ReactorHandle {
            runtime: self.runtime.handle().clone(),
            shutdown: Arc::clone(&self.shutdown),
        }
    }
}

impl ReactorHandle {
    /// Posts a task onto the reactor this handle belongs to.
    pub fn execute<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(task);
    }

    pub fn stop(&self) {
        self.shutdown.notify_one();
    }
}
