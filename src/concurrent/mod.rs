//! One-shot asynchronous results and the event loop that completes them.
//!
//! A [`Promise`] and its [`Future`] rendezvous through a [`SharedState`]
//! cell; the [`Reactor`] is the single-threaded loop that sessions and I/O
//! completions are posted to.

mod future;
mod promise;
mod reactor;
mod shared_state;

pub use future::Future;
pub use promise::Promise;
pub use reactor::{Reactor, ReactorHandle};
pub use shared_state::SharedState;
