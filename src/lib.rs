//! # aerobroker
//!
//! MQTT v3.1 broker library for flight-data messaging.
//!
//! The crate is a three-layer stack: one-shot promises and futures chained
//! through a single-threaded reactor, a position/limit byte buffer with
//! future-returning TCP I/O on top, and a bit-exact MQTT v3.1 codec driven
//! by a per-connection session loop.
//!
//! ## Features
//!
//! - **Promise/future pipeline** - one-shot results with blocking waits,
//!   combinators and `await` support
//! - **Buffered I/O** - explicit position/limit buffers staged through
//!   async TCP connections and acceptors
//! - **MQTT v3.1 codec** - CONNECT and CONNACK, bit-exact fixed header
//!   with variable-length encoding
//! - **Handler-driven sessions** - the host supplies a
//!   `fn(Message) -> Future<Message>` and the session pumps the
//!   request/response loop
//!
//! ## Limitations
//!
//! - CONNECT/CONNACK only; the remaining control packets are future work
//! - No persistent sessions, retained messages or QoS 1/2 delivery
//! - No TLS
//!
//! ## Example
//!
//! ```rust,ignore
//! use aerobroker::{
//!     ConnectReturnCode, Future, Message, MqttSession, Reactor, TcpAcceptor,
//! };
//!
//! let reactor = Reactor::new()?;
//! reactor.block_on(async {
//!     let acceptor = TcpAcceptor::bind(1883).await?;
//!     loop {
//!         let conn = acceptor.accept().await?;
//!         MqttSession::new(conn, |_request: Message| {
//!             Future::ready(Message::conn_ack(ConnectReturnCode::Accepted))
//!         })
//!         .start(&reactor);
//!     }
//! })
//! ```

pub mod concurrent;
pub mod error;
pub mod io;
pub mod protocol;
pub mod session;

// Convenience re-exports
pub use concurrent::{Future, Promise, Reactor, ReactorHandle, SharedState};
pub use error::{Attempt, Error, Result};
pub use io::{Buffer, Connection, TcpAcceptor, TcpConnection};
pub use protocol::{
    ConnAckMessage, ConnectMessage, ConnectReturnCode, Credentials, DecodeOptions, FixedHeader,
    Message, MessageType, QoS, Will,
};
pub use session::{MessageHandler, MqttSession, SessionConfig};
