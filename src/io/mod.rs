//! Buffered byte-oriented I/O: the position/limit [`Buffer`] and the
//! TCP transport that stages bytes through it.

mod buffer;
mod connection;
mod tcp;

pub use buffer::{Buffer, DEFAULT_BUFFER_CAPACITY};
pub use connection::{read_remaining, write_remaining, Connection};
pub use tcp::{resolve, tcp_connect, TcpAcceptor, TcpConnection};
