use crate::error::Result;
use crate::io::buffer::Buffer;
use std::future::Future;

/// Byte-stream endpoint with buffer-oriented asynchronous I/O.
///
/// `read` stages up to `nbytes` into the buffer's writable region and
/// `write` drains up to `nbytes` from its readable region; both advance the
/// buffer's position by what was actually transferred, so callers can chain
/// calls to satisfy a target length.
pub trait Connection {
    /// Reads until `nbytes` have been staged (or the buffer fills up) and
    /// returns the count.
    fn read(&mut self, buffer: &mut Buffer, nbytes: usize) -> impl Future<Output = Result<usize>> + Send;

    /// Writes until `nbytes` have been drained and returns the count.
    fn write(&mut self, buffer: &mut Buffer, nbytes: usize) -> impl Future<Output = Result<usize>> + Send;

    /// Shuts the connection down.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Reads into the buffer's whole remaining region.
pub async fn read_remaining<C: Connection>(conn: &mut C, buffer: &mut Buffer) -> Result<usize> {
    let nbytes = buffer.remaining();
    conn.read(buffer, nbytes).await
}

/// Writes the buffer's whole remaining region.
pub async fn write_remaining<C: Connection>(conn: &mut C, buffer: &mut Buffer) -> Result<usize> {
    let nbytes = buffer.remaining();
    conn.write(buffer, nbytes).await
}
