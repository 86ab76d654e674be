use crate::error::{Error, Result};

/// Default capacity for session I/O buffers (64 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Byte buffer with explicit position and limit cursors.
///
/// A buffer is always in one of two modes. In write mode the limit equals
/// the capacity and writes advance the position. `flip()` moves the buffer
/// into read mode: the limit drops to the old position and the position
/// rewinds to zero, so reads consume exactly the bytes just staged.
/// `reset()` returns to write mode.
///
/// The invariant `pos <= limit <= size` holds at all times; cursor setters
/// clamp rather than fail.
#[derive(Debug)]
pub struct Buffer {
    data: Box<[u8]>,
    pos: usize,
    limit: usize,
}

impl Buffer {
    /// Creates a buffer with the default capacity, in write mode.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Creates a buffer with the given capacity, in write mode.
    pub fn with_capacity(capacity: usize) -> Self {
        Buffer {
            data: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            limit: capacity,
        }
    }

    /// Creates a buffer sized to `bytes`, filled with them and flipped
    /// ready for reading.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::with_capacity(bytes.len());
        buffer.write(bytes);
        buffer.flip();
        buffer
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the limit.
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Moves the position, clamping to the limit. Returns the new position.
    pub fn set_pos(&mut self, new_pos: usize) -> usize {
        self.pos = new_pos.min(self.limit);
        self.pos
    }

    /// Advances the position, clamping to the limit.
    pub fn inc_pos(&mut self, inc: usize) -> usize {
        self.set_pos(self.pos.saturating_add(inc))
    }

    /// Rewinds the position, clamping to zero.
    pub fn dec_pos(&mut self, dec: usize) -> usize {
        self.set_pos(self.pos.saturating_sub(dec))
    }

    /// Alias of `inc_pos` for skipping over bytes while reading.
    pub fn skip(&mut self, nbytes: usize) -> usize {
        self.inc_pos(nbytes)
    }

    /// The byte at the current position, if any remain.
    pub fn first(&self) -> Option<u8> {
        if self.pos < self.limit {
            Some(self.data[self.pos])
        } else {
            None
        }
    }

    /// The byte just below the limit, if the limit is non-zero.
    pub fn last(&self) -> Option<u8> {
        if self.limit > 0 {
            Some(self.data[self.limit - 1])
        } else {
            None
        }
    }

    /// Switches to read mode: the staged bytes become the readable window.
    pub fn flip(&mut self) {
        self.limit = self.pos;
        self.pos = 0;
    }

    /// Switches back to write mode with the position rewound.
    pub fn reset(&mut self) {
        self.limit = self.data.len();
        self.pos = 0;
    }

    /// Copies up to `src.len()` bytes in, bounded by the remaining space.
    /// Returns how many bytes were copied.
    pub fn write(&mut self, src: &[u8]) -> usize {
        let nbytes = self.remaining().min(src.len());
        self.data[self.pos..self.pos + nbytes].copy_from_slice(&src[..nbytes]);
        self.pos += nbytes;
        nbytes
    }

    /// Copies all of `src` in, or fails without writing anything.
    pub fn write_all(&mut self, src: &[u8]) -> Result<()> {
        if self.remaining() < src.len() {
            return Err(Error::BufferOverflow {
                requested: src.len(),
                remaining: self.remaining(),
            });
        }
        self.write(src);
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    /// Copies the other buffer's remaining bytes in, without advancing the
    /// other buffer's position. Returns how many bytes were copied.
    pub fn write_buffer(&mut self, other: &Buffer) -> usize {
        self.write(&other.data[other.pos..other.limit])
    }

    /// Copies up to `dst.len()` bytes out, bounded by the remaining bytes.
    /// Returns how many bytes were copied.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let nbytes = self.remaining().min(dst.len());
        dst[..nbytes].copy_from_slice(&self.data[self.pos..self.pos + nbytes]);
        self.pos += nbytes;
        nbytes
    }

    /// Fills all of `dst`, or fails without consuming anything.
    pub fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        if self.remaining() < dst.len() {
            return Err(Error::BufferUnderflow {
                requested: dst.len(),
                remaining: self.remaining(),
            });
        }
        self.read(dst);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Reads `len` bytes as a UTF-8 string.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| Error::Decode {
            reason: format!("string of {} bytes is not valid UTF-8", len),
        })
    }

    /// The writable region starting at the position, at most `nbytes` long.
    pub fn writable(&mut self, nbytes: usize) -> &mut [u8] {
        let end = self.limit.min(self.pos + nbytes);
        &mut self.data[self.pos..end]
    }

    /// The readable region starting at the position, at most `nbytes` long.
    pub fn readable(&self, nbytes: usize) -> &[u8] {
        let end = self.limit.min(self.pos + nbytes);
        &self.data[self.pos..end]
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "buffer {{ size: {}, limit: {}, pos: {} }}",
            self.size(),
            self.limit,
            self.pos
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_in_write_mode() {
        let buffer = Buffer::with_capacity(16);
        assert_eq!(buffer.size(), 16);
        assert_eq!(buffer.limit(), 16);
        assert_eq!(buffer.pos(), 0);
        assert_eq!(buffer.remaining(), 16);
    }

    #[test]
    fn test_write_advances_pos() {
        let mut buffer = Buffer::with_capacity(16);
        assert_eq!(buffer.write(&[1, 2, 3]), 3);
        assert_eq!(buffer.pos(), 3);
        assert_eq!(buffer.remaining(), 13);
    }

    #[test]
    fn test_write_is_bounded_by_remaining() {
        let mut buffer = Buffer::with_capacity(4);
        assert_eq!(buffer.write(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(buffer.pos(), 4);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_write_all_fails_without_partial_write() {
        let mut buffer = Buffer::with_capacity(4);
        buffer.write(&[1, 2]);
        let result = buffer.write_all(&[3, 4, 5]);
        assert_eq!(
            result,
            Err(Error::BufferOverflow {
                requested: 3,
                remaining: 2,
            })
        );
        // nothing was staged by the failed write
        assert_eq!(buffer.pos(), 2);
    }

    #[test]
    fn test_flip_then_read_back() {
        let mut buffer = Buffer::with_capacity(16);
        buffer.write(&[0xAA, 0xBB, 0xCC]);
        buffer.flip();
        assert_eq!(buffer.limit(), 3);
        assert_eq!(buffer.pos(), 0);

        let mut out = [0u8; 3];
        buffer.read_exact(&mut out).unwrap();
        assert_eq!(out, [0xAA, 0xBB, 0xCC]);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_flip_then_reset_restores_write_mode() {
        let mut buffer = Buffer::with_capacity(16);
        buffer.write(&[1, 2, 3]);
        buffer.flip();
        buffer.reset();
        assert_eq!(buffer.pos(), 0);
        assert_eq!(buffer.limit(), 16);
    }

    #[test]
    fn test_read_exact_fails_without_consuming() {
        let mut buffer = Buffer::from_bytes(&[1, 2]);
        let mut out = [0u8; 3];
        let result = buffer.read_exact(&mut out);
        assert_eq!(
            result,
            Err(Error::BufferUnderflow {
                requested: 3,
                remaining: 2,
            })
        );
        assert_eq!(buffer.pos(), 0);
    }

    #[test]
    fn test_set_pos_clamps_to_limit() {
        let mut buffer = Buffer::from_bytes(&[1, 2, 3]);
        assert_eq!(buffer.set_pos(100), 3);
        assert_eq!(buffer.dec_pos(1), 2);
        assert_eq!(buffer.dec_pos(100), 0);
        assert_eq!(buffer.inc_pos(2), 2);
        assert_eq!(buffer.skip(5), 3);
    }

    #[test]
    fn test_first_and_last() {
        let mut buffer = Buffer::from_bytes(&[0x10, 0x20, 0x30]);
        assert_eq!(buffer.first(), Some(0x10));
        assert_eq!(buffer.last(), Some(0x30));
        buffer.skip(3);
        assert_eq!(buffer.first(), None);

        let empty = Buffer::from_bytes(&[]);
        assert_eq!(empty.last(), None);
    }

    #[test]
    fn test_write_buffer_leaves_source_untouched() {
        let source = Buffer::from_bytes(&[7, 8, 9]);
        let mut dest = Buffer::with_capacity(16);
        assert_eq!(dest.write_buffer(&source), 3);
        assert_eq!(source.pos(), 0);
        assert_eq!(source.remaining(), 3);

        dest.flip();
        let mut out = [0u8; 3];
        dest.read_exact(&mut out).unwrap();
        assert_eq!(out, [7, 8, 9]);
    }

    #[test]
    fn test_read_string() {
        let mut buffer = Buffer::from_bytes(b"MQIsdp!");
        assert_eq!(buffer.read_string(6).unwrap(), "MQIsdp");
        assert_eq!(buffer.remaining(), 1);
        assert!(buffer.read_string(2).is_err());
    }

    #[test]
    fn test_writable_window_is_bounded() {
        let mut buffer = Buffer::with_capacity(4);
        buffer.write(&[1, 2]);
        assert_eq!(buffer.writable(10).len(), 2);
        assert_eq!(buffer.writable(1).len(), 1);
    }

    #[test]
    fn test_cursor_invariant_holds_through_mode_changes() {
        let mut buffer = Buffer::with_capacity(8);
        buffer.write(&[1, 2, 3, 4, 5]);
        assert!(buffer.pos() <= buffer.limit() && buffer.limit() <= buffer.size());
        buffer.flip();
        assert!(buffer.pos() <= buffer.limit() && buffer.limit() <= buffer.size());
        buffer.skip(2);
        assert!(buffer.pos() <= buffer.limit() && buffer.limit() <= buffer.size());
        buffer.reset();
        assert!(buffer.pos() <= buffer.limit() && buffer.limit() <= buffer.size());
    }
}
