//! Primitive field codecs shared by the message codecs. MQTT integer
//! fields are big-endian; strings are a big-endian u16 length followed by
//! that many bytes, no terminator.

use crate::error::{Error, Result};
use crate::io::Buffer;

pub fn read_u16(buffer: &mut Buffer) -> Result<u16> {
    let mut bytes = [0u8; 2];
    buffer.read_exact(&mut bytes)?;
    Ok(u16::from_be_bytes(bytes))
}

pub fn write_u16(value: u16, buffer: &mut Buffer) -> Result<()> {
    buffer.write_all(&value.to_be_bytes())
}

pub fn read_string(buffer: &mut Buffer) -> Result<String> {
    let len = read_u16(buffer)? as usize;
    buffer.read_string(len)
}

pub fn write_string(value: &str, buffer: &mut Buffer) -> Result<()> {
    if value.len() > u16::MAX as usize {
        return Err(Error::Encode {
            reason: format!("string of {} bytes exceeds the u16 length prefix", value.len()),
        });
    }
    write_u16(value.len() as u16, buffer)?;
    buffer.write_all(value.as_bytes())
}

/// Encoded size of a string field: length prefix plus content.
pub fn string_len(value: &str) -> usize {
    2 + value.len()
}
