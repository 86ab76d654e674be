use crate::error::Result;
use crate::io::Buffer;
use crate::protocol::packets::{ConnAckMessage, ConnectReturnCode};

/// CONNACK body: a reserved byte and the return code.
pub const ENCODED_LEN: usize = 2;

pub fn decode(buffer: &mut Buffer) -> Result<ConnAckMessage> {
    buffer.read_u8()?; // first byte is reserved and unused
    let return_code = ConnectReturnCode::from_u8(buffer.read_u8()?)?;
    Ok(ConnAckMessage::new(return_code))
}

pub fn encode(msg: &ConnAckMessage, buffer: &mut Buffer) -> Result<()> {
    buffer.write_u8(0x00)?; // first byte is reserved and unused
    buffer.write_u8(msg.return_code as u8)
}
