//! Whole-message dispatch: branches on the fixed header's type and
//! delegates to the per-message codecs.

use crate::error::{Error, Result};
use crate::io::Buffer;
use crate::protocol::codec::{connack, connect, fixed_header, DecodeOptions};
use crate::protocol::message::{FixedHeader, Message};
use crate::protocol::message_type::MessageType;

/// Decodes a message body of the type named by `header`.
pub fn decode_body(
    header: &FixedHeader,
    buffer: &mut Buffer,
    options: &DecodeOptions,
) -> Result<Message> {
    match header.msg_type {
        MessageType::Connect => Ok(Message::Connect(connect::decode(buffer, options)?)),
        MessageType::ConnAck => Ok(Message::ConnAck(connack::decode(buffer)?)),
        other => Err(Error::Decode {
            reason: format!("cannot decode message of unhandled type {}", other),
        }),
    }
}

/// Exact encoded body length of `msg`.
pub fn encoded_body_len(msg: &Message) -> usize {
    match msg {
        Message::Connect(connect_msg) => connect::encoded_len(connect_msg),
        Message::ConnAck(_) => connack::ENCODED_LEN,
    }
}

/// Encodes `msg` complete with its fixed header, whose remaining length is
/// recomputed from the body.
pub fn encode(msg: &Message, buffer: &mut Buffer) -> Result<()> {
    let header = FixedHeader::for_type(msg.msg_type(), encoded_body_len(msg));
    fixed_header::encode(&header, buffer)?;
    match msg {
        Message::Connect(connect_msg) => connect::encode(connect_msg, buffer),
        Message::ConnAck(connack_msg) => connack::encode(connack_msg, buffer),
    }
}
