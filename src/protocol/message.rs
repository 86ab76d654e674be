use crate::protocol::message_type::MessageType;
use crate::protocol::packets::{ConnAckMessage, ConnectMessage, ConnectReturnCode};
use crate::protocol::qos::QoS;

/// First 2–5 bytes of every MQTT control packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedHeader {
    pub msg_type: MessageType,
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    /// Body length, encoded on the wire as a 1–4 byte varint.
    pub remaining_len: usize,
}

impl FixedHeader {
    /// Minimum encoded length: the type byte plus one length byte.
    pub const BASE_LEN: usize = 2;

    /// A header with no flags set, as emitted for broker responses.
    pub fn for_type(msg_type: MessageType, remaining_len: usize) -> Self {
        FixedHeader {
            msg_type,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_len,
        }
    }
}

impl std::fmt::Display for FixedHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ type: {}, dup: {}, qos: {}, ret: {}, len: {} }}",
            self.msg_type, self.dup, self.qos as u8, self.retain, self.remaining_len
        )
    }
}

/// A typed MQTT message, discriminated by its fixed header's type.
///
/// Further control packets slot in as new arms, each paired with a codec
/// branch in [`codec::message`](crate::protocol::codec::message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Connect(ConnectMessage),
    ConnAck(ConnAckMessage),
}

impl Message {
    pub fn conn_ack(return_code: ConnectReturnCode) -> Self {
        Message::ConnAck(ConnAckMessage::new(return_code))
    }

    pub fn msg_type(&self) -> MessageType {
        match self {
            Message::Connect(_) => MessageType::Connect,
            Message::ConnAck(_) => MessageType::ConnAck,
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Connect(msg) => write!(f, "CONNECT {}", msg),
            Message::ConnAck(msg) => write!(f, "CONNACK {}", msg),
        }
    }
}
