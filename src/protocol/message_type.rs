/// MQTT control message types (high nibble of the fixed header's first
/// byte).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum MessageType {
    Reserved0 = 0,
    Connect = 1,
    ConnAck = 2,
    Publish = 3,
    PubAck = 4,
    PubRec = 5,
    PubRel = 6,
    PubComp = 7,
    Subscribe = 8,
    SubAck = 9,
    Unsubscribe = 10,
    UnsubAck = 11,
    PingReq = 12,
    PingResp = 13,
    Disconnect = 14,
    Reserved15 = 15,
}

impl MessageType {
    /// Maps a 4-bit code to its message type. Total over `0..=15`; callers
    /// pass a masked nibble.
    pub const fn from_nibble(value: u8) -> Self {
        match value & 0x0F {
            0 => MessageType::Reserved0,
            1 => MessageType::Connect,
            2 => MessageType::ConnAck,
            3 => MessageType::Publish,
            4 => MessageType::PubAck,
            5 => MessageType::PubRec,
            6 => MessageType::PubRel,
            7 => MessageType::PubComp,
            8 => MessageType::Subscribe,
            9 => MessageType::SubAck,
            10 => MessageType::Unsubscribe,
            11 => MessageType::UnsubAck,
            12 => MessageType::PingReq,
            13 => MessageType::PingResp,
            14 => MessageType::Disconnect,
            _ => MessageType::Reserved15,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageType::Reserved0 => "RESERVED_0",
            MessageType::Connect => "CONNECT",
            MessageType::ConnAck => "CONNACK",
            MessageType::Publish => "PUBLISH",
            MessageType::PubAck => "PUBACK",
            MessageType::PubRec => "PUBREC",
            MessageType::PubRel => "PUBREL",
            MessageType::PubComp => "PUBCOMP",
            MessageType::Subscribe => "SUBSCRIBE",
            MessageType::SubAck => "SUBACK",
            MessageType::Unsubscribe => "UNSUBSCRIBE",
            MessageType::UnsubAck => "UNSUBACK",
            MessageType::PingReq => "PINGREQ",
            MessageType::PingResp => "PINGRESP",
            MessageType::Disconnect => "DISCONNECT",
            MessageType::Reserved15 => "RESERVED_15",
        };
        f.write_str(name)
    }
}
