//! MQTT v3.1 message model and wire codec.

pub mod codec;
mod message;
mod message_type;
pub mod packets;
mod qos;

pub use codec::DecodeOptions;
pub use message::{FixedHeader, Message};
pub use message_type::MessageType;
pub use packets::{ConnAckMessage, ConnectMessage, ConnectReturnCode, Credentials, Will};
pub use qos::QoS;
