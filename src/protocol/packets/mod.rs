mod connack;
mod connect;

pub use connack::{ConnAckMessage, ConnectReturnCode};
pub use connect::{ConnectMessage, Credentials, Will};
