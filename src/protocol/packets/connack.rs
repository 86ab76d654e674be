use crate::error::{Error, Result};

/// MQTT v3.1 CONNECT return codes.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectReturnCode {
    Accepted = 0,
    UnacceptableProtocolVersion = 1,
    IdentifierRejected = 2,
    ServerUnavailable = 3,
    BadUsernameOrPassword = 4,
    NotAuthorized = 5,
}

impl ConnectReturnCode {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ConnectReturnCode::Accepted),
            1 => Ok(ConnectReturnCode::UnacceptableProtocolVersion),
            2 => Ok(ConnectReturnCode::IdentifierRejected),
            3 => Ok(ConnectReturnCode::ServerUnavailable),
            4 => Ok(ConnectReturnCode::BadUsernameOrPassword),
            5 => Ok(ConnectReturnCode::NotAuthorized),
            _ => Err(Error::Decode {
                reason: format!("invalid connect return code {}", value),
            }),
        }
    }
}

impl std::fmt::Display for ConnectReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConnectReturnCode::Accepted => "CONNECTION_ACCEPTED",
            ConnectReturnCode::UnacceptableProtocolVersion => "UNACCEPTABLE_PROTOCOL_VERSION",
            ConnectReturnCode::IdentifierRejected => "IDENTIFIER_REJECTED",
            ConnectReturnCode::ServerUnavailable => "SERVER_UNAVAILABLE",
            ConnectReturnCode::BadUsernameOrPassword => "BAD_USERNAME_OR_PASSWORD",
            ConnectReturnCode::NotAuthorized => "NOT_AUTHORIZED",
        };
        f.write_str(name)
    }
}

/// MQTT v3.1 CONNACK message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConnAckMessage {
    pub return_code: ConnectReturnCode,
}

impl ConnAckMessage {
    pub fn new(return_code: ConnectReturnCode) -> Self {
        ConnAckMessage { return_code }
    }
}

impl std::fmt::Display for ConnAckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ {} }}", self.return_code)
    }
}
