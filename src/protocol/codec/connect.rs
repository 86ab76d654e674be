use crate::error::{Error, Result};
use crate::io::Buffer;
use crate::protocol::codec::types::{read_string, read_u16, string_len, write_string, write_u16};
use crate::protocol::codec::DecodeOptions;
use crate::protocol::packets::{ConnectMessage, Credentials, Will};
use crate::protocol::qos::QoS;

/// Protocol identifier of MQTT v3.1.
pub const PROTOCOL_NAME: &str = "MQIsdp";
pub const PROTOCOL_VERSION: u8 = 3;

/// Bytes before the payload: protocol name string, version byte, flags
/// byte and keep-alive.
const VARIABLE_HEADER_LEN: usize = 12;

const FLAG_USERNAME: u8 = 0x80;
const FLAG_PASSWORD: u8 = 0x40;
const FLAG_WILL_RETAIN: u8 = 0x20;
const FLAG_WILL: u8 = 0x04;
const FLAG_CLEAN_SESSION: u8 = 0x02;

/// Exact body length of `msg` once encoded; used to fill the fixed
/// header's remaining length before emission.
pub fn encoded_len(msg: &ConnectMessage) -> usize {
    VARIABLE_HEADER_LEN
        + string_len(&msg.client_id)
        + msg.will.as_ref().map_or(0, |will| {
            string_len(&will.topic) + string_len(&will.message)
        })
        + msg.credentials.as_ref().map_or(0, |credentials| {
            string_len(&credentials.username)
                + credentials
                    .password
                    .as_ref()
                    .map_or(0, |password| string_len(password))
        })
}

pub fn encode(msg: &ConnectMessage, buffer: &mut Buffer) -> Result<()> {
    write_string(PROTOCOL_NAME, buffer)?;
    buffer.write_u8(PROTOCOL_VERSION)?;
    buffer.write_u8(encode_flags(msg))?;
    write_u16(msg.keep_alive, buffer)?;
    write_string(&msg.client_id, buffer)?;

    if let Some(will) = &msg.will {
        write_string(&will.topic, buffer)?;
        write_string(&will.message, buffer)?;
    }
    if let Some(credentials) = &msg.credentials {
        write_string(&credentials.username, buffer)?;
        if let Some(password) = &credentials.password {
            write_string(password, buffer)?;
        }
    }
    Ok(())
}

fn encode_flags(msg: &ConnectMessage) -> u8 {
    let mut flags = 0u8;
    if msg.credentials.is_some() {
        flags |= FLAG_USERNAME;
    }
    if msg
        .credentials
        .as_ref()
        .is_some_and(|credentials| credentials.password.is_some())
    {
        flags |= FLAG_PASSWORD;
    }
    if let Some(will) = &msg.will {
        flags |= FLAG_WILL;
        flags |= (will.qos as u8) << 3;
        if will.retain {
            flags |= FLAG_WILL_RETAIN;
        }
    }
    if msg.clean_session {
        flags |= FLAG_CLEAN_SESSION;
    }
    flags
}

pub fn decode(buffer: &mut Buffer, options: &DecodeOptions) -> Result<ConnectMessage> {
    let proto_name = read_string(buffer)?;
    if proto_name != PROTOCOL_NAME {
        return Err(Error::Decode {
            reason: format!("invalid protocol name {:?}", proto_name),
        });
    }
    let proto_version = buffer.read_u8()?;
    if proto_version != PROTOCOL_VERSION {
        return Err(Error::Decode {
            reason: format!("invalid protocol version {}", proto_version),
        });
    }

    let flags = buffer.read_u8()?;
    let mut has_username = flags & FLAG_USERNAME != 0;
    let mut has_password = flags & FLAG_PASSWORD != 0;
    let will_retain = flags & FLAG_WILL_RETAIN != 0;
    let will_qos = QoS::from_u8((flags >> 3) & 0x03)?;
    let has_will = flags & FLAG_WILL != 0;
    let clean_session = flags & FLAG_CLEAN_SESSION != 0;

    let keep_alive = read_u16(buffer)?;
    let client_id = read_string(buffer)?;

    let will = if has_will {
        let topic = read_string(buffer)?;
        let message = read_string(buffer)?;
        Some(Will::new(topic, message, will_qos, will_retain))
    } else {
        None
    };

    let mut username = None;
    if has_username {
        match read_string(buffer) {
            Ok(value) => username = Some(value),
            Err(Error::BufferUnderflow { .. }) if options.lenient_credentials => {
                has_username = false;
            }
            Err(e) => return Err(e),
        }
    }
    let mut password = None;
    if has_password {
        match read_string(buffer) {
            Ok(value) => password = Some(value),
            Err(Error::BufferUnderflow { .. }) if options.lenient_credentials => {
                has_password = false;
            }
            Err(e) => return Err(e),
        }
    }
    if has_password && !has_username {
        return Err(Error::Decode {
            reason: "flag password is set, but username is missing".into(),
        });
    }

    Ok(ConnectMessage {
        client_id,
        credentials: username.map(|username| Credentials { username, password }),
        will,
        keep_alive,
        clean_session,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_strict(bytes: &[u8]) -> Result<ConnectMessage> {
        let mut buffer = Buffer::from_bytes(bytes);
        decode(&mut buffer, &DecodeOptions::default())
    }

    fn encode_to_vec(msg: &ConnectMessage) -> Vec<u8> {
        let mut buffer = Buffer::with_capacity(256);
        encode(msg, &mut buffer).unwrap();
        buffer.flip();
        let len = buffer.remaining();
        buffer.readable(len).to_vec()
    }

    // ===== DECODE TESTS =====

    #[test]
    fn test_decode_minimal() {
        let msg = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x03, // protocol version
            0x00, // connect flags
            0x00, 0x0A, // keep alive (10s)
            0x00, 0x03, b'a', b'p', b'v', // client identifier
        ])
        .unwrap();

        assert_eq!(msg.client_id, "apv");
        assert_eq!(msg.keep_alive, 10);
        assert!(msg.credentials.is_none());
        assert!(msg.will.is_none());
        assert!(!msg.clean_session);
    }

    #[test]
    fn test_decode_with_will() {
        let msg = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x03, // protocol version
            0x04, // connect flags (will)
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
            0x00, 0x03, b'X', b'Y', b'Z', // will topic
            0x00, 0x03, b'1', b'2', b'3', // will message
        ])
        .unwrap();

        let will = msg.will.unwrap();
        assert_eq!(will.topic, "XYZ");
        assert_eq!(will.message, "123");
        assert_eq!(will.qos, QoS::AtMostOnce);
        assert!(!will.retain);
        assert!(msg.credentials.is_none());
    }

    #[test]
    fn test_decode_with_username() {
        let msg = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x03, // protocol version
            0x80, // connect flags (username)
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
            0x00, 0x03, b'X', b'Y', b'Z', // username
        ])
        .unwrap();

        let credentials = msg.credentials.unwrap();
        assert_eq!(credentials.username, "XYZ");
        assert!(credentials.password.is_none());
    }

    #[test]
    fn test_decode_with_username_and_password() {
        let msg = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x03, // protocol version
            0xC0, // connect flags (username + password)
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
            0x00, 0x03, b'X', b'Y', b'Z', // username
            0x00, 0x03, b'1', b'2', b'3', // password
        ])
        .unwrap();

        let credentials = msg.credentials.unwrap();
        assert_eq!(credentials.username, "XYZ");
        assert_eq!(credentials.password.as_deref(), Some("123"));
    }

    #[test]
    fn test_decode_rejects_invalid_protocol_name() {
        let result = decode_strict(&[
            0x00, 0x04, b'A', b'B', b'C', b'D', // protocol name
            0x03, // protocol version
            0x00, // connect flags
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
        ]);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_decode_rejects_invalid_protocol_version() {
        let result = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x04, // protocol version (3.1.1, unsupported)
            0x00, // connect flags
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
        ]);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_decode_rejects_password_flag_without_username_flag() {
        let result = decode_strict(&[
            0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
            0x03, // protocol version
            0x40, // connect flags (password only)
            0x00, 0x0A, // keep alive
            0x00, 0x03, b'a', b'p', b'v', // client identifier
            0x00, 0x03, b'1', b'2', b'3', // password
        ]);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    const TRUNCATED_AFTER_CLIENT_ID: &[u8] = &[
        0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
        0x03, // protocol version
        0x80, // connect flags (username)
        0x00, 0x0A, // keep alive
        0x00, 0x03, b'a', b'p', b'v', // client identifier, then nothing
    ];

    #[test]
    fn test_strict_decode_fails_when_username_field_is_missing() {
        let result = decode_strict(TRUNCATED_AFTER_CLIENT_ID);
        assert!(matches!(result, Err(Error::BufferUnderflow { .. })));
    }

    #[test]
    fn test_lenient_decode_clears_username_claim_when_field_is_missing() {
        let mut buffer = Buffer::from_bytes(TRUNCATED_AFTER_CLIENT_ID);
        let msg = decode(&mut buffer, &DecodeOptions::lenient()).unwrap();
        assert_eq!(msg.client_id, "apv");
        assert!(msg.credentials.is_none());
    }

    #[test]
    fn test_lenient_decode_clears_both_credential_claims() {
        let mut bytes = TRUNCATED_AFTER_CLIENT_ID.to_vec();
        bytes[9] = 0xC0; // username + password claimed, neither present
        let mut buffer = Buffer::from_bytes(&bytes);
        let msg = decode(&mut buffer, &DecodeOptions::lenient()).unwrap();
        assert!(msg.credentials.is_none());
    }

    // ===== ENCODE TESTS =====

    #[test]
    fn test_encoded_len_just_client_id() {
        let msg = ConnectMessage::new("client", 10, false);
        assert_eq!(encoded_len(&msg), 20);
    }

    #[test]
    fn test_encoded_len_client_id_and_will() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.will = Some(Will::new("foo", "bar", QoS::AtMostOnce, false));
        assert_eq!(encoded_len(&msg), 30);
    }

    #[test]
    fn test_encoded_len_all_payload() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.credentials = Some(Credentials::new("john.barry", "socks"));
        msg.will = Some(Will::new("foo", "bar", QoS::AtMostOnce, false));
        assert_eq!(encoded_len(&msg), 49);
    }

    #[test]
    fn test_encode_simple_connect() {
        let msg = ConnectMessage::new("client", 10, false);
        let bytes = encode_to_vec(&msg);
        assert_eq!(
            bytes,
            [
                0x00, 0x06, b'M', b'Q', b'I', b's', b'd', b'p', // protocol name
                0x03, // protocol version
                0x00, // connect flags
                0x00, 0x0A, // keep alive
                0x00, 0x06, b'c', b'l', b'i', b'e', b'n', b't', // client identifier
            ]
        );
        assert_eq!(bytes.len(), encoded_len(&msg));
    }

    #[test]
    fn test_encode_flags_clean_session() {
        let msg = ConnectMessage::new("client", 10, true);
        assert_eq!(encode_to_vec(&msg)[9], 0x02);
    }

    #[test]
    fn test_encode_flags_username_and_password() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.credentials = Some(Credentials::new("username", "password"));
        assert_eq!(encode_to_vec(&msg)[9], 0xC0);
    }

    #[test]
    fn test_encode_flags_username_only() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.credentials = Some(Credentials::username_only("username"));
        assert_eq!(encode_to_vec(&msg)[9], 0x80);
    }

    #[test]
    fn test_encode_flags_will_qos1_retained() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.will = Some(Will::new("topic", "message", QoS::AtLeastOnce, true));
        assert_eq!(encode_to_vec(&msg)[9], 0x2C);
    }

    #[test]
    fn test_encode_flags_all() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.credentials = Some(Credentials::new("username", "password"));
        msg.will = Some(Will::new("topic", "message", QoS::ExactlyOnce, false));
        assert_eq!(encode_to_vec(&msg)[9], 0xD4);
    }

    // ===== ROUNDTRIP TESTS =====

    #[test]
    fn test_roundtrip_all_fields() {
        let mut msg = ConnectMessage::new("client", 10, false);
        msg.credentials = Some(Credentials::new("username", "password"));
        msg.will = Some(Will::new("topic", "message", QoS::ExactlyOnce, false));

        let bytes = encode_to_vec(&msg);
        assert_eq!(bytes.len(), encoded_len(&msg));
        let decoded = decode_strict(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_roundtrip_field_combinations() {
        let long_id = "x".repeat(64);
        let client_ids = ["", "a", long_id.as_str()];
        let keep_alives = [0u16, 30, 65_535];
        let wills = [
            None,
            Some(Will::new("alt/baro", "gone", QoS::AtLeastOnce, true)),
        ];
        let credentials = [
            None,
            Some(Credentials::username_only("pilot")),
            Some(Credentials::new("pilot", "wrench")),
        ];

        for client_id in client_ids {
            for keep_alive in keep_alives {
                for will in &wills {
                    for creds in &credentials {
                        for clean_session in [false, true] {
                            let msg = ConnectMessage {
                                client_id: client_id.to_string(),
                                credentials: creds.clone(),
                                will: will.clone(),
                                keep_alive,
                                clean_session,
                            };
                            let bytes = encode_to_vec(&msg);
                            assert_eq!(bytes.len(), encoded_len(&msg));
                            assert_eq!(decode_strict(&bytes).unwrap(), msg);
                        }
                    }
                }
            }
        }
    }
}
