//! Codec errors

use std::{io, string::FromUtf8Error};

use crate::control::ControlType;

/// Errors while unpacking a packet
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed fixed header: reserved packet type {0}")]
    MalformedHeader(u8),
    #[error("malformed remaining length")]
    MalformedLength,
    #[error("truncated packet body")]
    TruncatedBody,
    #[error(transparent)]
    ProtocolViolation(#[from] ProtocolViolation),
    #[error("packet too large ({size} > {max})")]
    PacketTooLarge { size: usize, max: usize },
    #[error(transparent)]
    IoError(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::TruncatedBody,
            _ => DecodeError::IoError(err),
        }
    }
}

impl From<FromUtf8Error> for DecodeError {
    fn from(_: FromUtf8Error) -> Self {
        DecodeError::ProtocolViolation(ProtocolViolation::InvalidUtf8)
    }
}

/// Well-formed bytes that break a rule of MQTT v3.1.1
#[derive(Debug, Eq, PartialEq, Clone, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("invalid quality of service ({0})")]
    InvalidQualityOfService(u8),
    #[error("invalid reserved flags")]
    InvalidReservedFlag,
    #[error("invalid protocol name ({0})")]
    InvalidProtocolName(String),
    #[error("unsupported protocol level ({0})")]
    UnsupportedProtocolLevel(u8),
    #[error("will qos or retain set without will flag")]
    InvalidWillFlags,
    #[error("password flag set without username flag")]
    PasswordWithoutUsername,
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("{0:?} carries no topic")]
    EmptyTopicList(ControlType),
    #[error("invalid subscribe return code ({0:#X})")]
    InvalidSubscribeReturnCode(u8),
    #[error("{0} unread bytes after packet body")]
    TrailingBytes(u64),
}

/// Errors while packing a packet
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("remaining length {0} exceeds 268435455")]
    CapacityExceeded(u32),
    #[error("length-prefixed field too long ({0} > 65535)")]
    StringTooLong(usize),
    #[error(transparent)]
    ProtocolViolation(#[from] ProtocolViolation),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_eof_is_truncated_body() {
        let err = DecodeError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, DecodeError::TruncatedBody));

        let err = DecodeError::from(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, DecodeError::IoError(_)));
    }

    #[test]
    fn test_display_protocol_violation() {
        let err = DecodeError::from(ProtocolViolation::EmptyTopicList(ControlType::Subscribe));
        assert_eq!(err.to_string(), "Subscribe carries no topic");

        let err = DecodeError::from(ProtocolViolation::InvalidSubscribeReturnCode(0x03));
        assert_eq!(err.to_string(), "invalid subscribe return code (0x3)");

        let err = EncodeError::from(ProtocolViolation::PasswordWithoutUsername);
        assert_eq!(err.to_string(), "password flag set without username flag");
    }
}
