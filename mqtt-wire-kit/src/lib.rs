//! MQTT 3.1.1 control packet codec
//!
//! Packs and unpacks the fourteen control packets of
//! [MQTT v3.1.1](http://docs.oasis-open.org/mqtt/mqtt/v3.1.1/os/mqtt-v3.1.1-os.html).
//! The crate owns no socket and keeps no session state: it turns bytes into packets and
//! packets into bytes.
//!
//! ## Usage
//!
//! ```rust
//! use std::io::Cursor;
//!
//! use mqtt_wire_kit::common::{Decodable, Encodable, QoSWithPacketIdentifier};
//! use mqtt_wire_kit::packet::{pack_packet, unpack_packet, PublishPacket, VariablePacket};
//!
//! // Create a new Publish packet
//! let packet = PublishPacket::new("mqtt/learning",
//!                                 QoSWithPacketIdentifier::Level2(10),
//!                                 b"Hello MQTT!".to_vec());
//!
//! // Encode
//! let mut buf = Vec::new();
//! packet.encode(&mut buf).unwrap();
//! assert_eq!(buf, pack_packet(&packet).unwrap());
//!
//! // Decode it with known type
//! let mut dec_buf = Cursor::new(&buf[..]);
//! let decoded = PublishPacket::decode(&mut dec_buf).unwrap();
//! assert_eq!(packet, decoded);
//!
//! // Auto decode by the fixed header
//! let (auto_decode, consumed) = unpack_packet(&buf).unwrap();
//! assert_eq!(VariablePacket::Publish(packet), auto_decode);
//! assert_eq!(consumed, buf.len());
//! ```
//!
//! ## Features
//!
//! - `log` (default): `trace` lines for every packed or unpacked packet and `debug` lines for
//!   rejected input, through the [`log`](https://docs.rs/log) facade.
//! - `tokio-codec`: `MqttDecoder`, `MqttEncoder` and `MqttCodec` for `tokio_util::codec`.

macro_rules! trace { ($($x:tt)*) => (
    #[cfg(feature = "log")] {
        log::trace!($($x)*)
    }
) }

macro_rules! debug { ($($x:tt)*) => (
    #[cfg(feature = "log")] {
        log::debug!($($x)*)
    }
) }

pub mod common;
pub mod control;
pub mod packet;

pub use common::{decode_length, encode_length, DecodeError, EncodeError};
pub use packet::{pack_packet, release, unpack_packet, VariablePacket};
