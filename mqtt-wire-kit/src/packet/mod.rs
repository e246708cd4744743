//! Specific packets

use std::io::{self, Read, Write};

use crate::{
    common::{
        packet::{DecodablePacket, EncodablePacket},
        DecodeError, Decodable, EncodeError, Encodable, ProtocolViolation, MAX_REMAINING_LENGTH,
    },
    control::{ControlType, FixedHeader},
};

macro_rules! encodable_packet {
    ($typ:ident($($field:ident),* $(,)?)) => {
        impl $crate::common::packet::EncodablePacket for $typ {
            type Output = $crate::control::FixedHeader;

            fn fixed_header(&self) -> &Self::Output {
                &self.fixed_header
            }

            #[allow(unused_variables)]
            fn encode_packet<W: ::std::io::Write>(
                &self,
                writer: &mut W,
            ) -> Result<(), $crate::common::EncodeError> {
                $($crate::common::Encodable::encode(&self.$field, writer)?;)*
                Ok(())
            }

            fn encoded_packet_length(&self) -> u32 {
                $($crate::common::Encodable::encoded_length(&self.$field) +)*
                    0
            }
        }

        impl $typ {
            #[allow(dead_code)]
            #[inline(always)]
            fn fix_header_remaining_len(&mut self) {
                self.fixed_header.remaining_length =
                    $crate::common::packet::EncodablePacket::encoded_packet_length(self);
            }
        }
    };
}

pub use self::{
    ack::AckPacket,
    connack::ConnackPacket,
    connect::{ConnectPacket, LastWill},
    header::HeaderPacket,
    publish::PublishPacket,
    suback::{SubackPacket, SubscribeReturnCode},
    subscribe::SubscribePacket,
    unsubscribe::UnsubscribePacket,
};

pub mod ack;
pub mod connack;
pub mod connect;
pub mod header;
pub mod publish;
pub mod suback;
pub mod subscribe;
pub mod unsubscribe;

/// Runs `decode` over a reader limited to the Remaining Length of `fixed_header`, and requires
/// that it consumes the body entirely.
fn decode_body<'r, R, T, F>(
    reader: &'r mut R,
    fixed_header: FixedHeader,
    decode: F,
) -> Result<T, DecodeError>
where
    R: Read,
    F: FnOnce(&mut io::Take<&'r mut R>, FixedHeader) -> Result<T, DecodeError>,
{
    let mut body = reader.take(fixed_header.remaining_length.into());
    let packet = decode(&mut body, fixed_header)?;

    let left = body.limit();
    if left > 0 {
        let available = io::copy(&mut body, &mut io::sink())?;
        if available < left {
            return Err(DecodeError::TruncatedBody);
        }
        return Err(ProtocolViolation::TrailingBytes(left).into());
    }

    Ok(packet)
}

macro_rules! impl_decodable {
    ($($typ:ident,)+) => {
        $(impl Decodable for $typ {
            type Cond = Option<FixedHeader>;

            fn decode_with<R: Read>(
                reader: &mut R,
                fixed_header: Self::Cond,
            ) -> Result<Self, DecodeError> {
                let fixed_header: FixedHeader = match fixed_header {
                    Some(hdr) => hdr,
                    None => Decodable::decode(reader)?,
                };

                decode_body(reader, fixed_header, <Self as DecodablePacket>::decode_packet)
            }
        })+
    };
}

impl_decodable! {
    ConnectPacket,
    ConnackPacket,
    PublishPacket,
    SubscribePacket,
    SubackPacket,
    UnsubscribePacket,
    AckPacket,
    HeaderPacket,
}

macro_rules! impl_variable_packet {
    ($($variant:ident($typ:ident) => $hdr:ident,)+) => {
        /// One decoded or locally built packet, tagged by its control type
        #[derive(Debug, Eq, PartialEq, Clone)]
        pub enum VariablePacket {
            $(
                $variant($typ),
            )+
        }

        #[inline]
        fn decode_with_header<R: Read>(
            rdr: &mut R,
            fixed_header: FixedHeader,
        ) -> Result<VariablePacket, DecodeError> {
            match fixed_header.packet_type.control_type() {
                $(
                    ControlType::$hdr => {
                        let pk = <$typ as DecodablePacket>::decode_packet(rdr, fixed_header)?;
                        Ok(VariablePacket::$variant(pk))
                    }
                )+
            }
        }

        impl EncodablePacket for VariablePacket {
            type Output = FixedHeader;

            fn fixed_header(&self) -> &Self::Output {
                match *self {
                    $(
                        VariablePacket::$variant(ref pk) => pk.fixed_header(),
                    )+
                }
            }

            fn encode_packet<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
                match *self {
                    $(
                        VariablePacket::$variant(ref pk) => pk.encode_packet(writer),
                    )+
                }
            }

            fn encoded_packet_length(&self) -> u32 {
                match *self {
                    $(
                        VariablePacket::$variant(ref pk) => pk.encoded_packet_length(),
                    )+
                }
            }
        }
    };
}

impl_variable_packet! {
    Connect(ConnectPacket)         => Connect,
    Connack(ConnackPacket)         => ConnectAcknowledgement,

    Publish(PublishPacket)         => Publish,
    Puback(AckPacket)              => PublishAcknowledgement,
    Pubrec(AckPacket)              => PublishReceived,
    Pubrel(AckPacket)              => PublishRelease,
    Pubcomp(AckPacket)             => PublishComplete,

    Subscribe(SubscribePacket)     => Subscribe,
    Suback(SubackPacket)           => SubscribeAcknowledgement,

    Unsubscribe(UnsubscribePacket) => Unsubscribe,
    Unsuback(AckPacket)            => UnsubscribeAcknowledgement,

    Pingreq(HeaderPacket)          => PingRequest,
    Pingresp(HeaderPacket)         => PingResponse,
    Disconnect(HeaderPacket)       => Disconnect,
}

impl VariablePacket {
    pub fn new<T>(t: T) -> VariablePacket
    where
        VariablePacket: From<T>,
    {
        From::from(t)
    }

    /// Control type of the active variant
    pub fn control_type(&self) -> ControlType {
        self.fixed_header().packet_type.control_type()
    }

    /// Empties every owned field of the packet. Releasing twice is a no-op, and packets without
    /// owned fields are left untouched.
    pub fn release(&mut self) {
        match self {
            VariablePacket::Connect(pk) => pk.release(),
            VariablePacket::Publish(pk) => pk.release(),
            VariablePacket::Subscribe(pk) => pk.release(),
            VariablePacket::Suback(pk) => pk.release(),
            VariablePacket::Unsubscribe(pk) => pk.release(),
            VariablePacket::Connack(_)
            | VariablePacket::Puback(_)
            | VariablePacket::Pubrec(_)
            | VariablePacket::Pubrel(_)
            | VariablePacket::Pubcomp(_)
            | VariablePacket::Unsuback(_)
            | VariablePacket::Pingreq(_)
            | VariablePacket::Pingresp(_)
            | VariablePacket::Disconnect(_) => {}
        }
    }
}

impl From<ConnectPacket> for VariablePacket {
    fn from(pk: ConnectPacket) -> Self {
        VariablePacket::Connect(pk)
    }
}

impl From<ConnackPacket> for VariablePacket {
    fn from(pk: ConnackPacket) -> Self {
        VariablePacket::Connack(pk)
    }
}

impl From<PublishPacket> for VariablePacket {
    fn from(pk: PublishPacket) -> Self {
        VariablePacket::Publish(pk)
    }
}

impl From<SubscribePacket> for VariablePacket {
    fn from(pk: SubscribePacket) -> Self {
        VariablePacket::Subscribe(pk)
    }
}

impl From<SubackPacket> for VariablePacket {
    fn from(pk: SubackPacket) -> Self {
        VariablePacket::Suback(pk)
    }
}

impl From<UnsubscribePacket> for VariablePacket {
    fn from(pk: UnsubscribePacket) -> Self {
        VariablePacket::Unsubscribe(pk)
    }
}

impl From<AckPacket> for VariablePacket {
    fn from(pk: AckPacket) -> Self {
        match pk.control_type() {
            ControlType::PublishReceived => VariablePacket::Pubrec(pk),
            ControlType::PublishRelease => VariablePacket::Pubrel(pk),
            ControlType::PublishComplete => VariablePacket::Pubcomp(pk),
            ControlType::UnsubscribeAcknowledgement => VariablePacket::Unsuback(pk),
            _ => VariablePacket::Puback(pk),
        }
    }
}

impl From<HeaderPacket> for VariablePacket {
    fn from(pk: HeaderPacket) -> Self {
        match pk.control_type() {
            ControlType::PingResponse => VariablePacket::Pingresp(pk),
            ControlType::Disconnect => VariablePacket::Disconnect(pk),
            _ => VariablePacket::Pingreq(pk),
        }
    }
}

impl Decodable for VariablePacket {
    type Cond = Option<FixedHeader>;

    fn decode_with<R: Read>(
        reader: &mut R,
        fixed_header: Self::Cond,
    ) -> Result<VariablePacket, DecodeError> {
        let fixed_header = match fixed_header {
            Some(fh) => fh,
            None => FixedHeader::decode(reader)?,
        };

        decode_body(reader, fixed_header, decode_with_header)
    }
}

/// Unpacks the packet at the start of `buf`.
///
/// Returns the packet and the bytes it took: the header byte, the Remaining Length field and
/// the Remaining Length itself. Anything after that in `buf` is left alone.
///
/// ```rust
/// use mqtt_wire_kit::packet::{unpack_packet, VariablePacket};
///
/// let (packet, consumed) = unpack_packet(b"\x40\x02\x00\x07\xc0\x00").unwrap();
/// assert!(matches!(packet, VariablePacket::Puback(ref ack) if ack.packet_identifier() == 7));
/// assert_eq!(consumed, 4);
/// ```
pub fn unpack_packet(buf: &[u8]) -> Result<(VariablePacket, usize), DecodeError> {
    let mut cursor = buf;
    let fixed_header = FixedHeader::decode(&mut cursor).inspect_err(|err| {
        debug!("unpack fixed header failed: {}", err);
    })?;

    let header_len = buf.len() - cursor.len();
    let total = header_len + fixed_header.remaining_length as usize;
    if buf.len() < total {
        debug!(
            "unpack {}: {} of {} bytes available",
            fixed_header,
            buf.len(),
            total
        );
        return Err(DecodeError::TruncatedBody);
    }

    let packet = VariablePacket::decode_with(&mut &buf[header_len..total], Some(fixed_header))
        .inspect_err(|err| {
            debug!("unpack {} failed: {}", fixed_header, err);
        })?;
    trace!("unpacked {}", fixed_header);

    Ok((packet, total))
}

/// Packs a packet into a freshly allocated buffer of exactly its encoded size.
///
/// ```rust
/// use mqtt_wire_kit::{
///     common::QoSWithPacketIdentifier,
///     packet::{pack_packet, PublishPacket},
/// };
///
/// let packet = PublishPacket::new("a/b", QoSWithPacketIdentifier::Level1(7), vec![0x01, 0x02]);
/// let buf = pack_packet(&packet).unwrap();
/// assert_eq!(buf, b"\x32\x09\x00\x03a/b\x00\x07\x01\x02");
/// ```
pub fn pack_packet<P>(packet: &P) -> Result<Vec<u8>, EncodeError>
where
    P: EncodablePacket<Output = FixedHeader>,
{
    let fixed_header = packet.fixed_header();
    if fixed_header.remaining_length > MAX_REMAINING_LENGTH {
        debug!("pack {} failed: remaining length too large", fixed_header);
        return Err(EncodeError::CapacityExceeded(fixed_header.remaining_length));
    }

    let mut buf = Vec::with_capacity(packet.encoded_length() as usize);
    packet.encode(&mut buf)?;
    trace!("packed {} into {} bytes", fixed_header, buf.len());

    Ok(buf)
}

/// Empties every owned field of `packet`, see [`VariablePacket::release`]
pub fn release(packet: &mut VariablePacket) {
    packet.release()
}

#[cfg(feature = "tokio-codec")]
mod codec {
    use bytes::{Buf as _, BufMut as _, BytesMut};
    use tokio_util::codec::{self, Decoder as _, Encoder as _};

    use super::*;
    use crate::common::varint::MAX_LEN_BYTES;

    /// Run-time options of [`MqttDecoder`]
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct DecoderConfig {
        /// Largest whole frame, fixed header included, the decoder accepts
        pub max_packet_size: usize,
    }

    impl DecoderConfig {
        pub const fn new(max_packet_size: usize) -> Self {
            Self { max_packet_size }
        }
    }

    impl Default for DecoderConfig {
        fn default() -> Self {
            Self::new(1 + MAX_LEN_BYTES + MAX_REMAINING_LENGTH as usize)
        }
    }

    pub struct MqttDecoder {
        config: DecoderConfig,
        state: DecodeState,
    }

    enum DecodeState {
        Start,
        Packet { header: FixedHeader },
    }

    impl MqttDecoder {
        pub const fn new() -> Self {
            Self::with_config(DecoderConfig::new(
                1 + MAX_LEN_BYTES + MAX_REMAINING_LENGTH as usize,
            ))
        }

        pub const fn with_config(config: DecoderConfig) -> Self {
            MqttDecoder {
                config,
                state: DecodeState::Start,
            }
        }
    }

    impl Default for MqttDecoder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Peeks the fixed header at the start of `data`. Returns None until the whole header is
    /// buffered.
    #[inline]
    fn decode_header(mut data: &[u8]) -> Option<Result<(FixedHeader, usize), DecodeError>> {
        let available = data.len();
        match FixedHeader::decode(&mut data) {
            Ok(header) => Some(Ok((header, available - data.len()))),
            Err(DecodeError::TruncatedBody) => None,
            Err(err) => Some(Err(err)),
        }
    }

    impl codec::Decoder for MqttDecoder {
        type Item = VariablePacket;
        type Error = DecodeError;

        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
            loop {
                match &mut self.state {
                    DecodeState::Start => match decode_header(&src[..]) {
                        Some(Ok((header, header_size))) => {
                            let size = header_size + header.remaining_length as usize;
                            if size > self.config.max_packet_size {
                                debug!(
                                    "reject {}: {} bytes over limit {}",
                                    header, size, self.config.max_packet_size
                                );
                                return Err(DecodeError::PacketTooLarge {
                                    size,
                                    max: self.config.max_packet_size,
                                });
                            }
                            src.advance(header_size);
                            src.reserve(header.remaining_length as usize);
                            self.state = DecodeState::Packet { header };
                            continue;
                        }
                        Some(Err(e)) => return Err(e),
                        None => return Ok(None),
                    },
                    DecodeState::Packet { header } => {
                        let header = *header;
                        let length = header.remaining_length as usize;
                        if src.remaining() < length {
                            return Ok(None);
                        }

                        self.state = DecodeState::Start;

                        let body = src.split_to(length);
                        let packet = VariablePacket::decode_with(&mut body.reader(), Some(header))?;
                        trace!("decoded {}", header);
                        return Ok(Some(packet));
                    }
                }
            }
        }
    }

    pub struct MqttEncoder {}

    impl MqttEncoder {
        pub const fn new() -> Self {
            MqttEncoder {}
        }
    }

    impl Default for MqttEncoder {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T: EncodablePacket<Output = FixedHeader>> codec::Encoder<T> for MqttEncoder {
        type Error = EncodeError;

        fn encode(&mut self, packet: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
            let remaining_length = packet.fixed_header().remaining_length;
            if remaining_length > MAX_REMAINING_LENGTH {
                return Err(EncodeError::CapacityExceeded(remaining_length));
            }

            dst.reserve(packet.encoded_length() as usize);
            packet.encode(&mut dst.writer())
        }
    }

    pub struct MqttCodec {
        decode: MqttDecoder,
        encode: MqttEncoder,
    }

    impl MqttCodec {
        pub const fn new() -> Self {
            MqttCodec {
                decode: MqttDecoder::new(),
                encode: MqttEncoder::new(),
            }
        }

        pub const fn with_config(config: DecoderConfig) -> Self {
            MqttCodec {
                decode: MqttDecoder::with_config(config),
                encode: MqttEncoder::new(),
            }
        }
    }

    impl Default for MqttCodec {
        fn default() -> Self {
            Self::new()
        }
    }

    impl codec::Decoder for MqttCodec {
        type Item = VariablePacket;
        type Error = DecodeError;
        #[inline]
        fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
            self.decode.decode(src)
        }
    }

    impl<T: EncodablePacket<Output = FixedHeader>> codec::Encoder<T> for MqttCodec {
        type Error = EncodeError;
        #[inline]
        fn encode(&mut self, packet: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
            self.encode.encode(packet, dst)
        }
    }
}

#[cfg(feature = "tokio-codec")]
pub use codec::{DecoderConfig, MqttCodec, MqttDecoder, MqttEncoder};
