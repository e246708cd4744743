//! QoS (Quality of Services)

use std::fmt::Display;

use super::ProtocolViolation;

#[repr(u8)]
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default)]
pub enum QualityOfService {
    #[default]
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
}

impl TryFrom<u8> for QualityOfService {
    type Error = ProtocolViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QualityOfService::Level0),
            1 => Ok(QualityOfService::Level1),
            2 => Ok(QualityOfService::Level2),
            qos => Err(ProtocolViolation::InvalidQualityOfService(qos)),
        }
    }
}

impl From<QoSWithPacketIdentifier> for QualityOfService {
    fn from(qos: QoSWithPacketIdentifier) -> Self {
        match qos {
            QoSWithPacketIdentifier::Level0 => QualityOfService::Level0,
            QoSWithPacketIdentifier::Level1(_) => QualityOfService::Level1,
            QoSWithPacketIdentifier::Level2(_) => QualityOfService::Level2,
        }
    }
}

impl Display for QualityOfService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// QoS with identifier pairs
///
/// A `PUBLISH` carries a packet identifier exactly when its QoS is above 0, so the two travel
/// together.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum QoSWithPacketIdentifier {
    Level0,
    Level1(u16),
    Level2(u16),
}

impl QoSWithPacketIdentifier {
    pub fn new(qos: QualityOfService, id: u16) -> Self {
        match (qos, id) {
            (QualityOfService::Level0, _) => QoSWithPacketIdentifier::Level0,
            (QualityOfService::Level1, id) => QoSWithPacketIdentifier::Level1(id),
            (QualityOfService::Level2, id) => QoSWithPacketIdentifier::Level2(id),
        }
    }

    pub fn split(self) -> (QualityOfService, Option<u16>) {
        match self {
            QoSWithPacketIdentifier::Level0 => (QualityOfService::Level0, None),
            QoSWithPacketIdentifier::Level1(pkid) => (QualityOfService::Level1, Some(pkid)),
            QoSWithPacketIdentifier::Level2(pkid) => (QualityOfService::Level2, Some(pkid)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn qos_from_byte() {
        assert_eq!(QualityOfService::try_from(2), Ok(QualityOfService::Level2));
        assert_eq!(
            QualityOfService::try_from(3),
            Err(ProtocolViolation::InvalidQualityOfService(3))
        );
    }

    #[test]
    fn split_drops_identifier_at_level0() {
        let qos = QoSWithPacketIdentifier::new(QualityOfService::Level0, 7);
        assert_eq!(qos.split(), (QualityOfService::Level0, None));

        let qos = QoSWithPacketIdentifier::new(QualityOfService::Level1, 7);
        assert_eq!(qos.split(), (QualityOfService::Level1, Some(7)));
    }
}
