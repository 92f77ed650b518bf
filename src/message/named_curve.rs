use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use super::Codec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCurve {
    Secp256r1,
    Secp384r1,
    Secp521r1,
    X25519,
    Unknown(u16),
}

impl Default for NamedCurve {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl NamedCurve {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0017 => NamedCurve::Secp256r1,
            0x0018 => NamedCurve::Secp384r1,
            0x0019 => NamedCurve::Secp521r1,
            0x001D => NamedCurve::X25519,
            _ => NamedCurve::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            NamedCurve::Secp256r1 => 0x0017,
            NamedCurve::Secp384r1 => 0x0018,
            NamedCurve::Secp521r1 => 0x0019,
            NamedCurve::X25519 => 0x001D,
            NamedCurve::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], NamedCurve> {
        let (input, value) = be_u16(input)?;
        Ok((input, NamedCurve::from_u16(value)))
    }
}

impl Codec for NamedCurve {
    fn byte_size(&self) -> usize {
        2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

/// ECCurveType. Only named curves ever appear in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    NamedCurve,
    Unknown(u8),
}

impl Default for CurveType {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl CurveType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            3 => CurveType::NamedCurve,
            _ => CurveType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            CurveType::NamedCurve => 3,
            CurveType::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CurveType> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcPointFormat {
    Uncompressed,
    Unknown(u8),
}

impl Default for EcPointFormat {
    fn default() -> Self {
        Self::Unknown(0xFF)
    }
}

impl EcPointFormat {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => EcPointFormat::Uncompressed,
            _ => EcPointFormat::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            EcPointFormat::Uncompressed => 0,
            EcPointFormat::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], EcPointFormat> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}
