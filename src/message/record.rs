use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::{be_u16, be_u8};
use nom::Err;
use nom::IResult;

use super::{Codec, ProtocolVersion};

/// Record header: content type (1) + version (2) + length (2).
pub const RECORD_HEADER_LEN: usize = 5;

/// Hard ceiling for a record's plaintext fragment (RFC 5246 6.2.1).
pub const MAX_PLAINTEXT_LEN: usize = 16_384;

/// Ciphertext may expand by at most 2048 bytes (RFC 5246 6.2.3).
pub const MAX_CIPHERTEXT_LEN: usize = MAX_PLAINTEXT_LEN + 2048;

/// The outermost TLS framing unit.
#[derive(Debug, PartialEq, Eq)]
pub struct TLSRecord<'a> {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub length: u16,
    pub fragment: &'a [u8],
}

impl<'a> TLSRecord<'a> {
    pub fn new(
        content_type: ContentType,
        version: ProtocolVersion,
        fragment: &'a [u8],
    ) -> Self {
        TLSRecord {
            content_type,
            version,
            length: fragment.len() as u16,
            fragment,
        }
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], TLSRecord<'a>> {
        let (input, content_type) = ContentType::parse(input)?;
        let (input, version) = ProtocolVersion::parse(input)?;
        let (input, length) = be_u16(input)?;

        if length as usize > MAX_CIPHERTEXT_LEN {
            return Err(Err::Failure(Error::new(input, ErrorKind::LengthValue)));
        }

        let (input, fragment) = take(length as usize)(input)?;

        Ok((
            input,
            TLSRecord {
                content_type,
                version,
                length,
                fragment,
            },
        ))
    }
}

impl Codec for TLSRecord<'_> {
    fn byte_size(&self) -> usize {
        RECORD_HEADER_LEN + self.fragment.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.content_type.as_u8());
        self.version.serialize(output);
        output.extend_from_slice(&self.length.to_be_bytes());
        output.extend_from_slice(self.fragment);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
    Unknown(u8),
}

impl ContentType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            20 => ContentType::ChangeCipherSpec,
            21 => ContentType::Alert,
            22 => ContentType::Handshake,
            23 => ContentType::ApplicationData,
            _ => ContentType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            ContentType::ChangeCipherSpec => 20,
            ContentType::Alert => 21,
            ContentType::Handshake => 22,
            ContentType::ApplicationData => 23,
            ContentType::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ContentType> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}
