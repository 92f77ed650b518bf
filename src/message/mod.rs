//! Wire-format object model: records, handshake bodies and extensions.
//!
//! Every type here is an immutable value created by `parse()` (nom, over a
//! borrowed input) or built directly, and written out with `serialize()`.
//! Serialization and [`Codec::byte_size`] must always agree; a mismatch is
//! a bug in the codec, never a protocol condition.

mod alert;
mod certificate;
mod change_cipher_spec;
mod client_hello;
mod client_key_exchange;
mod digitally_signed;
mod extension;
pub mod extensions;
mod finished;
mod handshake;
mod id;
mod named_curve;
mod random;
mod record;
mod server_hello;
mod server_key_exchange;

pub use alert::{Alert, AlertDescription, AlertLevel};
pub use certificate::{Asn1Cert, Certificate};
pub use change_cipher_spec::ChangeCipherSpec;
pub use client_hello::ClientHello;
pub use client_key_exchange::ClientKeyExchange;
pub use digitally_signed::{DigitallySigned, SignatureScheme};
pub use extension::{Extension, ExtensionType};
pub use finished::{Finished, VERIFY_DATA_LEN};
pub use handshake::{Body, Handshake, Header, MessageType, HANDSHAKE_HEADER_LEN};
pub use id::SessionId;
pub use named_curve::{CurveType, EcPointFormat, NamedCurve};
pub use random::Random;
pub use record::{
    ContentType, TLSRecord, MAX_CIPHERTEXT_LEN, MAX_PLAINTEXT_LEN, RECORD_HEADER_LEN,
};
pub use server_hello::ServerHello;
pub use server_key_exchange::{EcdhParams, ServerKeyExchange, ServerKeyExchangeParams};

use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

/// Encodable, self-sizing capability shared by every wire entity.
pub trait Codec {
    /// The exact number of bytes `serialize` will produce.
    fn byte_size(&self) -> usize;

    fn serialize(&self, output: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.byte_size());
        self.serialize(&mut output);
        // Universal invariant. If this trips, the codec itself is broken.
        assert_eq!(
            output.len(),
            self.byte_size(),
            "serialize()/byte_size() disagree"
        );
        output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    TLS1_0,
    TLS1_1,
    TLS1_2,
    Unknown(u16),
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl ProtocolVersion {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0301 => ProtocolVersion::TLS1_0,
            0x0302 => ProtocolVersion::TLS1_1,
            0x0303 => ProtocolVersion::TLS1_2,
            _ => ProtocolVersion::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ProtocolVersion::TLS1_0 => 0x0301,
            ProtocolVersion::TLS1_1 => 0x0302,
            ProtocolVersion::TLS1_2 => 0x0303,
            ProtocolVersion::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ProtocolVersion> {
        let (input, value) = be_u16(input)?;
        Ok((input, ProtocolVersion::from_u16(value)))
    }
}

impl Codec for ProtocolVersion {
    fn byte_size(&self) -> usize {
        2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Null,
    Unknown(u8),
}

impl Default for CompressionMethod {
    fn default() -> Self {
        Self::Unknown(0xFF)
    }
}

impl CompressionMethod {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => CompressionMethod::Null,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            CompressionMethod::Null => 0x00,
            CompressionMethod::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CompressionMethod> {
        let (input, byte) = be_u8(input)?;
        Ok((input, CompressionMethod::from_u8(byte)))
    }
}
