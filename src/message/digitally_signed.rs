use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;

use super::Codec;

/// A signature with its 2-byte algorithm id, as found at the tail of
/// ServerKeyExchange.
///
/// We parse and carry the signature but do not verify it; certificate
/// chain trust is out of scope for this client.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DigitallySigned<'a> {
    pub scheme: SignatureScheme,
    pub signature: &'a [u8],
}

impl<'a> DigitallySigned<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], DigitallySigned<'a>> {
        let (input, scheme) = SignatureScheme::parse(input)?;
        let (input, length) = be_u16(input)?;
        let (input, signature) = take(length)(input)?;

        Ok((input, DigitallySigned { scheme, signature }))
    }
}

impl Codec for DigitallySigned<'_> {
    fn byte_size(&self) -> usize {
        4 + self.signature.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        self.scheme.serialize(output);
        output.extend_from_slice(&(self.signature.len() as u16).to_be_bytes());
        output.extend_from_slice(self.signature);
    }
}

/// SignatureAndHashAlgorithm pairs, flattened to their 2-byte wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    RsaPkcs1Sha1,
    EcdsaSha1,
    RsaPkcs1Sha256,
    EcdsaNistp256Sha256,
    RsaPkcs1Sha384,
    EcdsaNistp384Sha384,
    RsaPkcs1Sha512,
    EcdsaNistp521Sha512,
    Unknown(u16),
}

impl Default for SignatureScheme {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl SignatureScheme {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0201 => SignatureScheme::RsaPkcs1Sha1,
            0x0203 => SignatureScheme::EcdsaSha1,
            0x0401 => SignatureScheme::RsaPkcs1Sha256,
            0x0403 => SignatureScheme::EcdsaNistp256Sha256,
            0x0501 => SignatureScheme::RsaPkcs1Sha384,
            0x0503 => SignatureScheme::EcdsaNistp384Sha384,
            0x0601 => SignatureScheme::RsaPkcs1Sha512,
            0x0603 => SignatureScheme::EcdsaNistp521Sha512,
            _ => SignatureScheme::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            SignatureScheme::RsaPkcs1Sha1 => 0x0201,
            SignatureScheme::EcdsaSha1 => 0x0203,
            SignatureScheme::RsaPkcs1Sha256 => 0x0401,
            SignatureScheme::EcdsaNistp256Sha256 => 0x0403,
            SignatureScheme::RsaPkcs1Sha384 => 0x0501,
            SignatureScheme::EcdsaNistp384Sha384 => 0x0503,
            SignatureScheme::RsaPkcs1Sha512 => 0x0601,
            SignatureScheme::EcdsaNistp521Sha512 => 0x0603,
            SignatureScheme::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], SignatureScheme> {
        let (input, value) = be_u16(input)?;
        Ok((input, SignatureScheme::from_u16(value)))
    }
}

impl Codec for SignatureScheme {
    fn byte_size(&self) -> usize {
        2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let signed = DigitallySigned {
            scheme: SignatureScheme::RsaPkcs1Sha256,
            signature: &[0x05, 0x06, 0x07, 0x08],
        };

        let serialized = signed.to_bytes();
        assert_eq!(serialized, [0x04, 0x01, 0x00, 0x04, 0x05, 0x06, 0x07, 0x08]);

        let (rest, parsed) = DigitallySigned::parse(&serialized).unwrap();
        assert_eq!(parsed, signed);
        assert!(rest.is_empty());
    }
}
