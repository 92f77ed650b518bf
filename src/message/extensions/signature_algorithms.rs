use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;
use tinyvec::ArrayVec;

use crate::message::{Codec, SignatureScheme};

/// signature_algorithms, RFC 5246 section 7.4.1.4.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAlgorithmsExtension {
    pub schemes: ArrayVec<[SignatureScheme; 16]>,
}

impl SignatureAlgorithmsExtension {
    /// Everything we can name, strongest hashes first, SHA-1 last.
    pub fn all_supported() -> Self {
        Self::new(&[
            SignatureScheme::RsaPkcs1Sha256,
            SignatureScheme::EcdsaNistp256Sha256,
            SignatureScheme::RsaPkcs1Sha384,
            SignatureScheme::EcdsaNistp384Sha384,
            SignatureScheme::RsaPkcs1Sha512,
            SignatureScheme::EcdsaNistp521Sha512,
            SignatureScheme::RsaPkcs1Sha1,
            SignatureScheme::EcdsaSha1,
        ])
    }

    pub fn new(schemes: &[SignatureScheme]) -> Self {
        let mut list = ArrayVec::new();
        for scheme in schemes.iter().take(16) {
            list.push(*scheme);
        }
        SignatureAlgorithmsExtension { schemes: list }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], SignatureAlgorithmsExtension> {
        let (input, list_len) = be_u16(input)?;
        let (input, list) = take(list_len)(input)?;

        let mut schemes = ArrayVec::new();
        let mut rest = list;
        while !rest.is_empty() && schemes.len() < 16 {
            let (next, scheme) = SignatureScheme::parse(rest)?;
            schemes.push(scheme);
            rest = next;
        }

        Ok((input, SignatureAlgorithmsExtension { schemes }))
    }
}

impl Codec for SignatureAlgorithmsExtension {
    fn byte_size(&self) -> usize {
        2 + self.schemes.len() * 2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&((self.schemes.len() * 2) as u16).to_be_bytes());
        for scheme in &self.schemes {
            scheme.serialize(output);
        }
    }
}
