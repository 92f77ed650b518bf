use nom::IResult;
use tinyvec::ArrayVec;

use crate::suite::CipherSuite;

use super::extension::{extension_block_size, parse_extension_block, serialize_extension_block};
use super::{Codec, CompressionMethod, Extension, ProtocolVersion, Random, SessionId};

#[derive(Debug, PartialEq, Eq)]
pub struct ServerHello<'a> {
    pub server_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suite: CipherSuite,
    pub compression_method: CompressionMethod,
    pub extensions: ArrayVec<[Extension<'a>; 16]>,
}

impl<'a> ServerHello<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], ServerHello<'a>> {
        let (input, server_version) = ProtocolVersion::parse(input)?;
        let (input, random) = Random::parse(input)?;
        let (input, session_id) = SessionId::parse(input)?;
        let (input, cipher_suite) = CipherSuite::parse(input)?;
        let (input, compression_method) = CompressionMethod::parse(input)?;
        let (input, extensions) = parse_extension_block(input)?;

        Ok((
            input,
            ServerHello {
                server_version,
                random,
                session_id,
                cipher_suite,
                compression_method,
                extensions,
            },
        ))
    }
}

impl Codec for ServerHello<'_> {
    fn byte_size(&self) -> usize {
        2 + self.random.byte_size()
            + self.session_id.byte_size()
            + 2
            + 1
            + extension_block_size(&self.extensions)
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        self.server_version.serialize(output);
        self.random.serialize(output);
        self.session_id.serialize(output);
        self.cipher_suite.serialize(output);
        output.push(self.compression_method.as_u8());
        serialize_extension_block(&self.extensions, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = &[
        0x03, 0x03, // ProtocolVersion::TLS1_2
        // Random
        0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x7B, 0x7C, 0x7D, 0x7E,
        0x7F, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x8D,
        0x8E, 0x8F, //
        0x00, // SessionId length
        0xC0, 0x2F, // CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
        0x00, // CompressionMethod::Null
        0x00, 0x05, // Extensions length
        0xFF, 0x01, 0x00, 0x01, 0x00, // RenegotiationInfo, empty
    ];

    #[test]
    fn roundtrip() {
        let (rest, parsed) = ServerHello::parse(MESSAGE).unwrap();
        assert!(rest.is_empty());

        assert_eq!(parsed.server_version, ProtocolVersion::TLS1_2);
        assert_eq!(parsed.cipher_suite, CipherSuite::ECDHE_RSA_AES128_GCM_SHA256);
        assert_eq!(parsed.compression_method, CompressionMethod::Null);
        assert_eq!(parsed.extensions.len(), 1);

        assert_eq!(parsed.to_bytes(), MESSAGE);
    }

    #[test]
    fn unknown_suite_is_carried_through() {
        let mut message = MESSAGE.to_vec();
        message[35] = 0x13;
        message[36] = 0x37;

        let (_, parsed) = ServerHello::parse(&message).unwrap();
        assert_eq!(parsed.cipher_suite, CipherSuite::Unknown(0x1337));
    }
}
