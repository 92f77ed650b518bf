use nom::bytes::complete::take;
use nom::error::{Error, ErrorKind};
use nom::number::complete::{be_u16, be_u8};
use nom::{Err, IResult};
use tinyvec::ArrayVec;

use crate::suite::CipherSuite;

use super::extension::{extension_block_size, parse_extension_block, serialize_extension_block};
use super::extensions::{
    EcPointFormatsExtension, RenegotiationInfoExtension, ServerNameExtension,
    SignatureAlgorithmsExtension, SignedCertificateTimestampExtension, StatusRequestExtension,
    SupportedGroupsExtension,
};
use super::{
    Codec, CompressionMethod, Extension, ExtensionType, NamedCurve, ProtocolVersion, Random,
    SessionId,
};

#[derive(Debug, PartialEq, Eq)]
pub struct ClientHello<'a> {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cipher_suites: ArrayVec<[CipherSuite; 32]>,
    pub compression_methods: ArrayVec<[CompressionMethod; 4]>,
    pub extensions: ArrayVec<[Extension<'a>; 16]>,
}

impl<'a> ClientHello<'a> {
    pub fn new(random: Random, cipher_suites: &[CipherSuite]) -> Self {
        let mut suites = ArrayVec::new();
        for suite in cipher_suites.iter().take(32) {
            suites.push(*suite);
        }

        let mut compression_methods = ArrayVec::new();
        compression_methods.push(CompressionMethod::Null);

        ClientHello {
            client_version: ProtocolVersion::TLS1_2,
            random,
            session_id: SessionId::empty(),
            cipher_suites: suites,
            compression_methods,
            extensions: ArrayVec::new(),
        }
    }

    /// Attach the standard client extension set, in the order modern
    /// clients send them: server_name, status_request, supported_groups,
    /// ec_point_formats, signature_algorithms, renegotiation_info and
    /// signed_certificate_timestamp.
    ///
    /// The payloads are serialized into the caller's `extension_data`
    /// buffer and the extensions borrow from it.
    pub fn with_default_extensions(
        mut self,
        server_name: &str,
        extension_data: &'a mut Vec<u8>,
    ) -> Self {
        extension_data.clear();

        let mut ranges = ArrayVec::<[(ExtensionType, usize, usize); 8]>::new();

        let start = extension_data.len();
        ServerNameExtension::new(server_name).serialize(extension_data);
        ranges.push((ExtensionType::ServerName, start, extension_data.len()));

        let start = extension_data.len();
        StatusRequestExtension.serialize(extension_data);
        ranges.push((ExtensionType::StatusRequest, start, extension_data.len()));

        let start = extension_data.len();
        SupportedGroupsExtension::new(&[
            NamedCurve::X25519,
            NamedCurve::Secp256r1,
            NamedCurve::Secp384r1,
            NamedCurve::Secp521r1,
        ])
        .serialize(extension_data);
        ranges.push((ExtensionType::SupportedGroups, start, extension_data.len()));

        let start = extension_data.len();
        EcPointFormatsExtension::uncompressed_only().serialize(extension_data);
        ranges.push((ExtensionType::EcPointFormats, start, extension_data.len()));

        let start = extension_data.len();
        SignatureAlgorithmsExtension::all_supported().serialize(extension_data);
        ranges.push((
            ExtensionType::SignatureAlgorithms,
            start,
            extension_data.len(),
        ));

        let start = extension_data.len();
        RenegotiationInfoExtension.serialize(extension_data);
        ranges.push((ExtensionType::RenegotiationInfo, start, extension_data.len()));

        let start = extension_data.len();
        SignedCertificateTimestampExtension.serialize(extension_data);
        ranges.push((
            ExtensionType::SignedCertificateTimestamp,
            start,
            extension_data.len(),
        ));

        let extension_data: &'a [u8] = extension_data;
        for (extension_type, start, end) in ranges {
            self.extensions
                .push(Extension::new(extension_type, &extension_data[start..end]));
        }

        self
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], ClientHello<'a>> {
        let (input, client_version) = ProtocolVersion::parse(input)?;
        let (input, random) = Random::parse(input)?;
        let (input, session_id) = SessionId::parse(input)?;

        let (input, cipher_suites_len) = be_u16(input)?;
        let (input, suites_data) = take(cipher_suites_len)(input)?;
        let mut cipher_suites = ArrayVec::new();
        let mut rest = suites_data;
        while !rest.is_empty() && cipher_suites.len() < 32 {
            let (next, suite) = CipherSuite::parse(rest)?;
            cipher_suites.push(suite);
            rest = next;
        }

        let (input, compression_methods_len) = be_u8(input)?;
        let (input, compression_data) = take(compression_methods_len as usize)(input)?;
        if compression_data.is_empty() {
            return Err(Err::Failure(Error::new(input, ErrorKind::LengthValue)));
        }
        let mut compression_methods = ArrayVec::new();
        let mut rest = compression_data;
        while !rest.is_empty() && compression_methods.len() < 4 {
            let (next, method) = CompressionMethod::parse(rest)?;
            compression_methods.push(method);
            rest = next;
        }

        let (input, extensions) = parse_extension_block(input)?;

        Ok((
            input,
            ClientHello {
                client_version,
                random,
                session_id,
                cipher_suites,
                compression_methods,
                extensions,
            },
        ))
    }
}

impl Codec for ClientHello<'_> {
    fn byte_size(&self) -> usize {
        2 + self.random.byte_size()
            + self.session_id.byte_size()
            + 2
            + self.cipher_suites.len() * 2
            + 1
            + self.compression_methods.len()
            + extension_block_size(&self.extensions)
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        self.client_version.serialize(output);
        self.random.serialize(output);
        self.session_id.serialize(output);

        output.extend_from_slice(&((self.cipher_suites.len() * 2) as u16).to_be_bytes());
        for suite in &self.cipher_suites {
            suite.serialize(output);
        }

        output.push(self.compression_methods.len() as u8);
        for method in &self.compression_methods {
            output.push(method.as_u8());
        }

        serialize_extension_block(&self.extensions, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequentialRandom;

    const MESSAGE: &[u8] = &[
        0x03, 0x03, // ProtocolVersion::TLS1_2
        // Random
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E,
        0x1F, 0x20, //
        0x00, // SessionId length
        0x00, 0x04, // CipherSuites length
        0xC0, 0x2F, // CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
        0xC0, 0x30, // CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
        0x01, // CompressionMethods length
        0x00, // CompressionMethod::Null
    ];

    #[test]
    fn roundtrip_without_extensions() {
        let random = Random::parse(&MESSAGE[2..34]).unwrap().1;
        let client_hello = ClientHello::new(
            random,
            &[
                CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
                CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            ],
        );

        let serialized = client_hello.to_bytes();
        assert_eq!(serialized, MESSAGE);

        let (rest, parsed) = ClientHello::parse(&serialized).unwrap();
        assert_eq!(parsed, client_hello);
        assert!(rest.is_empty());
    }

    #[test]
    fn default_extensions_in_order() {
        let mut rng = SequentialRandom::new();
        let mut extension_data = Vec::new();
        let client_hello = ClientHello::new(
            Random::new(&mut rng),
            &[CipherSuite::ECDHE_RSA_AES128_GCM_SHA256],
        )
        .with_default_extensions("example.ulfheim.net", &mut extension_data);

        let types: Vec<_> = client_hello
            .extensions
            .iter()
            .map(|e| e.extension_type)
            .collect();
        assert_eq!(
            types,
            [
                ExtensionType::ServerName,
                ExtensionType::StatusRequest,
                ExtensionType::SupportedGroups,
                ExtensionType::EcPointFormats,
                ExtensionType::SignatureAlgorithms,
                ExtensionType::RenegotiationInfo,
                ExtensionType::SignedCertificateTimestamp,
            ]
        );

        let serialized = client_hello.to_bytes();
        let (rest, parsed) = ClientHello::parse(&serialized).unwrap();
        assert_eq!(parsed, client_hello);
        assert!(rest.is_empty());
    }

    #[test]
    fn zero_compression_methods_is_an_error() {
        let mut message = MESSAGE.to_vec();
        message[41] = 0x00; // CompressionMethods length
        message.truncate(42);

        assert!(ClientHello::parse(&message).is_err());
    }
}
