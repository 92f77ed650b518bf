use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;
use tinyvec::ArrayVec;

use super::Codec;

/// A raw TLV extension: 2-byte type, 2-byte length, opaque payload.
///
/// Unknown extension types are kept as-is rather than rejected; the
/// decoder consumes exactly the declared length and moves on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Extension<'a> {
    pub extension_type: ExtensionType,
    pub extension_data: &'a [u8],
}

impl<'a> Extension<'a> {
    pub fn new(extension_type: ExtensionType, extension_data: &'a [u8]) -> Self {
        Extension {
            extension_type,
            extension_data,
        }
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], Extension<'a>> {
        let (input, extension_type) = ExtensionType::parse(input)?;
        let (input, extension_length) = be_u16(input)?;
        let (input, extension_data) = take(extension_length)(input)?;

        Ok((
            input,
            Extension {
                extension_type,
                extension_data,
            },
        ))
    }
}

impl Codec for Extension<'_> {
    fn byte_size(&self) -> usize {
        4 + self.extension_data.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.extension_type.as_u16().to_be_bytes());
        output.extend_from_slice(&(self.extension_data.len() as u16).to_be_bytes());
        output.extend_from_slice(self.extension_data);
    }
}

/// Parse the optional extensions block of a hello message: either nothing
/// at all, or a 2-byte total length followed by that many bytes of
/// extensions.
pub(crate) fn parse_extension_block<'a>(
    input: &'a [u8],
) -> IResult<&'a [u8], ArrayVec<[Extension<'a>; 16]>> {
    let mut extensions = ArrayVec::new();

    if input.is_empty() {
        return Ok((input, extensions));
    }

    let (input, block_len) = be_u16(input)?;
    let (input, block) = take(block_len)(input)?;

    let mut rest = block;
    while !rest.is_empty() && extensions.len() < 16 {
        let (next, extension) = Extension::parse(rest)?;
        extensions.push(extension);
        rest = next;
    }

    Ok((input, extensions))
}

/// Serialize a non-empty extensions block with its 2-byte total length.
pub(crate) fn serialize_extension_block(extensions: &[Extension<'_>], output: &mut Vec<u8>) {
    if extensions.is_empty() {
        return;
    }

    let total: usize = extensions.iter().map(|e| e.byte_size()).sum();
    output.extend_from_slice(&(total as u16).to_be_bytes());
    for extension in extensions {
        extension.serialize(output);
    }
}

pub(crate) fn extension_block_size(extensions: &[Extension<'_>]) -> usize {
    if extensions.is_empty() {
        return 0;
    }
    2 + extensions.iter().map(|e| e.byte_size()).sum::<usize>()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionType {
    ServerName,
    StatusRequest,
    SupportedGroups,
    EcPointFormats,
    SignatureAlgorithms,
    ApplicationLayerProtocolNegotiation,
    SignedCertificateTimestamp,
    Padding,
    ExtendedMasterSecret,
    SessionTicket,
    RenegotiationInfo,
    Unknown(u16),
}

impl Default for ExtensionType {
    fn default() -> Self {
        Self::Unknown(0xFFFF)
    }
}

impl ExtensionType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => ExtensionType::ServerName,
            0x0005 => ExtensionType::StatusRequest,
            0x000A => ExtensionType::SupportedGroups,
            0x000B => ExtensionType::EcPointFormats,
            0x000D => ExtensionType::SignatureAlgorithms,
            0x0010 => ExtensionType::ApplicationLayerProtocolNegotiation,
            0x0012 => ExtensionType::SignedCertificateTimestamp,
            0x0015 => ExtensionType::Padding,
            0x0017 => ExtensionType::ExtendedMasterSecret,
            0x0023 => ExtensionType::SessionTicket,
            0xFF01 => ExtensionType::RenegotiationInfo,
            _ => ExtensionType::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ExtensionType::ServerName => 0x0000,
            ExtensionType::StatusRequest => 0x0005,
            ExtensionType::SupportedGroups => 0x000A,
            ExtensionType::EcPointFormats => 0x000B,
            ExtensionType::SignatureAlgorithms => 0x000D,
            ExtensionType::ApplicationLayerProtocolNegotiation => 0x0010,
            ExtensionType::SignedCertificateTimestamp => 0x0012,
            ExtensionType::Padding => 0x0015,
            ExtensionType::ExtendedMasterSecret => 0x0017,
            ExtensionType::SessionTicket => 0x0023,
            ExtensionType::RenegotiationInfo => 0xFF01,
            ExtensionType::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ExtensionType> {
        let (input, value) = be_u16(input)?;
        Ok((input, ExtensionType::from_u16(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = &[
        0x00, 0x0A, // ExtensionType::SupportedGroups
        0x00, 0x08, // Extension length
        0x00, 0x06, 0x00, 0x1D, 0x00, 0x17, 0x00, 0x18, // Extension data
    ];

    #[test]
    fn roundtrip() {
        let extension = Extension::new(ExtensionType::SupportedGroups, &MESSAGE[4..]);

        let serialized = extension.to_bytes();
        assert_eq!(serialized, MESSAGE);

        let (rest, parsed) = Extension::parse(&serialized).unwrap();
        assert_eq!(parsed, extension);
        assert!(rest.is_empty());
    }

    #[test]
    fn unknown_type_is_skipped_not_rejected() {
        let wire = [0xAB, 0xCD, 0x00, 0x02, 0x01, 0x02, 0x00, 0x0B, 0x00, 0x00];

        let (rest, first) = Extension::parse(&wire).unwrap();
        assert_eq!(first.extension_type, ExtensionType::Unknown(0xABCD));
        assert_eq!(first.extension_data, &[0x01, 0x02]);

        let (rest, second) = Extension::parse(rest).unwrap();
        assert_eq!(second.extension_type, ExtensionType::EcPointFormats);
        assert!(rest.is_empty());
    }

    #[test]
    fn declared_length_beyond_input_is_an_error() {
        let wire = [0x00, 0x0A, 0x00, 0x08, 0x01];
        assert!(Extension::parse(&wire).is_err());
    }

    #[test]
    fn block_roundtrip() {
        let a = Extension::new(ExtensionType::SignedCertificateTimestamp, &[]);
        let b = Extension::new(ExtensionType::RenegotiationInfo, &[0x00]);

        let mut wire = Vec::new();
        serialize_extension_block(&[a, b], &mut wire);
        assert_eq!(wire.len(), extension_block_size(&[a, b]));

        let (rest, parsed) = parse_extension_block(&wire).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], a);
        assert_eq!(parsed[1], b);
    }

    #[test]
    fn missing_block_parses_as_no_extensions() {
        let (rest, parsed) = parse_extension_block(&[]).unwrap();
        assert!(rest.is_empty());
        assert!(parsed.is_empty());
    }
}
