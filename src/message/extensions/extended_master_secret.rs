use nom::IResult;

use crate::message::Codec;

/// extended_master_secret, RFC 7627. Zero-length in both directions; its
/// presence is the whole signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedMasterSecretExtension;

impl ExtendedMasterSecretExtension {
    pub fn parse(input: &[u8]) -> IResult<&[u8], ExtendedMasterSecretExtension> {
        Ok((input, ExtendedMasterSecretExtension))
    }
}

impl Codec for ExtendedMasterSecretExtension {
    fn byte_size(&self) -> usize {
        0
    }

    fn serialize(&self, _output: &mut Vec<u8>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_roundtrip() {
        let ext = ExtendedMasterSecretExtension;
        assert!(ext.to_bytes().is_empty());

        let (rest, parsed) = ExtendedMasterSecretExtension::parse(&[]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, ext);
    }
}
