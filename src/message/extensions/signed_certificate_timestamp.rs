use nom::IResult;

use crate::message::Codec;

/// signed_certificate_timestamp, RFC 6962. The client's request form is
/// zero-length; a server response carries an SCT list we do not examine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignedCertificateTimestampExtension;

impl SignedCertificateTimestampExtension {
    pub fn parse(input: &[u8]) -> IResult<&[u8], SignedCertificateTimestampExtension> {
        Ok((input, SignedCertificateTimestampExtension))
    }
}

impl Codec for SignedCertificateTimestampExtension {
    fn byte_size(&self) -> usize {
        0
    }

    fn serialize(&self, _output: &mut Vec<u8>) {}
}
