use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;

use crate::message::Codec;

/// renegotiation_info, RFC 5746. An initial handshake always carries an
/// empty renegotiated_connection value; we never renegotiate, so that is
/// the only shape this client produces or accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenegotiationInfoExtension;

impl RenegotiationInfoExtension {
    pub fn parse(input: &[u8]) -> IResult<&[u8], RenegotiationInfoExtension> {
        let (input, len) = be_u8(input)?;
        let (input, _renegotiated_connection) = take(len as usize)(input)?;
        Ok((input, RenegotiationInfoExtension))
    }
}

impl Codec for RenegotiationInfoExtension {
    fn byte_size(&self) -> usize {
        1
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(0x00);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let ext = RenegotiationInfoExtension;
        assert_eq!(ext.to_bytes(), [0x00]);

        let (rest, _) = RenegotiationInfoExtension::parse(&[0x00]).unwrap();
        assert!(rest.is_empty());
    }
}
