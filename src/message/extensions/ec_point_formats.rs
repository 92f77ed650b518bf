use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;
use tinyvec::ArrayVec;

use crate::message::{Codec, EcPointFormat};

/// ec_point_formats, RFC 8422 section 5.1.2. We only ever deal in
/// uncompressed points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPointFormatsExtension {
    pub formats: ArrayVec<[EcPointFormat; 4]>,
}

impl EcPointFormatsExtension {
    pub fn uncompressed_only() -> Self {
        let mut formats = ArrayVec::new();
        formats.push(EcPointFormat::Uncompressed);
        EcPointFormatsExtension { formats }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], EcPointFormatsExtension> {
        let (input, list_len) = be_u8(input)?;
        let (input, list) = take(list_len as usize)(input)?;

        let mut formats = ArrayVec::new();
        let mut rest = list;
        while !rest.is_empty() && formats.len() < 4 {
            let (next, format) = EcPointFormat::parse(rest)?;
            formats.push(format);
            rest = next;
        }

        Ok((input, EcPointFormatsExtension { formats }))
    }
}

impl Codec for EcPointFormatsExtension {
    fn byte_size(&self) -> usize {
        1 + self.formats.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.formats.len() as u8);
        for format in &self.formats {
            output.push(format.as_u8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let ext = EcPointFormatsExtension::uncompressed_only();
        let serialized = ext.to_bytes();
        assert_eq!(serialized, [0x01, 0x00]);

        let (rest, parsed) = EcPointFormatsExtension::parse(&serialized).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, ext);
    }
}
