use nom::bytes::complete::take;
use nom::IResult;

use crate::rng::RandomSource;

use super::Codec;

/// The 32-byte hello random.
///
/// RFC 5246 nominally splits this into a GMT timestamp and 28 random
/// bytes, but nothing on the wire distinguishes them and modern stacks
/// treat the whole field as opaque. So do we.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Random(pub [u8; 32]);

impl Random {
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        Random(bytes)
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Random> {
        let (input, bytes) = take(32_usize)(input)?;
        let mut random = [0u8; 32];
        random.copy_from_slice(bytes);
        Ok((input, Random(random)))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Codec for Random {
    fn byte_size(&self) -> usize {
        32
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequentialRandom;

    #[test]
    fn roundtrip() {
        let mut rng = SequentialRandom::new();
        let random = Random::new(&mut rng);

        let serialized = random.to_bytes();
        assert_eq!(serialized.len(), 32);
        assert_eq!(serialized[0], 0x00);
        assert_eq!(serialized[31], 0x1F);

        let (rest, parsed) = Random::parse(&serialized).unwrap();
        assert_eq!(parsed, random);
        assert!(rest.is_empty());
    }

    #[test]
    fn short_input_is_an_error() {
        assert!(Random::parse(&[0u8; 31]).is_err());
    }
}
