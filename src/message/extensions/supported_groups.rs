use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;
use tinyvec::ArrayVec;

use crate::message::{Codec, NamedCurve};

/// Supported Groups (formerly "elliptic_curves"), RFC 8422 section 5.1.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedGroupsExtension {
    pub groups: ArrayVec<[NamedCurve; 16]>,
}

impl SupportedGroupsExtension {
    pub fn new(groups: &[NamedCurve]) -> Self {
        let mut list = ArrayVec::new();
        for group in groups.iter().take(16) {
            list.push(*group);
        }
        SupportedGroupsExtension { groups: list }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], SupportedGroupsExtension> {
        let (input, list_len) = be_u16(input)?;
        let (input, list) = take(list_len)(input)?;

        let mut groups = ArrayVec::new();
        let mut rest = list;
        while !rest.is_empty() && groups.len() < 16 {
            let (next, group) = NamedCurve::parse(rest)?;
            groups.push(group);
            rest = next;
        }

        Ok((input, SupportedGroupsExtension { groups }))
    }
}

impl Codec for SupportedGroupsExtension {
    fn byte_size(&self) -> usize {
        2 + self.groups.len() * 2
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&((self.groups.len() * 2) as u16).to_be_bytes());
        for group in &self.groups {
            group.serialize(output);
        }
    }
}
