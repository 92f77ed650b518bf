use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;

use crate::suite::KeyExchangeAlgorithm;

use super::{Codec, CurveType, DigitallySigned, NamedCurve};

/// ECDHE parameters: curve id plus the server's ephemeral public point.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EcdhParams<'a> {
    pub curve_type: CurveType,
    pub curve: NamedCurve,
    pub public: &'a [u8],
}

impl<'a> EcdhParams<'a> {
    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], EcdhParams<'a>> {
        let (input, curve_type) = CurveType::parse(input)?;
        let (input, curve) = NamedCurve::parse(input)?;
        let (input, public_len) = be_u8(input)?;
        let (input, public) = take(public_len as usize)(input)?;

        Ok((
            input,
            EcdhParams {
                curve_type,
                curve,
                public,
            },
        ))
    }
}

impl Codec for EcdhParams<'_> {
    fn byte_size(&self) -> usize {
        4 + self.public.len()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.curve_type.as_u8());
        self.curve.serialize(output);
        output.push(self.public.len() as u8);
        output.extend_from_slice(self.public);
    }
}

/// The key-exchange-specific part of ServerKeyExchange. The wire layout
/// cannot be decoded without knowing which key exchange the negotiated
/// suite uses, so the parser takes it as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKeyExchangeParams<'a> {
    Ecdh(EcdhParams<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerKeyExchange<'a> {
    pub params: ServerKeyExchangeParams<'a>,
    pub signed: DigitallySigned<'a>,
}

impl<'a> ServerKeyExchange<'a> {
    pub fn parse(
        input: &'a [u8],
        key_exchange: KeyExchangeAlgorithm,
    ) -> IResult<&'a [u8], ServerKeyExchange<'a>> {
        match key_exchange {
            KeyExchangeAlgorithm::Ecdhe => {
                let (input, params) = EcdhParams::parse(input)?;
                let (input, signed) = DigitallySigned::parse(input)?;
                Ok((
                    input,
                    ServerKeyExchange {
                        params: ServerKeyExchangeParams::Ecdh(params),
                        signed,
                    },
                ))
            }
            // Plain RSA key exchange has no ServerKeyExchange message at
            // all; reaching here means the state machine mis-routed.
            _ => Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Switch,
            ))),
        }
    }

    pub fn ecdh_params(&self) -> &EcdhParams<'a> {
        match &self.params {
            ServerKeyExchangeParams::Ecdh(params) => params,
        }
    }
}

impl Codec for ServerKeyExchange<'_> {
    fn byte_size(&self) -> usize {
        let params = match &self.params {
            ServerKeyExchangeParams::Ecdh(p) => p.byte_size(),
        };
        params + self.signed.byte_size()
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        match &self.params {
            ServerKeyExchangeParams::Ecdh(params) => params.serialize(output),
        }
        self.signed.serialize(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::SignatureScheme;

    const MESSAGE: &[u8] = &[
        0x03, // CurveType::NamedCurve
        0x00, 0x1D, // NamedCurve::X25519
        0x04, // Public key length
        0x9F, 0xD7, 0xAD, 0x6D, // Public key (truncated for the test)
        0x04, 0x01, // SignatureScheme::RsaPkcs1Sha256
        0x00, 0x02, // Signature length
        0xAA, 0xBB, // Signature
    ];

    #[test]
    fn roundtrip() {
        let (rest, parsed) =
            ServerKeyExchange::parse(MESSAGE, KeyExchangeAlgorithm::Ecdhe).unwrap();
        assert!(rest.is_empty());

        let params = parsed.ecdh_params();
        assert_eq!(params.curve_type, CurveType::NamedCurve);
        assert_eq!(params.curve, NamedCurve::X25519);
        assert_eq!(params.public, &[0x9F, 0xD7, 0xAD, 0x6D]);
        assert_eq!(parsed.signed.scheme, SignatureScheme::RsaPkcs1Sha256);

        assert_eq!(parsed.to_bytes(), MESSAGE);
    }

    #[test]
    fn rsa_key_exchange_has_no_server_key_exchange() {
        assert!(ServerKeyExchange::parse(MESSAGE, KeyExchangeAlgorithm::Rsa).is_err());
    }
}
