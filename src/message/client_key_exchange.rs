use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::suite::KeyExchangeAlgorithm;

use super::Codec;

/// ClientKeyExchange. For ECDHE it carries the client's ephemeral public
/// point behind a 1-byte length; for RSA key exchange it carries the
/// RSA-encrypted pre-master secret behind a 2-byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKeyExchange<'a> {
    Ecdh { public: &'a [u8] },
    Rsa { encrypted_pre_master: &'a [u8] },
}

impl<'a> ClientKeyExchange<'a> {
    pub fn parse(
        input: &'a [u8],
        key_exchange: KeyExchangeAlgorithm,
    ) -> IResult<&'a [u8], ClientKeyExchange<'a>> {
        match key_exchange {
            KeyExchangeAlgorithm::Ecdhe => {
                let (input, public_len) = be_u8(input)?;
                let (input, public) = take(public_len as usize)(input)?;
                Ok((input, ClientKeyExchange::Ecdh { public }))
            }
            _ => {
                let (input, length) = be_u16(input)?;
                let (input, encrypted_pre_master) = take(length)(input)?;
                Ok((input, ClientKeyExchange::Rsa {
                    encrypted_pre_master,
                }))
            }
        }
    }
}

impl Codec for ClientKeyExchange<'_> {
    fn byte_size(&self) -> usize {
        match self {
            ClientKeyExchange::Ecdh { public } => 1 + public.len(),
            ClientKeyExchange::Rsa {
                encrypted_pre_master,
            } => 2 + encrypted_pre_master.len(),
        }
    }

    fn serialize(&self, output: &mut Vec<u8>) {
        match self {
            ClientKeyExchange::Ecdh { public } => {
                output.push(public.len() as u8);
                output.extend_from_slice(public);
            }
            ClientKeyExchange::Rsa {
                encrypted_pre_master,
            } => {
                output.extend_from_slice(&(encrypted_pre_master.len() as u16).to_be_bytes());
                output.extend_from_slice(encrypted_pre_master);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdh_roundtrip() {
        let public = [0x35u8; 32];
        let ckx = ClientKeyExchange::Ecdh { public: &public };

        let serialized = ckx.to_bytes();
        assert_eq!(serialized.len(), 33);
        assert_eq!(serialized[0], 32);

        let (rest, parsed) =
            ClientKeyExchange::parse(&serialized, KeyExchangeAlgorithm::Ecdhe).unwrap();
        assert_eq!(parsed, ckx);
        assert!(rest.is_empty());
    }

    #[test]
    fn rsa_roundtrip() {
        let encrypted = [0x42u8; 256];
        let ckx = ClientKeyExchange::Rsa {
            encrypted_pre_master: &encrypted,
        };

        let serialized = ckx.to_bytes();
        assert_eq!(serialized.len(), 258);
        assert_eq!(&serialized[..2], &[0x01, 0x00]);

        let (rest, parsed) =
            ClientKeyExchange::parse(&serialized, KeyExchangeAlgorithm::Rsa).unwrap();
        assert_eq!(parsed, ckx);
        assert!(rest.is_empty());
    }
}
