use thiserror::Error;

use crate::message::AlertDescription;

/// Errors produced by the TLS engine.
///
/// Nothing here is retried automatically. A failed handshake can only be
/// retried on a brand new connection with fresh randomness.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// The peer declared a length that exceeds the available bytes.
    #[error("truncated or incomplete message")]
    ParseIncomplete,

    /// A field did not decode as a valid value.
    #[error("malformed {0}")]
    Decode(&'static str),

    #[error("unsupported cipher suite {0:#06x}")]
    UnsupportedCipherSuite(u16),

    #[error("unsupported named curve {0:#06x}")]
    UnsupportedCurve(u16),

    #[error("record length {0} exceeds maximum")]
    RecordOverflow(usize),

    /// A message arrived out of the expected handshake sequence.
    #[error("unexpected {got} in state {state}")]
    UnexpectedMessage {
        state: &'static str,
        got: &'static str,
    },

    /// Integrity or crypto failure. Kept distinct from [`Error::Io`] so
    /// callers can treat integrity violations specially.
    #[error("security failure: {0}")]
    Security(&'static str),

    #[error("fatal alert received: {0:?}")]
    AlertReceived(AlertDescription),

    #[error("connection is closed")]
    Closed,
}

/// Run a complete nom parser over an input, folding nom's error cases into
/// the crate error with a short context label.
pub(crate) fn parse_all<'a, T>(
    result: nom::IResult<&'a [u8], T>,
    what: &'static str,
) -> Result<T, Error> {
    match result {
        Ok((rest, value)) => {
            if rest.is_empty() {
                Ok(value)
            } else {
                Err(Error::Decode(what))
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::ParseIncomplete),
        Err(_) => Err(Error::Decode(what)),
    }
}
