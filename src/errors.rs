//! Error handling.
use base64::DecodeError;

/// Everything that can go wrong while decoding a message.
///
/// Unmappable characters are *not* errors; they get substituted with a placeholder and decoding
/// carries on.
#[derive(Fail, Debug)]
pub enum SmsError {
    #[fail(display = "Read response was not valid base64: {}", _0)]
    InvalidBase64(#[cause] DecodeError),
    #[fail(display = "Read response contained no PDU line")]
    EmptyResponse,
    #[fail(display = "Invalid hex string")]
    InvalidHex,
    #[fail(display = "Invalid PDU: {}", _0)]
    InvalidPdu(&'static str),
    #[fail(display = "Invalid user data header: {}", _0)]
    InvalidUdh(&'static str),
    #[fail(display = "Payload could not be decoded: {}", _0)]
    UndecodablePayload(String),
}
impl From<DecodeError> for SmsError {
    fn from(e: DecodeError) -> SmsError {
        SmsError::InvalidBase64(e)
    }
}
pub type SmsResult<T> = Result<T, SmsError>;
