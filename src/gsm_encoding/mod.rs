//! Utilities for dealing with the (annoying) GSM 7-bit encoding (GSM 03.38), and decoding message
//! data.
//!
//! "The annoying GSM 7-bit encoding" is otherwise known as [GSM
//! 03.38](https://en.wikipedia.org/wiki/GSM_03.38), and that Wikipedia article is pretty
//! informative.
//!
//! Decoding happens in two steps: the packed user data is first split into *septets* (see
//! `unpack_septets`), and the septets are then mapped to characters (see `gsm_decode_septets`).
//! `GsmMessageData::decode_message` ties the two together, along with the 8-bit and UCS-2
//! encodings.

use crate::pdu::MessageEncoding;
use crate::errors::*;

mod lookup_tables;
pub mod udh;

use self::udh::UserDataHeader;
pub use self::lookup_tables::*;

/// Septet that switches the next septet over to the extension table.
pub const GSM_ESCAPE: u8 = 0x1B;
/// What gets emitted for septets we have no character for.
pub const GSM_PLACEHOLDER: char = '?';

/// Where the septet decoder is at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, is_enum_variant)]
enum DecodeState {
    /// Reading characters from the basic alphabet.
    Normal,
    /// The previous septet was an escape.
    Escaped
}
fn basic_char(septet: u8) -> char {
    match GSM_BASIC_ALPHABET.get(septet as usize) {
        Some(&ch) => ch,
        None => {
            trace!("no basic alphabet entry for {:#04x}", septet);
            GSM_PLACEHOLDER
        }
    }
}
/// Decode a sequence of **unpacked** septets into a string.
///
/// A 0x00 septet (outside of an escape) ends the message. If `national` is set, escaped septets
/// are looked up in the Turkish single shift table first; otherwise (and for septets that table
/// doesn't have), they fall back to the basic alphabet.
///
/// This method is lossy, and doesn't complain about crap that it can't decode.
pub fn gsm_decode_septets(septets: &[u8], national: bool) -> String {
    use self::DecodeState::*;

    let mut ret = String::new();
    let mut state = Normal;
    for &septet in septets {
        state = match (state, septet) {
            (Normal, 0x00) => break,
            (Normal, GSM_ESCAPE) => Escaped,
            (Normal, s) => {
                ret.push(basic_char(s));
                Normal
            },
            (Escaped, s) => {
                let shifted = if national {
                    turkish_single_shift(s)
                }
                else {
                    None
                };
                ret.push(shifted.unwrap_or_else(|| basic_char(s)));
                Normal
            }
        };
    }
    if state.is_escaped() {
        trace!("dropping dangling escape at end of message");
    }
    ret
}
/// Unpack GSM 7-bit packed data into septets.
///
/// Bits are consumed least significant first. The first `padding` bits (0 to 7) are skipped;
/// after that, every 7 bits become one septet. Unpacking stops once `len` septets have been
/// produced (if given), or when fewer than 7 bits are left - leftover bits are dropped, not
/// padded out into an extra character.
pub fn unpack_septets(orig: &[u8], padding: usize, len: Option<usize>) -> Vec<u8> {
    debug_assert!(padding < 8, "padding of {} bits", padding);
    let mut ret = vec![];
    // Bits that have been read, but not yet emitted. Never more than 14 of them.
    let mut acc: u16 = 0;
    let mut bits = 0;
    let mut skip = padding;
    for &byte in orig.iter() {
        let mut byte = byte as u16;
        let mut avail = 8;
        if skip > 0 {
            byte >>= skip;
            avail -= skip;
            skip = 0;
        }
        acc |= byte << bits;
        bits += avail;
        while bits >= 7 {
            if len.map_or(false, |l| ret.len() >= l) {
                return ret;
            }
            ret.push((acc & 0b0111_1111) as u8);
            acc >>= 7;
            bits -= 7;
        }
    }
    ret
}
/// The 'data' portion of an SMS message - i.e. the text, for a simple message.
#[derive(Debug, Clone)]
pub struct GsmMessageData {
    pub(crate) encoding: MessageEncoding,
    pub(crate) udh: bool,
    pub(crate) bytes: Vec<u8>,
    pub(crate) user_data_len: u8
}
/// A decoded text message, with optional user data header.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    /// Decoded text.
    pub text: String,
    /// User data header, if the message had one.
    pub udh: Option<UserDataHeader>
}
impl GsmMessageData {
    /// Make some message data out of its raw parts.
    pub fn new(encoding: MessageEncoding, udh: bool, bytes: Vec<u8>, user_data_len: u8) -> Self {
        GsmMessageData { encoding, udh, bytes, user_data_len }
    }
    /// Get the message encoding.
    pub fn encoding(&self) -> &MessageEncoding {
        &self.encoding
    }
    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
    /// Get the user data length.
    pub fn user_data_len(&self) -> u8 {
        self.user_data_len
    }
    /// Attempt to decode this message.
    ///
    /// For 7-bit messages with a header, the number of septets asked for is the user data length
    /// minus the header's span in *octets*.
    pub fn decode_message(&self) -> SmsResult<DecodedMessage> {
        use encoding::{Encoding, DecoderTrap};
        use encoding::all::{ISO_8859_1, UTF_16BE};

        let udh = if self.udh {
            Some(UserDataHeader::parse(&self.bytes)?)
        }
        else {
            None
        };
        let start = udh.as_ref().map(|u| u.byte_span()).unwrap_or(0);
        // UserDataHeader::parse checks that the span fits.
        let payload = &self.bytes[start..];
        if let Some(csms) = udh.as_ref().and_then(|u| u.get_concatenated_sms_data()) {
            debug!("message is part {} of {} (ref {})", csms.sequence, csms.parts, csms.reference);
        }
        let text = match self.encoding {
            MessageEncoding::Gsm7Bit => {
                let (padding, national) = match udh {
                    Some(ref u) => (u.septet_padding(), u.uses_national_shift()),
                    None => (0, false)
                };
                let count = (self.user_data_len as usize).saturating_sub(start);
                let septets = unpack_septets(payload, padding, Some(count));
                trace!("{} septets (wanted {}), padding {}, national shift {}",
                       septets.len(), count, padding, national);
                gsm_decode_septets(&septets, national)
            },
            MessageEncoding::EightBit => {
                ISO_8859_1.decode(payload, DecoderTrap::Replace)
                    .map_err(|e| SmsError::UndecodablePayload(e.into_owned()))?
            },
            MessageEncoding::Ucs2 => {
                UTF_16BE.decode(payload, DecoderTrap::Replace)
                    .map_err(|e| SmsError::UndecodablePayload(e.into_owned()))?
            }
        };
        Ok(DecodedMessage { text, udh })
    }
}
