//! The `sms-pdu-decode` library turns SMS-DELIVER PDUs, as handed over by modems that use the
//! Hayes/AT command set (`AT+CMGR` in PDU mode), into text.
//!
//! The quick way in is `decode_pdu_hex` (if you've got the hex PDU) or `decode_read_response` (if
//! you've got a base64 capture of the whole read response). The `pdu` module has the individual
//! header fields, and `gsm_encoding` the GSM 7-bit machinery, if you need more than the text.
//!
//! Supported payloads are GSM 7-bit (with the Turkish national single shift table, if the user
//! data header asks for it), 8-bit data (read as ISO-8859-1) and UCS-2.

#[macro_use] extern crate log;
#[macro_use] extern crate failure_derive;
#[macro_use] extern crate nom;
#[macro_use] extern crate derive_is_enum_variant;
#[macro_use] extern crate num_derive;

use std::convert::TryFrom;
pub use crate::errors::{SmsError, SmsResult};

macro_rules! check_offset {
    ($b:ident, $offset:ident, $reason:expr) => {
        if $b.get($offset).is_none() {
            return Err($crate::errors::SmsError::InvalidPdu(concat!("Offset check failed for: ", $reason)));
        }
    }
}

pub mod errors;
pub mod gsm_encoding;
pub mod pdu;
pub mod response;

use crate::pdu::{DeliverPdu, HexData};
use crate::response::ReadResponse;

/// Decode a hex-encoded SMS-DELIVER PDU into its message text.
pub fn decode_pdu_hex(hex: &str) -> SmsResult<String> {
    let bytes = HexData::decode(hex.trim())?;
    let pdu = DeliverPdu::try_from(&bytes as &[u8])?;
    debug!("PDU from {}, sent {}, dcs {:#04x}, udl {}, udhi {}",
           pdu.originating_address, pdu.scts, pdu.dcs, pdu.user_data_len, pdu.udhi());
    let msg = pdu.get_message_data().decode_message()?;
    Ok(msg.text)
}
/// Decode a base64 capture of an `AT+CMGR` response into the message text.
pub fn decode_read_response(b64: &str) -> SmsResult<String> {
    let resp = ReadResponse::from_base64(b64)?;
    if let Some(ref h) = resp.header {
        debug!("read response: status {:?}, TPDU length {}", h.status, h.length);
    }
    decode_pdu_hex(&resp.pdu)
}
#[cfg(test)]
mod test {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn hello() {
        // DCS 0x00, no header
        let text = decode_pdu_hex("07911326040000F0040B911326880736F400009930925161958005C8329BFD06");
        assert_eq!(text.unwrap(), "Hello");
        // the timestamp is the last thing before the user data length
        assert!(decode_pdu_hex("07911326040000F0040B911326880736F4000099309251619580").is_err());
        // no separators allowed
        assert!(decode_pdu_hex("07911326040000F0040B911326880736F4000099309251619580 05C8329BFD06").is_err());
    }
    #[test]
    fn ucs2() {
        let text = decode_pdu_hex("00040B911326880736F40008993092516195800400480069");
        assert_eq!(text.unwrap(), "Hi");
    }
    #[test]
    fn eight_bit() {
        let text = decode_pdu_hex("00040B911326880736F40004993092516195800348E921");
        assert_eq!(text.unwrap(), "Hé!");
    }
    #[test]
    fn turkish_shift() {
        let text = decode_pdu_hex("00440B911326880736F40000993092516195800803240101D894C3");
        assert_eq!(text.unwrap(), "ğa");
    }
    #[test]
    fn lowercase_hex() {
        let text = decode_pdu_hex("00040b911326880736f40008993092516195800400480069");
        assert_eq!(text.unwrap(), "Hi");
    }
    #[test]
    fn malformed() {
        assert!(decode_pdu_hex("").is_err());
        assert!(decode_pdu_hex("07").is_err());
        assert!(decode_pdu_hex("0791132604").is_err());
        assert!(decode_pdu_hex("zz").is_err());
        // UDHI set, but the header claims more than there is
        assert!(decode_pdu_hex("00440B911326880736F40000993092516195800809240101D894C3").is_err());
    }
    #[test]
    fn read_response() {
        let capture = "+CMGR: 1,,24\r\n00040B911326880736F40008993092516195800400480069\r\n\r\nOK\r\n";
        let text = decode_read_response(&STANDARD.encode(capture));
        assert_eq!(text.unwrap(), "Hi");
        assert!(decode_read_response(&STANDARD.encode("\r\n\r\n")).is_err());
    }
    #[test]
    fn wrapped_read_response() {
        let capture = "+CMGR: 1,,24\n00040B911326880736F40008993092516195800400480069\nOK\n";
        let b64 = STANDARD.encode(capture);
        let (head, tail) = b64.split_at(76);
        let text = decode_read_response(&format!("{}\n{}\n", head, tail));
        assert_eq!(text.unwrap(), "Hi");
    }
}
