//! Picking the PDU out of a captured `AT+CMGR` (read message) response.
//!
//! A PDU-mode read response looks something like this:
//!
//! ```text
//! +CMGR: 1,,36
//! 07917283010010F5040BC87238880900F10000993092516195800AE8329BFD4697D9EC37
//!
//! OK
//! ```
//!
//! The capture is handed over base64-encoded. The PDU is the second non-blank line (or the only
//! one, if someone just passed the PDU itself).
use encoding::{Encoding, DecoderTrap};
use encoding::all::{ASCII, UTF_8};
use num_traits::FromPrimitive;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use crate::errors::*;

/// The storage status of an SMS message (the `<stat>` in `+CMGR`).
#[repr(u8)]
#[derive(Debug, FromPrimitive, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageStatus {
    /// Received and unread.
    ReceivedUnread = 0,
    /// Received and read.
    ReceivedRead = 1,
    /// Outgoing and unsent.
    StoredUnsent = 2,
    /// Outgoing and sent.
    StoredSent = 3
}
/// The information line of a PDU-mode read response: `+CMGR: <stat>,[<alpha>],<length>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadHeader {
    /// Message status; `None` if the modem said something we don't know about.
    pub status: Option<MessageStatus>,
    /// Phonebook name for the sender, if the modem bothered looking it up.
    pub alpha: Option<String>,
    /// Length of the TPDU in octets (i.e. not counting the SMSC address).
    pub length: u32
}
named!(pub parse_string(&[u8]) -> String,
       map_res!(
           delimited!(
               tag!("\""),
               take_until!("\""),
               tag!("\"")
           ),
           |data| {
               ASCII.decode(data, DecoderTrap::Replace)
           }
       )
);
named!(pub parse_integer(&[u8]) -> u32,
       map_res!(
           many1!(
               one_of!("0123456789")
           ),
           |data: Vec<char>| {
               let st: String = data.into_iter().collect();
               st.parse()
           }
       )
);
named!(pub parse_read_header(&[u8]) -> ReadHeader,
       do_parse!(
           tag!("+CMGR:") >>
           opt!(tag!(" ")) >>
           stat: parse_integer >>
           tag!(",") >>
           alpha: opt!(parse_string) >>
           tag!(",") >>
           length: parse_integer >>
           (ReadHeader {
               status: MessageStatus::from_u32(stat),
               alpha,
               length
           })
       )
);
/// A read response, split up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    /// The `+CMGR:` line, if there was one and it made sense.
    pub header: Option<ReadHeader>,
    /// The hex-encoded PDU.
    pub pdu: String
}
impl ReadResponse {
    /// Decode a base64 capture of a read response.
    ///
    /// Whitespace in the capture (e.g. the line wrapping `base64` puts in) is ignored. Bytes that
    /// aren't valid UTF-8 are dropped.
    pub fn from_base64(data: &str) -> SmsResult<Self> {
        let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let raw = STANDARD.decode(&cleaned)?;
        let text = UTF_8.decode(&raw, DecoderTrap::Ignore)
            .map_err(|e| SmsError::UndecodablePayload(e.into_owned()))?;
        Self::from_text(&text)
    }
    /// Split up a read response that's already been turned into text.
    pub fn from_text(text: &str) -> SmsResult<Self> {
        use nom::IResult;

        let lines = text.split('\n')
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        trace!("read response has {} non-blank lines", lines.len());
        let pdu = match lines.len() {
            0 => return Err(SmsError::EmptyResponse),
            1 => lines[0],
            _ => lines[1]
        };
        let header = if lines.len() > 1 {
            match parse_read_header(lines[0].as_bytes()) {
                IResult::Done(_, h) => Some(h),
                _ => {
                    debug!("first line of read response isn't a +CMGR header");
                    None
                }
            }
        }
        else {
            None
        };
        Ok(ReadResponse {
            header,
            pdu: pdu.to_string()
        })
    }
}
#[cfg(test)]
mod test {
    use super::*;

    const PDU: &str = "07917283010010F5040BC87238880900F10000993092516195800AE8329BFD4697D9EC37";

    #[test]
    fn header_without_alpha() {
        assert_eq!(parse_read_header(b"+CMGR: 1,,36").unwrap(),
                   (&[] as &[_], ReadHeader {
                       status: Some(MessageStatus::ReceivedRead),
                       alpha: None,
                       length: 36
                   }));
    }
    #[test]
    fn header_with_alpha() {
        assert_eq!(parse_read_header(b"+CMGR:0,\"Mum\",24").unwrap(),
                   (&[] as &[_], ReadHeader {
                       status: Some(MessageStatus::ReceivedUnread),
                       alpha: Some("Mum".into()),
                       length: 24
                   }));
    }
    #[test]
    fn header_with_odd_status() {
        let (_, h) = parse_read_header(b"+CMGR: 9,,24").unwrap();
        assert_eq!(h.status, None);
    }
    #[test]
    fn full_response() {
        let text = format!("\r\n+CMGR: 1,,36\r\n{}\r\n\r\nOK\r\n", PDU);
        let resp = ReadResponse::from_text(&text).unwrap();
        assert_eq!(resp.pdu, PDU);
        assert_eq!(resp.header.map(|h| h.length), Some(36));
    }
    #[test]
    fn bare_pdu() {
        let resp = ReadResponse::from_text(&format!("{}\n", PDU)).unwrap();
        assert_eq!(resp.pdu, PDU);
        assert!(resp.header.is_none());
    }
    #[test]
    fn second_line_without_header() {
        let resp = ReadResponse::from_text("garbage\nAABB\nOK").unwrap();
        assert_eq!(resp.pdu, "AABB");
        assert!(resp.header.is_none());
    }
    #[test]
    fn empty_response() {
        assert!(ReadResponse::from_text("").is_err());
        assert!(ReadResponse::from_text(" \r\n\r\n").is_err());
    }
    #[test]
    fn from_base64_capture() {
        let b64 = STANDARD.encode(format!("+CMGR: 1,,36\n{}\nOK\n", PDU));
        assert_eq!(ReadResponse::from_base64(&b64).unwrap().pdu, PDU);
        assert!(ReadResponse::from_base64("not base64!").is_err());
    }
    #[test]
    fn wrapped_base64_capture() {
        let b64 = STANDARD.encode(format!("+CMGR: 1,,36\n{}\nOK\n", PDU));
        assert!(b64.len() > 76);
        // wrapped at 76 columns, like base64(1) does
        let wrapped = b64.as_bytes()
            .chunks(76)
            .map(|c| ::std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        let resp = ReadResponse::from_base64(&format!("{}\n", wrapped)).unwrap();
        assert_eq!(resp.pdu, PDU);
        assert_eq!(resp.header.map(|h| h.length), Some(36));
    }
    #[test]
    fn invalid_utf8_is_dropped() {
        let mut raw = b"+CMGR: 1,,4\n".to_vec();
        raw.extend(&[0xFF, b'A', b'B', 0xFE, b'C', b'D', b'\n']);
        let resp = ReadResponse::from_base64(&STANDARD.encode(&raw)).unwrap();
        assert_eq!(resp.pdu, "ABCD");
    }
}
