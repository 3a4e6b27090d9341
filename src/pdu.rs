//! Utilities for dealing with GSM 03.40 Protocol Data Units (PDUs).
//!
//! See [this Wikipedia article](https://en.wikipedia.org/wiki/GSM_03.40) for more general
//! information on the format of PDUs.
//!
//! Only SMS-DELIVER PDUs (i.e. messages that have been received) are parsed here. The PDU comes
//! out of the modem as a hex string; use `HexData::decode` to turn that into bytes, and then
//! `DeliverPdu::try_from` to pick the fields out.
use std::fmt;
use std::convert::TryFrom;
use num_traits::FromPrimitive;
use crate::errors::*;
use crate::gsm_encoding::{GsmMessageData, gsm_decode_septets, unpack_septets};

/// Type of number value - used as part of phone numbers to indicate whether the number is
/// international, alphanumeric, etc.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum TypeOfNumber {
    Unknown = 0b0_000_0000,
    International = 0b0_001_0000,
    National = 0b0_010_0000,
    Special = 0b0_011_0000,
    Subscriber = 0b0_100_0000,
    /// Alphanumeric sender (e.g. a bank's name), encoded in GSM 7-bit.
    Gsm = 0b0_101_0000,
    Short = 0b0_110_0000,
    Reserved = 0b0_111_0000
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum NumberingPlanIdentification {
    NetworkDetermined = 0b0_000_0000,
    IsdnTelephone = 0b0_000_0001,
    Data = 0b0_000_0011,
    Telex = 0b0_000_0100,
    National = 0b0_000_1000,
    Private = 0b0_000_1001,
    Ermes = 0b0_000_1010,
    Reserved = 0b0_000_1111
}
/// Address type, comprised of a `TypeOfNumber` and `NumberingPlanIdentification` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressType {
    pub type_of_number: TypeOfNumber,
    pub numbering_plan_identification: NumberingPlanIdentification
}
/// Numbering plans this doesn't know about are treated as `Reserved`; a weird sender address
/// shouldn't stop a message from being read.
impl From<u8> for AddressType {
    fn from(b: u8) -> Self {
        let type_of_number = TypeOfNumber::from_u8(b & 0b0_111_0000)
            .unwrap_or(TypeOfNumber::Reserved);
        let numbering_plan_identification = NumberingPlanIdentification::from_u8(b & 0b0_000_1111)
            .unwrap_or(NumberingPlanIdentification::Reserved);
        AddressType { type_of_number, numbering_plan_identification }
    }
}
/// A GSM phone number: decimal digits, or unpacked septets for alphanumeric addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(pub Vec<u8>);
/// Unpack semi-octet ("swapped nibble") digits, dropping the 0xF filler.
impl<'a> From<&'a [u8]> for PhoneNumber {
    fn from(b: &[u8]) -> Self {
        let mut ret = vec![];
        for b in b.iter() {
            let first = b & 0b0000_1111;
            let second = (b & 0b1111_0000) >> 4;
            ret.push(first);
            if second != 0b0000_1111 {
                ret.push(second);
            }
        }
        PhoneNumber(ret)
    }
}
impl PhoneNumber {
    /// Make a `PhoneNumber` for an alphanumeric GSM sender address.
    pub fn from_gsm(b: &[u8], len: usize) -> Self {
        PhoneNumber(unpack_septets(b, 0, Some(len)))
    }
}
/// An address (sender or service centre) inside a PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduAddress {
    pub type_addr: AddressType,
    pub number: PhoneNumber
}
impl fmt::Display for PduAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.type_addr.type_of_number {
            TypeOfNumber::International => "+",
            _ => ""
        };
        write!(f, "{}", prefix)?;
        if self.type_addr.type_of_number == TypeOfNumber::Gsm {
            write!(f, "{}", gsm_decode_septets(&self.number.0, false))?;
        }
        else {
            for b in self.number.0.iter() {
                // 0xA-0xE are '*', '#', 'a', 'b', 'c' in the BCD address alphabet
                match *b {
                    0..=9 => write!(f, "{}", b)?,
                    0xA => write!(f, "*")?,
                    0xB => write!(f, "#")?,
                    x @ 0xC..=0xE => write!(f, "{}", (b'a' + x - 0xC) as char)?,
                    _ => write!(f, "?")?
                }
            }
        }
        Ok(())
    }
}
impl PduAddress {
    /// Build an address from its type-of-address octet onwards, given how many septets an
    /// alphanumeric number would take up.
    fn from_parts(b: &[u8], septets: usize) -> SmsResult<Self> {
        if b.len() < 2 {
            return Err(SmsError::InvalidPdu("tried to make a PduAddress from less than 2 bytes"));
        }
        let type_addr = AddressType::from(b[1]);
        let number = if type_addr.type_of_number == TypeOfNumber::Gsm {
            PhoneNumber::from_gsm(&b[2..], septets)
        }
        else {
            PhoneNumber::from(&b[2..])
        };
        Ok(PduAddress { type_addr, number })
    }
    /// Parse a service centre address, whose length octet counts octets (type of address
    /// included) rather than semi-octets.
    pub fn from_sca(b: &[u8]) -> SmsResult<Self> {
        let octets = b.first().map(|&l| l as usize).unwrap_or(0).saturating_sub(1);
        Self::from_parts(b, (octets * 8) / 7)
    }
}
/// Accepts the address *with* its length and type-of-address octets in front, where the length
/// is in semi-octets (as for the originating address).
///
/// The length only matters for alphanumeric addresses: it says how many septets to unpack. The
/// caller has already used it to cut out the right number of bytes.
impl<'a> TryFrom<&'a [u8]> for PduAddress {
    type Error = SmsError;
    fn try_from(b: &[u8]) -> SmsResult<Self> {
        let semi_octets = b.first().map(|&l| l as usize).unwrap_or(0);
        Self::from_parts(b, (semi_octets * 4) / 7)
    }
}
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum MessageType {
    SmsDeliver = 0b000000_00,
    SmsCommand = 0b000000_10,
    SmsSubmit = 0b000000_01,
    Reserved = 0b000000_11
}
/// The first octet of an SMS-DELIVER PDU.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeliverPduFirstOctet {
    /// Message type indicator.
    pub mti: MessageType,
    /// More messages to send (set when there *aren't* any more).
    pub mms: bool,
    /// Status report indication.
    pub sri: bool,
    /// User data header indicator.
    pub udhi: bool,
    /// Reply path.
    pub rp: bool
}
impl From<u8> for DeliverPduFirstOctet {
    fn from(b: u8) -> Self {
        let mti = MessageType::from_u8(b & 0b000000_11)
            .unwrap_or(MessageType::Reserved);
        let mms = (b & 0b00000100) > 0;
        let sri = (b & 0b00100000) > 0;
        let udhi = (b & 0b01000000) > 0;
        let rp = (b & 0b10000000) > 0;
        DeliverPduFirstOctet { mti, mms, sri, udhi, rp }
    }
}
/// How the user data is encoded, as picked out of the data coding scheme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageEncoding {
    Gsm7Bit,
    EightBit,
    Ucs2
}
/// Only bits 2 and 3 of the DCS are looked at: bit 2 set means 8-bit data (this also catches the
/// reserved `0b11` value), `0b10` means UCS-2, and anything else is GSM 7-bit.
impl From<u8> for MessageEncoding {
    fn from(dcs: u8) -> Self {
        if (dcs & 0b0000_0100) > 0 {
            MessageEncoding::EightBit
        }
        else if (dcs & 0b0000_1100) == 0b0000_1000 {
            MessageEncoding::Ucs2
        }
        else {
            MessageEncoding::Gsm7Bit
        }
    }
}
/// The time the service centre got the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmscTimestamp {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Offset from UTC, in quarters of an hour.
    pub timezone: i8
}
/// Turn a swapped semi-octet pair into the number it represents.
pub fn reverse_byte(b: u8) -> u8 {
    let units = b >> 4;
    let tens = b & 0b0000_1111;
    (tens * 10) + units
}
impl<'a> TryFrom<&'a [u8]> for SmscTimestamp {
    type Error = SmsError;
    fn try_from(b: &[u8]) -> SmsResult<Self> {
        if b.len() != 7 {
            return Err(SmsError::InvalidPdu("SmscTimestamp must be 7 bytes long"));
        }
        // Bit 3 of the timezone octet is the sign; it sits in the 'tens' semi-octet.
        let tz = reverse_byte(b[6] & 0b1111_0111) as i8;
        let timezone = if (b[6] & 0b0000_1000) > 0 { -tz } else { tz };
        Ok(SmscTimestamp {
            year: reverse_byte(b[0]),
            month: reverse_byte(b[1]),
            day: reverse_byte(b[2]),
            hour: reverse_byte(b[3]),
            minute: reverse_byte(b[4]),
            second: reverse_byte(b[5]),
            timezone
        })
    }
}
impl fmt::Display for SmscTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.timezone < 0 { '-' } else { '+' };
        let minutes = (self.timezone as i16).abs() * 15;
        write!(f, "{:02}-{:02}-{:02} {:02}:{:02}:{:02} {}{:02}{:02}",
               self.year, self.month, self.day, self.hour, self.minute, self.second,
               sign, minutes / 60, minutes % 60)
    }
}
/// An SMS-DELIVER PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverPdu {
    pub sca: Option<PduAddress>,
    pub first_octet: DeliverPduFirstOctet,
    pub originating_address: PduAddress,
    /// Protocol identifier.
    pub pid: u8,
    /// Data coding scheme.
    pub dcs: u8,
    pub scts: SmscTimestamp,
    pub user_data: Vec<u8>,
    /// Length of the user data: in septets for GSM 7-bit messages, in octets otherwise.
    pub user_data_len: u8
}
impl DeliverPdu {
    /// Whether the user data starts with a user data header.
    pub fn udhi(&self) -> bool {
        self.first_octet.udhi
    }
    pub fn encoding(&self) -> MessageEncoding {
        MessageEncoding::from(self.dcs)
    }
    pub fn get_message_data(&self) -> GsmMessageData {
        GsmMessageData::new(self.encoding(), self.first_octet.udhi,
                            self.user_data.clone(), self.user_data_len)
    }
}
impl<'a> TryFrom<&'a [u8]> for DeliverPdu {
    type Error = SmsError;
    fn try_from(b: &[u8]) -> SmsResult<Self> {
        let mut offset: usize = 0;
        check_offset!(b, offset, "SCA length");
        let scalen = b[0];
        // scalen counts octets (including the type of address), not digits
        offset += scalen as usize + 1;
        let sca = if scalen > 0 {
            let o = offset - 1;
            check_offset!(b, o, "SCA");
            Some(PduAddress::from_sca(&b[0..offset])?)
        }
        else {
            None
        };
        check_offset!(b, offset, "first octet");
        let first_octet = DeliverPduFirstOctet::from(b[offset]);
        offset += 1;
        check_offset!(b, offset, "originating address len");
        // The sender's length is in digits; an odd count leaves the last octet half-filled.
        let digits = b[offset] as usize;
        let oa_span = 2 + (digits + 1) / 2;
        let oa_end = offset + oa_span;
        let last = oa_end - 1;
        check_offset!(b, last, "originating address");
        let originating_address = PduAddress::try_from(&b[offset..oa_end])?;
        offset = oa_end;
        check_offset!(b, offset, "protocol identifier");
        let pid = b[offset];
        offset += 1;
        check_offset!(b, offset, "data coding scheme");
        let dcs = b[offset];
        offset += 1;
        let scts_end = offset + 7;
        let ss = offset + 6;
        check_offset!(b, ss, "service center timestamp");
        let scts = SmscTimestamp::try_from(&b[offset..scts_end])?;
        offset += 7;
        check_offset!(b, offset, "user data len");
        let user_data_len = b[offset];
        offset += 1;
        let user_data = if b.get(offset).is_some() {
            b[offset..].to_owned()
        }
        else {
            vec![]
        };
        Ok(DeliverPdu {
            sca,
            first_octet,
            originating_address,
            pid,
            dcs,
            scts,
            user_data,
            user_data_len
        })
    }
}
/// Hex-encoded data, as modems like to hand PDUs over.
pub struct HexData<'a>(pub &'a [u8]);
impl<'a> fmt::Display for HexData<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
       for b in self.0.iter() {
           write!(f, "{:02X}", b)?;
       }
       Ok(())
    }
}
impl<'a> HexData<'a> {
    /// Decode a hex string (of even length, with no separators) into bytes.
    pub fn decode(data: &str) -> SmsResult<Vec<u8>> {
        if data.len() % 2 != 0 || !data.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SmsError::InvalidHex);
        }
        data.as_bytes()
            .chunks(2)
            .map(::std::str::from_utf8)
            .map(|x| {
                match x {
                    Ok(x) => u8::from_str_radix(x, 16)
                        .map_err(|_| SmsError::InvalidHex),
                    Err(_) => Err(SmsError::InvalidHex)
                }
            })
            .collect()
    }
}
#[cfg(test)]
mod test {
    use super::*;

    fn pdu(hex: &str) -> DeliverPdu {
        let bytes = HexData::decode(hex).unwrap();
        DeliverPdu::try_from(&bytes as &[u8]).unwrap()
    }
    #[test]
    fn hellohello() {
        let pdu = pdu("07917283010010F5040BC87238880900F10000993092516195800AE8329BFD4697D9EC37");
        assert_eq!(pdu.sca.as_ref().map(|s| s.to_string()), Some("+27381000015".into()));
        assert!(!pdu.udhi());
        assert_eq!(pdu.first_octet.mti, MessageType::SmsDeliver);
        assert_eq!(pdu.originating_address.type_addr.type_of_number, TypeOfNumber::Subscriber);
        assert_eq!(pdu.originating_address.to_string(), "27838890001");
        assert_eq!(pdu.pid, 0);
        assert_eq!(pdu.dcs, 0);
        assert_eq!(pdu.encoding(), MessageEncoding::Gsm7Bit);
        assert_eq!(pdu.user_data_len, 10);
        assert_eq!(pdu.user_data.len(), 9);
        assert_eq!(pdu.get_message_data().decode_message().unwrap().text, "hellohello");
    }
    #[test]
    fn timestamp() {
        let pdu = pdu("07917283010010F5040BC87238880900F10000993092516195800AE8329BFD4697D9EC37");
        assert_eq!(pdu.scts, SmscTimestamp {
            year: 99,
            month: 3,
            day: 29,
            hour: 15,
            minute: 16,
            second: 59,
            timezone: 8
        });
        assert_eq!(pdu.scts.to_string(), "99-03-29 15:16:59 +0200");
        let scts = SmscTimestamp::try_from(&[0x02, 0x10, 0x31, 0x21, 0x43, 0x65, 0x0A][..]).unwrap();
        assert_eq!(scts.timezone, -20);
        assert_eq!(scts.to_string(), "20-01-13 12:34:56 -0500");
    }
    #[test]
    fn no_sca() {
        let pdu = pdu("00040B911326880736F40000993092516195800AE8329BFD4697D9EC37");
        assert!(pdu.sca.is_none());
        assert_eq!(pdu.originating_address.to_string(), "+31628870634");
        assert_eq!(pdu.get_message_data().decode_message().unwrap().text, "hellohello");
    }
    #[test]
    fn alphanumeric_sender() {
        // "Test" as a 7-bit alphanumeric address: 4 septets in 4 octets, 7 semi-octets
        let pdu = pdu("000407D0D4F29C0E0000993092516195800548");
        assert_eq!(pdu.originating_address.type_addr.type_of_number, TypeOfNumber::Gsm);
        assert_eq!(pdu.originating_address.to_string(), "Test");
    }
    #[test]
    fn alphanumeric_service_centre() {
        // SCA length 5 octets: type of address plus "Test" packed into 4 octets
        let pdu = pdu("05D0D4F29C0E040B911326880736F40000993092516195800548");
        let sca = pdu.sca.unwrap();
        assert_eq!(sca.type_addr.type_of_number, TypeOfNumber::Gsm);
        assert_eq!(sca.to_string(), "Test");
        assert_eq!(pdu.originating_address.to_string(), "+31628870634");
    }
    #[test]
    fn encoding_from_dcs() {
        assert_eq!(MessageEncoding::from(0x00), MessageEncoding::Gsm7Bit);
        assert_eq!(MessageEncoding::from(0x04), MessageEncoding::EightBit);
        assert_eq!(MessageEncoding::from(0x08), MessageEncoding::Ucs2);
        assert_eq!(MessageEncoding::from(0x0C), MessageEncoding::EightBit);
        assert_eq!(MessageEncoding::from(0x18), MessageEncoding::Ucs2);
        assert_eq!(MessageEncoding::from(0xF0), MessageEncoding::Gsm7Bit);
    }
    #[test]
    fn empty_user_data() {
        let pdu = pdu("00040B911326880736F400009930925161958000");
        assert!(pdu.user_data.is_empty());
        assert_eq!(pdu.get_message_data().decode_message().unwrap().text, "");
    }
    #[test]
    fn truncated_pdus() {
        let full = HexData::decode("07917283010010F5040BC87238880900F1000099309251619580").unwrap();
        assert!(DeliverPdu::try_from(&full as &[u8]).is_err());
        for cut in 0..full.len() {
            assert!(DeliverPdu::try_from(&full[..cut]).is_err(), "cut at {}", cut);
        }
    }
    #[test]
    fn hex() {
        assert_eq!(HexData::decode("00ff7A").unwrap(), vec![0x00, 0xFF, 0x7A]);
        assert_eq!(HexData::decode("").unwrap(), Vec::<u8>::new());
        assert!(HexData::decode("0").is_err());
        assert!(HexData::decode("0G").is_err());
        assert!(HexData::decode("+1").is_err());
        assert_eq!(HexData(&[0x0A, 0xBC]).to_string(), "0ABC");
    }
}
