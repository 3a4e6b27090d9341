//! Utilities for dealing with User Data Headers inside messages.
//!
//! [This Wikipedia article](https://en.wikipedia.org/wiki/User_Data_Header) explains what this is
//! for pretty well. For decoding purposes, the interesting bits are how much of the user data the
//! header eats (which shifts the alignment of the 7-bit text after it), and whether it asks for a
//! national language shift table.
use crate::errors::*;

/// Information element identifier: concatenated SMS, 8-bit reference.
pub const IEI_CONCATENATED_8BIT: u8 = 0x00;
/// Information element identifier: concatenated SMS, 16-bit reference.
pub const IEI_CONCATENATED_16BIT: u8 = 0x08;
/// Information element identifier: national language single shift table.
pub const IEI_NATIONAL_SINGLE_SHIFT: u8 = 0x24;

/// Component of a User Data Header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdhComponent {
    /// Component identifier.
    pub id: u8,
    /// Component data.
    pub data: Vec<u8>
}
/// A User Data Header itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataHeader {
    /// Value of the UDH Length octet: the header size, not counting that octet.
    pub length: u8,
    pub components: Vec<UdhComponent>
}
/// Data about a concatenated SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatenatedSmsData {
    /// Reference that identifies which message this is a part of.
    pub reference: u16,
    /// How many parts to the message exist (e.g. 2).
    pub parts: u8,
    /// Which part this is (e.g. 1 of 2).
    pub sequence: u8
}
impl UserDataHeader {
    /// Parse the header at the start of some user data (i.e. *with* the UDH Length octet).
    ///
    /// Components have to fit inside the length the header declares; anything that runs over is
    /// rejected rather than read into the message text.
    pub fn parse(b: &[u8]) -> SmsResult<Self> {
        let length = match b.first() {
            Some(&l) => l,
            None => return Err(SmsError::InvalidUdh("UDHI specified, but no data"))
        };
        let end = length as usize + 1;
        if b.len() < end {
            return Err(SmsError::InvalidUdh("UDHL goes past end of data"));
        }
        let mut offset = 1;
        let mut components = vec![];
        while offset < end {
            if offset + 2 > end {
                return Err(SmsError::InvalidUdh("component header goes past end of UDH"));
            }
            let id = b[offset];
            let len = b[offset + 1] as usize;
            let data_end = offset + 2 + len;
            if data_end > end {
                return Err(SmsError::InvalidUdh("component data goes past end of UDH"));
            }
            trace!("UDH component {:#04x}, {} bytes", id, len);
            components.push(UdhComponent {
                id,
                data: b[offset + 2..data_end].to_owned()
            });
            offset = data_end;
        }
        Ok(UserDataHeader { length, components })
    }
    /// Number of user data octets taken up by the header, including the UDH Length octet.
    pub fn byte_span(&self) -> usize {
        self.length as usize + 1
    }
    /// Number of fill bits between the end of the header and the first septet of 7-bit text.
    pub fn septet_padding(&self) -> usize {
        match (self.byte_span() * 8) % 7 {
            0 => 0,
            rem => 7 - rem
        }
    }
    /// Whether the header asks for the (Turkish) national single shift table.
    pub fn uses_national_shift(&self) -> bool {
        self.components.iter().any(|c| c.id == IEI_NATIONAL_SINGLE_SHIFT)
    }
    /// The language identifier carried by the national single shift component, if any.
    pub fn single_shift_language(&self) -> Option<u8> {
        self.components.iter()
            .find(|c| c.id == IEI_NATIONAL_SINGLE_SHIFT)
            .and_then(|c| c.data.first().cloned())
    }
    /// If there is concatenated SMS data in this header, return it.
    pub fn get_concatenated_sms_data(&self) -> Option<ConcatenatedSmsData> {
        for comp in self.components.iter() {
            if comp.id == IEI_CONCATENATED_8BIT && comp.data.len() == 3 {
                return Some(ConcatenatedSmsData {
                    reference: comp.data[0] as _,
                    parts: comp.data[1],
                    sequence: comp.data[2]
                });
            }
            if comp.id == IEI_CONCATENATED_16BIT && comp.data.len() == 4 {
                let reference = ((comp.data[0] as u16) << 8) | (comp.data[1] as u16);
                return Some(ConcatenatedSmsData {
                    reference,
                    parts: comp.data[2],
                    sequence: comp.data[3]
                });
            }
        }
        None
    }
}
