/// The GSM 03.38 default alphabet, indexed by septet value.
///
/// 0x1B is the escape to the extension table; the decoder never looks it up unless it follows
/// another escape.
pub static GSM_BASIC_ALPHABET: [char; 128] = [
    '@', '\u{00A3}', '$', '\u{00A5}', 'è', 'é', 'ù', 'ì',
    'ò', '\u{00C7}', '\n', '\u{00D8}', '\u{00F8}', '\r', '\u{00C5}', '\u{00E5}',
    '\u{0394}', '_', '\u{03A6}', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ',
    'Σ', 'Θ', 'Ξ', '\u{001B}', 'Æ', 'æ', 'ß', 'É',
    ' ', '!', '"', '#', '¤', '%', '&', '\'',
    '(', ')', '*', '+', ',', '-', '.', '/',
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', ':', ';', '<', '=', '>', '?',
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W',
    'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§',
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o',
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w',
    'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];
/// Turkish national language single shift table (3GPP TS 23.038 A.2.1).
///
/// Sorted by septet value; only the entries listed here override the basic alphabet after an
/// escape.
pub static GSM_TURKISH_SINGLE_SHIFT_TABLE: [(u8, char); 16] = [
    (0x0A, '\u{000C}'),
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x47, 'Ğ'),
    (0x49, 'İ'),
    (0x53, 'Ş'),
    (0x63, 'ç'),
    (0x65, 'ğ'),
    (0x69, 'ı'),
    (0x73, 'ş'),
];
/// Look a septet up in the Turkish single shift table.
pub fn turkish_single_shift(septet: u8) -> Option<char> {
    GSM_TURKISH_SINGLE_SHIFT_TABLE
        .binary_search_by_key(&septet, |&(val, _)| val)
        .ok()
        .map(|i| GSM_TURKISH_SINGLE_SHIFT_TABLE[i].1)
}
