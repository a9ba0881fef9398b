//! Byte classification for the scan loops.
//!
//! A single 256-entry table maps every byte to a bitmask over the character
//! classes the parser and tokenizer care about. Classification is a pure
//! table lookup with no state and no error mode.

#[allow(dead_code)]
#[derive(Clone, Copy)]
#[rustfmt::skip]
pub(crate) enum Chartype {
    ParsePCData  =   1, // stops a PCDATA scan: \0, <
    ParseAttr    =   2, // stops an unquoted attribute-value scan: \0, \r, \t, \n, >, space
    ParseAttrWs  =   4, // stops a quoted attribute-value scan: \0, \t, \n, \r, ", &, '
    Space        =   8, // whitespace: \t, \n, \r, space
    ParseCdata   =  16, // stops a CDATA scan: \0, ], >, \r
    ParseComment =  32, // stops a comment scan: \0, -, >, \r
    Symbol       =  64, // name continuation: A-Za-z, 0-9, _, :, -, . and any byte >= 128
    StartSymbol  = 128, // name start: A-Za-z, _, : and any byte >= 128
}

#[rustfmt::skip]
pub(crate) const CHARTYPE_TABLE: [u8; 256] = [
     55,   0,   0,   0,   0,   0,   0,   0,      0,  14,  14,   0,   0,  62,   0,   0, // 0-15
      0,   0,   0,   0,   0,   0,   0,   0,      0,   0,   0,   0,   0,   0,   0,   0, // 16-31
     10,   0,   4,   0,   0,   0,   4,   4,      0,   0,   0,   0,   0,  96,  64,   0, // 32-47
     64,  64,  64,  64,  64,  64,  64,  64,     64,  64, 192,   0,   1,   0,  50,   0, // 48-63
      0, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192, // 64-79
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192,   0,   0,  16,   0, 192, // 80-95
      0, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192, // 96-111
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192,   0,   0,   0,   0,   0, // 112-127

    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192, // 128+
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
    192, 192, 192, 192, 192, 192, 192, 192,    192, 192, 192, 192, 192, 192, 192, 192,
];

/// Checks if a byte belongs to the given character class.
#[inline(always)]
pub(crate) fn is_chartype(byte: u8, chartype: Chartype) -> bool {
    (CHARTYPE_TABLE[byte as usize] & chartype as u8) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_classes() {
        assert!(is_chartype(b'a', Chartype::StartSymbol));
        assert!(is_chartype(b'Z', Chartype::StartSymbol));
        assert!(is_chartype(b'_', Chartype::StartSymbol));
        assert!(is_chartype(b':', Chartype::StartSymbol));
        assert!(!is_chartype(b'7', Chartype::StartSymbol));
        assert!(is_chartype(b'7', Chartype::Symbol));
        assert!(is_chartype(b'-', Chartype::Symbol));
        assert!(is_chartype(b'.', Chartype::Symbol));
        assert!(is_chartype(0xC3, Chartype::StartSymbol));
    }

    #[test]
    fn test_scan_terminators() {
        assert!(is_chartype(b'<', Chartype::ParsePCData));
        assert!(is_chartype(0, Chartype::ParsePCData));
        assert!(!is_chartype(b'a', Chartype::ParsePCData));

        for byte in [0u8, b'\r', b'\t', b'\n', b'>', b' '] {
            assert!(is_chartype(byte, Chartype::ParseAttr), "byte {byte}");
        }
        for byte in [0u8, b']', b'>', b'\r'] {
            assert!(is_chartype(byte, Chartype::ParseCdata), "byte {byte}");
        }
        for byte in [0u8, b'-', b'>', b'\r'] {
            assert!(is_chartype(byte, Chartype::ParseComment), "byte {byte}");
        }
    }

    #[test]
    fn test_whitespace() {
        for byte in [b' ', b'\t', b'\n', b'\r'] {
            assert!(is_chartype(byte, Chartype::Space));
        }
        assert!(!is_chartype(0, Chartype::Space));
        assert!(!is_chartype(b'a', Chartype::Space));
    }
}
