//! Text encoding conversion for answer files.
//!
//! The 2010 setup only reads unattend files encoded as UTF-16LE with a byte
//! order mark, one CRLF-terminated line per line of input.

/// UTF-16LE byte order mark.
pub const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Re-encodes UTF-8 text as UTF-16LE with BOM and CRLF line endings.
pub fn utf8_to_utf16le(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&UTF16LE_BOM);
    // A leading UTF-8 BOM is dropped so the output carries exactly one BOM.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    for line in text.lines() {
        for unit in line.encode_utf16().chain("\r\n".encode_utf16()) {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> String {
        assert_eq!(&bytes[..2], &UTF16LE_BOM);
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).expect("valid utf-16")
    }

    #[test]
    fn test_bom_and_crlf() {
        let bytes = utf8_to_utf16le("[Setup]\nKey=c:\\vs\n");
        assert_eq!(decode(&bytes), "[Setup]\r\nKey=c:\\vs\r\n");
    }

    #[test]
    fn test_existing_crlf_not_doubled() {
        let bytes = utf8_to_utf16le("a\r\nb");
        assert_eq!(decode(&bytes), "a\r\nb\r\n");
    }

    #[test]
    fn test_non_ascii() {
        let bytes = utf8_to_utf16le("Ünïcödé");
        assert_eq!(decode(&bytes), "Ünïcödé\r\n");
        assert_eq!(bytes[2..4], [0xDC, 0x00]);
    }

    #[test]
    fn test_utf8_bom_dropped() {
        let bytes = utf8_to_utf16le("\u{feff}x");
        assert_eq!(decode(&bytes), "x\r\n");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(utf8_to_utf16le(""), UTF16LE_BOM.to_vec());
    }
}
