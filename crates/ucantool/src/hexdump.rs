//! Canonical hex dump: offset, sixteen hex bytes and an ASCII column.
//!
//! ```text
//! 00000000  68 65 6c 6c 6f 2c 20 77  6f 72 6c 64 21 0a        |hello, world!.|
//! ```

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Dump `bytes`, one newline-terminated line per sixteen bytes.
pub fn dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(BYTES_PER_LINE) * 79);

    for (line, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let _ = write!(out, "{:08x}  ", line * BYTES_PER_LINE);
        for i in 0..BYTES_PER_LINE {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{b:02x} ");
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| printable(b)));
        out.push_str("|\n");
    }
    out
}

fn printable(b: u8) -> char {
    if (32..=126).contains(&b) {
        b as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(dump(&[]), "");
    }

    #[test]
    fn test_short_line_is_padded() {
        assert_eq!(
            dump(b"hello"),
            "00000000  68 65 6c 6c 6f                                    |hello|\n"
        );
    }

    #[test]
    fn test_full_lines() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let out = dump(&bytes);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "00000000  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f  |................|"
        );
        assert!(lines[1].starts_with("00000010  10 11 12 13 "));
        assert!(lines[1].ends_with(" |....|"));
        assert_eq!(lines[0].find('|'), lines[1].find('|'));
    }
}
