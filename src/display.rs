//! Rendering input bytes for descriptions, causes and tree dumps.

use std::fmt::{self, Debug, Display, Write};

/// Bytes shown as text, with anything unprintable escaped.
pub struct BstrFmt<B: AsRef<[u8]>>(pub B);

impl<B: AsRef<[u8]>> Display for BstrFmt<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.as_ref() {
            write_byte(f, b)?;
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]>> Debug for BstrFmt<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for &b in self.0.as_ref() {
            match b {
                b'"' => f.write_str("\\\"")?,
                b'\\' => f.write_str("\\\\")?,
                b'\r' => f.write_str("\\r")?,
                b'\0' => f.write_str("\\0")?,
                other => write_byte(f, other)?,
            }
        }
        f.write_char('"')
    }
}

/// A single byte, escaped the way causes print it (without quotes).
#[derive(Clone, Copy)]
pub struct CharFmt(pub u8);

impl Display for CharFmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_byte(f, self.0)
    }
}

/// A set of bytes, sorted and de-duplicated, with no separators.
pub struct CharSetFmt<'s>(pub &'s [u8]);

impl Display for CharSetFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.to_vec();
        chars.sort_unstable();
        chars.dedup();
        for b in chars {
            write_byte(f, b)?;
        }
        Ok(())
    }
}

fn write_byte(f: &mut impl Write, b: u8) -> fmt::Result {
    match b {
        b'\t' => f.write_str("\\t"),
        b'\n' => f.write_str("\\n"),
        0x20..=0x7e => f.write_char(b as char),
        // pad it to a length of 2 with 0s if need be
        ono => write!(f, "\\x{:02X}", ono),
    }
}
