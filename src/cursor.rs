//! Positions in the input buffer.

use std::{cmp::Ordering, fmt};

/// An immutable position in the input.
///
/// Advancing returns a new cursor; nothing is ever mutated in place.
/// Two cursors compare by byte offset only, so comparing cursors over different
/// buffers is meaningless (but harmless).
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the very start of the buffer, line 1 column 1.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// The whole underlying buffer.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn at_end(&self) -> bool {
        self.offset >= self.buf.len()
    }

    /// The byte under the cursor, or `None` at end of input.
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.offset).copied()
    }

    /// Everything from here to the end of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.offset.min(self.buf.len())..]
    }

    /// Step over one byte.
    ///
    /// Panics at end of input; callers check `at_end` (or `peek`) first.
    pub fn advance(self) -> Self {
        let byte = match self.peek() {
            Some(it) => it,
            None => panic!("advanced a cursor past end of input at {}", self),
        };
        if byte == b'\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
                ..self
            }
        } else {
            Self {
                offset: self.offset + 1,
                column: self.column + 1,
                ..self
            }
        }
    }

    /// Step over `n` bytes, stopping early at end of input.
    pub fn advance_by(self, n: usize) -> Self {
        let mut out = self;
        for _ in 0..n {
            if out.at_end() {
                break;
            }
            out = out.advance();
        }
        out
    }

    /// The bytes between this cursor and a later one.
    pub fn slice_to(&self, end: Cursor<'a>) -> &'a [u8] {
        debug_assert!(
            self.offset <= end.offset,
            "slice end {} is before its start {}",
            end,
            self
        );
        &self.buf[self.offset..end.offset]
    }

    /// Owned snapshot of where this cursor is.
    pub fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(s: &'a str) -> Self {
        Cursor::new(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Cursor<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Cursor::new(buf)
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl Eq for Cursor<'_> {}

impl PartialOrd for Cursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cursor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.position().fmt(f)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

/// Where a cursor was, without the buffer attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<line {}, col {}>", self.line, self.column)
    }
}
