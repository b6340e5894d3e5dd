//! Character cursor shared by the script scanner and manifest reading.

use zscript_core::SourceLoc;

/// Position-tracking reader over script text.
///
/// A leading byte-order mark is skipped. Offsets are byte offsets into the
/// original text; lines and columns are 1-based.
pub struct Cursor<'src> {
    source: &'src str,
    rest: &'src str,
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        let bom = if source.starts_with('\u{FEFF}') { '\u{FEFF}'.len_utf8() } else { 0 };
        Self {
            source,
            rest: &source[bom..],
            offset: bom as u32,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Zero-length location of the next unread character.
    #[inline]
    pub fn here(&self) -> SourceLoc {
        SourceLoc::point(self.line, self.column)
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        let first = *self.rest.as_bytes().first()?;
        if first < 128 {
            Some(first as char)
        } else {
            self.rest.chars().next()
        }
    }

    /// The character `n` positions ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let len = ch.len_utf8();
        self.rest = &self.rest[len..];
        self.offset += len as u32;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += len as u32;
        }
        Some(ch)
    }

    /// Consume `n` bytes of text that is known to contain whole characters.
    pub fn advance_bytes(&mut self, n: usize) {
        debug_assert!(self.rest.is_char_boundary(n));
        let end = self.offset as usize + n;
        while (self.offset as usize) < end {
            self.advance();
        }
    }

    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.check(&f) {
            self.advance();
        }
        self.slice_from(start)
    }

    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }

    /// Skip whitespace, `//` line comments and `/* */` block comments.
    ///
    /// A block comment that is never closed consumes the rest of the text;
    /// its start offset and extent are returned as the error.
    pub fn skip_trivia(&mut self) -> Result<(), (u32, SourceLoc)> {
        loop {
            self.eat_while(char::is_whitespace);
            if self.check_str("//") {
                self.eat_while(|c| c != '\n');
            } else if self.check_str("/*") {
                let start = self.offset;
                let (line, col) = (self.line, self.column);
                self.advance_bytes(2);
                while !self.check_str("*/") {
                    if self.advance().is_none() {
                        return Err((start, SourceLoc::new(line, col, self.offset - start)));
                    }
                }
                self.advance_bytes(2);
            } else {
                return Ok(());
            }
        }
    }
}

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
