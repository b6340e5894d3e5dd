//! Script scanner.
//!
//! The [`Lexer`] converts script text into a stream of [`Token`]s, using
//! direct dispatch on the first character. Lexical failures never stop the
//! scan: the error is recorded and a [`TokenKind::Error`] token takes the
//! place of the bad text.

use std::borrow::Cow;

use zscript_core::{LexError, Name, SourceLoc};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Literal, Token, TokenKind, lookup_keyword};

/// Scanner over one script.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            errors: Vec::new(),
        }
    }

    /// The most recent error, if any.
    pub fn last_error(&self) -> Option<&LexError> {
        self.errors.last()
    }

    /// Position of the next unread character.
    pub fn here(&self) -> SourceLoc {
        self.cursor.here()
    }

    /// Consume and return the next token. Returns `Eof` forever once the
    /// input is exhausted.
    pub fn next_token(&mut self) -> Token<'src> {
        if let Err((start, loc)) = self.cursor.skip_trivia() {
            return self.make_error(LexError::UnterminatedComment { loc }, start);
        }

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, "", self.here());
        };

        let line = self.cursor.line();
        let col = self.cursor.column();
        let start = self.cursor.offset();

        match c {
            '"' => self.scan_string(line, col, start),
            '\'' => self.scan_name(line, col, start),
            c if c.is_ascii_digit() => self.scan_number(line, col, start),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(line, col, start)
            }
            c if is_ident_start(c) => self.scan_identifier(line, col, start),
            _ => self.scan_operator(line, col, start),
        }
    }

    // =========================================
    // Internal helpers
    // =========================================

    fn make_token(&self, kind: TokenKind, line: u32, col: u32, start: u32) -> Token<'src> {
        let lexeme = self.cursor.slice_from(start);
        Token::new(kind, lexeme, SourceLoc::new(line, col, lexeme.len() as u32))
    }

    fn make_error(&mut self, error: LexError, start: u32) -> Token<'src> {
        let loc = error.loc();
        self.errors.push(error);
        Token::new(TokenKind::Error, self.cursor.slice_from(start), loc)
    }

    // =========================================
    // Scanning: string and name literals
    // =========================================

    fn scan_string(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        match self.scan_quoted('"') {
            Some(text) => self
                .make_token(TokenKind::StringConst, line, col, start)
                .with_literal(Literal::Str(text)),
            None => {
                let loc = SourceLoc::new(line, col, self.cursor.offset() - start);
                self.make_error(LexError::UnterminatedLiteral { what: "string", loc }, start)
            }
        }
    }

    fn scan_name(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        match self.scan_quoted('\'') {
            Some(text) => self
                .make_token(TokenKind::NameConst, line, col, start)
                .with_literal(Literal::Name(Name::new(&text))),
            None => {
                let loc = SourceLoc::new(line, col, self.cursor.offset() - start);
                self.make_error(LexError::UnterminatedLiteral { what: "name", loc }, start)
            }
        }
    }

    /// Scan a quoted literal, returning its contents with escapes resolved.
    ///
    /// Strings may span lines; names may not.
    fn scan_quoted(&mut self, quote: char) -> Option<Cow<'src, str>> {
        self.cursor.advance();
        let body_start = self.cursor.offset();
        let mut decoded: Option<String> = None;

        loop {
            match self.cursor.peek() {
                None => return None,
                Some('\n') if quote == '\'' => return None,
                Some(c) if c == quote => {
                    let raw = self.cursor.slice_from(body_start);
                    self.cursor.advance();
                    return Some(match decoded {
                        Some(text) => Cow::Owned(text),
                        None => Cow::Borrowed(raw),
                    });
                }
                Some('\\') => {
                    let text = decoded
                        .get_or_insert_with(|| self.cursor.slice_from(body_start).to_owned());
                    self.cursor.advance();
                    let escaped = self.cursor.advance()?;
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                Some(c) => {
                    self.cursor.advance();
                    if let Some(text) = decoded.as_mut() {
                        text.push(c);
                    }
                }
            }
        }
    }

    // =========================================
    // Scanning: numbers
    // =========================================

    fn scan_number(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        if self.cursor.check_str("0x") || self.cursor.check_str("0X") {
            self.cursor.advance_bytes(2);
            let digits = self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            return self.finish_integer(digits, 16, line, col, start);
        }

        let int_part = self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_none_or(|c| c != '.')
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
            is_float = true;
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.cursor.peek_nth(1), Some('+' | '-')));
            if self.cursor.peek_nth(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
                if sign == 1 {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        let text_end = self.cursor.offset();
        if matches!(self.cursor.peek(), Some('f' | 'F'))
            && !self.cursor.peek_nth(1).is_some_and(is_ident_continue)
        {
            self.cursor.advance();
            is_float = true;
        }

        if is_float {
            if self.cursor.check(is_ident_continue) {
                return self.scan_non_whitespace(line, col, start);
            }
            let text = &self.cursor.slice_from(start)[..(text_end - start) as usize];
            return match text.parse::<f64>() {
                Ok(value) => self
                    .make_token(TokenKind::FloatConst, line, col, start)
                    .with_literal(Literal::Float(value)),
                Err(err) => {
                    let loc = SourceLoc::new(line, col, self.cursor.offset() - start);
                    let detail = err.to_string();
                    self.make_error(LexError::InvalidNumber { loc, detail }, start)
                }
            };
        }

        let radix = if int_part.len() > 1 && int_part.starts_with('0') {
            8
        } else {
            10
        };
        self.finish_integer(int_part, radix, line, col, start)
    }

    fn finish_integer(
        &mut self,
        digits: &str,
        radix: u32,
        line: u32,
        col: u32,
        start: u32,
    ) -> Token<'src> {
        let unsigned = matches!(self.cursor.peek(), Some('u' | 'U'))
            && !self.cursor.peek_nth(1).is_some_and(is_ident_continue);
        if unsigned {
            self.cursor.advance();
        }
        if self.cursor.check(is_ident_continue) {
            return self.scan_non_whitespace(line, col, start);
        }

        let digits = if radix == 8 { &digits[1..] } else { digits };
        let parsed = if digits.is_empty() {
            Err("missing digits".to_string())
        } else {
            u64::from_str_radix(digits, radix).map_err(|err| err.to_string())
        };

        match parsed {
            Ok(value) => {
                let kind = if unsigned {
                    TokenKind::UIntConst
                } else {
                    TokenKind::IntConst
                };
                // Values past i64::MAX wrap, as unsigned storage is shared.
                self.make_token(kind, line, col, start)
                    .with_literal(Literal::Int(value as i64))
            }
            Err(detail) => {
                let loc = SourceLoc::new(line, col, self.cursor.offset() - start);
                self.make_error(LexError::InvalidNumber { loc, detail }, start)
            }
        }
    }

    /// A digit-led run such as `1st` or `3dfloor` that is neither a number
    /// nor an identifier.
    fn scan_non_whitespace(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        self.cursor.eat_while(is_ident_continue);
        self.make_token(TokenKind::NonWhitespace, line, col, start)
    }

    // =========================================
    // Scanning: identifiers and keywords
    // =========================================

    fn scan_identifier(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, line, col, start)
    }

    // =========================================
    // Scanning: operators
    // =========================================

    fn scan_operator(&mut self, line: u32, col: u32, start: u32) -> Token<'src> {
        use TokenKind::*;

        // Longest spellings first.
        const OPERATORS: &[(&str, TokenKind)] = &[
            (">>>=", URShiftEq),
            ("<<=", LShiftEq),
            (">>=", RShiftEq),
            (">>>", URShift),
            ("<>=", LtGtEq),
            ("~==", ApproxEq),
            ("...", Ellipsis),
            ("*=", MulEq),
            ("/=", DivEq),
            ("%=", ModEq),
            ("+=", AddEq),
            ("-=", SubEq),
            ("&=", AndEq),
            ("|=", OrEq),
            ("^=", XorEq),
            ("::", ColonColon),
            ("||", OrOr),
            ("&&", AndAnd),
            ("==", Eq),
            ("!=", Neq),
            ("<=", Leq),
            (">=", Geq),
            ("..", DotDot),
            ("<<", LShift),
            (">>", RShift),
            ("**", StarStar),
            ("++", Incr),
            ("--", Decr),
            ("=", Assign),
            ("?", Question),
            (":", Colon),
            ("<", Lt),
            (">", Gt),
            ("|", Pipe),
            ("^", Caret),
            ("&", Amp),
            ("-", Minus),
            ("+", Plus),
            ("*", Star),
            ("/", Slash),
            ("%", Percent),
            (".", Period),
            ("~", Tilde),
            ("!", Bang),
            ("(", LeftParen),
            (")", RightParen),
            ("[", LeftBracket),
            ("]", RightBracket),
            ("{", LeftBrace),
            ("}", RightBrace),
            (";", Semicolon),
            (",", Comma),
        ];

        if let Some(&(text, kind)) = OPERATORS.iter().find(|(text, _)| self.cursor.check_str(text)) {
            self.cursor.advance_bytes(text.len());
            return self.make_token(kind, line, col, start);
        }

        let ch = self.cursor.advance().unwrap_or_default();
        let loc = SourceLoc::new(line, col, self.cursor.offset() - start);
        self.make_error(LexError::UnexpectedChar { ch, loc }, start)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
