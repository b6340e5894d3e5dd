//! Translation between scanner token kinds and grammar terminals.
//!
//! The standard map is built once on first use and is read-only after that,
//! so it can be shared by every session without locking.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use zscript_core::Name;

use crate::lexer::{Literal, Token, TokenKind};
use crate::state::ParseState;
use crate::terminal::{Terminal, TokenPayload, TokenValue};

/// One registered translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMapEntry {
    pub terminal: Terminal,
    /// Canonical name for keywords that denote a built-in type.
    pub name: Name,
}

/// Bidirectional scanner-kind / terminal table.
#[derive(Debug)]
pub struct TokenMap {
    forward: FxHashMap<TokenKind, TokenMapEntry>,
    /// Indexed by terminal code; `None` for terminals nobody registered.
    back: Vec<Option<TokenKind>>,
}

impl Default for TokenMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMap {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            forward: FxHashMap::default(),
            back: vec![None; Terminal::ERROR_SYMBOL as usize],
        }
    }

    /// The process-wide map of every kind the grammar accepts.
    pub fn get() -> &'static TokenMap {
        static MAP: OnceLock<TokenMap> = OnceLock::new();
        MAP.get_or_init(|| {
            tracing::debug!("building token map");
            TokenMap::standard()
        })
    }

    /// Install one translation.
    ///
    /// Each scanner kind may be registered once.
    pub fn register(&mut self, kind: TokenKind, terminal: Terminal, name: Name) {
        let previous = self.forward.insert(kind, TokenMapEntry { terminal, name });
        debug_assert!(previous.is_none(), "{kind:?} registered twice");
        self.back[terminal.code() as usize] = Some(kind);
    }

    /// The terminal and canonical name registered for `kind`.
    #[inline]
    pub fn lookup(&self, kind: TokenKind) -> Option<TokenMapEntry> {
        self.forward.get(&kind).copied()
    }

    /// Number of registered scanner kinds.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The scanner kind registered for `terminal`, if any.
    pub fn scanner_kind(&self, terminal: impl Into<u16>) -> Option<TokenKind> {
        self.back.get(terminal.into() as usize).copied().flatten()
    }

    /// Human-readable name of a terminal, for syntax error messages.
    pub fn terminal_display_name(&self, terminal: impl Into<u16>) -> String {
        let code = terminal.into();
        if code == Terminal::Eof.code() {
            return "end of file".to_string();
        }
        if code == Terminal::EndOfInput.code() {
            return "end of input".to_string();
        }
        match self.scanner_kind(code) {
            Some(kind) => kind.description().to_string(),
            None => format!("unknown terminal #{code}"),
        }
    }

    /// Compute the terminal and semantic value for a scanned token.
    ///
    /// String constants are interned into the session string arena;
    /// identifiers and free-form words become canonical names. Returns
    /// `None` for kinds the grammar has no terminal for.
    pub fn translate<'s>(
        &self,
        token: &Token<'_>,
        state: &mut ParseState<'s>,
    ) -> Option<(Terminal, TokenValue<'s>)> {
        let entry = self.lookup(token.kind)?;
        let payload = match (token.kind, &token.literal) {
            (TokenKind::StringConst, Literal::Str(text)) => {
                TokenPayload::String(state.intern_str(text))
            }
            (TokenKind::NameConst, Literal::Name(name)) => TokenPayload::Name(*name),
            (TokenKind::IntConst | TokenKind::UIntConst, Literal::Int(value)) => {
                TokenPayload::Int(*value)
            }
            (TokenKind::FloatConst, Literal::Float(value)) => TokenPayload::Float(*value),
            (TokenKind::Identifier | TokenKind::NonWhitespace, _) => {
                TokenPayload::Name(Name::new(token.lexeme))
            }
            _ if !entry.name.is_none() => TokenPayload::Name(entry.name),
            _ => TokenPayload::None,
        };
        Some((entry.terminal, TokenValue::new(token.loc, payload)))
    }

    fn standard() -> Self {
        use Terminal as T;
        use TokenKind as K;

        let mut map = TokenMap::new();
        let plain: &[(TokenKind, Terminal)] = &[
            (K::Assign, T::Assign),
            (K::MulEq, T::MulEq),
            (K::DivEq, T::DivEq),
            (K::ModEq, T::ModEq),
            (K::AddEq, T::AddEq),
            (K::SubEq, T::SubEq),
            (K::LShiftEq, T::LShiftEq),
            (K::RShiftEq, T::RShiftEq),
            (K::URShiftEq, T::URShiftEq),
            (K::AndEq, T::AndEq),
            (K::OrEq, T::OrEq),
            (K::XorEq, T::XorEq),
            (K::Question, T::Question),
            (K::Colon, T::Colon),
            (K::ColonColon, T::Scope),
            (K::OrOr, T::OrOr),
            (K::AndAnd, T::AndAnd),
            (K::Eq, T::EqEq),
            (K::Neq, T::Neq),
            (K::ApproxEq, T::ApproxEq),
            (K::Lt, T::Lt),
            (K::Gt, T::Gt),
            (K::Leq, T::LtEq),
            (K::Geq, T::GtEq),
            (K::LtGtEq, T::LtGtEq),
            (K::Is, T::Is),
            (K::DotDot, T::DotDot),
            (K::Ellipsis, T::Ellipsis),
            (K::Pipe, T::Or),
            (K::Caret, T::Xor),
            (K::Amp, T::And),
            (K::LShift, T::LShift),
            (K::RShift, T::RShift),
            (K::URShift, T::URShift),
            (K::Minus, T::Sub),
            (K::Plus, T::Add),
            (K::Star, T::Mul),
            (K::Slash, T::Div),
            (K::Percent, T::Mod),
            (K::Cross, T::CrossProd),
            (K::Dot, T::DotProd),
            (K::StarStar, T::Pow),
            (K::Incr, T::AddAdd),
            (K::Decr, T::SubSub),
            (K::Period, T::Dot),
            (K::Tilde, T::Tilde),
            (K::Bang, T::Bang),
            (K::SizeOf, T::SizeOf),
            (K::AlignOf, T::AlignOf),
            (K::LeftParen, T::LParen),
            (K::RightParen, T::RParen),
            (K::LeftBracket, T::LBracket),
            (K::RightBracket, T::RBracket),
            (K::LeftBrace, T::LBrace),
            (K::RightBrace, T::RBrace),
            (K::Semicolon, T::Semicolon),
            (K::Comma, T::Comma),
            (K::Class, T::Class),
            (K::Struct, T::Struct),
            (K::Enum, T::Enum),
            (K::Const, T::Const),
            (K::Extend, T::Extend),
            (K::Replaces, T::Replaces),
            (K::Abstract, T::Abstract),
            (K::Native, T::Native),
            (K::Action, T::Action),
            (K::Static, T::Static),
            (K::Private, T::Private),
            (K::Protected, T::Protected),
            (K::Latent, T::Latent),
            (K::Final, T::Final),
            (K::Meta, T::Meta),
            (K::Deprecated, T::Deprecated),
            (K::ReadOnly, T::ReadOnly),
            (K::Virtual, T::Virtual),
            (K::Override, T::Override),
            (K::Ui, T::Ui),
            (K::Play, T::Play),
            (K::ClearScope, T::ClearScope),
            (K::True, T::True),
            (K::False, T::False),
            (K::Null, T::Null),
            (K::Super, T::Super),
            (K::In, T::In),
            (K::Out, T::Out),
            (K::Optional, T::Optional),
            (K::If, T::If),
            (K::Else, T::Else),
            (K::Switch, T::Switch),
            (K::Case, T::Case),
            (K::While, T::While),
            (K::Until, T::Until),
            (K::Do, T::Do),
            (K::For, T::For),
            (K::Continue, T::Continue),
            (K::Break, T::Break),
            (K::Return, T::Return),
            (K::Identifier, T::Identifier),
            (K::StringConst, T::StringConst),
            (K::NameConst, T::NameConst),
            (K::IntConst, T::IntConst),
            (K::UIntConst, T::UIntConst),
            (K::FloatConst, T::FloatConst),
            (K::NonWhitespace, T::NonWhitespace),
        ];
        for &(kind, terminal) in plain {
            map.register(kind, terminal, Name::NONE);
        }

        let named: &[(TokenKind, Terminal, Name)] = &[
            (K::SByte, T::SByte, Name::SBYTE),
            (K::Byte, T::Byte, Name::BYTE),
            (K::Short, T::Short, Name::SHORT),
            (K::UShort, T::UShort, Name::USHORT),
            (K::Int, T::Int, Name::INT),
            (K::UInt, T::UInt, Name::UINT),
            (K::Bool, T::Bool, Name::BOOL),
            (K::Float, T::Float, Name::FLOAT),
            (K::Double, T::Double, Name::DOUBLE),
            (K::String, T::String, Name::STRING),
            (K::Vector2, T::Vector2, Name::VECTOR2),
            (K::Vector3, T::Vector3, Name::VECTOR3),
            (K::Name, T::Name, Name::NAME),
            (K::Map, T::Map, Name::MAP),
            (K::Array, T::Array, Name::ARRAY),
            (K::Void, T::Void, Name::VOID),
            (K::Color, T::Color, Name::COLOR),
            (K::Sound, T::Sound, Name::SOUND),
            (K::Default, T::Default, Name::DEFAULT),
        ];
        for &(kind, terminal, name) in named {
            map.register(kind, terminal, name);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_registration() {
        let mut map = TokenMap::new();
        map.register(TokenKind::Int, Terminal::Int, Name::INT);
        map.register(TokenKind::Semicolon, Terminal::Semicolon, Name::NONE);

        assert_eq!(
            map.lookup(TokenKind::Int),
            Some(TokenMapEntry {
                terminal: Terminal::Int,
                name: Name::INT
            })
        );
        assert_eq!(map.lookup(TokenKind::Int), map.lookup(TokenKind::Int));
        assert_eq!(map.lookup(TokenKind::Comma), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn unregistered_terminals_are_reported_distinctly() {
        let map = TokenMap::new();
        assert_eq!(
            map.terminal_display_name(Terminal::Semicolon),
            format!("unknown terminal #{}", Terminal::Semicolon.code())
        );
        assert_eq!(map.terminal_display_name(9999u16), "unknown terminal #9999");
    }

    #[test]
    fn end_terminals_have_fixed_names() {
        let map = TokenMap::get();
        assert_eq!(map.terminal_display_name(Terminal::Eof), "end of file");
        assert_eq!(map.terminal_display_name(Terminal::EndOfInput), "end of input");
    }

    #[test]
    fn standard_map_covers_every_terminal() {
        let map = TokenMap::get();
        for code in 2..Terminal::ERROR_SYMBOL {
            let name = map.terminal_display_name(code);
            assert!(!name.is_empty());
            assert!(!name.starts_with("unknown"), "terminal {code} unregistered");
        }
    }

    #[test]
    fn standard_map_round_trips() {
        let map = TokenMap::get();
        let entry = map.lookup(TokenKind::Vector3).unwrap();
        assert_eq!(entry.name, Name::VECTOR3);
        assert_eq!(map.scanner_kind(entry.terminal), Some(TokenKind::Vector3));
        assert_eq!(map.terminal_display_name(entry.terminal), "'vector3'");
        assert_eq!(map.lookup(TokenKind::Default).unwrap().name, Name::DEFAULT);
    }

    #[test]
    fn translate_attaches_payloads() {
        use crate::lexer::Lexer;
        use bumpalo::Bump;

        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let map = TokenMap::get();
        let values: Vec<_> = Lexer::new(r#"Imp "text" 'Walk' 4u 2.5 int ;"#)
            .map(|token| map.translate(&token, &mut state).unwrap())
            .collect();

        assert_eq!(values[0].0, Terminal::Identifier);
        assert_eq!(values[0].1.as_name(), Name::new("imp"));
        assert_eq!(values[1].0, Terminal::StringConst);
        assert_eq!(values[1].1.as_str(), "text");
        assert_eq!(values[2].1.as_name(), Name::new("walk"));
        assert_eq!(values[3].0, Terminal::UIntConst);
        assert_eq!(values[3].1.as_int(), 4);
        assert_eq!(values[4].1.as_float(), 2.5);
        assert_eq!(values[5].1.as_name(), Name::INT);
        assert_eq!(values[6].1.payload, TokenPayload::None);
    }

    #[test]
    fn translate_rejects_unmapped_kinds() {
        use crate::lexer::Lexer;
        use bumpalo::Bump;

        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let token = Lexer::new("goto").next_token();
        assert!(TokenMap::get().translate(&token, &mut state).is_none());
    }

    #[test]
    fn reserved_and_error_kinds_are_unmapped() {
        let map = TokenMap::get();
        for kind in [
            TokenKind::States,
            TokenKind::Goto,
            TokenKind::Stop,
            TokenKind::Error,
            TokenKind::Eof,
        ] {
            assert!(map.lookup(kind).is_none(), "{kind:?}");
        }
    }
}
