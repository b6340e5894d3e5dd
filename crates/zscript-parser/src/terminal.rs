//! Grammar terminals and the semantic values that travel with them.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use zscript_core::{Name, SourceLoc};

/// A terminal symbol of the ZScript grammar.
///
/// This is the parser's token vocabulary, distinct from the scanner's
/// [`TokenKind`](crate::lexer::TokenKind). Discriminants are dense, starting
/// at [`Terminal::EndOfInput`] = 0, and stop just below
/// [`Terminal::ERROR_SYMBOL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum Terminal {
    /// Sent once, after the last script of a manifest.
    EndOfInput = 0,
    /// Sent after every script.
    Eof,

    // Constants and words
    StringConst,
    NameConst,
    IntConst,
    UIntConst,
    FloatConst,
    Identifier,
    NonWhitespace,

    // Assignment
    Assign,
    MulEq,
    DivEq,
    ModEq,
    AddEq,
    SubEq,
    LShiftEq,
    RShiftEq,
    URShiftEq,
    AndEq,
    OrEq,
    XorEq,

    // Operators
    Question,
    Colon,
    Scope,
    OrOr,
    AndAnd,
    EqEq,
    Neq,
    ApproxEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    LtGtEq,
    Is,
    DotDot,
    Ellipsis,
    Or,
    Xor,
    And,
    LShift,
    RShift,
    URShift,
    Sub,
    Add,
    Mul,
    Div,
    Mod,
    CrossProd,
    DotProd,
    Pow,
    AddAdd,
    SubSub,
    Dot,
    Tilde,
    Bang,
    SizeOf,
    AlignOf,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,

    // Declarations and flags
    Class,
    Struct,
    Enum,
    Const,
    Extend,
    Replaces,
    Abstract,
    Native,
    Action,
    Static,
    Private,
    Protected,
    Latent,
    Final,
    Meta,
    Deprecated,
    ReadOnly,
    Virtual,
    Override,
    Ui,
    Play,
    ClearScope,

    // Built-in types
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Bool,
    Float,
    Double,
    String,
    Vector2,
    Vector3,
    Name,
    Map,
    Array,
    Void,
    Color,
    Sound,

    // Values and parameters
    True,
    False,
    Null,
    Super,
    In,
    Out,
    Optional,

    // Statements
    If,
    Else,
    Switch,
    Case,
    Default,
    While,
    Until,
    Do,
    For,
    Continue,
    Break,
    Return,
}

impl Terminal {
    /// One past the last terminal; sizes the reverse token table.
    pub const ERROR_SYMBOL: u16 = Terminal::Return as u16 + 1;

    /// Raw terminal number.
    #[inline]
    pub fn code(self) -> u16 {
        self.into()
    }

    /// Whether this terminal ends a script or a manifest.
    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, Terminal::EndOfInput | Terminal::Eof)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::TokenMap::get().terminal_display_name(*self))
    }
}

/// The semantic value passed to the parser alongside a [`Terminal`].
///
/// Which payload is meaningful depends only on the terminal: string
/// constants carry [`TokenPayload::String`], name constants, identifiers
/// and free-form words carry [`TokenPayload::Name`], integer constants
/// carry [`TokenPayload::Int`], float constants [`TokenPayload::Float`].
/// Keyword terminals that denote a built-in type carry their canonical
/// name too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenValue<'s> {
    pub loc: SourceLoc,
    pub payload: TokenPayload<'s>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenPayload<'s> {
    None,
    /// Interned into the session string arena.
    String(&'s str),
    Int(i64),
    Float(f64),
    Name(Name),
}

impl<'s> TokenValue<'s> {
    #[inline]
    pub fn new(loc: SourceLoc, payload: TokenPayload<'s>) -> Self {
        Self { loc, payload }
    }

    /// The sentinel value sent with end-of-stream terminals.
    #[inline]
    pub fn end(loc: SourceLoc) -> Self {
        Self {
            loc,
            payload: TokenPayload::None,
        }
    }

    pub fn as_name(&self) -> Name {
        match self.payload {
            TokenPayload::Name(name) => name,
            _ => Name::NONE,
        }
    }

    pub fn as_int(&self) -> i64 {
        match self.payload {
            TokenPayload::Int(value) => value,
            _ => 0,
        }
    }

    pub fn as_float(&self) -> f64 {
        match self.payload {
            TokenPayload::Float(value) => value,
            _ => 0.0,
        }
    }

    pub fn as_str(&self) -> &'s str {
        match self.payload {
            TokenPayload::String(text) => text,
            _ => "",
        }
    }
}

impl fmt::Display for TokenPayload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPayload::None => Ok(()),
            TokenPayload::String(text) => write!(f, "{text:?}"),
            TokenPayload::Int(value) => write!(f, "{value}"),
            TokenPayload::Float(value) => write!(f, "{value}"),
            TokenPayload::Name(name) => write!(f, "{name}"),
        }
    }
}
