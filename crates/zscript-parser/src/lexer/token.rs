//! Scanner token kinds and tokens.
//!
//! [`TokenKind`] is the scanner's own vocabulary. It is deliberately wider
//! than what the grammar accepts: reserved words for actor state blocks are
//! recognised here but have no terminal, so feeding one to the driver takes
//! the "unexpected token" path.

use std::borrow::Cow;
use std::fmt;

use zscript_core::{Name, SourceLoc};

/// A token produced by the [`Lexer`](super::Lexer).
#[derive(Clone, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The raw source text of the token.
    pub lexeme: &'src str,
    /// Decoded literal value, for literal kinds.
    pub literal: Literal<'src>,
    pub loc: SourceLoc,
}

impl<'src> Token<'src> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, loc: SourceLoc) -> Self {
        Self {
            kind,
            lexeme,
            literal: Literal::None,
            loc,
        }
    }

    #[inline]
    pub fn with_literal(mut self, literal: Literal<'src>) -> Self {
        self.literal = literal;
        self
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.loc)
    }
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal<'src> {
    None,
    /// String literal contents with escapes resolved.
    Str(Cow<'src, str>),
    /// Name literal, already interned.
    Name(Name),
    /// Integer literal; unsigned literals use the same storage.
    Int(i64),
    Float(f64),
}

/// Every kind of token the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// `"text"`
    StringConst,
    /// `'name'`
    NameConst,
    /// `42`, `0x2A`, `052`
    IntConst,
    /// `42u`
    UIntConst,
    /// `4.2`, `4.2e1`, `4f`
    FloatConst,
    Identifier,
    /// A run of non-blank characters that is neither a number nor an identifier.
    NonWhitespace,

    // Declarations and modifiers
    Class,
    Abstract,
    Native,
    Action,
    Replaces,
    Static,
    Private,
    Protected,
    Latent,
    Final,
    Meta,
    Deprecated,
    ReadOnly,
    Struct,
    Enum,
    Extend,
    Virtual,
    Override,
    Ui,
    Play,
    ClearScope,
    Const,

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

    // Values
    True,
    False,
    Null,
    Super,

    // Parameters
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

    // Word operators
    SizeOf,
    AlignOf,
    Is,
    Cross,
    Dot,

    // State-block keywords (reserved, no terminal)
    States,
    Stop,
    Wait,
    Fail,
    Loop,
    Goto,

    // Assignment
    /// `=`
    Assign,
    /// `*=`
    MulEq,
    /// `/=`
    DivEq,
    /// `%=`
    ModEq,
    /// `+=`
    AddEq,
    /// `-=`
    SubEq,
    /// `<<=`
    LShiftEq,
    /// `>>=`
    RShiftEq,
    /// `>>>=`
    URShiftEq,
    /// `&=`
    AndEq,
    /// `|=`
    OrEq,
    /// `^=`
    XorEq,

    // Operators
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `||`
    OrOr,
    /// `&&`
    AndAnd,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `~==`
    ApproxEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
    /// `<>=`
    LtGtEq,
    /// `..`
    DotDot,
    /// `...`
    Ellipsis,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `&`
    Amp,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `>>>`
    URShift,
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `++`
    Incr,
    /// `--`
    Decr,
    /// `.`
    Period,
    /// `~`
    Tilde,
    /// `!`
    Bang,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,

    // Special
    Eof,
    /// Lexical error; the scanner keeps the detail.
    Error,
}

impl TokenKind {
    /// Human-readable name of this kind, used in diagnostics.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            StringConst => "string constant",
            NameConst => "name constant",
            IntConst => "integer constant",
            UIntConst => "unsigned integer constant",
            FloatConst => "float constant",
            Identifier => "identifier",
            NonWhitespace => "non-whitespace string",
            Class => "'class'",
            Abstract => "'abstract'",
            Native => "'native'",
            Action => "'action'",
            Replaces => "'replaces'",
            Static => "'static'",
            Private => "'private'",
            Protected => "'protected'",
            Latent => "'latent'",
            Final => "'final'",
            Meta => "'meta'",
            Deprecated => "'deprecated'",
            ReadOnly => "'readonly'",
            Struct => "'struct'",
            Enum => "'enum'",
            Extend => "'extend'",
            Virtual => "'virtual'",
            Override => "'override'",
            Ui => "'ui'",
            Play => "'play'",
            ClearScope => "'clearscope'",
            Const => "'const'",
            SByte => "'sbyte'",
            Byte => "'byte'",
            Short => "'short'",
            UShort => "'ushort'",
            Int => "'int'",
            UInt => "'uint'",
            Bool => "'bool'",
            Float => "'float'",
            Double => "'double'",
            String => "'string'",
            Vector2 => "'vector2'",
            Vector3 => "'vector3'",
            Name => "'name'",
            Map => "'map'",
            Array => "'array'",
            Void => "'void'",
            Color => "'color'",
            Sound => "'sound'",
            True => "'true'",
            False => "'false'",
            Null => "'null'",
            Super => "'super'",
            In => "'in'",
            Out => "'out'",
            Optional => "'optional'",
            If => "'if'",
            Else => "'else'",
            Switch => "'switch'",
            Case => "'case'",
            Default => "'default'",
            While => "'while'",
            Until => "'until'",
            Do => "'do'",
            For => "'for'",
            Continue => "'continue'",
            Break => "'break'",
            Return => "'return'",
            SizeOf => "'sizeof'",
            AlignOf => "'alignof'",
            Is => "'is'",
            Cross => "'cross'",
            Dot => "'dot'",
            States => "'states'",
            Stop => "'stop'",
            Wait => "'wait'",
            Fail => "'fail'",
            Loop => "'loop'",
            Goto => "'goto'",
            Assign => "'='",
            MulEq => "'*='",
            DivEq => "'/='",
            ModEq => "'%='",
            AddEq => "'+='",
            SubEq => "'-='",
            LShiftEq => "'<<='",
            RShiftEq => "'>>='",
            URShiftEq => "'>>>='",
            AndEq => "'&='",
            OrEq => "'|='",
            XorEq => "'^='",
            Question => "'?'",
            Colon => "':'",
            ColonColon => "'::'",
            OrOr => "'||'",
            AndAnd => "'&&'",
            Eq => "'=='",
            Neq => "'!='",
            ApproxEq => "'~=='",
            Lt => "'<'",
            Gt => "'>'",
            Leq => "'<='",
            Geq => "'>='",
            LtGtEq => "'<>='",
            DotDot => "'..'",
            Ellipsis => "'...'",
            Pipe => "'|'",
            Caret => "'^'",
            Amp => "'&'",
            LShift => "'<<'",
            RShift => "'>>'",
            URShift => "'>>>'",
            Minus => "'-'",
            Plus => "'+'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            StarStar => "'**'",
            Incr => "'++'",
            Decr => "'--'",
            Period => "'.'",
            Tilde => "'~'",
            Bang => "'!'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Comma => "','",
            Eof => "end of file",
            Error => "invalid token",
        }
    }

    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            StringConst | NameConst | IntConst | UIntConst | FloatConst | True | False | Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Map an identifier to its keyword kind, ignoring ASCII case.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    if ident.len() > 10 {
        return None;
    }
    let lower = ident.to_ascii_lowercase();
    Some(match lower.as_str() {
        "class" => Class,
        "abstract" => Abstract,
        "native" => Native,
        "action" => Action,
        "replaces" => Replaces,
        "static" => Static,
        "private" => Private,
        "protected" => Protected,
        "latent" => Latent,
        "final" => Final,
        "meta" => Meta,
        "deprecated" => Deprecated,
        "readonly" => ReadOnly,
        "struct" => Struct,
        "enum" => Enum,
        "extend" => Extend,
        "virtual" => Virtual,
        "override" => Override,
        "ui" => Ui,
        "play" => Play,
        "clearscope" => ClearScope,
        "const" => Const,

        "sbyte" | "int8" => SByte,
        "byte" | "uint8" => Byte,
        "short" | "int16" => Short,
        "ushort" | "uint16" => UShort,
        "int" => Int,
        "uint" => UInt,
        "bool" => Bool,
        "float" => Float,
        "double" => Double,
        "string" => String,
        "vector2" => Vector2,
        "vector3" => Vector3,
        "name" => Name,
        "map" => Map,
        "array" => Array,
        "void" => Void,
        "color" => Color,
        "sound" => Sound,

        "true" => True,
        "false" => False,
        "null" => Null,
        "super" => Super,

        "in" => In,
        "out" => Out,
        "optional" => Optional,

        "if" => If,
        "else" => Else,
        "switch" => Switch,
        "case" => Case,
        "default" => Default,
        "while" => While,
        "until" => Until,
        "do" => Do,
        "for" => For,
        "continue" => Continue,
        "break" => Break,
        "return" => Return,

        "sizeof" => SizeOf,
        "alignof" => AlignOf,
        "is" => Is,
        "cross" => Cross,
        "dot" => Dot,

        "states" => States,
        "stop" => Stop,
        "wait" => Wait,
        "fail" => Fail,
        "loop" => Loop,
        "goto" => Goto,

        _ => return None,
    })
}
