//! Operator definitions for ZScript expressions.
//!
//! Provides enums for binary, unary, postfix and assignment operators along
//! with the binding powers used by the Pratt expression parser.

use std::fmt;

use crate::terminal::Terminal;

/// Binary operators, from loosest to tightest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `~==`
    ApproxEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<>=`
    Compare,
    /// `is`
    Is,
    /// `..`
    Concat,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `>>>`
    URShift,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `cross`
    CrossProduct,
    /// `dot`
    DotProduct,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Returns (left_bp, right_bp). Left-associative operators have
    /// `right_bp = left_bp + 1`.
    pub fn binding_power(&self) -> (u8, u8) {
        use BinaryOp::*;
        match self {
            LogicalOr => (5, 6),
            LogicalAnd => (7, 8),
            BitOr => (9, 10),
            BitXor => (11, 12),
            BitAnd => (13, 14),
            Eq | Neq | ApproxEq => (15, 16),
            Lt | LtEq | Gt | GtEq | Compare | Is => (17, 18),
            Concat => (19, 20),
            LShift | RShift | URShift => (21, 22),
            Add | Sub => (23, 24),
            Mul | Div | Mod | CrossProduct | DotProduct => (25, 26),
            // right-associative
            Pow => (28, 27),
        }
    }

    pub fn from_terminal(terminal: Terminal) -> Option<Self> {
        use Terminal as T;
        Some(match terminal {
            T::OrOr => BinaryOp::LogicalOr,
            T::AndAnd => BinaryOp::LogicalAnd,
            T::Or => BinaryOp::BitOr,
            T::Xor => BinaryOp::BitXor,
            T::And => BinaryOp::BitAnd,
            T::EqEq => BinaryOp::Eq,
            T::Neq => BinaryOp::Neq,
            T::ApproxEq => BinaryOp::ApproxEq,
            T::Lt => BinaryOp::Lt,
            T::LtEq => BinaryOp::LtEq,
            T::Gt => BinaryOp::Gt,
            T::GtEq => BinaryOp::GtEq,
            T::LtGtEq => BinaryOp::Compare,
            T::Is => BinaryOp::Is,
            T::DotDot => BinaryOp::Concat,
            T::LShift => BinaryOp::LShift,
            T::RShift => BinaryOp::RShift,
            T::URShift => BinaryOp::URShift,
            T::Add => BinaryOp::Add,
            T::Sub => BinaryOp::Sub,
            T::Mul => BinaryOp::Mul,
            T::Div => BinaryOp::Div,
            T::Mod => BinaryOp::Mod,
            T::CrossProd => BinaryOp::CrossProduct,
            T::DotProd => BinaryOp::DotProduct,
            T::Pow => BinaryOp::Pow,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Eq => "==",
            Neq => "!=",
            ApproxEq => "~==",
            Lt => "<",
            LtEq => "<=",
            Gt => ">",
            GtEq => ">=",
            Compare => "<>=",
            Is => "is",
            Concat => "..",
            LShift => "<<",
            RShift => ">>",
            URShift => ">>>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            CrossProduct => "cross",
            DotProduct => "dot",
            Pow => "**",
        };
        f.write_str(s)
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `++`
    PreInc,
    /// `--`
    PreDec,
    /// `sizeof`
    SizeOf,
    /// `alignof`
    AlignOf,
}

impl UnaryOp {
    /// Binds tighter than every binary operator except `**`'s right side.
    pub fn binding_power() -> u8 {
        29
    }

    pub fn from_terminal(terminal: Terminal) -> Option<Self> {
        use Terminal as T;
        Some(match terminal {
            T::Sub => UnaryOp::Neg,
            T::Add => UnaryOp::Plus,
            T::Bang => UnaryOp::Not,
            T::Tilde => UnaryOp::BitNot,
            T::AddAdd => UnaryOp::PreInc,
            T::SubSub => UnaryOp::PreDec,
            T::SizeOf => UnaryOp::SizeOf,
            T::AlignOf => UnaryOp::AlignOf,
            _ => return None,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use UnaryOp::*;
        let s = match self {
            Neg => "-",
            Plus => "+",
            Not => "!",
            BitNot => "~",
            PreInc => "++",
            PreDec => "--",
            SizeOf => "sizeof",
            AlignOf => "alignof",
        };
        f.write_str(s)
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// `++`
    PostInc,
    /// `--`
    PostDec,
}

impl PostfixOp {
    pub fn binding_power() -> u8 {
        31
    }

    pub fn from_terminal(terminal: Terminal) -> Option<Self> {
        match terminal {
            Terminal::AddAdd => Some(PostfixOp::PostInc),
            Terminal::SubSub => Some(PostfixOp::PostDec),
            _ => None,
        }
    }
}

impl fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostfixOp::PostInc => "++",
            PostfixOp::PostDec => "--",
        })
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
    /// `&=`
    And,
    /// `|=`
    Or,
    /// `^=`
    Xor,
    /// `<<=`
    LShift,
    /// `>>=`
    RShift,
    /// `>>>=`
    URShift,
}

impl AssignOp {
    /// Lowest precedence, right-associative.
    pub fn binding_power() -> (u8, u8) {
        (2, 1)
    }

    pub fn from_terminal(terminal: Terminal) -> Option<Self> {
        use Terminal as T;
        Some(match terminal {
            T::Assign => AssignOp::Assign,
            T::AddEq => AssignOp::Add,
            T::SubEq => AssignOp::Sub,
            T::MulEq => AssignOp::Mul,
            T::DivEq => AssignOp::Div,
            T::ModEq => AssignOp::Mod,
            T::AndEq => AssignOp::And,
            T::OrEq => AssignOp::Or,
            T::XorEq => AssignOp::Xor,
            T::LShiftEq => AssignOp::LShift,
            T::RShiftEq => AssignOp::RShift,
            T::URShiftEq => AssignOp::URShift,
            _ => return None,
        })
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, AssignOp::Assign)
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AssignOp::*;
        let s = match self {
            Assign => "=",
            Add => "+=",
            Sub => "-=",
            Mul => "*=",
            Div => "/=",
            Mod => "%=",
            And => "&=",
            Or => "|=",
            Xor => "^=",
            LShift => "<<=",
            RShift => ">>=",
            URShift => ">>>=",
        };
        f.write_str(s)
    }
}

/// Binding power of the `?:` operator, between assignment and `||`.
pub const TERNARY_BP: (u8, u8) = (4, 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        let (or_l, _) = BinaryOp::LogicalOr.binding_power();
        let (cat_l, _) = BinaryOp::Concat.binding_power();
        let (add_l, _) = BinaryOp::Add.binding_power();
        let (cross_l, _) = BinaryOp::CrossProduct.binding_power();

        assert!(TERNARY_BP.0 < or_l);
        assert!(or_l < cat_l);
        assert!(cat_l < add_l);
        assert!(add_l < cross_l);
        assert!(UnaryOp::binding_power() > BinaryOp::Pow.binding_power().0);
    }

    #[test]
    fn associativity() {
        let (l, r) = BinaryOp::Sub.binding_power();
        assert!(l < r);
        let (l, r) = BinaryOp::Pow.binding_power();
        assert!(l > r);
        let (l, r) = AssignOp::binding_power();
        assert!(l > r);
    }

    #[test]
    fn from_terminal() {
        assert_eq!(BinaryOp::from_terminal(Terminal::DotProd), Some(BinaryOp::DotProduct));
        assert_eq!(BinaryOp::from_terminal(Terminal::Assign), None);
        assert_eq!(UnaryOp::from_terminal(Terminal::SizeOf), Some(UnaryOp::SizeOf));
        assert_eq!(PostfixOp::from_terminal(Terminal::AddAdd), Some(PostfixOp::PostInc));
        assert_eq!(AssignOp::from_terminal(Terminal::URShiftEq), Some(AssignOp::URShift));
        assert!(AssignOp::Assign.is_simple());
    }

    #[test]
    fn display() {
        assert_eq!(BinaryOp::ApproxEq.to_string(), "~==");
        assert_eq!(UnaryOp::AlignOf.to_string(), "alignof");
        assert_eq!(AssignOp::LShift.to_string(), "<<=");
    }
}
