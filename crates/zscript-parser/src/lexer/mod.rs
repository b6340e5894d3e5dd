//! Lexical analysis for ZScript.

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Literal, Token, TokenKind, lookup_keyword};
