//! Scanner error types.

use thiserror::Error;

use crate::SourceLoc;

/// Errors that occur while splitting a script into tokens.
///
/// The scanner records these and hands out an error token in their place,
/// so the drivers see them as tokens the grammar has no terminal for.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at {loc}")]
    UnexpectedChar { ch: char, loc: SourceLoc },

    /// A string or name literal ran into the end of the line or file.
    #[error("unterminated {what} at {loc}")]
    UnterminatedLiteral { what: &'static str, loc: SourceLoc },

    /// A block comment was not closed.
    #[error("unterminated comment at {loc}")]
    UnterminatedComment { loc: SourceLoc },

    /// A numeric literal could not be decoded.
    #[error("invalid number at {loc}: {detail}")]
    InvalidNumber { loc: SourceLoc, detail: String },
}

impl LexError {
    /// Where the error occurred.
    pub fn loc(&self) -> SourceLoc {
        match self {
            LexError::UnexpectedChar { loc, .. } => *loc,
            LexError::UnterminatedLiteral { loc, .. } => *loc,
            LexError::UnterminatedComment { loc } => *loc,
            LexError::InvalidNumber { loc, .. } => *loc,
        }
    }
}
