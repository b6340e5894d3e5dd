//! ZScript parser crate.
//!
//! This crate turns ZScript source into a syntax tree. It includes:
//! - The scanner ([`Lexer`]) and its token kinds
//! - The [`TokenMap`] from scanner tokens to grammar terminals
//! - The index-linked syntax tree ([`AstArena`]) and its textual dump
//! - The push parser ([`ScriptParser`]) driven one terminal at a time
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use zscript_core::{Diagnostics, SourceLoc};
//! use zscript_parser::{
//!     Lexer, ParseState, PushParser, ScriptParser, Terminal, TokenMap, TokenValue, print_ast,
//! };
//!
//! let bump = Bump::new();
//! let mut state = ParseState::new(&bump);
//! let mut diags = Diagnostics::new();
//! let mut parser = ScriptParser::new();
//!
//! state.begin_file("zscript/consts.zs", None);
//! for token in Lexer::new("const Answer = 6 * 7;") {
//!     let (terminal, value) = TokenMap::get().translate(&token, &mut state).unwrap();
//!     state.set_position(value.loc);
//!     parser.step(terminal, value, &mut state, &mut diags);
//! }
//! parser.step(Terminal::Eof, TokenValue::end(SourceLoc::default()), &mut state, &mut diags);
//! state.end_file();
//! parser.step(Terminal::EndOfInput, TokenValue::end(SourceLoc::default()), &mut state, &mut diags);
//!
//! assert!(!diags.has_errors());
//! let dump = print_ast(state.ast(), state.top_node());
//! assert!(dump.starts_with("(constant-def Answer"));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod state;
pub mod terminal;
pub mod token_map;

pub use ast::dump::{AstDump, print_ast};
pub use ast::{AstArena, NodeData, NodeId, NodeKind, TreeNode};
pub use lexer::{Cursor, Lexer, Token, TokenKind};
pub use parser::{PushParser, ScriptParser};
pub use state::ParseState;
pub use terminal::{Terminal, TokenPayload, TokenValue};
pub use token_map::TokenMap;
