//! The push parser.
//!
//! Drivers feed one `(terminal, value)` pair at a time through
//! [`PushParser::step`]. [`ScriptParser`] collects the terminals of one
//! top-level declaration, using brace depth to find where it ends, and then
//! runs the recursive-descent grammar over that declaration. Syntax errors
//! are recorded in the diagnostics sink; the parser itself never fails.

mod decl_parser;
mod expr_parser;
mod grammar;
mod stmt_parser;
mod type_parser;

use zscript_core::Diagnostics;

use crate::ast::NodeId;
use crate::state::ParseState;
use crate::terminal::{Terminal, TokenValue};

use grammar::Parser;

/// A terminal waiting to be parsed, with its value.
pub type Pending<'s> = (Terminal, TokenValue<'s>);

/// A parser that is advanced one terminal at a time.
pub trait PushParser<'s> {
    /// Feed one terminal.
    ///
    /// [`Terminal::Eof`] ends one script and [`Terminal::EndOfInput`] ends
    /// the whole manifest; both leave the translation unit parsed so far in
    /// [`ParseState::top_node`].
    fn step(
        &mut self,
        terminal: Terminal,
        value: TokenValue<'s>,
        state: &mut ParseState<'s>,
        diags: &mut Diagnostics,
    );
}

/// The ZScript grammar as a push parser.
#[derive(Debug, Default)]
pub struct ScriptParser<'s> {
    pending: Vec<Pending<'s>>,
    depth: u32,
    unit: Option<NodeId>,
    declarations: usize,
}

impl<'s> ScriptParser<'s> {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(256),
            ..Self::default()
        }
    }

    /// Number of top-level declarations parsed so far.
    pub fn declarations(&self) -> usize {
        self.declarations
    }

    /// Head of the translation unit parsed so far.
    pub fn unit(&self) -> Option<NodeId> {
        self.unit
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn parse_pending(&mut self, end: Pending<'s>, state: &mut ParseState<'s>, diags: &mut Diagnostics) {
        if self.pending.is_empty() {
            return;
        }
        let tokens = std::mem::take(&mut self.pending);
        let mut parser = Parser::new(&tokens, end, state, diags);
        let decls = parser.parse_declarations();
        let count = state.ast().list(decls).count();
        if let Some(decls) = decls {
            self.unit = Some(state.ast_mut().join(self.unit, decls));
        }
        self.declarations += count;
        self.depth = 0;

        // Reuse the allocation for the next declaration.
        self.pending = tokens;
        self.pending.clear();
    }
}

impl<'s> PushParser<'s> for ScriptParser<'s> {
    fn step(
        &mut self,
        terminal: Terminal,
        value: TokenValue<'s>,
        state: &mut ParseState<'s>,
        diags: &mut Diagnostics,
    ) {
        match terminal {
            Terminal::Eof | Terminal::EndOfInput => {
                self.parse_pending((terminal, value), state, diags);
                state.set_top_node(self.unit);
                if terminal == Terminal::EndOfInput {
                    tracing::debug!(declarations = self.declarations, "end of input");
                }
            }
            _ => {
                self.pending.push((terminal, value));
                let complete = match terminal {
                    Terminal::LBrace => {
                        self.depth += 1;
                        false
                    }
                    Terminal::RBrace => {
                        self.depth = self.depth.saturating_sub(1);
                        self.depth == 0
                    }
                    Terminal::Semicolon => self.depth == 0,
                    _ => false,
                };
                if complete {
                    let end = (Terminal::Eof, TokenValue::end(value.loc));
                    self.parse_pending(end, state, diags);
                }
            }
        }
    }
}
