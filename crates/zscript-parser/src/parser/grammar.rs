//! Parser infrastructure: token navigation, node creation and error recovery.
//!
//! The grammar itself is split across `decl_parser`, `type_parser`,
//! `stmt_parser` and `expr_parser`, each adding methods to [`Parser`].

use zscript_core::{Diagnostics, SourceLoc};

use super::Pending;
use crate::ast::{NodeData, NodeId};
use crate::state::ParseState;
use crate::terminal::{Terminal, TokenPayload, TokenValue};
use crate::token_map::TokenMap;

/// Deepest nesting of expressions, statements, types and members accepted.
pub(super) const MAX_NESTING: u32 = 256;

/// A syntax error: the terminal the grammar could not accept.
#[derive(Debug, Clone, Copy)]
pub(super) struct SyntaxError<'s> {
    pub terminal: Terminal,
    pub value: TokenValue<'s>,
    /// Position in the buffer, or the buffer length for the end marker.
    pub pos: usize,
    /// The terminal would have opened a level past [`MAX_NESTING`].
    pub too_deep: bool,
}

pub(super) type PResult<'s, T> = Result<T, SyntaxError<'s>>;

/// Recursive-descent parser over the terminals of one declaration.
pub(super) struct Parser<'p, 's> {
    tokens: &'p [Pending<'s>],
    pos: usize,
    /// Returned once the buffer is exhausted.
    end: Pending<'s>,
    /// The current token is `>>` and its first `>` has been consumed.
    split_shift: bool,
    /// An error has already been reported at the end marker.
    reported_end: bool,
    nesting: u32,
    pub(super) state: &'p mut ParseState<'s>,
    diags: &'p mut Diagnostics,
}

impl<'p, 's> Parser<'p, 's> {
    pub fn new(
        tokens: &'p [Pending<'s>],
        end: Pending<'s>,
        state: &'p mut ParseState<'s>,
        diags: &'p mut Diagnostics,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            split_shift: false,
            reported_end: false,
            nesting: 0,
            state,
            diags,
        }
    }

    // ========================================================================
    // Token navigation
    // ========================================================================

    #[inline]
    fn token(&self, pos: usize) -> &Pending<'s> {
        self.tokens.get(pos).unwrap_or(&self.end)
    }

    /// The current terminal.
    #[inline]
    pub fn peek(&self) -> Terminal {
        if self.split_shift {
            return Terminal::Gt;
        }
        self.token(self.pos).0
    }

    /// The terminal `n` positions ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Terminal {
        if n == 0 {
            return self.peek();
        }
        self.token(self.pos + n).0
    }

    /// The current value.
    #[inline]
    pub fn value(&self) -> TokenValue<'s> {
        self.token(self.pos).1
    }

    #[inline]
    pub fn loc(&self) -> SourceLoc {
        self.value().loc
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the current terminal, returning its value.
    pub fn advance(&mut self) -> TokenValue<'s> {
        let value = self.value();
        self.split_shift = false;
        if !self.at_end() {
            self.pos += 1;
        }
        value
    }

    #[inline]
    pub fn check(&self, terminal: Terminal) -> bool {
        self.peek() == terminal
    }

    pub fn eat(&mut self, terminal: Terminal) -> Option<TokenValue<'s>> {
        if self.check(terminal) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, terminal: Terminal) -> PResult<'s, TokenValue<'s>> {
        self.eat(terminal).ok_or_else(|| self.unexpected())
    }

    /// Consume a closing `>`, splitting `>>` into two.
    pub fn expect_closing_angle(&mut self) -> PResult<'s, ()> {
        if self.split_shift || self.check(Terminal::Gt) {
            self.advance();
            Ok(())
        } else if self.check(Terminal::RShift) {
            self.split_shift = true;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Expect an identifier, returning the name it carries.
    pub fn expect_identifier(&mut self) -> PResult<'s, TokenValue<'s>> {
        self.expect(Terminal::Identifier)
    }

    // ========================================================================
    // Node creation
    // ========================================================================

    /// Create a node stamped with the active script and `loc`.
    #[inline]
    pub fn node(&mut self, data: NodeData<'s>, loc: SourceLoc) -> NodeId {
        self.state.init_node_at(data, loc)
    }

    /// Append `node` to an optional list, returning the list head.
    #[inline]
    pub fn join(&mut self, list: Option<NodeId>, node: NodeId) -> NodeId {
        self.state.ast_mut().join(list, node)
    }

    // ========================================================================
    // Error handling
    // ========================================================================

    /// An error for the current terminal.
    pub fn unexpected(&self) -> SyntaxError<'s> {
        let (terminal, value) = *self.token(self.pos);
        SyntaxError {
            terminal,
            value,
            pos: self.pos.min(self.tokens.len()),
            too_deep: false,
        }
    }

    /// Run `parse` one nesting level deeper.
    ///
    /// Past [`MAX_NESTING`] the current terminal is rejected without
    /// descending.
    pub fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> PResult<'s, T>,
    ) -> PResult<'s, T> {
        if self.nesting >= MAX_NESTING {
            return Err(SyntaxError {
                too_deep: true,
                ..self.unexpected()
            });
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Record a syntax error in the diagnostics sink.
    ///
    /// Only the first error at the end marker is reported.
    pub fn report(&mut self, error: SyntaxError<'s>) {
        if error.pos >= self.tokens.len() {
            if self.reported_end {
                return;
            }
            self.reported_end = true;
        }

        let message = if error.too_deep {
            "Expression nested too deeply".to_owned()
        } else {
            let mut message = format!(
                "Unexpected {}",
                TokenMap::get().terminal_display_name(error.terminal)
            );
            match error.value.payload {
                TokenPayload::None => {}
                TokenPayload::Name(_) if !is_word(error.terminal) => {}
                payload => message.push_str(&format!(" {payload}")),
            }
            message
        };
        let section = self.state.section();
        self.diags.error(section, error.value.loc, message);
    }

    /// Skip to the end of the current statement or member.
    ///
    /// Stops after a `;` or a balanced `{ ... }` block, or before a `}` that
    /// closes the enclosing block. Always makes progress unless already at
    /// such a `}` or at the end.
    pub fn synchronize(&mut self) {
        let mut depth = 0u32;
        while !self.at_end() {
            match self.peek() {
                Terminal::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                Terminal::LBrace => {
                    depth += 1;
                    self.advance();
                }
                Terminal::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip everything left in the buffer.
    pub fn skip_rest(&mut self) {
        self.pos = self.tokens.len();
        self.split_shift = false;
    }
}

/// Terminals whose value is worth quoting in an error message.
fn is_word(terminal: Terminal) -> bool {
    matches!(
        terminal,
        Terminal::Identifier
            | Terminal::NonWhitespace
            | Terminal::NameConst
            | Terminal::StringConst
            | Terminal::IntConst
            | Terminal::UIntConst
            | Terminal::FloatConst
    )
}
