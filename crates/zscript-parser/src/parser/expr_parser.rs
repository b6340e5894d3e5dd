//! Expression parsing by precedence climbing.
//!
//! Each binary operator has a `(left, right)` binding power; an operator
//! continues the current expression only while its left power is at least
//! the caller's minimum. Assignment and the ternary bind loosest and
//! associate to the right, as does `**`.

use ordered_float::OrderedFloat;
use zscript_core::Name;

use super::grammar::{PResult, Parser};
use super::type_parser::is_builtin_type;
use crate::ast::{
    AssignOp, BinaryOp, ConstValue, NodeData, NodeId, PostfixOp, TERNARY_BP, UnaryOp,
};
use crate::terminal::Terminal;

impl<'p, 's> Parser<'p, 's> {
    /// Parse a full expression, assignments included.
    pub(super) fn parse_expr(&mut self) -> PResult<'s, NodeId> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> PResult<'s, NodeId> {
        self.nested(|parser| parser.parse_operators(min_bp))
    }

    fn parse_operators(&mut self, min_bp: u8) -> PResult<'s, NodeId> {
        let mut lhs = self.parse_unary()?;

        loop {
            let terminal = self.peek();
            let loc = self.loc();

            if let Some(op) = AssignOp::from_terminal(terminal) {
                let (l_bp, r_bp) = AssignOp::binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let value = self.parse_expr_bp(r_bp)?;
                lhs = self.node(
                    NodeData::ExprAssign {
                        op,
                        target: lhs,
                        value,
                    },
                    loc,
                );
                continue;
            }

            if terminal == Terminal::Question {
                let (l_bp, r_bp) = TERNARY_BP;
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let then_value = self.parse_expr()?;
                self.expect(Terminal::Colon)?;
                let else_value = self.parse_expr_bp(r_bp)?;
                lhs = self.node(
                    NodeData::ExprTernary {
                        condition: lhs,
                        then_value,
                        else_value,
                    },
                    loc,
                );
                continue;
            }

            let Some(op) = BinaryOp::from_terminal(terminal) else {
                break;
            };
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let right = self.parse_expr_bp(r_bp)?;
            lhs = self.node(
                NodeData::ExprBinary {
                    op,
                    left: lhs,
                    right,
                },
                loc,
            );
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        if let Some(op) = UnaryOp::from_terminal(self.peek()) {
            self.advance();
            let operand = self.parse_expr_bp(UnaryOp::binding_power())?;
            return Ok(self.node(NodeData::ExprUnary { op, operand }, loc));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    /// Member access, calls, indexing and `++`/`--` after a primary.
    fn parse_postfix(&mut self, mut expr: NodeId) -> PResult<'s, NodeId> {
        loop {
            let loc = self.loc();
            expr = match self.peek() {
                Terminal::Dot => {
                    self.advance();
                    let member = match self.peek() {
                        Terminal::Identifier => self.advance().as_name(),
                        Terminal::Default => {
                            self.advance();
                            Name::DEFAULT
                        }
                        _ => return Err(self.unexpected()),
                    };
                    self.node(NodeData::ExprMemberAccess { object: expr, member }, loc)
                }
                Terminal::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    self.expect(Terminal::RParen)?;
                    self.node(
                        NodeData::ExprFuncCall {
                            function: expr,
                            args,
                        },
                        loc,
                    )
                }
                Terminal::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(Terminal::RBracket)?;
                    self.node(NodeData::ExprIndex { array: expr, index }, loc)
                }
                terminal => match PostfixOp::from_terminal(terminal) {
                    Some(op) => {
                        self.advance();
                        self.node(NodeData::ExprPostfix { op, operand: expr }, loc)
                    }
                    None => return Ok(expr),
                },
            };
        }
    }

    /// `arg, label: arg, ...` without the parentheses.
    fn parse_call_args(&mut self) -> PResult<'s, Option<NodeId>> {
        let mut args = None;
        while !self.check(Terminal::RParen) {
            let loc = self.loc();
            let label = if self.check(Terminal::Identifier) && self.peek_nth(1) == Terminal::Colon {
                let label = self.advance().as_name();
                self.advance();
                label
            } else {
                Name::NONE
            };
            let value = self.parse_expr()?;
            let arg = self.node(NodeData::FuncParm { label, value }, loc);
            args = Some(self.join(args, arg));
            if self.eat(Terminal::Comma).is_none() {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let data = match self.peek() {
            Terminal::IntConst => NodeData::ExprConstant {
                value: ConstValue::Int(self.advance().as_int()),
            },
            Terminal::UIntConst => NodeData::ExprConstant {
                value: ConstValue::UInt(self.advance().as_int() as u64),
            },
            Terminal::FloatConst => NodeData::ExprConstant {
                value: ConstValue::Float(OrderedFloat(self.advance().as_float())),
            },
            Terminal::StringConst => NodeData::ExprConstant {
                value: ConstValue::String(self.parse_string_concat()),
            },
            Terminal::NameConst => NodeData::ExprConstant {
                value: ConstValue::Name(self.advance().as_name()),
            },
            Terminal::True | Terminal::False => NodeData::ExprConstant {
                value: ConstValue::Bool(self.advance_is(Terminal::True)),
            },
            Terminal::Null => {
                self.advance();
                NodeData::ExprConstant {
                    value: ConstValue::Null,
                }
            }
            Terminal::Super => {
                self.advance();
                NodeData::ExprSuper
            }
            Terminal::Identifier => NodeData::ExprId {
                name: self.advance().as_name(),
            },
            terminal if is_builtin_type(terminal) => NodeData::ExprTypeRef {
                name: self.advance().as_name(),
            },
            Terminal::LParen => return self.parse_paren_or_vector(),
            _ => return Err(self.unexpected()),
        };
        Ok(self.node(data, loc))
    }

    /// Consume the current terminal, reporting whether it was `terminal`.
    fn advance_is(&mut self, terminal: Terminal) -> bool {
        let matched = self.check(terminal);
        self.advance();
        matched
    }

    /// Adjacent string literals are joined into one constant.
    fn parse_string_concat(&mut self) -> &'s str {
        let first = self.advance().as_str();
        if !self.check(Terminal::StringConst) {
            return first;
        }
        let mut joined = first.to_owned();
        while let Some(next) = self.eat(Terminal::StringConst) {
            joined.push_str(next.as_str());
        }
        self.state.intern_str(&joined)
    }

    /// `( expr )`, or a vector literal `(x, y)` / `(x, y, z)`.
    fn parse_paren_or_vector(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::LParen)?.loc;
        let x = self.parse_expr()?;
        if self.eat(Terminal::RParen).is_some() {
            return Ok(x);
        }
        self.expect(Terminal::Comma)?;
        let y = self.parse_expr()?;
        let z = if self.eat(Terminal::Comma).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(Terminal::RParen)?;
        Ok(self.node(NodeData::VectorInitializer { x, y, z }, loc))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::dump::print_ast;
    use crate::ast::{ConstValue, NodeData};
    use crate::parser::tests::parse;
    use crate::state::ParseState;
    use bumpalo::Bump;
    use zscript_core::Diagnostics;

    /// Parse `const X = <expr>;` and dump the value expression.
    fn dump_expr(expr: &str) -> String {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let source = format!("const X = {expr};");
        let top = parse(&source, &mut state, &mut diags);
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let NodeData::ConstantDef { value, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a constant");
        };
        print_ast(ast, Some(value))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            dump_expr("1 + 2 * 3"),
            "(expr-binary +\n  :left (expr-constant 1)\n  :right (expr-binary *\n    :left (expr-constant 2)\n    :right (expr-constant 3)))\n"
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let dump = dump_expr("a - b - c");
        assert!(dump.starts_with("(expr-binary -\n  :left (expr-binary -"), "{dump}");
    }

    #[test]
    fn power_and_assignment_are_right_associative() {
        let dump = dump_expr("a ** b ** c");
        assert!(dump.contains(":right (expr-binary **"), "{dump}");

        let dump = dump_expr("a = b += c");
        assert!(dump.starts_with("(expr-assign ="), "{dump}");
        assert!(dump.contains(":value (expr-assign +="), "{dump}");
    }

    #[test]
    fn ternary_and_postfix() {
        let dump = dump_expr("ok ? list[i].Size() : -1");
        assert!(dump.starts_with("(expr-ternary"), "{dump}");
        assert!(dump.contains("(expr-func-call"), "{dump}");
        assert!(dump.contains("(expr-member-access"), "{dump}");
        assert!(dump.contains("(expr-index"), "{dump}");
        assert!(dump.contains("(expr-unary -"), "{dump}");
    }

    #[test]
    fn labelled_call_arguments() {
        // Names keep their first spelling, so compare case-insensitively.
        let dump = dump_expr("Spawn(\"Imp\", pos, flags: 2)").to_lowercase();
        assert!(dump.contains("(func-parm flags"), "{dump}");
        assert!(dump.contains("\"imp\""), "{dump}");
    }

    #[test]
    fn vector_literals_and_parentheses() {
        let dump = dump_expr("(1, 2, 3)");
        assert!(dump.starts_with("(vector-initializer"), "{dump}");
        assert!(dump.contains(":z"), "{dump}");

        let dump = dump_expr("(1 + 2) * 3");
        assert!(dump.starts_with("(expr-binary *\n  :left (expr-binary +"), "{dump}");
    }

    #[test]
    fn adjacent_strings_are_joined() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse("const S = \"ab\" \"cd\";", &mut state, &mut diags);
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let NodeData::ConstantDef { value, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a constant");
        };
        assert_eq!(
            *ast[value].data(),
            NodeData::ExprConstant {
                value: ConstValue::String("abcd")
            }
        );
    }

    #[test]
    fn constants_of_every_kind() {
        let dump = dump_expr("f(3u, 1.5, 'Walk', true, null, super, int(2))").to_lowercase();
        for needle in ["3u", "1.5", "'walk'", "true", "null", "(expr-super)", "(expr-type-ref int)"] {
            assert!(dump.contains(needle), "missing {needle} in {dump}");
        }
    }
    #[test]
    fn deep_parentheses_are_an_error_not_a_crash() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let source = format!("const A = {}1{};\nconst B = 2;", "(".repeat(5000), ")".repeat(5000));
        let top = parse(&source, &mut state, &mut diags);

        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.iter().next().unwrap().message, "Expression nested too deeply");
        // The next declaration still parses.
        assert_eq!(state.ast().list(top).count(), 1);
    }

    #[test]
    fn deep_unary_chains_are_limited_too() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let source = format!("const A = {}1;", "- ".repeat(5000));
        parse(&source, &mut state, &mut diags);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn moderate_nesting_is_accepted() {
        let dump = dump_expr(&format!("{}1{}", "(".repeat(100), ")".repeat(100)));
        assert_eq!(dump, "(expr-constant 1)\n");
    }
}
