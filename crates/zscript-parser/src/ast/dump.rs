//! Textual dump of a finished tree.
//!
//! The format is an indented S-expression: one parenthesised form per node,
//! scalar attributes inline, child nodes on their own lines under a
//! `:field` label. It is a debugging aid, not an interchange format.

use std::fmt::{self, Write};

use super::{AstArena, NodeData, NodeId};

/// Render every top-level node of `top`'s group.
pub fn print_ast(ast: &AstArena<'_>, top: Option<NodeId>) -> String {
    AstDump { ast, top }.to_string()
}

/// [`Display`](fmt::Display) adapter over a tree.
pub struct AstDump<'a, 's> {
    pub ast: &'a AstArena<'s>,
    pub top: Option<NodeId>,
}

impl fmt::Display for AstDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer {
            ast: self.ast,
            out: f,
            depth: 0,
        };
        for id in self.ast.list(self.top) {
            printer.node(id)?;
            printer.out.write_char('\n')?;
        }
        Ok(())
    }
}

struct Printer<'a, 's, W> {
    ast: &'a AstArena<'s>,
    out: W,
    depth: usize,
}

impl<W: Write> Printer<'_, '_, W> {
    fn newline(&mut self) -> fmt::Result {
        self.out.write_char('\n')?;
        for _ in 0..self.depth {
            self.out.write_str("  ")?;
        }
        Ok(())
    }

    fn atom(&mut self, value: impl fmt::Display) -> fmt::Result {
        write!(self.out, " {value}")
    }

    fn flags<F>(&mut self, flags: F) -> fmt::Result
    where
        F: bitflags::Flags,
        F::Bits: bitflags::parser::WriteHex,
    {
        if flags.is_empty() {
            return Ok(());
        }
        self.out.write_char(' ')?;
        bitflags::parser::to_writer(&flags, &mut self.out)
    }

    fn field(&mut self, label: &str, id: Option<NodeId>) -> fmt::Result {
        let Some(id) = id else {
            return Ok(());
        };
        self.depth += 1;
        self.newline()?;
        write!(self.out, ":{label} ")?;
        self.node(id)?;
        self.depth -= 1;
        Ok(())
    }

    fn list(&mut self, label: &str, head: Option<NodeId>) -> fmt::Result {
        let Some(head) = head else {
            return Ok(());
        };
        self.depth += 1;
        self.newline()?;
        write!(self.out, ":{label}")?;
        self.depth += 1;
        let ast = self.ast;
        for id in ast.siblings(head) {
            self.newline()?;
            self.node(id)?;
        }
        self.depth -= 2;
        Ok(())
    }

    fn node(&mut self, id: NodeId) -> fmt::Result {
        let ast = self.ast;
        let node = &ast[id];
        write!(self.out, "({}", node.kind())?;

        match *node.data() {
            NodeData::Identifier { name } => self.atom(name)?,
            NodeData::Class {
                name,
                parent,
                replaces,
                flags,
                body,
            } => {
                self.atom(name)?;
                self.flags(flags)?;
                self.list("parent", parent)?;
                self.list("replaces", replaces)?;
                self.list("body", body)?;
            }
            NodeData::Struct { name, flags, body } => {
                self.atom(name)?;
                self.flags(flags)?;
                self.list("body", body)?;
            }
            NodeData::ExtendClass { name, body } => {
                self.atom(name)?;
                self.list("body", body)?;
            }
            NodeData::Enum {
                name,
                base_type,
                enumerators,
            } => {
                self.atom(name)?;
                self.field("type", base_type)?;
                self.list("values", enumerators)?;
            }
            NodeData::Enumerator { name, value } => {
                self.atom(name)?;
                self.field("value", value)?;
            }
            NodeData::ConstantDef { name, value } => {
                self.atom(name)?;
                self.field("value", Some(value))?;
            }
            NodeData::VarDeclarator { flags, ty, names } => {
                self.flags(flags)?;
                self.list("type", Some(ty))?;
                self.list("names", Some(names))?;
            }
            NodeData::VarName {
                name,
                array_size,
                init,
            } => {
                self.atom(name)?;
                self.field("size", array_size)?;
                self.field("init", init)?;
            }
            NodeData::FuncDeclarator {
                flags,
                returns,
                name,
                params,
                is_const,
                body,
            } => {
                self.atom(name)?;
                self.flags(flags)?;
                if is_const {
                    self.atom("const")?;
                }
                self.list("returns", returns)?;
                self.list("params", params)?;
                self.field("body", body)?;
            }
            NodeData::FuncParamDecl {
                flags,
                ty,
                name,
                default,
            } => {
                self.atom(name)?;
                self.flags(flags)?;
                self.field("type", Some(ty))?;
                self.field("default", default)?;
            }
            NodeData::BasicType {
                name,
                user_type,
                array_size,
            } => {
                if !name.is_none() {
                    self.atom(name)?;
                }
                self.list("user", user_type)?;
                self.field("size", array_size)?;
            }
            NodeData::MapType {
                key,
                value,
                array_size,
            } => {
                self.field("key", Some(key))?;
                self.field("value", Some(value))?;
                self.field("size", array_size)?;
            }
            NodeData::DynArrayType {
                element,
                array_size,
            } => {
                self.field("element", Some(element))?;
                self.field("size", array_size)?;
            }
            NodeData::ClassType {
                restriction,
                array_size,
            } => {
                self.list("restriction", restriction)?;
                self.field("size", array_size)?;
            }
            NodeData::CompoundStmt { content } => self.list("content", content)?,
            NodeData::ExpressionStmt { expr } => self.field("expr", Some(expr))?,
            NodeData::LocalVarStmt { ty, vars } => {
                self.field("type", Some(ty))?;
                self.list("vars", Some(vars))?;
            }
            NodeData::IfStmt {
                condition,
                then_branch,
                else_branch,
            } => {
                self.field("cond", Some(condition))?;
                self.field("then", Some(then_branch))?;
                self.field("else", else_branch)?;
            }
            NodeData::IterationStmt {
                init,
                condition,
                update,
                body,
                check_at,
            } => {
                self.atom(format_args!("{check_at:?}"))?;
                self.list("init", init)?;
                self.field("cond", condition)?;
                self.list("update", update)?;
                self.field("body", Some(body))?;
            }
            NodeData::SwitchStmt { condition, content } => {
                self.field("cond", Some(condition))?;
                self.list("content", content)?;
            }
            NodeData::CaseStmt { condition } => match condition {
                Some(condition) => self.field("cond", Some(condition))?,
                None => self.atom("default")?,
            },
            NodeData::JumpStmt { kind } => self.atom(format_args!("{kind:?}"))?,
            NodeData::ReturnStmt { values } => self.list("values", values)?,
            NodeData::ExprConstant { value } => self.atom(value)?,
            NodeData::ExprId { name } => self.atom(name)?,
            NodeData::ExprSuper => {}
            NodeData::ExprTypeRef { name } => self.atom(name)?,
            NodeData::ExprUnary { op, operand } => {
                self.atom(op)?;
                self.field("operand", Some(operand))?;
            }
            NodeData::ExprPostfix { op, operand } => {
                self.atom(op)?;
                self.field("operand", Some(operand))?;
            }
            NodeData::ExprBinary { op, left, right } => {
                self.atom(op)?;
                self.field("left", Some(left))?;
                self.field("right", Some(right))?;
            }
            NodeData::ExprAssign { op, target, value } => {
                self.atom(op)?;
                self.field("target", Some(target))?;
                self.field("value", Some(value))?;
            }
            NodeData::ExprTernary {
                condition,
                then_value,
                else_value,
            } => {
                self.field("cond", Some(condition))?;
                self.field("then", Some(then_value))?;
                self.field("else", Some(else_value))?;
            }
            NodeData::ExprFuncCall { function, args } => {
                self.field("function", Some(function))?;
                self.list("args", args)?;
            }
            NodeData::FuncParm { label, value } => {
                if !label.is_none() {
                    self.atom(label)?;
                }
                self.field("value", Some(value))?;
            }
            NodeData::ExprMemberAccess { object, member } => {
                self.atom(member)?;
                self.field("object", Some(object))?;
            }
            NodeData::ExprIndex { array, index } => {
                self.field("array", Some(array))?;
                self.field("index", Some(index))?;
            }
            NodeData::VectorInitializer { x, y, z } => {
                self.field("x", Some(x))?;
                self.field("y", Some(y))?;
                self.field("z", z)?;
            }
        }

        self.out.write_char(')')
    }
}
