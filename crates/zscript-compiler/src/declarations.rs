//! The reference declaration compiler.
//!
//! Runs three passes over a manifest's translation unit:
//!
//! 1. **Types**: classes, structs and enums go into the global table, so
//!    later declarations (and later manifests) can refer to them.
//! 2. **Values**: constants and enumerators go into the manifest-local table,
//!    with integer values folded where possible.
//! 3. **References**: parent classes and `extend class` targets must name a
//!    known class.
//!
//! Function bodies are not checked.

use std::ops::AddAssign;

use zscript_core::{Diagnostics, Name, Provenance};
use zscript_parser::ast::{BinaryOp, ConstValue, NodeData, UnaryOp};
use zscript_parser::{AstArena, NodeId};

use crate::Compiler;
use crate::symbols::{Symbol, SymbolKind, SymbolTable, lookup};

/// Declarations registered, summed over every [`Compiler::compile`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    pub types: usize,
    pub constants: usize,
    pub enumerators: usize,
}

impl AddAssign for CompileStats {
    fn add_assign(&mut self, other: Self) {
        self.types += other.types;
        self.constants += other.constants;
        self.enumerators += other.enumerators;
    }
}

#[derive(Debug, Default)]
pub struct DeclarationCompiler {
    stats: CompileStats,
}

impl DeclarationCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CompileStats {
        self.stats
    }
}

impl Compiler for DeclarationCompiler {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn compile(
        &mut self,
        ast: &AstArena<'_>,
        top: Option<NodeId>,
        parent: Option<&SymbolTable>,
        local: &mut SymbolTable,
        globals: &mut SymbolTable,
        diags: &mut Diagnostics,
    ) {
        let mut pass = Pass {
            ast,
            parent,
            diags,
            stats: CompileStats::default(),
        };
        pass.register_types(top, globals);
        pass.register_values(top, local, globals);
        pass.check_references(top, globals);

        tracing::debug!(
            table = local.name(),
            types = pass.stats.types,
            constants = pass.stats.constants,
            enumerators = pass.stats.enumerators,
            "compiled declarations"
        );
        self.stats += pass.stats;
    }
}

struct Pass<'a, 's, 'd> {
    ast: &'a AstArena<'s>,
    parent: Option<&'a SymbolTable>,
    diags: &'d mut Diagnostics,
    stats: CompileStats,
}

impl<'a, 's> Pass<'a, 's, '_> {
    fn error(&mut self, at: NodeId, message: String) {
        let provenance = self.ast[at].provenance();
        self.diags.error(section(&provenance), provenance.loc, message);
    }

    fn warning(&mut self, at: NodeId, message: String) {
        let provenance = self.ast[at].provenance();
        self.diags.warning(section(&provenance), provenance.loc, message);
    }

    /// Last component of a dotted name group.
    fn last_name(&self, group: Option<NodeId>) -> Option<Name> {
        let head = group?;
        match *self.ast[self.ast.prev(head)].data() {
            NodeData::Identifier { name } => Some(name),
            _ => None,
        }
    }

    // ========================================================================
    // Pass 1: types
    // ========================================================================

    fn register_types(&mut self, top: Option<NodeId>, globals: &mut SymbolTable) {
        let ast = self.ast;
        for decl in ast.list(top) {
            let (name, kind) = match *ast[decl].data() {
                NodeData::Class {
                    name,
                    parent,
                    replaces,
                    body,
                    ..
                } => {
                    self.check_nested(body);
                    let kind = SymbolKind::Class {
                        parent: self.last_name(parent),
                        replaces: self.last_name(replaces),
                    };
                    (name, kind)
                }
                NodeData::Struct { name, body, .. } => {
                    self.check_nested(body);
                    (name, SymbolKind::Struct)
                }
                NodeData::Enum {
                    name, enumerators, ..
                } => {
                    self.check_enum(decl, name, enumerators);
                    (name, SymbolKind::Enum)
                }
                NodeData::ExtendClass { body, .. } => {
                    self.check_nested(body);
                    continue;
                }
                _ => continue,
            };

            if let Some(existing) = self.parent.and_then(|table| table.find(name)) {
                let message = redefinition(name, existing);
                self.error(decl, message);
                continue;
            }
            let symbol = Symbol::new(name, kind, ast[decl].provenance());
            match globals.add(symbol) {
                Ok(()) => self.stats.types += 1,
                Err(existing) => {
                    let message = redefinition(name, existing);
                    self.error(decl, message);
                }
            }
        }
    }

    /// Warnings for enums declared inside a class or struct body.
    fn check_nested(&mut self, body: Option<NodeId>) {
        let ast = self.ast;
        for member in ast.list(body) {
            if let NodeData::Enum {
                name, enumerators, ..
            } = *ast[member].data()
            {
                self.check_enum(member, name, enumerators);
            }
        }
    }

    fn check_enum(&mut self, decl: NodeId, name: Name, enumerators: Option<NodeId>) {
        if enumerators.is_none() {
            self.warning(decl, format!("Enum '{name}' has no values"));
        }
    }

    // ========================================================================
    // Pass 2: constants and enumerators
    // ========================================================================

    fn register_values(&mut self, top: Option<NodeId>, local: &mut SymbolTable, globals: &SymbolTable) {
        let ast = self.ast;
        for decl in ast.list(top) {
            match *ast[decl].data() {
                NodeData::Enum { enumerators, .. } => {
                    let mut next = Some(0i64);
                    for item in ast.list(enumerators) {
                        let NodeData::Enumerator { name, value } = *ast[item].data() else {
                            continue;
                        };
                        let value = match value {
                            Some(expr) => self.evaluate(expr, local, globals),
                            None => next,
                        };
                        next = value.and_then(|v| v.checked_add(1));
                        if self.add_value(item, name, SymbolKind::Enumerator { value }, local, globals) {
                            self.stats.enumerators += 1;
                        }
                    }
                }
                NodeData::ConstantDef { name, value } => {
                    let value = self.evaluate(value, local, globals);
                    if self.add_value(decl, name, SymbolKind::Constant { value }, local, globals) {
                        self.stats.constants += 1;
                    }
                }
                _ => {}
            }
        }
    }

    fn add_value(
        &mut self,
        decl: NodeId,
        name: Name,
        kind: SymbolKind,
        local: &mut SymbolTable,
        globals: &SymbolTable,
    ) -> bool {
        if let Some(existing) = globals.find(name).filter(|symbol| symbol.kind.is_type()) {
            let message = redefinition(name, existing);
            self.error(decl, message);
            return false;
        }
        let symbol = Symbol::new(name, kind, self.ast[decl].provenance());
        match local.add(symbol) {
            Ok(()) => true,
            Err(existing) => {
                let message = redefinition(name, existing);
                self.error(decl, message);
                false
            }
        }
    }

    /// Fold an integer constant expression.
    fn evaluate(&self, expr: NodeId, local: &SymbolTable, globals: &SymbolTable) -> Option<i64> {
        match *self.ast[expr].data() {
            NodeData::ExprConstant { value } => match value {
                ConstValue::Int(v) => Some(v),
                ConstValue::UInt(v) => i64::try_from(v).ok(),
                ConstValue::Bool(b) => Some(i64::from(b)),
                _ => None,
            },
            NodeData::ExprId { name } => {
                match lookup(&[Some(local), self.parent, Some(globals)], name)?.kind {
                    SymbolKind::Constant { value } | SymbolKind::Enumerator { value } => value,
                    _ => None,
                }
            }
            NodeData::ExprUnary { op, operand } => {
                let v = self.evaluate(operand, local, globals)?;
                match op {
                    UnaryOp::Neg => v.checked_neg(),
                    UnaryOp::Plus => Some(v),
                    UnaryOp::BitNot => Some(!v),
                    UnaryOp::Not => Some(i64::from(v == 0)),
                    _ => None,
                }
            }
            NodeData::ExprBinary { op, left, right } => {
                let l = self.evaluate(left, local, globals)?;
                let r = self.evaluate(right, local, globals)?;
                match op {
                    BinaryOp::Add => l.checked_add(r),
                    BinaryOp::Sub => l.checked_sub(r),
                    BinaryOp::Mul => l.checked_mul(r),
                    BinaryOp::Div => l.checked_div(r),
                    BinaryOp::Mod => l.checked_rem(r),
                    BinaryOp::LShift => u32::try_from(r).ok().and_then(|r| l.checked_shl(r)),
                    BinaryOp::RShift => u32::try_from(r).ok().and_then(|r| l.checked_shr(r)),
                    BinaryOp::BitOr => Some(l | r),
                    BinaryOp::BitAnd => Some(l & r),
                    BinaryOp::BitXor => Some(l ^ r),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    // ========================================================================
    // Pass 3: references
    // ========================================================================

    fn check_references(&mut self, top: Option<NodeId>, globals: &SymbolTable) {
        let ast = self.ast;
        for decl in ast.list(top) {
            match *ast[decl].data() {
                NodeData::Class {
                    name,
                    parent,
                    replaces,
                    ..
                } => {
                    if let Some(parent_name) = self.last_name(parent) {
                        match lookup(&[self.parent, Some(globals)], parent_name) {
                            Some(symbol) if matches!(symbol.kind, SymbolKind::Class { .. }) => {}
                            Some(symbol) => {
                                let what = symbol.kind.describe();
                                self.error(decl, format!("'{parent_name}' is a {what}, not a class"));
                            }
                            None => self.error(
                                decl,
                                format!("Unknown parent class '{parent_name}' for class '{name}'"),
                            ),
                        }
                    }
                    if self.last_name(replaces) == Some(name) {
                        self.warning(decl, format!("Class '{name}' replaces itself"));
                    }
                }
                NodeData::ExtendClass { name, .. } => {
                    let known = lookup(&[self.parent, Some(globals)], name)
                        .is_some_and(|symbol| matches!(symbol.kind, SymbolKind::Class { .. } | SymbolKind::Struct));
                    if !known {
                        self.error(decl, format!("Extending unknown class '{name}'"));
                    }
                }
                _ => {}
            }
        }
    }
}

fn section<'s>(provenance: &Provenance<'s>) -> Option<&'s str> {
    Some(provenance.source_name).filter(|name| !name.is_empty())
}

fn redefinition(name: Name, existing: &Symbol) -> String {
    if existing.source_name.is_empty() {
        format!("'{name}' is already defined as a {}", existing.kind.describe())
    } else {
        format!(
            "'{name}' is already defined as a {} at {}:{}",
            existing.kind.describe(),
            existing.source_name,
            existing.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use zscript_core::SourceLoc;
    use zscript_parser::{Lexer, ParseState, PushParser, ScriptParser, Terminal, TokenMap, TokenValue};

    /// Parse one script and compile it against `globals`.
    fn compile(source: &str, globals: &mut SymbolTable) -> (Diagnostics, SymbolTable, CompileStats) {
        let mut compiler = DeclarationCompiler::new();
        let (diags, local) = compile_with(&mut compiler, source, globals);
        (diags, local, compiler.stats())
    }

    fn compile_with(
        compiler: &mut DeclarationCompiler,
        source: &str,
        globals: &mut SymbolTable,
    ) -> (Diagnostics, SymbolTable) {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let mut parser = ScriptParser::new();

        state.begin_file("test.zs", None);
        for token in Lexer::new(source) {
            let (terminal, value) = TokenMap::get().translate(&token, &mut state).unwrap();
            state.set_position(value.loc);
            parser.step(terminal, value, &mut state, &mut diags);
        }
        parser.step(Terminal::Eof, TokenValue::end(SourceLoc::default()), &mut state, &mut diags);
        state.end_file();
        parser.step(Terminal::EndOfInput, TokenValue::end(SourceLoc::default()), &mut state, &mut diags);
        assert!(!diags.has_errors(), "{diags}");

        let mut local = SymbolTable::new("Global_Node");
        compiler.compile(state.ast(), state.top_node(), None, &mut local, globals, &mut diags);
        (diags, local)
    }

    #[test]
    fn registers_types_and_values() {
        let mut globals = SymbolTable::new("globals");
        let (diags, local, stats) = compile(
            r#"
            class Actor { }
            class Imp : Actor { }
            struct Pos { int x; }
            enum Tint { Red, Green = 4, Blue, Mask = Blue << 1 | 1 }
            const Limit = -(2 + 3) * 2;
            const Title = "imp";
            "#,
            &mut globals,
        );

        assert!(diags.is_empty(), "{diags}");
        assert_eq!(stats, CompileStats { types: 4, constants: 2, enumerators: 4 });
        assert!(globals.find(Name::new("imp")).is_some());

        let value = |name: &str| match local.find(Name::new(name)).map(|s| &s.kind) {
            Some(SymbolKind::Enumerator { value } | SymbolKind::Constant { value }) => *value,
            _ => panic!("no value for {name}"),
        };
        assert_eq!(value("Red"), Some(0));
        assert_eq!(value("Blue"), Some(5));
        assert_eq!(value("Mask"), Some(11));
        assert_eq!(value("Limit"), Some(-10));
        assert_eq!(value("Title"), None);
    }

    #[test]
    fn duplicate_types_are_errors() {
        let mut globals = SymbolTable::new("globals");
        let (diags, _, _) = compile("struct A { }\nclass A { }\n", &mut globals);

        assert_eq!(diags.error_count(), 1);
        let error = diags.errors().next().unwrap();
        assert_eq!(error.line, 2);
        assert!(error.message.contains("already defined as a struct at test.zs:1"), "{}", error.message);
    }

    #[test]
    fn types_persist_across_manifests() {
        let mut globals = SymbolTable::new("globals");
        let (diags, _, _) = compile("class Base { }", &mut globals);
        assert!(diags.is_empty());

        let (diags, _, _) = compile("class Derived : Base { }\nextend class Base { }", &mut globals);
        assert!(diags.is_empty(), "{diags}");

        let (diags, _, _) = compile("class Base { }", &mut globals);
        assert_eq!(diags.error_count(), 1);
    }

    #[test]
    fn stats_accumulate_across_calls() {
        let mut globals = SymbolTable::new("globals");
        let mut compiler = DeclarationCompiler::new();
        compile_with(&mut compiler, "class Base { }\nconst One = 1;", &mut globals);
        compile_with(&mut compiler, "class Derived : Base { }\nenum E { A, B }", &mut globals);

        assert_eq!(
            compiler.stats(),
            CompileStats { types: 3, constants: 1, enumerators: 2 }
        );
    }

    #[test]
    fn unknown_references_are_errors() {
        let mut globals = SymbolTable::new("globals");
        let (diags, _, _) = compile(
            "struct S { }\nclass A : Missing { }\nclass B : S { }\nextend class Nowhere { }",
            &mut globals,
        );

        let messages: Vec<_> = diags.errors().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 3, "{diags}");
        assert!(messages[0].starts_with("Unknown parent class 'Missing'"));
        assert!(messages[1].contains("is a struct, not a class"));
        assert!(messages[2].starts_with("Extending unknown class 'Nowhere'"));
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut globals = SymbolTable::new("globals");
        let (diags, _, _) = compile(
            "enum Empty { }\nclass Self replaces Self { enum Inner { } }",
            &mut globals,
        );

        assert_eq!(diags.error_count(), 0);
        assert_eq!(diags.warning_count(), 3);
    }

    #[test]
    fn duplicate_values_are_errors() {
        let mut globals = SymbolTable::new("globals");
        let (diags, local, stats) = compile("const X = 1;\nenum E { X }", &mut globals);

        assert_eq!(diags.error_count(), 1);
        assert_eq!(stats.enumerators, 0);
        assert_eq!(local.len(), 1);
    }
}
