//! Declaration parsing: classes, structs, enums, constants and members.

use zscript_core::{Name, SourceLoc};

use super::grammar::{PResult, Parser};
use crate::ast::{DeclFlags, NodeData, NodeId, ParamFlags};
use crate::terminal::{Terminal, TokenValue};

impl<'p, 's> Parser<'p, 's> {
    /// Parse every declaration in the buffer, recovering from errors.
    pub fn parse_declarations(&mut self) -> Option<NodeId> {
        let mut decls = None;
        while !self.at_end() {
            match self.parse_declaration() {
                Ok(Some(decl)) => decls = Some(self.join(decls, decl)),
                Ok(None) => {}
                Err(error) => {
                    self.report(error);
                    self.skip_rest();
                }
            }
        }
        decls
    }

    /// Parse one top-level declaration. A lone `;` yields `None`.
    fn parse_declaration(&mut self) -> PResult<'s, Option<NodeId>> {
        let decl = match self.peek() {
            Terminal::Semicolon => {
                self.advance();
                return Ok(None);
            }
            Terminal::Class => self.parse_class()?,
            Terminal::Extend => self.parse_extend()?,
            Terminal::Struct => self.parse_struct()?,
            Terminal::Enum => self.parse_enum()?,
            Terminal::Const => self.parse_const_def()?,
            _ => return Err(self.unexpected()),
        };
        Ok(Some(decl))
    }

    /// `class Name [: Parent] [replaces Other] {flags} { body }`
    fn parse_class(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Class)?.loc;
        let name = self.expect_identifier()?.as_name();

        let parent = if self.eat(Terminal::Colon).is_some() {
            Some(self.parse_dotted_name()?)
        } else {
            None
        };
        let replaces = if self.eat(Terminal::Replaces).is_some() {
            Some(self.parse_dotted_name()?)
        } else {
            None
        };
        let flags = self.parse_decl_flags()?;
        let body = self.parse_body()?;

        Ok(self.node(
            NodeData::Class {
                name,
                parent,
                replaces,
                flags,
                body,
            },
            loc,
        ))
    }

    /// `extend class Name { body }`
    fn parse_extend(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Extend)?.loc;
        if self.eat(Terminal::Class).is_none() {
            self.expect(Terminal::Struct)?;
        }
        let name = self.expect_identifier()?.as_name();
        let body = self.parse_body()?;
        Ok(self.node(NodeData::ExtendClass { name, body }, loc))
    }

    /// `struct Name {flags} { body } [;]`
    fn parse_struct(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Struct)?.loc;
        let name = self.expect_identifier()?.as_name();
        let flags = self.parse_decl_flags()?;
        let body = self.parse_body()?;
        Ok(self.node(NodeData::Struct { name, flags, body }, loc))
    }

    /// `enum Name [: int-type] { A, B = expr, ... } [;]`
    fn parse_enum(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Enum)?.loc;
        let name = self.expect_identifier()?.as_name();

        let base_type = if self.eat(Terminal::Colon).is_some() {
            match self.peek() {
                Terminal::SByte
                | Terminal::Byte
                | Terminal::Short
                | Terminal::UShort
                | Terminal::Int
                | Terminal::UInt => Some(self.parse_type()?),
                _ => return Err(self.unexpected()),
            }
        } else {
            None
        };

        self.expect(Terminal::LBrace)?;
        let mut enumerators = None;
        while !self.check(Terminal::RBrace) {
            let value = self.expect_identifier()?;
            let init = if self.eat(Terminal::Assign).is_some() {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let enumerator = self.node(
                NodeData::Enumerator {
                    name: value.as_name(),
                    value: init,
                },
                value.loc,
            );
            enumerators = Some(self.join(enumerators, enumerator));
            if self.eat(Terminal::Comma).is_none() {
                break;
            }
        }
        self.expect(Terminal::RBrace)?;

        Ok(self.node(
            NodeData::Enum {
                name,
                base_type,
                enumerators,
            },
            loc,
        ))
    }

    /// `const Name = expr;`
    fn parse_const_def(&mut self) -> PResult<'s, NodeId> {
        let loc = self.expect(Terminal::Const)?.loc;
        let name = self.expect_identifier()?.as_name();
        self.expect(Terminal::Assign)?;
        let value = self.parse_expr()?;
        self.expect(Terminal::Semicolon)?;
        Ok(self.node(NodeData::ConstantDef { name, value }, loc))
    }

    /// `A.B.C` as an identifier group.
    pub(super) fn parse_dotted_name(&mut self) -> PResult<'s, NodeId> {
        let value = self.expect_identifier()?;
        let head = self.node(NodeData::Identifier { name: value.as_name() }, value.loc);
        while self.check(Terminal::Dot) && self.peek_nth(1) == Terminal::Identifier {
            self.advance();
            let value = self.advance();
            let part = self.node(NodeData::Identifier { name: value.as_name() }, value.loc);
            self.join(Some(head), part);
        }
        Ok(head)
    }

    pub(super) fn parse_decl_flags(&mut self) -> PResult<'s, DeclFlags> {
        let mut flags = DeclFlags::empty();
        loop {
            let flag = match self.peek() {
                Terminal::Abstract => DeclFlags::ABSTRACT,
                Terminal::Native => DeclFlags::NATIVE,
                Terminal::Static => DeclFlags::STATIC,
                Terminal::Private => DeclFlags::PRIVATE,
                Terminal::Protected => DeclFlags::PROTECTED,
                Terminal::Final => DeclFlags::FINAL,
                Terminal::Meta => DeclFlags::META,
                Terminal::Deprecated => DeclFlags::DEPRECATED,
                Terminal::ReadOnly => DeclFlags::READONLY,
                Terminal::Action => DeclFlags::ACTION,
                Terminal::Latent => DeclFlags::LATENT,
                Terminal::Virtual => DeclFlags::VIRTUAL,
                Terminal::Override => DeclFlags::OVERRIDE,
                Terminal::Ui => DeclFlags::UI,
                Terminal::Play => DeclFlags::PLAY,
                Terminal::ClearScope => DeclFlags::CLEARSCOPE,
                _ => return Ok(flags),
            };
            self.advance();
            // deprecated("version"[, "reason"])
            if flag == DeclFlags::DEPRECATED && self.eat(Terminal::LParen).is_some() {
                self.expect(Terminal::StringConst)?;
                if self.eat(Terminal::Comma).is_some() {
                    self.expect(Terminal::StringConst)?;
                }
                self.expect(Terminal::RParen)?;
            }
            flags |= flag;
        }
    }

    // ========================================================================
    // Class and struct bodies
    // ========================================================================

    /// `{ member* }`, recovering member by member.
    fn parse_body(&mut self) -> PResult<'s, Option<NodeId>> {
        self.expect(Terminal::LBrace)?;
        let mut members = None;
        while !self.check(Terminal::RBrace) && !self.at_end() {
            match self.parse_member() {
                Ok(Some(member)) => members = Some(self.join(members, member)),
                Ok(None) => {}
                Err(error) => {
                    self.report(error);
                    self.synchronize();
                }
            }
        }
        self.expect(Terminal::RBrace)?;
        Ok(members)
    }

    fn parse_member(&mut self) -> PResult<'s, Option<NodeId>> {
        let member = match self.peek() {
            Terminal::Semicolon => {
                self.advance();
                return Ok(None);
            }
            Terminal::Const => self.parse_const_def()?,
            Terminal::Enum => {
                let decl = self.parse_enum()?;
                self.eat(Terminal::Semicolon);
                decl
            }
            Terminal::Struct => {
                let decl = self.nested(Self::parse_struct)?;
                self.eat(Terminal::Semicolon);
                decl
            }
            _ => self.parse_field_or_method()?,
        };
        Ok(Some(member))
    }

    /// `{flags} Type name[, name2][[size]];` or
    /// `{flags} Type[, Type2] Name(params) [const] { stmts }`
    fn parse_field_or_method(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let flags = self.parse_decl_flags()?;

        let returns = if self.check(Terminal::Void) {
            self.advance();
            None
        } else {
            let first = self.parse_type()?;
            let mut types = Some(first);
            while self.eat(Terminal::Comma).is_some() {
                let ty = self.parse_type()?;
                types = Some(self.join(types, ty));
            }
            types
        };

        let name = self.expect_identifier()?;
        if self.check(Terminal::LParen) {
            return self.parse_method_rest(flags, returns, name.as_name(), loc);
        }

        // Fields need exactly one type.
        let ty = match returns {
            Some(ty) if self.state.ast().group_len(ty) == 1 => ty,
            _ => return Err(self.unexpected()),
        };
        let mut names = self.parse_var_name(name)?;
        while self.eat(Terminal::Comma).is_some() {
            let next = self.expect_identifier()?;
            let var = self.parse_var_name(next)?;
            names = self.join(Some(names), var);
        }
        self.expect(Terminal::Semicolon)?;

        Ok(self.node(NodeData::VarDeclarator { flags, ty, names }, loc))
    }

    /// One field name with an optional `[size]`.
    fn parse_var_name(&mut self, name: TokenValue<'s>) -> PResult<'s, NodeId> {
        let array_size = self.parse_array_size()?;
        Ok(self.node(
            NodeData::VarName {
                name: name.as_name(),
                array_size,
                init: None,
            },
            name.loc,
        ))
    }

    fn parse_method_rest(
        &mut self,
        flags: DeclFlags,
        returns: Option<NodeId>,
        name: Name,
        loc: SourceLoc,
    ) -> PResult<'s, NodeId> {
        self.expect(Terminal::LParen)?;
        let params = self.parse_params()?;
        self.expect(Terminal::RParen)?;
        let is_const = self.eat(Terminal::Const).is_some();

        let body = if self.eat(Terminal::Semicolon).is_some() {
            None
        } else {
            Some(self.parse_compound()?)
        };

        Ok(self.node(
            NodeData::FuncDeclarator {
                flags,
                returns,
                name,
                params,
                is_const,
                body,
            },
            loc,
        ))
    }

    /// Parameter list without the parentheses. `void` and `...` mean nothing.
    fn parse_params(&mut self) -> PResult<'s, Option<NodeId>> {
        if self.check(Terminal::Void) && self.peek_nth(1) == Terminal::RParen {
            self.advance();
            return Ok(None);
        }

        let mut params = None;
        while !self.check(Terminal::RParen) {
            if self.eat(Terminal::Ellipsis).is_some() {
                break;
            }
            let param = self.parse_param()?;
            params = Some(self.join(params, param));
            if self.eat(Terminal::Comma).is_none() {
                break;
            }
        }
        Ok(params)
    }

    /// `{in|out|optional} Type name [= expr]`
    fn parse_param(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let mut flags = ParamFlags::empty();
        loop {
            flags |= match self.peek() {
                Terminal::In => ParamFlags::IN,
                Terminal::Out => ParamFlags::OUT,
                Terminal::Optional => ParamFlags::OPTIONAL,
                _ => break,
            };
            self.advance();
        }

        let ty = self.parse_type()?;
        let name = self.expect_identifier()?.as_name();
        let default = if self.eat(Terminal::Assign).is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(self.node(
            NodeData::FuncParamDecl {
                flags,
                ty,
                name,
                default,
            },
            loc,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{DeclFlags, NodeData, NodeKind, ParamFlags};
    use crate::parser::tests::{kinds, parse};
    use crate::state::ParseState;
    use bumpalo::Bump;
    use zscript_core::{Diagnostics, Name};

    #[test]
    fn class_with_parent_replacement_and_flags() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse(
            "class FastImp : Doom.Imp replaces DoomImp native abstract\n{\n}\n",
            &mut state,
            &mut diags,
        );
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let class = top.unwrap();
        let NodeData::Class {
            name,
            parent,
            replaces,
            flags,
            body,
        } = *ast[class].data()
        else {
            panic!("expected a class");
        };
        assert_eq!(name, Name::new("FastImp"));
        assert_eq!(ast.group_len(parent.unwrap()), 2);
        assert_eq!(ast.group_len(replaces.unwrap()), 1);
        assert_eq!(flags, DeclFlags::NATIVE | DeclFlags::ABSTRACT);
        assert_eq!(body, None);
        assert_eq!(ast[class].provenance().loc.line, 1);
    }

    #[test]
    fn class_members() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse(
            r#"
            class Imp : Actor
            {
                const Speed = 8;
                enum EState { Idle, Chase = 2 };
                int health, armor[2];
                readonly double fraction;
                virtual int, bool Damage(int amount, out Actor source = null) const;
                deprecated("2.4") void Think() { }
                static void Init(void) { }
            }
            "#,
            &mut state,
            &mut diags,
        );
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let NodeData::Class { body, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a class");
        };
        assert_eq!(
            kinds(ast, body),
            vec![
                NodeKind::ConstantDef,
                NodeKind::Enum,
                NodeKind::VarDeclarator,
                NodeKind::VarDeclarator,
                NodeKind::FuncDeclarator,
                NodeKind::FuncDeclarator,
                NodeKind::FuncDeclarator,
            ]
        );

        let members: Vec<_> = ast.list(body).collect();
        let NodeData::VarDeclarator { names, .. } = *ast[members[2]].data() else {
            panic!("expected a field");
        };
        assert_eq!(ast.group_len(names), 2);

        let NodeData::FuncDeclarator {
            flags,
            returns,
            params,
            is_const,
            body,
            ..
        } = *ast[members[4]].data()
        else {
            panic!("expected a method");
        };
        assert_eq!(flags, DeclFlags::VIRTUAL);
        assert_eq!(ast.group_len(returns.unwrap()), 2);
        assert!(is_const);
        assert!(body.is_none());
        let second_param = ast.list(params).nth(1).unwrap();
        let NodeData::FuncParamDecl { flags, default, .. } = *ast[second_param].data() else {
            panic!("expected a parameter");
        };
        assert_eq!(flags, ParamFlags::OUT);
        assert!(default.is_some());

        let NodeData::FuncDeclarator { flags, returns, .. } = *ast[members[5]].data() else {
            panic!("expected a method");
        };
        assert_eq!(flags, DeclFlags::DEPRECATED);
        assert!(returns.is_none());
    }

    #[test]
    fn member_errors_recover_at_next_member() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse(
            "class A\n{\n  int = 3;\n  void Ok() { }\n  bool;\n  int last;\n}\n",
            &mut state,
            &mut diags,
        );

        assert_eq!(diags.error_count(), 2);
        let lines: Vec<_> = diags.errors().map(|d| d.line).collect();
        assert_eq!(lines, vec![3, 5]);

        let ast = state.ast();
        let NodeData::Class { body, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a class");
        };
        assert_eq!(kinds(ast, body), vec![NodeKind::FuncDeclarator, NodeKind::VarDeclarator]);
    }

    #[test]
    fn structs_enums_and_extensions() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse(
            "struct Pair native { int a; int b; };\nenum Flags : uint8 { F1 = 1, F2 = 1 << 1, };\nextend class Pair { }\n",
            &mut state,
            &mut diags,
        );
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        assert_eq!(
            kinds(ast, top),
            vec![NodeKind::Struct, NodeKind::Enum, NodeKind::ExtendClass]
        );
        let en = ast.list(top).nth(1).unwrap();
        let NodeData::Enum {
            base_type,
            enumerators,
            ..
        } = *ast[en].data()
        else {
            panic!("expected an enum");
        };
        assert!(base_type.is_some());
        assert_eq!(ast.group_len(enumerators.unwrap()), 2);
    }

    #[test]
    fn top_level_garbage_is_one_error_per_declaration() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse("int x;\nconst Y = 1;", &mut state, &mut diags);

        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.errors().next().unwrap().message, "Unexpected 'int'");
        assert_eq!(kinds(state.ast(), top), vec![NodeKind::ConstantDef]);
    }
}
