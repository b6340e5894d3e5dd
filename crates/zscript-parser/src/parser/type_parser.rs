use zscript_core::Name;

use super::grammar::{PResult, Parser};
use crate::ast::{NodeData, NodeId};
use crate::terminal::Terminal;

impl<'p, 's> Parser<'p, 's> {
    /// Parse a type:
    /// - a built-in scalar type such as `int` or `vector3`
    /// - `array<T>`, `map<K, V>` or `class[<Restriction>]`
    /// - a dotted user type name
    ///
    /// followed by an optional `[size]`.
    pub(super) fn parse_type(&mut self) -> PResult<'s, NodeId> {
        let loc = self.loc();
        let data = match self.peek() {
            Terminal::Array => {
                self.advance();
                self.expect(Terminal::Lt)?;
                let element = self.nested(Self::parse_type)?;
                self.expect_closing_angle()?;
                NodeData::DynArrayType {
                    element,
                    array_size: None,
                }
            }
            Terminal::Map => {
                self.advance();
                self.expect(Terminal::Lt)?;
                let key = self.nested(Self::parse_type)?;
                self.expect(Terminal::Comma)?;
                let value = self.nested(Self::parse_type)?;
                self.expect_closing_angle()?;
                NodeData::MapType {
                    key,
                    value,
                    array_size: None,
                }
            }
            Terminal::Class => {
                self.advance();
                let restriction = if self.eat(Terminal::Lt).is_some() {
                    let restriction = self.parse_dotted_name()?;
                    self.expect_closing_angle()?;
                    Some(restriction)
                } else {
                    None
                };
                NodeData::ClassType {
                    restriction,
                    array_size: None,
                }
            }
            Terminal::Identifier => NodeData::BasicType {
                name: Name::NONE,
                user_type: Some(self.parse_dotted_name()?),
                array_size: None,
            },
            terminal if is_builtin_type(terminal) => NodeData::BasicType {
                name: self.advance().as_name(),
                user_type: None,
                array_size: None,
            },
            _ => return Err(self.unexpected()),
        };

        let size = self.parse_array_size()?;
        let data = match (data, size) {
            (data, None) => data,
            (NodeData::BasicType { name, user_type, .. }, size) => NodeData::BasicType {
                name,
                user_type,
                array_size: size,
            },
            (NodeData::MapType { key, value, .. }, size) => NodeData::MapType {
                key,
                value,
                array_size: size,
            },
            (NodeData::DynArrayType { element, .. }, size) => NodeData::DynArrayType {
                element,
                array_size: size,
            },
            (NodeData::ClassType { restriction, .. }, size) => NodeData::ClassType {
                restriction,
                array_size: size,
            },
            (data, _) => data,
        };
        Ok(self.node(data, loc))
    }

    /// An optional `[expr]` suffix.
    pub(super) fn parse_array_size(&mut self) -> PResult<'s, Option<NodeId>> {
        if self.eat(Terminal::LBracket).is_none() {
            return Ok(None);
        }
        let size = self.parse_expr()?;
        self.expect(Terminal::RBracket)?;
        Ok(Some(size))
    }

    /// Whether a type starts at `n` tokens ahead, and if so how many tokens
    /// it spans. Only simple shapes are recognised; it is used to tell local
    /// variable declarations from expression statements.
    pub(super) fn type_len_at(&self, n: usize) -> Option<usize> {
        let mut len = match self.peek_nth(n) {
            Terminal::Identifier => {
                let mut len = 1;
                while self.peek_nth(n + len) == Terminal::Dot
                    && self.peek_nth(n + len + 1) == Terminal::Identifier
                {
                    len += 2;
                }
                len
            }
            Terminal::Array | Terminal::Map | Terminal::Class => {
                if self.peek_nth(n + 1) != Terminal::Lt {
                    // A bare `class` is a type; bare `array`/`map` are not.
                    return (self.peek_nth(n) == Terminal::Class).then_some(1);
                }
                // Skip to the matching `>`, counting `>>` as two.
                let mut depth = 0i32;
                let mut len = 1;
                loop {
                    match self.peek_nth(n + len) {
                        Terminal::Lt => depth += 1,
                        Terminal::Gt => depth -= 1,
                        Terminal::RShift => depth -= 2,
                        Terminal::Eof | Terminal::Semicolon | Terminal::LBrace | Terminal::RBrace => {
                            return None;
                        }
                        _ => {}
                    }
                    len += 1;
                    if depth <= 0 {
                        break;
                    }
                }
                len
            }
            terminal if is_builtin_type(terminal) => 1,
            _ => return None,
        };

        if self.peek_nth(n + len) == Terminal::LBracket {
            let mut depth = 0u32;
            loop {
                match self.peek_nth(n + len) {
                    Terminal::LBracket => depth += 1,
                    Terminal::RBracket => depth -= 1,
                    Terminal::Eof | Terminal::Semicolon => return None,
                    _ => {}
                }
                len += 1;
                if depth == 0 {
                    break;
                }
            }
        }
        Some(len)
    }
}

/// Scalar types that carry their own name.
pub(super) fn is_builtin_type(terminal: Terminal) -> bool {
    matches!(
        terminal,
        Terminal::SByte
            | Terminal::Byte
            | Terminal::Short
            | Terminal::UShort
            | Terminal::Int
            | Terminal::UInt
            | Terminal::Bool
            | Terminal::Float
            | Terminal::Double
            | Terminal::String
            | Terminal::Vector2
            | Terminal::Vector3
            | Terminal::Name
            | Terminal::Color
            | Terminal::Sound
    )
}

#[cfg(test)]
mod tests {
    use crate::ast::{NodeData, NodeKind};
    use crate::parser::tests::parse;
    use crate::state::ParseState;
    use bumpalo::Bump;
    use zscript_core::{Diagnostics, Name};

    /// Parse `struct S { <field> }` and return the field's type node data.
    fn field_type(field: &str) -> (Vec<NodeKind>, String) {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let source = format!("struct S {{ {field} }}");
        let top = parse(&source, &mut state, &mut diags);
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let NodeData::Struct { body, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a struct");
        };
        let NodeData::VarDeclarator { ty, .. } = *ast[body.unwrap()].data() else {
            panic!("expected a field");
        };
        let dump = crate::ast::dump::print_ast(ast, Some(ty));
        (vec![ast[ty].kind()], dump)
    }

    #[test]
    fn builtin_types_carry_their_name() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut diags = Diagnostics::new();
        let top = parse("struct S { vector3 pos; uint8 b; }", &mut state, &mut diags);
        assert!(diags.is_empty(), "{diags}");

        let ast = state.ast();
        let NodeData::Struct { body, .. } = *ast[top.unwrap()].data() else {
            panic!("expected a struct");
        };
        let names: Vec<_> = ast
            .list(body)
            .map(|field| match *ast[field].data() {
                NodeData::VarDeclarator { ty, .. } => match *ast[ty].data() {
                    NodeData::BasicType { name, .. } => name,
                    _ => Name::NONE,
                },
                _ => Name::NONE,
            })
            .collect();
        assert_eq!(names, vec![Name::VECTOR3, Name::BYTE]);
    }

    #[test]
    fn nested_generics_split_shift() {
        let (kinds, _) = field_type("array<array<int>> grid;");
        assert_eq!(kinds, vec![NodeKind::DynArrayType]);

        let (kinds, _) = field_type("map<name, class<Actor>> lookup;");
        assert_eq!(kinds, vec![NodeKind::MapType]);
    }

    #[test]
    fn user_types_and_array_sizes() {
        let (kinds, dump) = field_type("Doom.Imp[4] imps;");
        assert_eq!(kinds, vec![NodeKind::BasicType]);
        assert!(dump.contains("Doom"), "{dump}");
        assert!(dump.contains("Imp"), "{dump}");
        assert!(dump.contains(":size"), "{dump}");
    }

    #[test]
    fn bare_class_type() {
        let (kinds, _) = field_type("class cls;");
        assert_eq!(kinds, vec![NodeKind::ClassType]);
    }
}
