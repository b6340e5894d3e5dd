//! Symbol tables shared between manifests.
//!
//! Unlike the syntax tree, symbol tables outlive a single manifest: the
//! global table carries every type declared so far into the next manifest's
//! compile. Symbols therefore own their data instead of pointing into the
//! tree.

use rustc_hash::FxHashMap;
use zscript_core::{Name, Provenance};

// ============================================================================
// Symbols
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Class {
        /// Last component of the parent name, if any.
        parent: Option<Name>,
        /// The class this one replaces, if any.
        replaces: Option<Name>,
    },
    Struct,
    Enum,
    /// An enum value; `None` when it could not be evaluated.
    Enumerator { value: Option<i64> },
    /// A named constant; `value` is set for integer constants only.
    Constant { value: Option<i64> },
}

impl SymbolKind {
    /// Whether the symbol names a type.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class { .. } | SymbolKind::Struct | SymbolKind::Enum
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Class { .. } => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Enumerator { .. } => "enumerator",
            SymbolKind::Constant { .. } => "constant",
        }
    }
}

/// A declared symbol and where it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    /// Script the declaration came from; empty for synthesized declarations.
    pub source_name: String,
    pub line: u32,
}

impl Symbol {
    pub fn new(name: Name, kind: SymbolKind, provenance: Provenance<'_>) -> Self {
        Self {
            name,
            kind,
            source_name: provenance.source_name.to_owned(),
            line: provenance.loc.line,
        }
    }
}

// ============================================================================
// SymbolTable
// ============================================================================

/// A named scope of symbols keyed by canonical name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    name: String,
    symbols: FxHashMap<Name, Symbol>,
    /// Insertion order, for deterministic iteration.
    order: Vec<Name>,
}

impl SymbolTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn find(&self, name: Name) -> Option<&Symbol> {
        self.symbols.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.symbols.contains_key(&name)
    }

    /// Add `symbol`, refusing to replace an existing one.
    ///
    /// On a clash the table is unchanged and the existing symbol is returned.
    pub fn add(&mut self, symbol: Symbol) -> Result<(), &Symbol> {
        use std::collections::hash_map::Entry;

        match self.symbols.entry(symbol.name) {
            Entry::Occupied(existing) => Err(&*existing.into_mut()),
            Entry::Vacant(slot) => {
                self.order.push(symbol.name);
                slot.insert(symbol);
                Ok(())
            }
        }
    }

    /// Symbols in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }
}

/// Look `name` up in each table in turn.
pub fn lookup<'t>(tables: &[Option<&'t SymbolTable>], name: Name) -> Option<&'t Symbol> {
    tables
        .iter()
        .flatten()
        .find_map(|table| table.find(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zscript_core::SourceLoc;

    fn symbol(name: &str, kind: SymbolKind) -> Symbol {
        let provenance = Provenance::new("a.zs", None, SourceLoc::point(3, 1));
        Symbol::new(Name::new(name), kind, provenance)
    }

    #[test]
    fn add_refuses_duplicates() {
        let mut table = SymbolTable::new("Global_Node");
        assert!(table.add(symbol("Imp", SymbolKind::Struct)).is_ok());

        let existing = table.add(symbol("IMP", SymbolKind::Enum)).unwrap_err();
        assert_eq!(existing.kind, SymbolKind::Struct);
        assert_eq!(existing.line, 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut table = SymbolTable::new("t");
        for name in ["Zed", "Alpha", "Mid"] {
            table.add(symbol(name, SymbolKind::Constant { value: None })).unwrap();
        }
        let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Alpha", "Mid"]);
    }

    #[test]
    fn lookup_searches_tables_in_order() {
        let mut first = SymbolTable::new("first");
        let mut second = SymbolTable::new("second");
        first.add(symbol("Shared", SymbolKind::Struct)).unwrap();
        second.add(symbol("Shared", SymbolKind::Enum)).unwrap();
        second.add(symbol("OnlySecond", SymbolKind::Enum)).unwrap();

        let tables = [None, Some(&first), Some(&second)];
        assert_eq!(lookup(&tables, Name::new("shared")).unwrap().kind, SymbolKind::Struct);
        assert!(lookup(&tables, Name::new("OnlySecond")).is_some());
        assert!(lookup(&tables, Name::new("Missing")).is_none());
    }
}
