//! Per-manifest parse state.
//!
//! A [`ParseState`] is created for each manifest and shared by every script
//! in it. It owns the tree, interns strings that token values and node
//! provenance refer to, and remembers which script is currently being
//! scanned so that new nodes can be stamped with where they came from.

use bumpalo::Bump;
use rustc_hash::FxHashSet;
use zscript_core::{LumpId, Provenance, SourceLoc};

use crate::ast::{AstArena, NodeData, NodeId};

/// The script currently being fed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveScanner<'s> {
    pub source_name: &'s str,
    pub source_lump: Option<LumpId>,
    /// Position of the token most recently handed out.
    pub loc: SourceLoc,
}

pub struct ParseState<'s> {
    bump: &'s Bump,
    strings: FxHashSet<&'s str>,
    ast: AstArena<'s>,
    scanner: Option<ActiveScanner<'s>>,
    top_node: Option<NodeId>,
}

impl<'s> ParseState<'s> {
    pub fn new(bump: &'s Bump) -> Self {
        Self {
            bump,
            strings: FxHashSet::default(),
            ast: AstArena::new(bump),
            scanner: None,
            top_node: None,
        }
    }

    /// Copy `text` into the session string arena, reusing an earlier copy.
    pub fn intern_str(&mut self, text: &str) -> &'s str {
        if let Some(&interned) = self.strings.get(text) {
            return interned;
        }
        let interned: &'s str = self.bump.alloc_str(text);
        self.strings.insert(interned);
        interned
    }

    // =========================================
    // Active scanner
    // =========================================

    /// Mark `source_name` as the script being scanned.
    pub fn begin_file(&mut self, source_name: &str, source_lump: Option<LumpId>) {
        let source_name = self.intern_str(source_name);
        self.scanner = Some(ActiveScanner {
            source_name,
            source_lump,
            loc: SourceLoc::point(1, 1),
        });
    }

    /// Record the position of the token about to be fed to the parser.
    pub fn set_position(&mut self, loc: SourceLoc) {
        if let Some(scanner) = self.scanner.as_mut() {
            scanner.loc = loc;
        }
    }

    /// Clear the active scanner once a script has been fully fed.
    pub fn end_file(&mut self) {
        self.scanner = None;
    }

    pub fn scanner(&self) -> Option<&ActiveScanner<'s>> {
        self.scanner.as_ref()
    }

    /// Name of the script being scanned, for diagnostics.
    pub fn section(&self) -> Option<&'s str> {
        self.scanner.map(|scanner| scanner.source_name)
    }

    // =========================================
    // Node factory
    // =========================================

    /// Create a node stamped with the active scanner's current position.
    pub fn init_node(&mut self, data: NodeData<'s>) -> NodeId {
        let loc = self.scanner.map(|scanner| scanner.loc).unwrap_or_default();
        self.init_node_at(data, loc)
    }

    /// Create a node stamped with the active script and the given position,
    /// usually that of the token the node was built from.
    pub fn init_node_at(&mut self, data: NodeData<'s>, loc: SourceLoc) -> NodeId {
        let provenance = match self.scanner {
            Some(scanner) => Provenance::new(scanner.source_name, scanner.source_lump, loc),
            None => Provenance {
                loc,
                ..Provenance::default()
            },
        };
        self.ast.alloc(data, provenance)
    }

    /// Create a node derived from `basis`, copying its provenance.
    pub fn init_node_from(&mut self, data: NodeData<'s>, basis: NodeId) -> NodeId {
        self.ast.init_node(data, Some(basis))
    }

    pub fn ast(&self) -> &AstArena<'s> {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut AstArena<'s> {
        &mut self.ast
    }

    /// Root of the translation unit, once a script has been finished.
    pub fn top_node(&self) -> Option<NodeId> {
        self.top_node
    }

    pub fn set_top_node(&mut self, top: Option<NodeId>) {
        self.top_node = top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zscript_core::Name;

    #[test]
    fn interning_reuses_storage() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let a = state.intern_str("zscript/actor.zs");
        let b = state.intern_str("zscript/actor.zs");
        assert!(std::ptr::eq(a, b));
        let c = state.intern_str("zscript/Actor.zs");
        assert!(!std::ptr::eq(a, c));
    }

    #[test]
    fn nodes_take_the_active_scanner_position() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        state.begin_file("zscript/actor.zs", Some(LumpId(2)));
        state.set_position(SourceLoc::new(14, 3, 5));

        let id = state.init_node(NodeData::ExprSuper);
        let prov = state.ast()[id].provenance();
        assert_eq!(prov.source_name, "zscript/actor.zs");
        assert_eq!(prov.source_lump, Some(LumpId(2)));
        assert_eq!(prov.loc, SourceLoc::new(14, 3, 5));
    }

    #[test]
    fn derived_nodes_copy_their_basis() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        state.begin_file("a.zs", None);
        let basis = state.init_node_at(NodeData::ExprId { name: Name::new("x") }, SourceLoc::point(4, 9));
        state.end_file();
        state.begin_file("b.zs", None);

        let derived = state.init_node_from(NodeData::ExprSuper, basis);
        assert_eq!(state.ast()[derived].provenance(), state.ast()[basis].provenance());
        assert_eq!(state.ast()[derived].provenance().source_name, "a.zs");
    }

    #[test]
    fn no_scanner_means_no_source() {
        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        assert!(state.scanner().is_none());
        let id = state.init_node(NodeData::ExprSuper);
        assert_eq!(state.ast()[id].provenance().source_name, "");
        assert_eq!(state.section(), None);
    }
}
