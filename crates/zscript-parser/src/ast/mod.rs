//! Abstract syntax tree for ZScript.
//!
//! All nodes of one parse session live in an [`AstArena`] and refer to each
//! other by [`NodeId`]. Ordered groups of nodes (parameter lists, statement
//! sequences, class bodies) are circular sibling rings threaded through the
//! nodes themselves: a fresh node is a ring of one, and joining two groups
//! relinks indices without allocating.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use zscript_core::Name;
//! use zscript_parser::ast::{AstArena, NodeData};
//!
//! let bump = Bump::new();
//! let mut ast = AstArena::new(&bump);
//!
//! let a = ast.init_node(NodeData::Identifier { name: Name::new("Actor") }, None);
//! let b = ast.init_node(NodeData::Identifier { name: Name::new("Inventory") }, None);
//! ast.append_sibling(a, b);
//!
//! assert_eq!(ast.group_len(a), 2);
//! assert_eq!(ast.next(b), a);
//! ```

pub mod dump;
pub mod node;
pub mod ops;

use std::fmt;
use std::ops::Index;

use bumpalo::Bump;
use zscript_core::Provenance;

pub use node::*;
pub use ops::*;

/// Index of a node in its [`AstArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// The common header every node carries, plus its payload.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'s> {
    kind: NodeKind,
    next: NodeId,
    prev: NodeId,
    provenance: Provenance<'s>,
    data: NodeData<'s>,
}

impl<'s> TreeNode<'s> {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub fn data(&self) -> &NodeData<'s> {
        &self.data
    }

    /// Where this node came from. Fixed at creation.
    #[inline]
    pub fn provenance(&self) -> Provenance<'s> {
        self.provenance
    }

    #[inline]
    pub fn next(&self) -> NodeId {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> NodeId {
        self.prev
    }
}

/// Session-lifetime storage for tree nodes.
///
/// Nodes are never freed individually; the whole arena goes away with the
/// bump allocator it was created in.
pub struct AstArena<'s> {
    nodes: bumpalo::collections::Vec<'s, TreeNode<'s>>,
}

impl<'s> AstArena<'s> {
    pub fn new(bump: &'s Bump) -> Self {
        Self {
            nodes: bumpalo::collections::Vec::with_capacity_in(256, bump),
        }
    }

    /// Number of nodes created so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node as a singleton group.
    ///
    /// Provenance is copied from `basis` when one is given. Without a basis
    /// the node has no provenance; nodes built from live input go through
    /// [`ParseState::init_node`](crate::ParseState::init_node) instead.
    pub fn init_node(&mut self, data: NodeData<'s>, basis: Option<NodeId>) -> NodeId {
        let provenance = basis
            .map(|basis| self[basis].provenance)
            .unwrap_or_default();
        self.alloc(data, provenance)
    }

    /// Create a node as a singleton group with explicit provenance.
    pub fn alloc(&mut self, data: NodeData<'s>, provenance: Provenance<'s>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode {
            kind: data.kind(),
            next: id,
            prev: id,
            provenance,
            data,
        });
        id
    }

    /// Splice the group containing `sibling` onto the end of the group
    /// containing `head`.
    ///
    /// The two nodes must belong to different groups.
    pub fn append_sibling(&mut self, head: NodeId, sibling: NodeId) {
        debug_assert!(
            self.siblings(head).all(|id| id != sibling),
            "{sibling:?} is already in the group of {head:?}"
        );
        let tail = self.nodes[head.index()].prev;
        let sibling_tail = self.nodes[sibling.index()].prev;

        self.nodes[tail.index()].next = sibling;
        self.nodes[sibling.index()].prev = tail;
        self.nodes[sibling_tail.index()].next = head;
        self.nodes[head.index()].prev = sibling_tail;
    }

    /// Append `node` to an optional list, returning the list head.
    pub fn join(&mut self, list: Option<NodeId>, node: NodeId) -> NodeId {
        match list {
            Some(head) => {
                self.append_sibling(head, node);
                head
            }
            None => node,
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<'s>> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> NodeId {
        self[id].next
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> NodeId {
        self[id].prev
    }

    /// Iterate a group in order, starting at `head`.
    pub fn siblings(&self, head: NodeId) -> Siblings<'_, 's> {
        Siblings {
            arena: self,
            head,
            current: Some(head),
        }
    }

    /// Iterate an optional group; empty when `head` is `None`.
    pub fn list(&self, head: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        head.into_iter().flat_map(|head| self.siblings(head))
    }

    /// Number of nodes in the group containing `id`.
    pub fn group_len(&self, id: NodeId) -> usize {
        self.siblings(id).count()
    }
}

impl<'s> Index<NodeId> for AstArena<'s> {
    type Output = TreeNode<'s>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for AstArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstArena")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Iterator over one sibling ring.
pub struct Siblings<'a, 's> {
    arena: &'a AstArena<'s>,
    head: NodeId,
    current: Option<NodeId>,
}

impl Iterator for Siblings<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.current?;
        let next = self.arena.next(current);
        self.current = (next != self.head).then_some(next);
        Some(current)
    }
}
