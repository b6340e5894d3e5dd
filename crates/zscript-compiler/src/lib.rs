//! ZScript compiler boundary.
//!
//! The session driver hands every finished translation unit to a
//! [`Compiler`]. A compiler reports problems only through the
//! [`Diagnostics`] sink; the driver polls the counts afterwards to decide
//! whether to continue.
//!
//! ## Modules
//!
//! - [`symbols`]: owned symbol tables that outlive a single manifest
//! - [`declarations`]: [`DeclarationCompiler`], the reference compiler that
//!   registers types and constants

pub mod declarations;
pub mod symbols;

pub use declarations::{CompileStats, DeclarationCompiler};
pub use symbols::{Symbol, SymbolKind, SymbolTable};

use zscript_core::Diagnostics;
use zscript_parser::{AstArena, NodeId};

/// Semantic analysis of one manifest's translation unit.
pub trait Compiler {
    /// Compile the declarations in `top`'s group.
    ///
    /// `parent` is an enclosing scope searched before `globals`; `local`
    /// receives the manifest's own values and `globals` the types that later
    /// manifests may refer to.
    fn compile(
        &mut self,
        ast: &AstArena<'_>,
        top: Option<NodeId>,
        parent: Option<&SymbolTable>,
        local: &mut SymbolTable,
        globals: &mut SymbolTable,
        diags: &mut Diagnostics,
    );
}

impl<C: Compiler + ?Sized> Compiler for &mut C {
    fn compile(
        &mut self,
        ast: &AstArena<'_>,
        top: Option<NodeId>,
        parent: Option<&SymbolTable>,
        local: &mut SymbolTable,
        globals: &mut SymbolTable,
        diags: &mut Diagnostics,
    ) {
        (**self).compile(ast, top, parent, local, globals, diags);
    }
}
