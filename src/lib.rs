//! ZScript front end.
//!
//! Reads the `ZSCRIPT` manifests found in a set of archives, parses the
//! scripts each one lists into a single syntax tree, and hands that tree to
//! a [`Compiler`]. The pieces live in their own crates:
//!
//! - `zscript-core`: names, source locations and the diagnostics sink
//! - `zscript-parser`: scanner, token map, push parser and tree
//! - `zscript-compiler`: the compiler boundary and symbol tables
//!
//! This crate adds the archive model and the drivers.
//!
//! ```
//! use zscript::{Archive, ArchiveSet, DeclarationCompiler, Session, SessionOptions};
//!
//! let archives = ArchiveSet::new().with(
//!     Archive::new("core")
//!         .with_lump("zscript.txt", "zscript/base.zs")
//!         .with_lump("zscript/base.zs", "class Base { int health; }"),
//! );
//! let mut session = Session::new(&archives, DeclarationCompiler::new(), SessionOptions::default());
//! let reports = session.parse_scripts().unwrap();
//! assert_eq!(reports[0].declarations, 1);
//! assert!(session.globals().contains(zscript::Name::new("Base")));
//! ```

pub mod archive;
pub mod driver;
pub mod error;

pub use archive::{Archive, ArchiveSet};
pub use driver::{
    LOCAL_TABLE_NAME, MANIFEST_NAME, ManifestEntry, ManifestReport, Session, SessionOptions,
    manifest_entries, parse_file,
};
pub use error::{ArchiveError, SessionError};

pub use zscript_compiler::{Compiler, DeclarationCompiler, SymbolTable};
pub use zscript_core::{Diagnostic, DiagnosticKind, Diagnostics, LumpId, Name, SourceLoc};
pub use zscript_parser::{ParseState, PushParser, ScriptParser, print_ast};
