//! Core types shared by every stage of the ZScript front end.
//!
//! This crate provides:
//! - [`SourceLoc`] and [`Provenance`] for source position tracking
//! - [`Name`], the canonical case-insensitive interned identifier
//! - [`Diagnostics`], the error/warning sink polled at pipeline checkpoints
//! - [`LexError`] for scanner failures

mod diagnostics;
mod error;
mod name;
mod span;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::LexError;
pub use name::Name;
pub use span::{LumpId, Provenance, SourceLoc};
