//! Error types for sessions and archives.
//!
//! Recoverable problems (syntax errors, missing scripts, semantic errors) go
//! to the [`Diagnostics`](zscript_core::Diagnostics) sink. The types here
//! cover only the outcomes that end a session.

use std::path::PathBuf;

use thiserror::Error;

/// A session that could not run to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A non-core archive replaces a script listed by a core manifest.
    #[error("File {archive} is overriding core lump {lump}.")]
    CoreLumpOverridden { archive: String, lump: String },

    /// The manifest had syntax errors; it was not compiled.
    #[error("{errors} errors while parsing {manifest}")]
    ParseFailed { errors: usize, manifest: String },

    /// The compiler reported errors.
    #[error("{errors} errors, {warnings} warnings while compiling {manifest}")]
    CompileFailed {
        errors: usize,
        warnings: usize,
        manifest: String,
    },
}

/// Errors while loading an archive from disk.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("{} is not valid UTF-8", path.display())]
    InvalidUtf8 { path: PathBuf },
}
