//! Single-file and session drivers.
//!
//! [`parse_file`] feeds one script through a push parser. [`Session`] runs
//! every `ZSCRIPT` manifest found in an [`ArchiveSet`]: it parses the scripts
//! a manifest lists into one tree, checks the diagnostics counts, optionally
//! dumps the tree, and hands it to the compiler.

use std::fs;
use std::path::{Path, PathBuf};

use bumpalo::Bump;
use zscript_compiler::{Compiler, SymbolTable};
use zscript_core::{Diagnostics, LumpId, SourceLoc};
use zscript_parser::{
    Cursor, Lexer, ParseState, PushParser, ScriptParser, Terminal, TokenKind, TokenMap,
    TokenValue, print_ast,
};

use crate::archive::ArchiveSet;
use crate::error::SessionError;

/// Root-level lumps with this stem are manifests.
pub const MANIFEST_NAME: &str = "ZSCRIPT";

/// Name of the per-manifest symbol table handed to the compiler.
pub const LOCAL_TABLE_NAME: &str = "Global_Node";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Write each manifest's tree to `<dump_dir>/<manifest base name>.ast`.
    pub dump_ast: bool,
    pub dump_dir: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dump_ast: false,
            dump_dir: PathBuf::from("."),
        }
    }
}

// ============================================================================
// Single-file driver
// ============================================================================

/// One script named by a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    /// Where the name appears in the manifest.
    pub loc: SourceLoc,
}

/// Split a manifest into script names.
///
/// Names are separated by whitespace and may be double-quoted. `//` and
/// `/* */` comments are skipped; an unclosed block comment ends the list.
pub fn manifest_entries(text: &str) -> Vec<ManifestEntry> {
    let mut cursor = Cursor::new(text);
    let mut entries = Vec::new();
    while cursor.skip_trivia().is_ok() {
        let Some(first) = cursor.peek() else {
            break;
        };
        let here = cursor.here();
        let start = cursor.offset();
        let name = if first == '"' {
            cursor.advance();
            let name = cursor.eat_while(|c| c != '"' && c != '\n');
            cursor.advance();
            name
        } else {
            cursor.eat_while(|c| !c.is_whitespace())
        };
        if !name.is_empty() {
            entries.push(ManifestEntry {
                name: name.to_owned(),
                loc: SourceLoc::new(here.line, here.col, cursor.offset() - start),
            });
        }
    }
    entries
}

/// Feed the script `entry` names through `parser`.
///
/// A script that cannot be found is reported as a warning against the
/// manifest and contributes nothing; the parser is not stepped at all. A
/// token the grammar has no terminal for is an error and ends the script
/// early. Otherwise the script is always closed with [`Terminal::Eof`].
///
/// Returns whether the script was found.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_file<'s, P: PushParser<'s>>(
    archives: &ArchiveSet,
    entry: &ManifestEntry,
    manifest: &str,
    parser: &mut P,
    state: &mut ParseState<'s>,
    diags: &mut Diagnostics,
) -> bool {
    let Some(lump) = archives.check_num_for_full_name(&entry.name) else {
        diags.warning(
            Some(manifest),
            entry.loc,
            format!("Could not find script lump '{}'", entry.name),
        );
        return false;
    };

    tracing::debug!(script = %archives.lump_full_path(lump), "parsing");
    state.begin_file(archives.lump_full_name(lump), Some(lump));
    let token_map = TokenMap::get();
    let mut lexer = Lexer::new(archives.lump_text(lump));

    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Eof {
            break;
        }
        match token_map.translate(&token, state) {
            Some((terminal, value)) => {
                state.set_position(value.loc);
                parser.step(terminal, value, state, diags);
            }
            None => {
                let mut message = format!("Unexpected token {}.", token.kind.description());
                if token.kind == TokenKind::Error {
                    if let Some(error) = lexer.last_error() {
                        message = format!("{message} {error}");
                    }
                }
                diags.error(state.section(), token.loc, message);
                break;
            }
        }
    }

    parser.step(Terminal::Eof, TokenValue::end(lexer.here()), state, diags);
    state.end_file();
    true
}

// ============================================================================
// Session driver
// ============================================================================

/// What one manifest produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    /// `archive:lump` of the manifest.
    pub manifest: String,
    /// Scripts listed by the manifest.
    pub entries: usize,
    /// Scripts that were found and parsed.
    pub parsed: usize,
    /// Top-level declarations in the finished tree.
    pub declarations: usize,
    /// Nodes allocated for the tree.
    pub nodes: usize,
    /// Where the tree was dumped, if it was.
    pub dump: Option<PathBuf>,
}

/// Parses and compiles every manifest in a set of archives.
pub struct Session<'a, C> {
    archives: &'a ArchiveSet,
    compiler: C,
    options: SessionOptions,
    globals: SymbolTable,
    diags: Diagnostics,
}

impl<'a, C: Compiler> Session<'a, C> {
    pub fn new(archives: &'a ArchiveSet, compiler: C, options: SessionOptions) -> Self {
        Self {
            archives,
            compiler,
            options,
            globals: SymbolTable::new("Globals"),
            diags: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diags
    }

    /// Types registered by every manifest compiled so far.
    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Run every manifest in load order.
    ///
    /// The diagnostics counts are reset once here, so they accumulate across
    /// manifests. The first failing manifest ends the session.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_scripts(&mut self) -> Result<Vec<ManifestReport>, SessionError> {
        self.diags.reset();
        let manifests = self.archives.find_lumps(MANIFEST_NAME);
        tracing::info!(manifests = manifests.len(), "parsing scripts");

        let mut reports = Vec::with_capacity(manifests.len());
        for manifest in manifests {
            reports.push(self.parse_manifest(manifest)?);
        }
        Ok(reports)
    }

    /// Parse, dump and compile one manifest.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_manifest(&mut self, manifest: LumpId) -> Result<ManifestReport, SessionError> {
        let archives = self.archives;
        let manifest_name = archives.lump_full_name(manifest);
        let manifest_path = archives.lump_full_path(manifest);
        let from_core = archives.lump_archive(manifest) == Some(0);
        let entries = manifest_entries(archives.lump_text(manifest));

        let bump = Bump::new();
        let mut state = ParseState::new(&bump);
        let mut parser = ScriptParser::new();
        let mut parsed = 0;
        let mut end = SourceLoc::point(1, 1);

        for entry in &entries {
            if from_core {
                check_core_override(archives, &entry.name)?;
            }
            if parse_file(archives, entry, manifest_name, &mut parser, &mut state, &mut self.diags) {
                parsed += 1;
            }
            end = entry.loc;
        }
        parser.step(Terminal::EndOfInput, TokenValue::end(end), &mut state, &mut self.diags);
        let declarations = parser.declarations();
        drop(parser);

        if self.diags.has_errors() {
            return Err(SessionError::ParseFailed {
                errors: self.diags.error_count(),
                manifest: manifest_path,
            });
        }

        let top = state.top_node();
        let dump = if self.options.dump_ast {
            self.dump_ast(manifest_name, &print_ast(state.ast(), top))
        } else {
            None
        };

        let mut local = SymbolTable::new(LOCAL_TABLE_NAME);
        self.compiler.compile(
            state.ast(),
            top,
            None,
            &mut local,
            &mut self.globals,
            &mut self.diags,
        );

        let errors = self.diags.error_count();
        let warnings = self.diags.warning_count();
        if errors > 0 {
            return Err(SessionError::CompileFailed {
                errors,
                warnings,
                manifest: manifest_path,
            });
        }
        if warnings > 0 {
            tracing::warn!("{warnings} warnings while compiling {manifest_path}");
        }

        let report = ManifestReport {
            manifest: manifest_path,
            entries: entries.len(),
            parsed,
            declarations,
            nodes: state.ast().len(),
            dump,
        };
        tracing::info!(
            manifest = %report.manifest,
            scripts = report.parsed,
            declarations = report.declarations,
            nodes = report.nodes,
            "compiled manifest"
        );
        Ok(report)
    }

    /// Write a tree dump; failure is only a warning.
    fn dump_ast(&mut self, manifest_name: &str, text: &str) -> Option<PathBuf> {
        let path = self.options.dump_dir.join(format!("{}.ast", file_base(manifest_name)));
        match fs::write(&path, text) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "wrote syntax tree");
                Some(path)
            }
            Err(error) => {
                self.diags.warning(
                    None,
                    SourceLoc::default(),
                    format!("Could not write {}: {error}", path.display()),
                );
                None
            }
        }
    }
}

/// Fail if `name` currently resolves to a lump outside the core archive.
fn check_core_override(archives: &ArchiveSet, name: &str) -> Result<(), SessionError> {
    let Some(lump) = archives.check_num_for_full_name(name) else {
        return Ok(());
    };
    match archives.lump_archive(lump) {
        Some(archive) if archive != 0 => Err(SessionError::CoreLumpOverridden {
            archive: archives.archive_name(archive).to_owned(),
            lump: name.to_owned(),
        }),
        _ => Ok(()),
    }
}

/// File name without directories or extension.
fn file_base(full_name: &str) -> &str {
    let file = Path::new(full_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(full_name);
    if file.is_empty() { full_name } else { file }
}
