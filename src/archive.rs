//! Loaded script archives and lump lookup.
//!
//! An [`ArchiveSet`] holds archives in load order; archive 0 is the core
//! archive. Every lump gets a [`LumpId`] that is stable for the life of the
//! set. Full names are matched case-insensitively and a later archive's lump
//! hides an earlier one with the same full name.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use zscript_core::LumpId;

use crate::error::ArchiveError;

#[derive(Debug, Clone)]
struct Lump {
    full_name: String,
    text: String,
}

/// One archive: a named collection of text lumps.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    name: String,
    lumps: Vec<Lump>,
}

impl Archive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lumps: Vec::new(),
        }
    }

    /// Add a lump, builder style.
    pub fn with_lump(mut self, full_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.add_lump(full_name, text);
        self
    }

    pub fn add_lump(&mut self, full_name: impl Into<String>, text: impl Into<String>) {
        self.lumps.push(Lump {
            full_name: full_name.into(),
            text: text.into(),
        });
    }

    /// Load every file below `dir` as a lump named by its relative path.
    ///
    /// Paths use `/` separators and files are added in sorted order.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ArchiveError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        collect_files(dir, &mut files)?;
        files.sort();

        let mut archive = Archive::new(dir.display().to_string());
        for path in files {
            let bytes = fs::read(&path).map_err(|source| ArchiveError::Io {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8(bytes)
                .map_err(|_| ArchiveError::InvalidUtf8 { path: path.clone() })?;
            let relative = path.strip_prefix(dir).unwrap_or(&path);
            let full_name = relative
                .components()
                .map(|part| part.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            archive.add_lump(full_name, text);
        }
        tracing::debug!(archive = %archive.name, lumps = archive.lumps.len(), "loaded archive");
        Ok(archive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ArchiveError> {
    let io_error = |source| ArchiveError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

// ============================================================================
// ArchiveSet
// ============================================================================

/// Archives in load order, with a global lump directory.
#[derive(Debug, Default)]
pub struct ArchiveSet {
    archives: Vec<Archive>,
    /// (archive, index within archive) for each lump id.
    lumps: Vec<(usize, usize)>,
    /// Lowercased full name to the most recently loaded lump.
    by_name: FxHashMap<String, LumpId>,
}

impl ArchiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an archive, returning its load index.
    pub fn add(&mut self, archive: Archive) -> usize {
        let index = self.archives.len();
        for (slot, lump) in archive.lumps.iter().enumerate() {
            let id = LumpId(self.lumps.len() as u32);
            self.lumps.push((index, slot));
            self.by_name.insert(lump.full_name.to_ascii_lowercase(), id);
        }
        self.archives.push(archive);
        index
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, archive: Archive) -> Self {
        self.add(archive);
        self
    }

    pub fn archive_count(&self) -> usize {
        self.archives.len()
    }

    pub fn lump_count(&self) -> usize {
        self.lumps.len()
    }

    pub fn archive_name(&self, index: usize) -> &str {
        self.archives.get(index).map_or("", |archive| archive.name())
    }

    fn lump(&self, id: LumpId) -> Option<&Lump> {
        let &(archive, slot) = self.lumps.get(id.index())?;
        self.archives.get(archive)?.lumps.get(slot)
    }

    /// The lump currently visible under `full_name`, if any.
    pub fn check_num_for_full_name(&self, full_name: &str) -> Option<LumpId> {
        self.by_name.get(&full_name.to_ascii_lowercase()).copied()
    }

    /// Every root-level lump whose name without extension is `stem`, in
    /// load order. Hidden lumps are included.
    pub fn find_lumps(&self, stem: &str) -> Vec<LumpId> {
        (0..self.lumps.len() as u32)
            .map(LumpId)
            .filter(|&id| {
                let Some(lump) = self.lump(id) else {
                    return false;
                };
                let name = lump.full_name.as_str();
                if name.contains('/') {
                    return false;
                }
                let base = name.split_once('.').map_or(name, |(base, _)| base);
                base.eq_ignore_ascii_case(stem)
            })
            .collect()
    }

    /// Load index of the archive that contributed `id`.
    pub fn lump_archive(&self, id: LumpId) -> Option<usize> {
        self.lumps.get(id.index()).map(|&(archive, _)| archive)
    }

    pub fn lump_full_name(&self, id: LumpId) -> &str {
        self.lump(id).map_or("", |lump| lump.full_name.as_str())
    }

    /// `archive:lump`, for messages.
    pub fn lump_full_path(&self, id: LumpId) -> String {
        match self.lump_archive(id) {
            Some(archive) => format!("{}:{}", self.archive_name(archive), self.lump_full_name(id)),
            None => format!("#{}", id.index()),
        }
    }

    pub fn lump_text(&self, id: LumpId) -> &str {
        self.lump(id).map_or("", |lump| lump.text.as_str())
    }
}
