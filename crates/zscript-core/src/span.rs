//! Source location tracking for diagnostics and AST provenance.
//!
//! [`SourceLoc`] is the position a token or node starts at. [`Provenance`]
//! adds the originating script lump so that nodes built from several files
//! in one session can still be traced back to where they came from.

use std::fmt;

/// A position in a script, represented by its starting line and column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLoc {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes of the token this location was taken from.
    pub len: u32,
}

impl SourceLoc {
    /// Create a new location from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length location.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this location covers no source text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Merge two locations into one that starts at the earlier and covers both.
    ///
    /// Locations on different lines keep the first position and sum the lengths.
    #[inline]
    pub fn merge(self, other: SourceLoc) -> SourceLoc {
        if self.line == other.line {
            let start_col = self.col.min(other.col);
            let end_col = (other.col + other.len).max(self.col + self.len);
            SourceLoc {
                line: self.line,
                col: start_col,
                len: end_col - start_col,
            }
        } else {
            SourceLoc {
                line: self.line,
                col: self.col,
                len: self.len + other.len,
            }
        }
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Identity of a script lump inside the loaded archive set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LumpId(pub u32);

impl LumpId {
    /// Index of the lump in its archive set's directory.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a tree node came from.
///
/// `source_name` borrows from the session string arena, so provenance is
/// valid for as long as the AST that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Provenance<'s> {
    /// Full name of the script the node was parsed from.
    pub source_name: &'s str,
    /// The lump the script was read from, if the node came from a real lump.
    pub source_lump: Option<LumpId>,
    /// Position within the script.
    pub loc: SourceLoc,
}

impl<'s> Provenance<'s> {
    /// Create provenance for a node read from `source_lump`.
    pub fn new(source_name: &'s str, source_lump: Option<LumpId>, loc: SourceLoc) -> Self {
        Self {
            source_name,
            source_lump,
            loc,
        }
    }
}

impl fmt::Display for Provenance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source_name.is_empty() {
            write!(f, "{}", self.loc)
        } else {
            write!(f, "{}:{}", self.source_name, self.loc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loc_basics() {
        let loc = SourceLoc::new(1, 5, 10);
        assert_eq!(loc.len, 10);
        assert!(!loc.is_empty());
        assert!(SourceLoc::point(1, 5).is_empty());
    }

    #[test]
    fn loc_display() {
        assert_eq!(SourceLoc::new(3, 15, 5).to_string(), "3:15");
    }

    #[test]
    fn merge_same_line() {
        let merged = SourceLoc::new(1, 5, 3).merge(SourceLoc::new(1, 10, 3));
        assert_eq!(merged, SourceLoc::new(1, 5, 8));
    }

    #[test]
    fn merge_reverse_order() {
        let merged = SourceLoc::new(1, 10, 3).merge(SourceLoc::new(1, 5, 3));
        assert_eq!(merged, SourceLoc::new(1, 5, 8));
    }

    #[test]
    fn merge_different_lines() {
        let merged = SourceLoc::new(1, 5, 10).merge(SourceLoc::new(3, 10, 5));
        assert_eq!(merged, SourceLoc::new(1, 5, 15));
    }

    #[test]
    fn provenance_display() {
        let prov = Provenance::new("zscript/actor.zs", Some(LumpId(4)), SourceLoc::point(12, 3));
        assert_eq!(prov.to_string(), "zscript/actor.zs:12:3");
        assert_eq!(Provenance::default().to_string(), "0:0");
    }
}
