//! Canonical interned names.
//!
//! A [`Name`] is a small integer identity for an identifier. Interning is
//! case-insensitive and process-wide, so two spellings of the same word in
//! different scripts compare equal without touching the text. The first
//! spelling seen is the one [`Name::as_str`] returns.

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;

/// An interned, case-insensitive identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(u32);

impl Name {
    /// The empty name.
    pub const NONE: Name = Name(0);
    pub const SBYTE: Name = Name(1);
    pub const BYTE: Name = Name(2);
    pub const SHORT: Name = Name(3);
    pub const USHORT: Name = Name(4);
    pub const INT: Name = Name(5);
    pub const UINT: Name = Name(6);
    pub const BOOL: Name = Name(7);
    pub const FLOAT: Name = Name(8);
    pub const DOUBLE: Name = Name(9);
    pub const STRING: Name = Name(10);
    pub const VECTOR2: Name = Name(11);
    pub const VECTOR3: Name = Name(12);
    pub const NAME: Name = Name(13);
    pub const MAP: Name = Name(14);
    pub const ARRAY: Name = Name(15);
    pub const DEFAULT: Name = Name(16);
    pub const VOID: Name = Name(17);
    pub const COLOR: Name = Name(18);
    pub const SOUND: Name = Name(19);
    pub const CLASS: Name = Name(20);

    /// Intern `text`, returning the existing name if it is already known.
    ///
    /// The empty string interns to [`Name::NONE`].
    pub fn new(text: &str) -> Name {
        if text.is_empty() {
            return Name::NONE;
        }
        let key = text.to_ascii_lowercase();
        {
            let table = table().read().unwrap_or_else(PoisonError::into_inner);
            if let Some(&name) = table.lookup.get(key.as_str()) {
                return name;
            }
        }
        let mut table = table().write().unwrap_or_else(PoisonError::into_inner);
        table.intern(key, text)
    }

    /// The spelling this name was first interned with.
    pub fn as_str(self) -> &'static str {
        let table = table().read().unwrap_or_else(PoisonError::into_inner);
        table.text.get(self.0 as usize).copied().unwrap_or("")
    }

    /// The integer identity of this name.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Name::NONE
    }
}

const PREDEFINED: [&str; 21] = [
    "None", "sByte", "Byte", "Short", "uShort", "Int", "uInt", "Bool", "Float", "Double",
    "String", "Vector2", "Vector3", "Name", "Map", "Array", "Default", "Void", "Color", "Sound",
    "Class",
];

struct NameTable {
    lookup: FxHashMap<Box<str>, Name>,
    text: Vec<&'static str>,
}

impl NameTable {
    fn with_predefined() -> Self {
        let mut table = NameTable {
            lookup: FxHashMap::default(),
            text: Vec::with_capacity(1024),
        };
        for text in PREDEFINED {
            table.intern(text.to_ascii_lowercase(), text);
        }
        table
    }

    fn intern(&mut self, key: String, text: &str) -> Name {
        if let Some(&name) = self.lookup.get(key.as_str()) {
            return name;
        }
        let name = Name(self.text.len() as u32);
        // Interned text lives for the rest of the process.
        let text: &'static str = Box::leak(text.to_owned().into_boxed_str());
        self.text.push(text);
        self.lookup.insert(key.into_boxed_str(), name);
        name
    }
}

fn table() -> &'static RwLock<NameTable> {
    static TABLE: OnceLock<RwLock<NameTable>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(NameTable::with_predefined()))
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_names_are_stable() {
        assert_eq!(Name::new("int"), Name::INT);
        assert_eq!(Name::new("VECTOR3"), Name::VECTOR3);
        assert_eq!(Name::INT.as_str(), "Int");
        assert_eq!(Name::new(""), Name::NONE);
        assert!(Name::NONE.is_none());
    }

    #[test]
    fn interning_is_case_insensitive() {
        let a = Name::new("DoomImp");
        let b = Name::new("doomimp");
        assert_eq!(a, b);
        assert_eq!(b.as_str(), "DoomImp");
    }

    #[test]
    fn distinct_text_gives_distinct_names() {
        assert_ne!(Name::new("Zombieman"), Name::new("ShotgunGuy"));
    }
}
