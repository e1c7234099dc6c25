//! # symtab
//!
//! An insertion-ordered string interner built on [`indexmap::IndexSet`].
//!
//! Each unique name receives a dense index equal to its insertion order.
//! The grammar keeps one table for nonterminals and one for terminals, so a
//! symbol is always a `(kind, index)` pair and names are stored exactly once.
//!
//! ## Example
//! ```rust
//! # use lr0::Symtab;
//! let mut st = Symtab::new();
//! assert_eq!(st.intern("expr"), 0);
//! assert_eq!(st.intern("term"), 1);
//! assert_eq!(st.intern("expr"), 0); // same index, not reinserted
//! assert_eq!(st.name(1), Some("term"));
//! assert_eq!(st.index("factor"), None);
//! ```

use indexmap::IndexSet;
use smartstring::alias::String;

/// Maps symbol names to stable indices in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symtab {
    names: IndexSet<String>,
}

impl Symtab {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self {
            names: IndexSet::new(),
        }
    }

    /// Inserts `name` if it is not present yet and returns its index.
    pub fn intern(&mut self, name: impl AsRef<str>) -> usize {
        let (idx, _) = self.names.insert_full(String::from(name.as_ref()));
        idx
    }

    /// Returns the index of `name`, if it has been interned.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    /// Returns the name stored at `idx`.
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get_index(idx).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the names in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(|s| s.as_str())
    }
}

impl<S: AsRef<str>> FromIterator<S> for Symtab {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut st = Symtab::new();
        for name in iter {
            st.intern(name);
        }
        st
    }
}
