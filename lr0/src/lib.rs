//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! LR(0) grammar analysis and parsing.
//!
//! The pipeline runs in four steps, each producing an immutable value:
//!  * [`Grammar::new`] validates a context-free grammar `(N, E, S, P)`,
//!  * [`build`] computes the canonical collection of LR(0) item sets,
//!  * [`compile`] turns it into ACTION/GOTO [`Tables`], reporting every
//!    conflict,
//!  * [`parse`] (or a reusable [`ParseDriver`]) runs the shift-reduce machine
//!    over a sequence of terminals.
//!
//! ```rust
//! let g = lr0::Grammar::new(
//!     ["S"],
//!     ["a", "b", "c"],
//!     "S",
//!     [("S", vec![vec!["a", "S", "b", "S"], vec!["a", "S"], vec!["c"]])],
//! )?;
//! let automaton = lr0::build(g)?;
//!
//! // `a S • b S` and `a S •` compete on `b`
//! let err = lr0::compile(&automaton).unwrap_err();
//! assert_eq!(err.conflicts().len(), 1);
//!
//! let tables = lr0::compile_with(&automaton, &lr0::TableOptions::prefer_shift())?;
//! assert!(lr0::parse(&tables, &["a", "c"]).is_accepted());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Text formats, printing and the command line live in the `lr0-tools`
//! crate.

pub mod automaton;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod item;
pub mod symtab;
pub mod table;

pub use crate::automaton::{Automaton, BuildOptions, StateId};
pub use crate::driver::{ParseDriver, ParseOutcome, ParserStats};
pub use crate::error::{BuildError, GrammarError, ParseError, TableError};
pub use crate::grammar::{END_MARKER, EPSILON, Grammar, ProdId, Production, Symbol};
pub use crate::item::{Item, ItemSet, closure, goto};
pub use crate::symtab::Symtab;
pub use crate::table::{Action, Conflict, ConflictPolicy, TableOptions, Tables};

use std::sync::Arc;

/// Builds the LR(0) automaton of `grammar`.
pub fn build(grammar: impl Into<Arc<Grammar>>) -> Result<Automaton, BuildError> {
    Automaton::build(grammar)
}

/// Builds the LR(0) automaton of `grammar` under `options`.
pub fn build_with(
    grammar: impl Into<Arc<Grammar>>,
    options: &BuildOptions,
) -> Result<Automaton, BuildError> {
    Automaton::build_with(grammar, options)
}

/// Compiles ACTION/GOTO tables, failing on any conflict.
pub fn compile(automaton: &Automaton) -> Result<Tables, TableError> {
    Tables::compile(automaton)
}

/// Compiles ACTION/GOTO tables, resolving conflicts as `options` says.
pub fn compile_with(automaton: &Automaton, options: &TableOptions) -> Result<Tables, TableError> {
    Tables::compile_with(automaton, options)
}

/// Parses `input`, a sequence of terminal names, with a fresh driver.
pub fn parse<S: AsRef<str>>(tables: &Tables, input: &[S]) -> ParseOutcome {
    ParseDriver::new(tables).parse(input)
}
