//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! Text front end for the [`lr0`] engine.
//!
//!  * [`loader`] reads the line-oriented grammar format into an
//!    [`lr0::Grammar`],
//!  * [`report`] prints grammars, item sets, ACTION/GOTO tables and a
//!    Graphviz view of the automaton.
//!
//! The `lr0` binary (behind the default `cli` feature) ties both to the
//! command line.

pub mod loader;
pub mod report;

pub use loader::{load_file, load_str};
