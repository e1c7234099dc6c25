//! # Error taxonomy
//!
//! One enum per failure domain of the pipeline:
//!
//! - [`GrammarError`]: the grammar handed to [`Grammar::new`] is not a valid
//!   CFG. Construction fails fast and no partial grammar is returned.
//! - [`BuildError`]: automaton construction was stopped by a caller-imposed
//!   budget.
//! - [`TableError`]: the automaton has cells with competing actions, i.e. the
//!   grammar is not LR(0). Every conflict found is carried, not only the first.
//! - [`ParseError`]: why an input was rejected. Parse failures are returned
//!   as values inside [`ParseOutcome`], never raised.
//!
//! All errors are plain data (`Clone + Eq`) so they can be compared in tests
//! and stored next to the outcome that produced them.
//!
//! [`Grammar::new`]: crate::Grammar::new
//! [`ParseOutcome`]: crate::ParseOutcome

use crate::table::Conflict;
use thiserror::Error;

/// Reasons a grammar is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The start symbol is not one of the declared nonterminals.
    #[error("start symbol `{0}` is not in the set of nonterminals")]
    InvalidStartSymbol(String),

    /// A production is keyed by a name that is not a declared nonterminal.
    #[error("production LHS `{0}` is not a nonterminal")]
    UnknownProductionLHS(String),

    /// A right-hand side mentions a name that is neither a terminal, a
    /// nonterminal nor `epsilon`.
    #[error("symbol `{symbol}` in production `{production}` is neither a terminal nor a nonterminal")]
    UnknownSymbol {
        /// The offending name.
        symbol: String,
        /// The production it appears in, rendered as `A -> x y z`.
        production: String,
    },

    /// A lookup asked for the productions of a name that is not a nonterminal.
    #[error("`{0}` is not a nonterminal")]
    UnknownNonterminal(String),

    /// A name was declared both as a terminal and as a nonterminal.
    #[error("`{0}` is declared both as a terminal and as a nonterminal")]
    OverlappingSymbol(String),

    /// A reserved name (`epsilon` or the end marker) was declared as a symbol.
    #[error("`{0}` is reserved and cannot be declared as a symbol")]
    ReservedSymbol(String),
}

/// Reasons automaton construction was stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The canonical collection grew beyond the configured number of states.
    #[error("canonical collection exceeds the budget of {limit} states")]
    StateBudgetExceeded {
        /// The configured maximum.
        limit: usize,
    },
}

/// Reasons table construction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// At least one ACTION cell received two different proposals.
    #[error("grammar is not LR(0): {} conflict(s)", .conflicts.len())]
    GrammarNotLR0 {
        /// All conflicts, ordered by state, then terminal. Never empty.
        conflicts: Vec<Conflict>,
    },
}

impl TableError {
    /// Returns the conflicts that caused the failure.
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            TableError::GrammarNotLR0 { conflicts } => conflicts,
        }
    }
}

/// Reasons an input was rejected by the [`ParseDriver`](crate::ParseDriver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No action is defined for the input symbol at this 0-based position.
    #[error("unexpected symbol at position {0}")]
    UnexpectedSymbol(usize),

    /// The input ended in a state that cannot accept or reduce on `$`.
    #[error("premature end of input")]
    PrematureEnd,

    /// More consecutive reductions than the configured bound were performed
    /// without consuming input.
    #[error("too many consecutive reductions without a shift")]
    InternalLoopGuardTripped,

    /// A reduction needed a GOTO entry or stack depth the table does not
    /// provide.
    #[error("inconsistent parse table at state {state}")]
    CorruptTable {
        /// The state on top of the stack when the fault was detected.
        state: usize,
    },
}
