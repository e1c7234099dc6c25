//! # ACTION/GOTO tables
//!
//! Compiles an [`Automaton`] into the two tables a shift-reduce driver needs.
//! Every state contributes proposals:
//!
//! - a complete item `S' -> S •` proposes `Accept` on `$`,
//! - any other complete item `A -> w •` proposes `Reduce` on every terminal
//!   and on `$`,
//! - an item with a terminal `t` after the dot proposes `Shift` to the target
//!   of the `t` transition,
//! - transitions on nonterminals fill GOTO.
//!
//! Proposals for a cell are gathered into an ordered set first, so a cell
//! with more than one distinct proposal is a [`Conflict`] regardless of the
//! order items were visited in. What happens next is up to the
//! [`ConflictPolicy`].

use crate::automaton::{Automaton, StateId};
use crate::error::TableError;
use crate::grammar::{Grammar, ProdId, Symbol};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// One ACTION table entry.
///
/// The derived ordering (`Accept < Shift < Reduce`, then by payload) is the
/// preference order used by [`ConflictPolicy::PreferShift`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Accept,
    Shift(StateId),
    Reduce(ProdId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Accept => write!(f, "acc"),
            Action::Shift(s) => write!(f, "s{}", s),
            Action::Reduce(p) => write!(f, "r{}", p),
        }
    }
}

/// A cell of the ACTION table that received more than one proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateId,
    /// Terminal index of the cell; `$` is the grammar's end marker index.
    pub terminal: usize,
    /// Name of the terminal, for messages.
    pub lookahead: String,
    /// The competing actions, in preference order.
    pub actions: Vec<Action>,
}

impl Conflict {
    /// Whether one of the competing actions is a shift.
    pub fn is_shift_reduce(&self) -> bool {
        self.actions.iter().any(|a| matches!(a, Action::Shift(_)))
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}, lookahead `{}`: ", self.state, self.lookahead)?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            match action {
                Action::Accept => write!(f, "accept")?,
                Action::Shift(s) => write!(f, "shift {}", s)?,
                Action::Reduce(p) => write!(f, "reduce {}", p)?,
            }
        }
        Ok(())
    }
}

/// What to do with a cell that has competing proposals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail with [`TableError::GrammarNotLR0`] listing every conflict.
    #[default]
    Reject,
    /// Keep the first action in [`Action`] order: accept, then shift, then
    /// the reduce with the lowest production id.
    PreferShift,
}

/// Options for [`Tables::compile_with`].
#[derive(Clone, Debug, Default)]
pub struct TableOptions {
    pub policy: ConflictPolicy,
}

impl TableOptions {
    pub fn prefer_shift() -> Self {
        Self {
            policy: ConflictPolicy::PreferShift,
        }
    }
}

/// Compiled ACTION/GOTO tables. Immutable once built.
#[derive(Clone, Debug)]
pub struct Tables {
    pub(crate) grammar: Arc<Grammar>,
    /// `action[state][terminal]`, with one extra column for `$`.
    pub(crate) action: Vec<Vec<Option<Action>>>,
    /// `goto[state][nonterminal]`.
    pub(crate) goto: Vec<Vec<Option<StateId>>>,
    /// Conflicts that were resolved by the policy; empty for LR(0) grammars.
    pub(crate) conflicts: Vec<Conflict>,
}

impl Tables {
    /// Compiles the tables, rejecting grammars that are not LR(0).
    pub fn compile(automaton: &Automaton) -> Result<Self, TableError> {
        Self::compile_with(automaton, &TableOptions::default())
    }

    /// Compiles the tables under `options`.
    pub fn compile_with(automaton: &Automaton, options: &TableOptions) -> Result<Self, TableError> {
        let grammar = automaton.grammar();
        let n_states = automaton.len();
        let n_cols = grammar.n_terminals() + 1;
        let end = grammar.end_marker();

        let mut cells: Vec<Vec<BTreeSet<Action>>> = vec![vec![BTreeSet::new(); n_cols]; n_states];
        let mut goto = vec![vec![None; grammar.n_nonterminals()]; n_states];

        for (state, items) in automaton.states() {
            for item in items {
                match item.next_symbol(grammar) {
                    None if item.prod == Grammar::AUGMENTED => {
                        cells[state][end].insert(Action::Accept);
                    }
                    None => {
                        for cell in cells[state].iter_mut() {
                            cell.insert(Action::Reduce(item.prod));
                        }
                    }
                    Some(symbol @ Symbol::Terminal(t)) => {
                        if let Some(next) = automaton.transition(state, symbol) {
                            cells[state][t].insert(Action::Shift(next));
                        }
                    }
                    Some(Symbol::Nonterminal(_)) => {}
                }
            }
            for (symbol, next) in automaton.transitions(state) {
                if let Symbol::Nonterminal(n) = symbol {
                    goto[state][n] = Some(next);
                }
            }
        }

        let mut conflicts = Vec::new();
        let mut action = Vec::with_capacity(n_states);
        for (state, row) in cells.into_iter().enumerate() {
            let mut resolved = Vec::with_capacity(n_cols);
            for (terminal, cell) in row.into_iter().enumerate() {
                if cell.len() > 1 {
                    conflicts.push(Conflict {
                        state,
                        terminal,
                        lookahead: grammar.terminal_name(terminal).to_owned(),
                        actions: cell.iter().copied().collect(),
                    });
                }
                resolved.push(cell.first().copied());
            }
            action.push(resolved);
        }

        if !conflicts.is_empty() {
            match options.policy {
                ConflictPolicy::Reject => {
                    log::debug!("{} conflict(s), rejecting grammar", conflicts.len());
                    return Err(TableError::GrammarNotLR0 { conflicts });
                }
                ConflictPolicy::PreferShift => {
                    for c in &conflicts {
                        log::warn!("{}; keeping {}", c, c.actions[0]);
                    }
                }
            }
        }

        log::debug!(
            "tables: {} states x {} terminals, {} nonterminals",
            n_states,
            n_cols,
            grammar.n_nonterminals()
        );

        Ok(Self {
            grammar: automaton.grammar_arc(),
            action,
            goto,
            conflicts,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn n_states(&self) -> usize {
        self.action.len()
    }

    /// State ids in order, `0..n_states`.
    pub fn states(&self) -> std::ops::Range<StateId> {
        0..self.action.len()
    }

    /// `ACTION[state][terminal]`; the end marker is
    /// [`Grammar::end_marker`]. Out-of-range indices yield `None`.
    pub fn action(&self, state: StateId, terminal: usize) -> Option<Action> {
        self.action.get(state)?.get(terminal).copied().flatten()
    }

    /// `GOTO[state][nonterminal]`. Out-of-range indices yield `None`.
    pub fn goto(&self, state: StateId, nonterminal: usize) -> Option<StateId> {
        self.goto.get(state)?.get(nonterminal).copied().flatten()
    }

    /// Conflicts resolved while compiling with
    /// [`ConflictPolicy::PreferShift`].
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// True when every cell had at most one proposal.
    pub fn is_lr0(&self) -> bool {
        self.conflicts.is_empty()
    }
}
