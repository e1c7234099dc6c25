//! Canonical collection of LR(0) item sets and its transition relation.

use crate::error::BuildError;
use crate::grammar::{Grammar, Symbol};
use crate::item::{self, Item, ItemSet};
use indexmap::IndexSet;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

/// Index of a state in the automaton; state 0 is the initial state.
pub type StateId = usize;

/// Options for [`Automaton::build_with`].
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Stop with [`BuildError::StateBudgetExceeded`] once the collection
    /// would grow beyond this many states. `None` means unbounded.
    pub max_states: Option<usize>,
}

/// The LR(0) automaton: the deduplicated states of the canonical collection,
/// numbered in discovery order, and their transitions.
#[derive(Debug, Clone)]
pub struct Automaton {
    grammar: Arc<Grammar>,
    /// Item set of every state; the insertion index is the state id.
    states: IndexSet<ItemSet>,
    /// Outgoing transitions of every state, ordered by symbol.
    transitions: Vec<BTreeMap<Symbol, StateId>>,
}

impl Automaton {
    /// Builds the canonical collection without a state budget.
    pub fn build(grammar: impl Into<Arc<Grammar>>) -> Result<Self, BuildError> {
        Self::build_with(grammar, &BuildOptions::default())
    }

    /// Builds the canonical collection.
    ///
    /// State 0 is `closure({S' -> • S})`. States are processed breadth-first;
    /// for each state every declared symbol is tried in the fixed order of
    /// [`Grammar::symbols`], so ids are the same on every run. A non-empty
    /// `goto` result is looked up by content and only gets a new id the first
    /// time it is seen.
    pub fn build_with(
        grammar: impl Into<Arc<Grammar>>,
        options: &BuildOptions,
    ) -> Result<Self, BuildError> {
        let grammar = grammar.into();
        let mut states = IndexSet::new();
        let mut transitions = Vec::new();

        let start = item::closure(
            &grammar,
            &ItemSet::from([Item::start(Grammar::AUGMENTED)]),
        );
        states.insert(start);
        transitions.push(BTreeMap::new());

        let mut pending = VecDeque::from([0]);
        while let Some(state) = pending.pop_front() {
            for symbol in grammar.symbols() {
                let items = &states[state];
                let next = item::goto(&grammar, items, symbol);
                if next.is_empty() {
                    continue;
                }
                let (target, inserted) = states.insert_full(next);
                if inserted {
                    if let Some(limit) = options.max_states {
                        if states.len() > limit {
                            return Err(BuildError::StateBudgetExceeded { limit });
                        }
                    }
                    log::trace!(
                        "state {} --{}--> new state {}",
                        state,
                        grammar.symbol_name(symbol),
                        target
                    );
                    transitions.push(BTreeMap::new());
                    pending.push_back(target);
                }
                transitions[state].insert(symbol, target);
            }
        }

        log::debug!(
            "canonical collection: {} states, {} transitions",
            states.len(),
            transitions.iter().map(BTreeMap::len).sum::<usize>()
        );

        Ok(Self {
            grammar,
            states,
            transitions,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// A shared handle to the grammar.
    pub fn grammar_arc(&self) -> Arc<Grammar> {
        Arc::clone(&self.grammar)
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The item set of `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not below [`Automaton::len`].
    pub fn items(&self, state: StateId) -> &ItemSet {
        &self.states[state]
    }

    /// Looks up a state by content.
    pub fn find_state(&self, items: &ItemSet) -> Option<StateId> {
        self.states.get_index_of(items)
    }

    /// Target of the transition on `symbol` out of `state`, if any.
    pub fn transition(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.transitions.get(state)?.get(&symbol).copied()
    }

    /// Outgoing transitions of `state`, ordered by symbol. Empty for an
    /// unknown state.
    pub fn transitions(&self, state: StateId) -> impl Iterator<Item = (Symbol, StateId)> + '_ {
        self.transitions
            .get(state)
            .into_iter()
            .flatten()
            .map(|(&sym, &to)| (sym, to))
    }

    /// Iterates over `(id, items)` in id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &ItemSet)> + '_ {
        self.states.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn balanced() -> Grammar {
        Grammar::new(
            ["S"],
            ["a", "b", "c"],
            "S",
            [(
                "S",
                vec![vec!["a", "S", "b", "S"], vec!["a", "S"], vec!["c"]],
            )],
        )
        .unwrap()
    }

    fn expr() -> Grammar {
        Grammar::new(
            ["E", "T", "F"],
            ["+", "*", "(", ")", "id"],
            "E",
            [
                ("E", vec![vec!["E", "+", "T"], vec!["T"]]),
                ("T", vec![vec!["T", "*", "F"], vec!["F"]]),
                ("F", vec![vec!["(", "E", ")"], vec!["id"]]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn balanced_grammar_has_seven_states() {
        let a = Automaton::build(balanced()).unwrap();
        assert_eq!(a.len(), 7);

        let g = a.grammar();
        let (s, ta, tb, tc) = (
            g.symbol("S").unwrap(),
            g.symbol("a").unwrap(),
            g.symbol("b").unwrap(),
            g.symbol("c").unwrap(),
        );
        // discovery order: S, a, c from state 0
        assert_eq!(a.transition(0, s), Some(1));
        assert_eq!(a.transition(0, ta), Some(2));
        assert_eq!(a.transition(0, tb), None);
        assert_eq!(a.transition(0, tc), Some(3));
        assert_eq!(a.transition(2, ta), Some(2));
        assert_eq!(a.transition(2, s), Some(4));
        assert_eq!(a.transition(4, tb), Some(5));
        assert_eq!(a.transition(5, s), Some(6));
        assert_eq!(a.transitions(1).count(), 0);
    }

    #[test]
    fn expression_grammar_has_twelve_states() {
        let a = Automaton::build(expr()).unwrap();
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn states_are_unique() {
        let a = Automaton::build(expr()).unwrap();
        let distinct: HashSet<&ItemSet> = a.states().map(|(_, items)| items).collect();
        assert_eq!(distinct.len(), a.len());
        for (id, items) in a.states() {
            assert_eq!(a.find_state(items), Some(id));
        }
    }

    #[test]
    fn ids_are_reproducible() {
        let first = Automaton::build(expr()).unwrap();
        let second = Automaton::build(expr()).unwrap();
        assert_eq!(first.len(), second.len());
        for ((i, x), (j, y)) in first.states().zip(second.states()) {
            assert_eq!(i, j);
            assert_eq!(x, y);
            assert_eq!(
                first.transitions(i).collect::<Vec<_>>(),
                second.transitions(j).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn transitions_agree_with_goto() {
        let a = Automaton::build(expr()).unwrap();
        let g = a.grammar();
        for (id, items) in a.states() {
            for symbol in g.symbols() {
                let next = item::goto(g, items, symbol);
                match a.transition(id, symbol) {
                    Some(target) => assert_eq!(a.items(target), &next),
                    None => assert!(next.is_empty()),
                }
            }
        }
    }

    #[test]
    fn state_count_is_bounded_by_item_power_set() {
        let a = Automaton::build(expr()).unwrap();
        let k: usize = a.grammar().productions().iter().map(|p| p.len() + 1).sum();
        assert!(k < usize::BITS as usize);
        assert!(a.len() <= 1usize << k);
    }

    #[test]
    fn state_budget_stops_construction() {
        let err = Automaton::build_with(
            expr(),
            &BuildOptions {
                max_states: Some(5),
            },
        )
        .unwrap_err();
        assert_eq!(err, BuildError::StateBudgetExceeded { limit: 5 });

        let ok = Automaton::build_with(
            expr(),
            &BuildOptions {
                max_states: Some(12),
            },
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn initial_state_is_closure_of_augmented_item() {
        let a = Automaton::build(balanced()).unwrap();
        let expected = item::closure(
            a.grammar(),
            &ItemSet::from([Item::start(Grammar::AUGMENTED)]),
        );
        assert_eq!(a.items(0), &expected);
    }

    #[test]
    fn transitions_of_unknown_state_are_empty() {
        let a = Automaton::build(balanced()).unwrap();
        assert_eq!(a.transitions(a.len()).count(), 0);
        assert_eq!(a.transition(a.len(), Symbol::Terminal(0)), None);
        // the accepting state has no way out
        assert_eq!(a.transitions(1).count(), 0);
    }
}
