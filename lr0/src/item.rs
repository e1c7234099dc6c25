//! LR(0) item machinery: items, item sets, `closure` and `goto`.
//!
//! Items reference productions by id, so an item is two integers and an
//! [`ItemSet`] is an ordered set of them. Because the set is ordered, two
//! item sets with the same content compare and hash equal no matter in which
//! order their items were discovered; the set is its own canonical signature.

use crate::grammar::{Grammar, ProdId, Symbol};
use std::collections::BTreeSet;
use std::fmt;

/// An LR(0) item: a production and the position of the dot in its RHS.
///
/// If production `E -> E + T` is recognized up to `E -> E • + T`, the item
/// stores the id of `E -> E + T` and `dot == 1`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The index of the production in the grammar.
    pub prod: ProdId,

    /// The position of the dot within the production's right-hand side,
    /// in `0..=rhs.len()`.
    pub dot: usize,
}

/// A set of LR(0) items.
pub type ItemSet = BTreeSet<Item>;

impl Item {
    /// The item with the dot before the first symbol of `prod`.
    pub fn start(prod: ProdId) -> Self {
        Item { prod, dot: 0 }
    }

    /// The symbol right after the dot, or `None` for a complete item.
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar.production(self.prod).rhs().get(self.dot).copied()
    }

    /// Whether the dot is at the end of the production.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.production(self.prod).len()
    }

    /// Whether this item belongs to the kernel of its state: the augmented
    /// start item, or any item whose dot has moved.
    pub fn is_kernel(&self) -> bool {
        self.dot > 0 || self.prod == Grammar::AUGMENTED
    }

    /// Returns a value that renders the item as `A -> x • y`.
    pub fn display<'g>(&self, grammar: &'g Grammar) -> ItemDisplay<'g> {
        ItemDisplay {
            item: *self,
            grammar,
        }
    }
}

/// Renders an [`Item`] with symbol names, see [`Item::display`].
pub struct ItemDisplay<'g> {
    item: Item,
    grammar: &'g Grammar,
}

impl fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prod = self.grammar.production(self.item.prod);
        write!(f, "{} ->", self.grammar.nonterminal_name(prod.lhs()))?;
        for (i, &sym) in prod.rhs().iter().enumerate() {
            if i == self.item.dot {
                write!(f, " •")?;
            }
            write!(f, " {}", self.grammar.symbol_name(sym))?;
        }
        if self.item.dot >= prod.len() {
            write!(f, " •")?;
        }
        Ok(())
    }
}

/// Computes the LR(0) *closure* of a set of items.
///
/// For every item whose dot sits before a nonterminal `A`, the zero-dot items
/// of all productions of `A` are added, until no new item appears. The item
/// universe is finite (one item per production and dot position), so the
/// loop terminates.
///
/// `closure` is monotone (`items ⊆ closure(items)`), idempotent, and maps the
/// empty set to the empty set.
pub fn closure(grammar: &Grammar, items: &ItemSet) -> ItemSet {
    let mut c = items.clone();
    let mut pending: Vec<Item> = items.iter().copied().collect();
    // Each nonterminal only needs expanding once.
    let mut expanded = BTreeSet::new();
    while let Some(item) = pending.pop() {
        let Some(Symbol::Nonterminal(n)) = item.next_symbol(grammar) else {
            continue;
        };
        if !expanded.insert(n) {
            continue;
        }
        for &prod in grammar.alternatives(n) {
            let new_item = Item::start(prod);
            if c.insert(new_item) {
                pending.push(new_item);
            }
        }
    }
    c
}

/// Computes the LR(0) *goto* function for an item set and a grammar symbol.
///
/// Items whose dot is right before `symbol` are advanced by one position and
/// the result is closed. When no item can advance the result is empty, which
/// means the automaton has no transition on `symbol`.
pub fn goto(grammar: &Grammar, items: &ItemSet, symbol: Symbol) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(|item| Item {
            prod: item.prod,
            dot: item.dot + 1,
        })
        .collect();
    if moved.is_empty() {
        return moved;
    }
    closure(grammar, &moved)
}

/// Returns the kernel items of `items`; see [`Item::is_kernel`].
pub fn kernel(items: &ItemSet) -> ItemSet {
    items.iter().copied().filter(Item::is_kernel).collect()
}
