//! # Grammar model
//!
//! An immutable, validated context-free grammar `(N, E, S, P)`.
//!
//! Names are interned into two [`Symtab`]s (nonterminals, terminals) and every
//! other structure refers to symbols by index. Productions are stored once, in
//! an arena indexed by [`ProdId`]. Slot 0 of the arena always holds the
//! augmented production `S' -> S`; the user's alternatives follow in
//! declaration order.
//!
//! ## Example
//! ```rust
//! # use lr0::{Grammar, GrammarError};
//! let g = Grammar::new(
//!     ["S", "A"],
//!     ["a", "b"],
//!     "S",
//!     [("S", vec![vec!["a", "A"]]), ("A", vec![vec!["b"], vec!["epsilon"]])],
//! )?;
//! assert_eq!(g.productions().len(), 4); // S' -> S plus three alternatives
//! assert_eq!(g.format_production(3), "A -> epsilon");
//! # Ok::<(), GrammarError>(())
//! ```

use crate::error::GrammarError;
use crate::symtab::Symtab;
use std::fmt;

/// Reserved name marking an empty alternative.
pub const EPSILON: &str = "epsilon";

/// Name of the end-of-input marker in the ACTION table.
pub const END_MARKER: &str = "$";

/// Index of a production in the grammar's arena.
pub type ProdId = usize;

/// A grammar symbol, identified by its index in the matching symbol table.
///
/// Nonterminals order before terminals, which is also the order the
/// automaton builder visits symbols in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Nonterminal(usize),
    Terminal(usize),
}

/// A production `lhs -> rhs`. An empty `rhs` is an epsilon production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    pub(crate) lhs: usize,
    pub(crate) rhs: Vec<Symbol>,
}

impl Production {
    /// Index of the left-hand side nonterminal.
    pub fn lhs(&self) -> usize {
        self.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// Number of symbols popped when this production is reduced.
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// A validated, immutable context-free grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar {
    /// Declared nonterminals, followed by the synthetic augmented start.
    nonterms: Symtab,
    /// Number of declared nonterminals (the augmented start is not counted).
    n_nonterms: usize,
    terms: Symtab,
    start: usize,
    prods: Vec<Production>,
    /// Alternatives of each nonterminal (including the augmented start), in
    /// declaration order.
    alternatives: Vec<Vec<ProdId>>,
}

impl Grammar {
    /// Id of the augmented production `S' -> S`.
    pub const AUGMENTED: ProdId = 0;

    /// Validates `(N, E, S, P)` and builds the grammar.
    ///
    /// `productions` maps a nonterminal name to its ordered alternatives, each
    /// an ordered list of symbol names. The name [`EPSILON`] is dropped from
    /// alternatives, so `["epsilon"]` is an empty production. A key that
    /// appears more than once appends its alternatives.
    ///
    /// Checks run in this order and the first violation is returned:
    /// the start symbol, reserved names, names declared twice, then every
    /// production in declaration order.
    pub fn new<N, E, P, K, A, B, S>(
        nonterminals: N,
        terminals: E,
        start: &str,
        productions: P,
    ) -> Result<Self, GrammarError>
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        P: IntoIterator<Item = (K, A)>,
        K: AsRef<str>,
        A: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut nonterms: Symtab = nonterminals.into_iter().collect();
        let terms: Symtab = terminals.into_iter().collect();

        let Some(start) = nonterms.index(start) else {
            return Err(GrammarError::InvalidStartSymbol(start.to_owned()));
        };

        for name in nonterms.iter().chain(terms.iter()) {
            if name == EPSILON || name == END_MARKER {
                return Err(GrammarError::ReservedSymbol(name.to_owned()));
            }
        }
        if let Some(name) = nonterms.iter().find(|name| terms.contains(name)) {
            return Err(GrammarError::OverlappingSymbol(name.to_owned()));
        }

        let n_nonterms = nonterms.len();
        let mut alternatives = vec![Vec::new(); n_nonterms + 1];
        let mut prods = Vec::new();

        // S' -> S goes first so that its id is fixed.
        let mut augmented = format!("{}'", nonterms.name(start).unwrap_or_default());
        while nonterms.contains(&augmented) || terms.contains(&augmented) {
            augmented.push('\'');
        }
        let augmented = nonterms.intern(&augmented);
        prods.push(Production {
            lhs: augmented,
            rhs: vec![Symbol::Nonterminal(start)],
        });
        alternatives[augmented].push(Self::AUGMENTED);

        for (lhs_name, alts) in productions {
            let lhs_name = lhs_name.as_ref();
            let lhs = match nonterms.index(lhs_name) {
                Some(lhs) if lhs < n_nonterms => lhs,
                _ => return Err(GrammarError::UnknownProductionLHS(lhs_name.to_owned())),
            };
            for alt in alts {
                let names: Vec<S> = alt.into_iter().collect();
                let mut rhs = Vec::with_capacity(names.len());
                for name in &names {
                    let name = name.as_ref();
                    if name == EPSILON {
                        continue;
                    }
                    let symbol = match (nonterms.index(name), terms.index(name)) {
                        (Some(n), _) if n < n_nonterms => Symbol::Nonterminal(n),
                        (_, Some(t)) => Symbol::Terminal(t),
                        _ => {
                            let body: Vec<&str> = names.iter().map(|s| s.as_ref()).collect();
                            return Err(GrammarError::UnknownSymbol {
                                symbol: name.to_owned(),
                                production: format!("{} -> {}", lhs_name, body.join(" ")),
                            });
                        }
                    };
                    rhs.push(symbol);
                }
                alternatives[lhs].push(prods.len());
                prods.push(Production { lhs, rhs });
            }
        }

        Ok(Self {
            nonterms,
            n_nonterms,
            terms,
            start,
            prods,
            alternatives,
        })
    }

    /// Returns the alternatives of the named nonterminal, in declaration order.
    ///
    /// A declared nonterminal without productions yields an empty list.
    pub fn productions_for(&self, nonterminal: &str) -> Result<Vec<&Production>, GrammarError> {
        match self.nonterms.index(nonterminal) {
            Some(n) if n < self.n_nonterms => Ok(self.alternatives[n]
                .iter()
                .map(|&p| &self.prods[p])
                .collect()),
            _ => Err(GrammarError::UnknownNonterminal(nonterminal.to_owned())),
        }
    }

    /// Production ids of nonterminal `n` (the augmented start included).
    pub fn alternatives(&self, n: usize) -> &[ProdId] {
        self.alternatives.get(n).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The production arena. Index 0 is `S' -> S`.
    pub fn productions(&self) -> &[Production] {
        &self.prods
    }

    /// Production `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range; see [`Grammar::productions`].
    pub fn production(&self, id: ProdId) -> &Production {
        &self.prods[id]
    }

    /// Index of the start nonterminal `S`.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of declared nonterminals.
    pub fn n_nonterminals(&self) -> usize {
        self.n_nonterms
    }

    /// Number of declared terminals. This is also the column of `$`.
    pub fn n_terminals(&self) -> usize {
        self.terms.len()
    }

    /// Terminal index used for the end-of-input marker `$`.
    pub fn end_marker(&self) -> usize {
        self.terms.len()
    }

    /// Declared nonterminal names, in declaration order.
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.nonterms.iter().take(self.n_nonterms)
    }

    /// Declared terminal names, in declaration order.
    pub fn terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter()
    }

    /// All declared symbols: nonterminals first, then terminals, each in
    /// declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.n_nonterms)
            .map(Symbol::Nonterminal)
            .chain((0..self.terms.len()).map(Symbol::Terminal))
    }

    /// Looks up a declared symbol by name.
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        match self.nonterms.index(name) {
            Some(n) if n < self.n_nonterms => Some(Symbol::Nonterminal(n)),
            _ => self.terms.index(name).map(Symbol::Terminal),
        }
    }

    /// Looks up a terminal by name. `$` is not a declared terminal.
    pub fn terminal(&self, name: &str) -> Option<usize> {
        self.terms.index(name)
    }

    pub fn nonterminal_name(&self, n: usize) -> &str {
        self.nonterms.name(n).unwrap_or("?")
    }

    /// Name of terminal `t`, or `$` for the end marker.
    pub fn terminal_name(&self, t: usize) -> &str {
        if t == self.end_marker() {
            END_MARKER
        } else {
            self.terms.name(t).unwrap_or("?")
        }
    }

    pub fn symbol_name(&self, symbol: Symbol) -> &str {
        match symbol {
            Symbol::Nonterminal(n) => self.nonterminal_name(n),
            Symbol::Terminal(t) => self.terminal_name(t),
        }
    }

    /// Renders the body of production `id`, `epsilon` when empty.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a production of this grammar.
    pub fn format_body(&self, id: ProdId) -> String {
        let prod = &self.prods[id];
        if prod.rhs.is_empty() {
            EPSILON.to_owned()
        } else {
            prod.rhs
                .iter()
                .map(|&s| self.symbol_name(s))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Renders production `id` as `A -> x y`, or `A -> epsilon` when empty.
    pub fn format_production(&self, id: ProdId) -> String {
        format!(
            "{} -> {}",
            self.nonterminal_name(self.prods[id].lhs),
            self.format_body(id)
        )
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "N = {}", self.nonterminals().collect::<Vec<_>>().join(" "))?;
        writeln!(f, "E = {}", self.terminals().collect::<Vec<_>>().join(" "))?;
        writeln!(f, "S = {}", self.nonterminal_name(self.start))?;
        writeln!(f, "P =")?;
        for n in 0..self.n_nonterms {
            let alts = &self.alternatives[n];
            if alts.is_empty() {
                continue;
            }
            let bodies: Vec<String> = alts.iter().map(|&p| self.format_body(p)).collect();
            writeln!(f, "{} -> {}", self.nonterminal_name(n), bodies.join(" | "))?;
        }
        Ok(())
    }
}
