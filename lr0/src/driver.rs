//! Shift-reduce driver over compiled [`Tables`].

use crate::automaton::StateId;
use crate::error::ParseError;
use crate::table::{Action, Tables};

/// Result of one parse. Rejection is a value, not an error to propagate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted,
    Rejected(ParseError),
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParseOutcome::Accepted)
    }

    pub fn error(&self) -> Option<ParseError> {
        match self {
            ParseOutcome::Accepted => None,
            ParseOutcome::Rejected(err) => Some(*err),
        }
    }
}

impl From<Result<(), ParseError>> for ParseOutcome {
    fn from(result: Result<(), ParseError>) -> Self {
        match result {
            Ok(()) => ParseOutcome::Accepted,
            Err(err) => ParseOutcome::Rejected(err),
        }
    }
}

/// Counters of the last parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Input symbols looked at, the end marker included.
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
}

/// A shift-reduce stack machine borrowing a set of tables.
///
/// The driver owns only its stack and counters, so any number of drivers can
/// run over the same [`Tables`], and one driver can be reused for any number
/// of inputs.
///
/// ```rust
/// # use lr0::{Automaton, Grammar, ParseDriver, ParseOutcome, Tables};
/// let g = Grammar::new(["S"], ["(", ")", "x"], "S", [("S", vec![vec!["(", "S", ")"], vec!["x"]])])?;
/// let tables = Tables::compile(&Automaton::build(g)?)?;
/// let mut driver = ParseDriver::new(&tables);
/// assert_eq!(driver.parse(&["(", "x", ")"]), ParseOutcome::Accepted);
/// assert!(!driver.parse(&["(", "x"]).is_accepted());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParseDriver<'t> {
    tables: &'t Tables,
    stack: Vec<StateId>,
    stats: ParserStats,
    reduction_limit: Option<usize>,
}

impl<'t> ParseDriver<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        Self {
            tables,
            stack: Vec::new(),
            stats: ParserStats::default(),
            reduction_limit: None,
        }
    }

    /// Caps the number of reductions allowed between two shifts.
    ///
    /// Without a cap the bound is `n_states * (depth + n_states)`, where
    /// `depth` is the stack depth after the last shift.
    pub fn with_reduction_limit(mut self, limit: usize) -> Self {
        self.reduction_limit = Some(limit);
        self
    }

    /// Parses a sequence of terminal names. A name that is not a declared
    /// terminal is rejected as [`ParseError::UnexpectedSymbol`] once the
    /// driver reaches it.
    pub fn parse<S: AsRef<str>>(&mut self, input: &[S]) -> ParseOutcome {
        let grammar = self.tables.grammar();
        let ids: Vec<Option<usize>> = input
            .iter()
            .map(|name| grammar.terminal(name.as_ref()))
            .collect();
        self.run(&ids).into()
    }

    /// Parses a sequence of terminal ids. Ids outside the declared terminals
    /// (the end marker included) are unexpected symbols.
    pub fn parse_ids(&mut self, input: &[usize]) -> ParseOutcome {
        let n_terminals = self.tables.grammar().n_terminals();
        let ids: Vec<Option<usize>> = input
            .iter()
            .map(|&t| (t < n_terminals).then_some(t))
            .collect();
        self.run(&ids).into()
    }

    /// Counters of the last call to `parse`.
    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    /// The state stack as the last parse left it.
    pub fn stack(&self) -> &[StateId] {
        &self.stack
    }

    fn limit(&self, depth: usize) -> usize {
        let n = self.tables.n_states();
        self.reduction_limit
            .unwrap_or_else(|| n.saturating_mul(depth.saturating_add(n)))
    }

    fn run(&mut self, input: &[Option<usize>]) -> Result<(), ParseError> {
        let tables = self.tables;
        let grammar = tables.grammar();
        let end = grammar.end_marker();

        self.stack.clear();
        self.stack.push(0);
        self.stats = ParserStats::default();

        let mut pos = 0;
        let mut reductions = 0;
        let mut limit = self.limit(self.stack.len());

        loop {
            let state = *self.stack.last().ok_or(ParseError::CorruptTable { state: 0 })?;
            let lookahead = match input.get(pos) {
                Some(&t) => t,
                None => Some(end),
            };
            self.stats.tokens = self.stats.tokens.max(pos + 1);
            if log::log_enabled!(log::Level::Trace) {
                self.dump_stack(lookahead);
            }

            let Some(action) = lookahead.and_then(|t| tables.action(state, t)) else {
                return Err(if pos >= input.len() {
                    ParseError::PrematureEnd
                } else {
                    ParseError::UnexpectedSymbol(pos)
                });
            };

            match action {
                Action::Shift(next) => {
                    log::trace!("Shift {}", next);
                    if next >= tables.n_states() {
                        return Err(ParseError::CorruptTable { state });
                    }
                    self.stack.push(next);
                    pos += 1;
                    reductions = 0;
                    limit = self.limit(self.stack.len());
                    self.stats.shifts += 1;
                }

                Action::Reduce(prod_id) => {
                    reductions += 1;
                    if reductions > limit {
                        log::debug!("{} reductions without a shift, giving up", reductions);
                        return Err(ParseError::InternalLoopGuardTripped);
                    }
                    let Some(prod) = grammar.productions().get(prod_id) else {
                        return Err(ParseError::CorruptTable { state });
                    };
                    log::trace!("Reduce {}", grammar.format_production(prod_id));
                    // the bottom state must survive the pop
                    if prod.len() >= self.stack.len() {
                        return Err(ParseError::CorruptTable { state });
                    }
                    self.stack.truncate(self.stack.len() - prod.len());
                    let top = *self.stack.last().ok_or(ParseError::CorruptTable { state })?;
                    let Some(next) = tables.goto(top, prod.lhs()) else {
                        return Err(ParseError::CorruptTable { state: top });
                    };
                    self.stack.push(next);
                    self.stats.reductions += 1;
                }

                Action::Accept => {
                    log::trace!("Accept");
                    return Ok(());
                }
            }
        }
    }

    fn dump_stack(&self, lookahead: Option<usize>) {
        let mut output = String::new();
        for state in &self.stack {
            output.push_str(&format!("<{}> ", state));
        }
        let name = match lookahead {
            Some(t) => self.tables.grammar().terminal_name(t),
            None => "?",
        };
        log::trace!("{} <-  {}", output, name);
    }
}
