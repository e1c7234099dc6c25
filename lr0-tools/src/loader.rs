//! Grammar text loader.
//!
//! Reads the line-oriented grammar format and hands `(N, E, S, P)` to
//! [`Grammar::new`]:
//!
//! ```text
//! N = S A
//! E = a b c
//! S = S
//! P =
//! S -> a S b S | a S | c
//! A -> epsilon
//! ```
//!
//! Header lines come in this order; symbols are separated by blanks; blank
//! lines and `#` comments are ignored. A rule line may list its nonterminal
//! again, in which case the alternatives are appended.

mod lexer;
mod parser;

use anyhow::{Context, Result, anyhow};
use chumsky::Parser;
use lexer::{LexContext, Lexer, Token};
use lr0::Grammar;
use std::path::Path;

/// Loads and validates the grammar stored at `path`.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Grammar> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read grammar file {}", path.display()))?;
    load_str(&text).with_context(|| format!("in grammar file {}", path.display()))
}

/// Parses and validates grammar text.
pub fn load_str(text: &str) -> Result<Grammar> {
    let mut ctx = LexContext::default();
    let (tokens, spans) = Lexer::tokenize_all(text, &mut ctx)?;

    let parsed = parser::parser()
        .parse(&tokens)
        .into_result()
        .map_err(|errs| {
            let Some(err) = errs.into_iter().next() else {
                return anyhow!("malformed grammar");
            };
            let at = err.span().start;
            let offset = spans.get(at).map_or(text.len(), |s| s.start);
            let found = match err.found() {
                Some(tok) => describe(tok, &ctx),
                None => "end of input".to_owned(),
            };
            anyhow!("line {}: unexpected {}", line_of(text, offset), found)
        })?;

    let name = |w: usize| ctx.words.name(w).unwrap_or_default();
    let nonterminals: Vec<&str> = parsed.nonterminals.iter().map(|&w| name(w)).collect();
    let terminals: Vec<&str> = parsed.terminals.iter().map(|&w| name(w)).collect();
    let rules = parsed.rules.iter().map(|rule| {
        let alternatives: Vec<Vec<&str>> = rule
            .alternatives
            .iter()
            .map(|alt| alt.iter().map(|&w| name(w)).collect())
            .collect();
        (name(rule.lhs), alternatives)
    });

    let grammar = Grammar::new(nonterminals, terminals, name(parsed.start), rules)?;
    log::debug!(
        "loaded grammar: {} nonterminals, {} terminals, {} productions",
        grammar.n_nonterminals(),
        grammar.n_terminals(),
        grammar.productions().len() - 1
    );
    Ok(grammar)
}

fn describe(token: &Token, ctx: &LexContext) -> String {
    match token {
        Token::Word(w) => format!("`{}`", ctx.words.name(*w).unwrap_or_default()),
        Token::Equals => "`=`".to_owned(),
        Token::Arrow => "`->`".to_owned(),
        Token::Bar => "`|`".to_owned(),
        Token::LineFeed => "end of line".to_owned(),
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr0::{GrammarError, Symbol};

    const BALANCED: &str = "\
N = S
E = a b c
S = S
P =
S -> a S b S | a S | c
";

    #[test]
    fn loads_balanced_grammar() {
        let g = load_str(BALANCED).unwrap();
        assert_eq!(g.nonterminals().collect::<Vec<_>>(), vec!["S"]);
        assert_eq!(g.terminals().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(g.productions_for("S").unwrap().len(), 3);
        assert_eq!(g.format_production(1), "S -> a S b S");
    }

    #[test]
    fn display_round_trips() {
        let g = load_str(BALANCED).unwrap();
        let again = load_str(&g.to_string()).unwrap();
        assert_eq!(g, again);
        assert_eq!(g.to_string(), BALANCED);
    }

    #[test]
    fn comments_blank_lines_and_repeated_rules() {
        let text = "
# expression grammar
N = E T F
E = + * ( ) id
S = E
P =

E -> E + T | T   # left recursive
T -> T * F | F
F -> ( E )
F -> id";
        let g = load_str(text).unwrap();
        assert_eq!(g.productions().len(), 7);
        assert_eq!(g.format_production(6), "F -> id");
        assert_eq!(g.symbol("("), Some(Symbol::Terminal(2)));
    }

    #[test]
    fn epsilon_and_equals_symbols() {
        let text = "N = S A\nE = = x\nS = S\nP =\nS -> A = x\nA -> epsilon\n";
        let g = load_str(text).unwrap();
        assert_eq!(g.format_production(1), "S -> A = x");
        assert!(g.productions_for("A").unwrap()[0].is_empty());
    }

    #[test]
    fn validation_errors_pass_through() {
        let text = "N = S\nE = a\nS = S\nP =\nS -> X\n";
        let err = load_str(text).unwrap_err();
        let inner = err.downcast_ref::<GrammarError>().unwrap();
        assert!(matches!(inner, GrammarError::UnknownSymbol { symbol, .. } if symbol == "X"));

        let text = "N = S\nE = a\nS = Z\nP =\nS -> a\n";
        let err = load_str(text).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GrammarError>(),
            Some(&GrammarError::InvalidStartSymbol("Z".into()))
        );
    }

    #[test]
    fn syntax_errors_name_the_line() {
        let text = "N = S\nE = a\nS = S\nP =\nS a\n";
        let msg = load_str(text).unwrap_err().to_string();
        assert!(msg.starts_with("line 5: unexpected"), "{msg}");

        let text = "N = S\nS = S\n";
        let msg = load_str(text).unwrap_err().to_string();
        assert!(msg.contains("line 2"), "{msg}");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_file("/nonexistent/grammar.txt").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/grammar.txt"));
    }

    #[test]
    fn loads_bundled_grammars() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("grammars");
        for (file, productions) in [("balanced.txt", 4), ("expr.txt", 7), ("prefix.txt", 5)] {
            let g = load_file(dir.join(file)).unwrap();
            assert_eq!(g.productions().len(), productions, "{file}");
        }
    }
}
