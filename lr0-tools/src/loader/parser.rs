use super::lexer::{KEY_E, KEY_N, KEY_P, KEY_S, Token, WORD_EQUALS};
use chumsky::prelude::*;

/// One `Lhs -> alt | alt` line. Words are indices into the lexer's table.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub lhs: usize,
    pub alternatives: Vec<Vec<usize>>,
}

/// A grammar file before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GrammarText {
    pub nonterminals: Vec<usize>,
    pub terminals: Vec<usize>,
    pub start: usize,
    pub rules: Vec<Rule>,
}

pub fn parser<'a>() -> impl Parser<'a, &'a [Token], GrammarText, extra::Err<Rich<'a, Token>>> {
    let word = select! { Token::Word(w) => w }.labelled("symbol");
    let symbol = select! {
        Token::Word(w) => w,
        Token::Equals => WORD_EQUALS,
    }
    .labelled("symbol");

    let eq = select! { Token::Equals => () }.labelled("`=`");
    let arrow = select! { Token::Arrow => () }.labelled("`->`");
    let bar = select! { Token::Bar => () }.labelled("`|`");
    let lf = select! { Token::LineFeed => () }.labelled("end of line");
    let eol = lf.clone().repeated().at_least(1);

    let words = symbol.clone().repeated().collect::<Vec<_>>();

    let n_line = select! { Token::Word(KEY_N) => () }
        .labelled("`N`")
        .ignore_then(eq.clone())
        .ignore_then(words.clone())
        .then_ignore(eol.clone());
    let e_line = select! { Token::Word(KEY_E) => () }
        .labelled("`E`")
        .ignore_then(eq.clone())
        .ignore_then(words)
        .then_ignore(eol.clone());
    let s_line = select! { Token::Word(KEY_S) => () }
        .labelled("`S`")
        .ignore_then(eq.clone())
        .ignore_then(word.clone())
        .then_ignore(eol.clone());
    let p_line = select! { Token::Word(KEY_P) => () }
        .labelled("`P`")
        .ignore_then(eq)
        .then_ignore(eol.clone());

    let alternative = symbol.repeated().collect::<Vec<_>>();
    let rule = word
        .then_ignore(arrow)
        .then(alternative.separated_by(bar).at_least(1).collect::<Vec<_>>())
        .then_ignore(eol)
        .map(|(lhs, alternatives)| Rule { lhs, alternatives });

    lf.repeated()
        .ignore_then(n_line)
        .then(e_line)
        .then(s_line)
        .then_ignore(p_line)
        .then(rule.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|(((nonterminals, terminals), start), rules)| GrammarText {
            nonterminals,
            terminals,
            start,
            rules,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // word ids as assigned by a fresh `LexContext`
    const S: usize = KEY_S;
    const A: usize = 5;
    const B: usize = 6;
    const EPS: usize = 7;

    fn header() -> Vec<Token> {
        vec![
            Token::Word(KEY_N),
            Token::Equals,
            Token::Word(S),
            Token::LineFeed,
            Token::Word(KEY_E),
            Token::Equals,
            Token::Word(A),
            Token::Word(B),
            Token::LineFeed,
            Token::Word(KEY_S),
            Token::Equals,
            Token::Word(S),
            Token::LineFeed,
            Token::Word(KEY_P),
            Token::Equals,
            Token::LineFeed,
        ]
    }

    #[test]
    fn header_without_rules() {
        let tokens = header();
        let g = parser().parse(&tokens).into_result().unwrap();
        assert_eq!(g.nonterminals, vec![S]);
        assert_eq!(g.terminals, vec![A, B]);
        assert_eq!(g.start, S);
        assert!(g.rules.is_empty());
    }

    #[test]
    fn rules_with_alternatives() {
        let mut tokens = header();
        tokens.extend([
            Token::LineFeed,
            Token::Word(S),
            Token::Arrow,
            Token::Word(A),
            Token::Word(S),
            Token::Word(B),
            Token::Bar,
            Token::Word(EPS),
            Token::LineFeed,
            Token::Word(S),
            Token::Arrow,
            Token::Equals,
            Token::LineFeed,
        ]);
        let g = parser().parse(&tokens).into_result().unwrap();
        assert_eq!(
            g.rules,
            vec![
                Rule {
                    lhs: S,
                    alternatives: vec![vec![A, S, B], vec![EPS]],
                },
                Rule {
                    lhs: S,
                    alternatives: vec![vec![WORD_EQUALS]],
                },
            ]
        );
    }

    #[test]
    fn empty_alternative_is_allowed() {
        let mut tokens = header();
        tokens.extend([
            Token::Word(S),
            Token::Arrow,
            Token::Bar,
            Token::Word(A),
            Token::LineFeed,
        ]);
        let g = parser().parse(&tokens).into_result().unwrap();
        assert_eq!(g.rules[0].alternatives, vec![vec![], vec![A]]);
    }

    #[test]
    fn missing_arrow_is_reported() {
        let mut tokens = header();
        let at = tokens.len();
        tokens.extend([Token::Word(S), Token::Word(A), Token::LineFeed]);
        let errs = parser().parse(&tokens).into_result().unwrap_err();
        assert!(!errs.is_empty());
        // either at the rule's first word or at the word where `->` belongs
        assert!((at..=at + 1).contains(&errs[0].span().start));
    }

    #[test]
    fn headers_must_come_in_order() {
        let mut tokens = header();
        tokens.swap(0, 4);
        assert!(parser().parse(&tokens).into_result().is_err());
    }
}
