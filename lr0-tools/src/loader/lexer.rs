//! Lexer for grammar text files.
//!
//! Built on [`logos`]. Words are interned into a [`Symtab`] held by a
//! [`LexContext`] so tokens carry only an index; the header keys `N`, `E`,
//! `S`, `P` and the word `=` are interned first, at fixed indices, so the
//! parser can match them by value.
//!
//! Blanks and `#` comments are skipped. Line feeds are kept because a
//! production ends at the end of its line.

use anyhow::{Result, anyhow};
use logos::Logos;
use lr0::Symtab;
use std::ops::Range;

/// Index of the `N` header key.
pub const KEY_N: usize = 0;
/// Index of the `E` header key.
pub const KEY_E: usize = 1;
/// Index of the `S` header key.
pub const KEY_S: usize = 2;
/// Index of the `P` header key.
pub const KEY_P: usize = 3;
/// Index of `=` when used as a grammar symbol.
pub const WORD_EQUALS: usize = 4;

/// Words seen while lexing one file.
#[derive(Debug)]
pub struct LexContext {
    pub words: Symtab,
}

impl Default for LexContext {
    fn default() -> Self {
        Self {
            words: ["N", "E", "S", "P", "="].into_iter().collect(),
        }
    }
}

/// Tokens of the grammar text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Any other run of non-blank characters: a symbol or a header key.
    Word(usize),
    /// `=`
    Equals,
    /// `->`
    Arrow,
    /// `|`
    Bar,
    LineFeed,
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum LogosToken {
    #[token("\n")]
    LineFeed,

    #[regex(r"#[^\n]*")]
    Comment,

    #[token("->")]
    Arrow,

    #[token("|")]
    Bar,

    #[token("=")]
    Equals,

    #[regex(r"[^\s|#=]+")]
    Word,
}

pub struct Lexer<'source> {
    inner: logos::Lexer<'source, LogosToken>,
}

impl<'source> Lexer<'source> {
    pub fn new(input: &'source str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }

    /// Returns the next token and its byte range, `None` at end of input.
    pub fn next_token(&mut self, ctx: &mut LexContext) -> Option<Result<(Token, Range<usize>)>> {
        while let Some(kind) = self.inner.next() {
            let span = self.inner.span();
            let token = match kind {
                Ok(LogosToken::Comment) => continue,
                Ok(LogosToken::LineFeed) => Token::LineFeed,
                Ok(LogosToken::Arrow) => Token::Arrow,
                Ok(LogosToken::Bar) => Token::Bar,
                Ok(LogosToken::Equals) => Token::Equals,
                Ok(LogosToken::Word) => Token::Word(ctx.words.intern(self.inner.slice())),
                Err(()) => {
                    return Some(Err(anyhow!(
                        "unrecognized input {:?} at byte {}",
                        self.inner.slice(),
                        span.start
                    )));
                }
            };
            return Some(Ok((token, span)));
        }
        None
    }

    /// Tokenizes the whole input. The result always ends with a
    /// [`Token::LineFeed`], so the last line needs no newline.
    pub fn tokenize_all(
        input: &'source str,
        ctx: &mut LexContext,
    ) -> Result<(Vec<Token>, Vec<Range<usize>>)> {
        let mut lex = Lexer::new(input);
        let mut tokens = Vec::new();
        let mut spans = Vec::new();
        while let Some(next) = lex.next_token(ctx) {
            let (tok, span) = next?;
            tokens.push(tok);
            spans.push(span);
        }
        if tokens.last() != Some(&Token::LineFeed) {
            tokens.push(Token::LineFeed);
            spans.push(input.len()..input.len());
        }
        Ok((tokens, spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_and_productions() {
        let mut ctx = LexContext::default();
        let input = "N = S\nE = a\n# comment\nS -> a S | epsilon\n";
        let (toks, spans) = Lexer::tokenize_all(input, &mut ctx).unwrap();
        assert_eq!(toks.len(), spans.len());
        let s = ctx.words.index("S").unwrap();
        let a = ctx.words.index("a").unwrap();
        let eps = ctx.words.index("epsilon").unwrap();
        assert_eq!(s, KEY_S);
        assert_eq!(
            toks,
            vec![
                Token::Word(KEY_N),
                Token::Equals,
                Token::Word(s),
                Token::LineFeed,
                Token::Word(KEY_E),
                Token::Equals,
                Token::Word(a),
                Token::LineFeed,
                Token::LineFeed,
                Token::Word(s),
                Token::Arrow,
                Token::Word(a),
                Token::Word(s),
                Token::Bar,
                Token::Word(eps),
                Token::LineFeed,
            ]
        );
    }

    #[test]
    fn punctuation_words() {
        let mut ctx = LexContext::default();
        let (toks, _) = Lexer::tokenize_all("F -> ( E ) | id + *", &mut ctx).unwrap();
        // missing final newline is supplied
        assert_eq!(toks.last(), Some(&Token::LineFeed));
        assert_eq!(toks.len(), 10);
        assert!(ctx.words.contains("("));
        assert!(ctx.words.contains("+"));
        assert!(ctx.words.contains("*"));
    }

    #[test]
    fn crlf_line_endings() {
        let mut ctx = LexContext::default();
        let (toks, _) = Lexer::tokenize_all("S = S\r\nP =\r\n", &mut ctx).unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Word(KEY_S),
                Token::Equals,
                Token::Word(KEY_S),
                Token::LineFeed,
                Token::Word(KEY_P),
                Token::Equals,
                Token::LineFeed,
            ]
        );
    }
}
