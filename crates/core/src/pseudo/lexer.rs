use std::ops::Range;

use logos::Logos;

use crate::error::{Error, Result};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip(r"[ \t\r\f]+"))]
pub(super) enum PseudoToken {
    #[token("label")]
    Label,
    #[token("goto")]
    Goto,
    #[token("call")]
    Call,
    #[token("ret")]
    Ret,
    #[token("if")]
    If,
    #[token(".8byte")]
    Data8,

    #[token("*")]
    Star,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,

    #[regex(r"\n+")]
    Newline,

    /// Numbers keep their lexeme; sign and base survive into the IR.
    #[regex(r"[+-]?[0-9]+|[+-]?0[xX][0-9a-fA-F]+", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

pub(super) fn lex(source: &str) -> Result<Vec<(PseudoToken, Range<usize>)>> {
    let mut lexer = PseudoToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(next) = lexer.next() {
        match next {
            Ok(kind) => tokens.push((kind, lexer.span())),
            Err(()) => {
                let line = super::line_of(source, lexer.span().start);
                let escaped: String = lexer.slice().chars().flat_map(char::escape_default).collect();
                return Err(Error::Syntax(format!(
                    "line {line}: unexpected character '{escaped}'"
                )));
            }
        }
    }
    Ok(tokens)
}
