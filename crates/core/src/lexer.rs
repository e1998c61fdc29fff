use logos::Logos;

use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip(r"[ \t\r\f]+"))]
enum RawToken {
    #[token(",")]
    Comma,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("\n")]
    Newline,
    // comments run to end of line; the lexer drops them outright
    #[regex(r"(;|//)[^\n]*", logos::skip)]
    Comment,
    #[regex(r"[^,\[\]\s;/]+", |lex| lex.slice().to_string())]
    Word(String),
}

const COND_SUFFIXES: [&str; 10] = [
    ".eq", ".ne", ".hs", ".lo", ".hi", ".ls", ".ge", ".lt", ".gt", ".le",
];

/// Lex raw ARM64 assembly text into the shared token alphabet. `;` and `//`
/// start comments.
pub fn lex_raw(input: &str) -> Result<Vec<Token>> {
    let mut lexer = RawToken::lexer(input);
    let mut tokens = Vec::new();
    while let Some(next) = lexer.next() {
        match next {
            Ok(RawToken::Comma) => tokens.push(Token::new(TokenKind::Comma, ",")),
            Ok(RawToken::LBrack) => tokens.push(Token::new(TokenKind::LBrack, "[")),
            Ok(RawToken::RBrack) => tokens.push(Token::new(TokenKind::RBrack, "]")),
            Ok(RawToken::Newline) => tokens.push(Token::newline()),
            Ok(RawToken::Comment) => {}
            Ok(RawToken::Word(word)) => classify_word(&word, &mut tokens),
            Err(()) => {
                let escaped: String = lexer.slice().chars().flat_map(char::escape_default).collect();
                return Err(Error::Syntax(format!("unexpected character '{escaped}'")));
            }
        }
    }
    Ok(tokens)
}

/// `b.<cond>` words split into `ID "b"` plus the condition suffix so the
/// assembler sees the same shape the IR lowering produces.
fn classify_word(word: &str, out: &mut Vec<Token>) {
    if let Some(suffix) = word.strip_prefix('b') {
        if COND_SUFFIXES.contains(&suffix) {
            out.push(Token::new(TokenKind::Id, "b"));
            out.push(Token::new(TokenKind::DotId, suffix));
            return;
        }
    }
    out.push(classify(word));
}

fn classify(word: &str) -> Token {
    if word.ends_with(':') {
        return Token::new(TokenKind::Label, word);
    }
    if word.starts_with('.') {
        return Token::new(TokenKind::DotId, word);
    }
    if is_hex(word) {
        return Token::new(TokenKind::HexInt, word);
    }
    if is_integer(word) {
        return Token::new(TokenKind::Int, word);
    }
    if word == "xzr" {
        return Token::new(TokenKind::ZReg, word);
    }
    let bytes = word.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'x' && bytes[1].is_ascii_digit() {
        return Token::new(TokenKind::Reg, word);
    }
    // instruction names, label references, and sp all land here
    Token::new(TokenKind::Id, word)
}

fn is_hex(word: &str) -> bool {
    word.len() > 2 && (word.starts_with("0x") || word.starts_with("0X"))
}

fn is_integer(word: &str) -> bool {
    let digits = match word.as_bytes().first() {
        Some(b'-') | Some(b'+') => &word[1..],
        _ => word,
    };
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}
