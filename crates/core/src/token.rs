use crate::error::{Error, Result};

/// The closed token alphabet shared by every front-end. The assembler only
/// ever sees these kinds, whether they came from the pre-tokenized reader,
/// the raw-assembly lexer, or IR lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    DotId,
    Label,
    Id,
    HexInt,
    Reg,
    ZReg,
    Int,
    Comma,
    LBrack,
    RBrack,
    Newline,
}

impl TokenKind {
    pub fn from_name(name: &str) -> Option<TokenKind> {
        let kind = match name {
            "DOTID" => TokenKind::DotId,
            "LABEL" => TokenKind::Label,
            "ID" => TokenKind::Id,
            "HEXINT" => TokenKind::HexInt,
            "REG" => TokenKind::Reg,
            "ZREG" => TokenKind::ZReg,
            "INT" => TokenKind::Int,
            "COMMA" => TokenKind::Comma,
            "LBRACK" => TokenKind::LBrack,
            "RBRACK" => TokenKind::RBrack,
            "NEWLINE" => TokenKind::Newline,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::DotId => "DOTID",
            TokenKind::Label => "LABEL",
            TokenKind::Id => "ID",
            TokenKind::HexInt => "HEXINT",
            TokenKind::Reg => "REG",
            TokenKind::ZReg => "ZREG",
            TokenKind::Int => "INT",
            TokenKind::Comma => "COMMA",
            TokenKind::LBrack => "LBRACK",
            TokenKind::RBrack => "RBRACK",
            TokenKind::Newline => "NEWLINE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
        }
    }

    pub fn newline() -> Token {
        Token {
            kind: TokenKind::Newline,
            lexeme: String::new(),
        }
    }
}

/// Read the whitespace-separated pre-tokenized stream: `KIND LEXEME` pairs,
/// except `NEWLINE`, which carries no lexeme.
pub fn read_tokenized(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut words = input.split_ascii_whitespace();
    while let Some(name) = words.next() {
        let kind = TokenKind::from_name(name)
            .ok_or_else(|| Error::Syntax(format!("unrecognized token kind '{name}'")))?;
        let lexeme = if kind == TokenKind::Newline {
            String::new()
        } else {
            words
                .next()
                .ok_or_else(|| Error::Syntax(format!("missing lexeme after '{name}'")))?
                .to_string()
        };
        tokens.push(Token { kind, lexeme });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_kind_lexeme_pairs() {
        let tokens = read_tokenized("ID add REG x1 COMMA , NEWLINE").expect("read");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Id, "add"),
                Token::new(TokenKind::Reg, "x1"),
                Token::new(TokenKind::Comma, ","),
                Token::newline(),
            ]
        );
    }

    #[test]
    fn newline_carries_no_lexeme() {
        let tokens = read_tokenized("NEWLINE NEWLINE").expect("read");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|token| token.lexeme.is_empty()));
    }

    #[test]
    fn rejects_unknown_kind_names() {
        let err = read_tokenized("FLOAT 1.5").expect_err("must fail");
        assert!(err.to_string().contains("unrecognized token kind 'FLOAT'"));
    }

    #[test]
    fn rejects_kind_without_lexeme() {
        let err = read_tokenized("ID add REG").expect_err("must fail");
        assert!(err.to_string().contains("missing lexeme after 'REG'"));
    }

    #[test]
    fn kind_names_round_trip() {
        for name in [
            "DOTID", "LABEL", "ID", "HEXINT", "REG", "ZREG", "INT", "COMMA", "LBRACK", "RBRACK",
            "NEWLINE",
        ] {
            let kind = TokenKind::from_name(name).expect("known kind");
            assert_eq!(kind.name(), name);
        }
        assert!(TokenKind::from_name("NONE").is_none());
    }
}
