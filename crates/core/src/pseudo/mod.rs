mod lexer;
mod parser;

use chumsky::{
    Parser as _,
    error::{Rich, RichPattern, RichReason},
    input::{Input as _, Stream},
    prelude::SimpleSpan,
};

use crate::error::{Error, Result};
use crate::ir::IrInst;

use lexer::PseudoToken;

/// Parse high-level pseudocode into IR. Blank lines and lines whose first
/// non-whitespace character is `#` are ignored.
pub fn parse(source: &str) -> Result<Vec<IrInst>> {
    let source = blank_comment_lines(source);
    let tokens = lexer::lex(&source)?;
    let end_offset = tokens.last().map(|(_, span)| span.end).unwrap_or(0);
    let token_stream = Stream::from_iter(tokens.into_iter().map(|(kind, span)| {
        let span: SimpleSpan = (span.start..span.end).into();
        (kind, span)
    }))
    .map((end_offset..end_offset).into(), |(kind, span): (_, _)| {
        (kind, span)
    });

    let (output, errors) = parser::file_parser().parse(token_stream).into_output_errors();
    if let Some(error) = errors.into_iter().next() {
        return Err(render_error(&source, error));
    }
    Ok(output.unwrap_or_default())
}

/// Comment lines are blanked rather than removed so error line numbers stay
/// aligned with the input.
fn blank_comment_lines(source: &str) -> String {
    source
        .lines()
        .map(|line| if line.trim_start().starts_with('#') { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_of(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source[..offset].bytes().filter(|byte| *byte == b'\n').count() + 1
}

fn render_error(source: &str, error: Rich<'_, PseudoToken>) -> Error {
    let line = line_of(source, error.span().start);
    let message = match error.reason() {
        RichReason::Custom(custom) => custom.to_string(),
        RichReason::ExpectedFound { expected, found } => {
            let expected = format_expected(expected);
            let found = found
                .as_deref()
                .map(token_message)
                .unwrap_or_else(|| "end of input".to_string());
            format!("expected {expected}, found {found}")
        }
    };
    Error::Syntax(format!("line {line}: {message}"))
}

fn format_expected(expected: &[RichPattern<'_, PseudoToken>]) -> String {
    let mut values = Vec::new();
    for pattern in expected {
        let text = pattern_message(pattern);
        if !values.contains(&text) {
            values.push(text);
        }
    }

    match values.as_slice() {
        [] => "something else".to_string(),
        [single] => single.clone(),
        [a, b] => format!("{a} or {b}"),
        _ => {
            let head = values[..values.len() - 1].join(", ");
            let tail = values.last().expect("non-empty values");
            format!("{head}, or {tail}")
        }
    }
}

fn pattern_message(pattern: &RichPattern<'_, PseudoToken>) -> String {
    match pattern {
        RichPattern::Token(token) => token_message(token),
        RichPattern::Label(label) => label.to_string(),
        RichPattern::Identifier(identifier) => format!("'{identifier}'"),
        RichPattern::Any => "any token".to_string(),
        RichPattern::SomethingElse => "something else".to_string(),
        RichPattern::EndOfInput => "end of input".to_string(),
        _ => "something else".to_string(),
    }
}

fn token_message(token: &PseudoToken) -> String {
    match token {
        PseudoToken::Label => "'label'".to_string(),
        PseudoToken::Goto => "'goto'".to_string(),
        PseudoToken::Call => "'call'".to_string(),
        PseudoToken::Ret => "'ret'".to_string(),
        PseudoToken::If => "'if'".to_string(),
        PseudoToken::Data8 => "'.8byte'".to_string(),
        PseudoToken::Star => "'*'".to_string(),
        PseudoToken::LParen => "'('".to_string(),
        PseudoToken::RParen => "')'".to_string(),
        PseudoToken::Plus => "'+'".to_string(),
        PseudoToken::Minus => "'-'".to_string(),
        PseudoToken::Slash => "'/'".to_string(),
        PseudoToken::Percent => "'%'".to_string(),
        PseudoToken::EqEq => "'=='".to_string(),
        PseudoToken::BangEq => "'!='".to_string(),
        PseudoToken::LtEq => "'<='".to_string(),
        PseudoToken::GtEq => "'>='".to_string(),
        PseudoToken::Lt => "'<'".to_string(),
        PseudoToken::Gt => "'>'".to_string(),
        PseudoToken::Eq => "'='".to_string(),
        PseudoToken::Newline => "end of line".to_string(),
        PseudoToken::Number(text) => format!("'{text}'"),
        PseudoToken::Ident(name) => format!("'{name}'"),
    }
}
