use asm64_isa as isa;

use crate::error::{Error, Result};
use crate::symtab::SymbolTable;
use crate::token::{Token, TokenKind};

/// Result of a successful assembly: the raw little-endian byte stream plus
/// the resolved labels for the diagnostic dump.
#[derive(Debug, Clone)]
pub struct AssembleOutput {
    pub bytes: Vec<u8>,
    pub symbols: SymbolTable,
}

/// Assemble a token stream in two passes: collect label addresses, then
/// encode every statement against the finished symbol table.
pub fn assemble(tokens: &[Token]) -> Result<AssembleOutput> {
    let statements = group_statements(tokens);
    let symbols = collect_labels(&statements)?;
    let bytes = encode_statements(&statements, &symbols)?;
    Ok(AssembleOutput { bytes, symbols })
}

/// A statement is a maximal run of tokens between newlines; empty runs are
/// dropped, and a trailing unterminated run still counts.
fn group_statements<'a>(tokens: &'a [Token]) -> Vec<&'a [Token]> {
    tokens
        .split(|token| token.kind == TokenKind::Newline)
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn collect_labels(statements: &[&[Token]]) -> Result<SymbolTable> {
    let mut symbols = SymbolTable::new();
    let mut pc: u64 = 0;
    for statement in statements {
        match statement {
            [only] if only.kind == TokenKind::Label => {
                let name = only.lexeme.strip_suffix(':').unwrap_or(&only.lexeme);
                symbols.define(name, pc)?;
            }
            [first, ..] if is_data_directive(first) => pc += 8,
            _ => pc += 4,
        }
    }
    Ok(symbols)
}

fn encode_statements(statements: &[&[Token]], symbols: &SymbolTable) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut pc: u64 = 0;
    for statement in statements {
        match statement {
            [only] if only.kind == TokenKind::Label => {}
            [first, rest @ ..] if is_data_directive(first) => {
                encode_data(rest, symbols, &mut bytes)?;
                pc += 8;
            }
            _ => {
                encode_instruction(statement, symbols, pc, &mut bytes)?;
                pc += 4;
            }
        }
    }
    Ok(bytes)
}

fn is_data_directive(token: &Token) -> bool {
    token.kind == TokenKind::DotId && token.lexeme == ".8byte"
}

fn encode_data(operands: &[Token], symbols: &SymbolTable, out: &mut Vec<u8>) -> Result<()> {
    let value = match operands {
        [] => return Err(Error::MissingOperand("'.8byte' requires a value".to_string())),
        [operand] => operand,
        _ => return Err(Error::Syntax("extra tokens after '.8byte'".to_string())),
    };
    let datum = match value.kind {
        TokenKind::Id => symbols.lookup(&value.lexeme)?,
        TokenKind::Int | TokenKind::HexInt => parse_u64_auto(&value.lexeme)?,
        _ => {
            return Err(Error::Syntax(format!(
                "expected value after '.8byte', got '{}'",
                value.lexeme
            )));
        }
    };
    isa::push_u64_le(out, datum);
    Ok(())
}

/// `.8byte` numeric operands: base auto-detection (`0x` prefix means hex),
/// with negative input wrapping to its two's complement.
fn parse_u64_auto(lexeme: &str) -> Result<u64> {
    let invalid = || Error::Syntax(format!("invalid value '{lexeme}' for '.8byte'"));
    let (negative, rest) = match lexeme.as_bytes().first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };
    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        rest.parse::<u64>()
    }
    .map_err(|_| invalid())?;
    Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

/// Operand layout per mnemonic. `r` register-or-sp, `z` register-or-xzr,
/// `c` comma, `l`/`t` brackets, `i` immediate, `j` immediate-or-label.
fn pattern_for(mnemonic: &str) -> Option<&'static str> {
    let pattern = match mnemonic {
        "add" | "sub" | "mul" | "smulh" | "umulh" | "sdiv" | "udiv" => "rcrcz",
        "cmp" => "rcz",
        "br" | "blr" => "r",
        "ldur" | "stur" => "rclrcit",
        "ldr" => "rcj",
        "b" => "j",
        _ => return None,
    };
    Some(pattern)
}

fn encode_instruction(
    statement: &[Token],
    symbols: &SymbolTable,
    pc: u64,
    out: &mut Vec<u8>,
) -> Result<()> {
    let first = &statement[0];
    if first.kind != TokenKind::Id {
        return Err(Error::Syntax(format!(
            "expected instruction, got '{}'",
            first.lexeme
        )));
    }

    let mut mnemonic = first.lexeme.as_str();
    let mut args = [0i64; 3];
    let mut slot = 0;
    let mut operands = &statement[1..];

    // `b` followed by a condition suffix becomes `b.cond`, with the 4-bit
    // condition value in slot 0 and the offset decoded by the `j` pattern.
    if mnemonic == "b" {
        if let [cond, rest @ ..] = operands {
            if cond.kind == TokenKind::DotId {
                args[slot] = i64::from(isa::cond_code(&cond.lexeme)?);
                slot += 1;
                mnemonic = "b.cond";
                operands = rest;
            }
        }
    }

    let pattern = pattern_for(if mnemonic == "b.cond" { "b" } else { mnemonic })
        .ok_or_else(|| Error::UnknownInstruction(mnemonic.to_string()))?;

    let mut tokens = operands.iter();
    for code in pattern.chars() {
        let token = tokens
            .next()
            .ok_or_else(|| Error::Syntax(format!("too few operands for '{mnemonic}'")))?;
        match code {
            'r' => {
                let accepts = token.kind == TokenKind::Reg
                    || (token.kind == TokenKind::Id && token.lexeme == "sp");
                if !accepts {
                    return Err(Error::Syntax(format!(
                        "expected register or sp, got '{}'",
                        token.lexeme
                    )));
                }
                args[slot] = i64::from(isa::read_reg(&token.lexeme)?);
                slot += 1;
            }
            'z' => {
                if !matches!(token.kind, TokenKind::Reg | TokenKind::ZReg) {
                    return Err(Error::Syntax(format!(
                        "expected register or xzr, got '{}'",
                        token.lexeme
                    )));
                }
                args[slot] = i64::from(isa::read_reg(&token.lexeme)?);
                slot += 1;
            }
            'c' => {
                if token.kind != TokenKind::Comma {
                    return Err(Error::Syntax(format!("expected ',', got '{}'", token.lexeme)));
                }
            }
            'l' => {
                if token.kind != TokenKind::LBrack {
                    return Err(Error::Syntax(format!("expected '[', got '{}'", token.lexeme)));
                }
            }
            't' => {
                if token.kind != TokenKind::RBrack {
                    return Err(Error::Syntax(format!("expected ']', got '{}'", token.lexeme)));
                }
            }
            'i' => {
                if !matches!(token.kind, TokenKind::Int | TokenKind::HexInt) {
                    return Err(Error::Syntax(format!(
                        "expected immediate, got '{}'",
                        token.lexeme
                    )));
                }
                args[slot] = isa::read_imm(&token.lexeme)?;
                slot += 1;
            }
            'j' => {
                args[slot] = match token.kind {
                    TokenKind::Int | TokenKind::HexInt => isa::read_imm(&token.lexeme)?,
                    // labels resolve to a PC-relative byte offset, narrowed
                    // the way the encoder expects
                    TokenKind::Id => {
                        let target = symbols.lookup(&token.lexeme)? as i64;
                        i64::from((target.wrapping_sub(pc as i64)) as i32)
                    }
                    _ => {
                        return Err(Error::Syntax(format!(
                            "expected immediate or label, got '{}'",
                            token.lexeme
                        )));
                    }
                };
                slot += 1;
            }
            _ => unreachable!("pattern alphabet is fixed"),
        }
    }

    if tokens.next().is_some() {
        return Err(Error::Syntax(format!("extra tokens after '{mnemonic}'")));
    }

    let word = isa::encode(mnemonic, args[0], args[1], args[2])?;
    isa::push_u32_le(out, word);
    Ok(())
}
