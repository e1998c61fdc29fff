use crate::error::{Error, Result};
use crate::ir::{BinOp, IrInst};
use crate::token::{Token, TokenKind};

/// Lower IR into the ARM64 token stream consumed by the assembler. Each IR
/// instruction becomes one statement, except the multi-statement expansions
/// (modulo, compare-and-branch), which insert their own newlines.
pub fn lower(instructions: &[IrInst]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for inst in instructions {
        lower_inst(inst, &mut tokens)?;
        tokens.push(Token::newline());
    }
    Ok(tokens)
}

fn lower_inst(inst: &IrInst, out: &mut Vec<Token>) -> Result<()> {
    match inst {
        IrInst::Label { name } => {
            out.push(Token::new(TokenKind::Label, format!("{name}:")));
        }
        IrInst::Bin { op, dst, lhs, rhs } => match op {
            BinOp::Add => push_three_reg("add", dst, lhs, rhs, out)?,
            BinOp::Sub => push_three_reg("sub", dst, lhs, rhs, out)?,
            BinOp::Mul => push_three_reg("mul", dst, lhs, rhs, out)?,
            BinOp::Div => push_three_reg("sdiv", dst, lhs, rhs, out)?,
            BinOp::Mod => {
                // dst = lhs % rhs has no single instruction:
                //   sdiv dst, lhs, rhs
                //   mul  dst, dst, rhs
                //   sub  dst, lhs, dst
                push_three_reg("sdiv", dst, lhs, rhs, out)?;
                out.push(Token::newline());
                push_three_reg("mul", dst, dst, rhs, out)?;
                out.push(Token::newline());
                push_three_reg("sub", dst, lhs, dst, out)?;
            }
        },
        IrInst::Mov { dst, src } => {
            push_three_reg("add", dst, src, "xzr", out)?;
        }
        IrInst::Load { dst, base, offset } => {
            out.push(Token::new(TokenKind::Id, "ldur"));
            out.push(reg_token(dst)?);
            out.push(Token::new(TokenKind::Comma, ","));
            out.push(Token::new(TokenKind::LBrack, "["));
            out.push(reg_token(base)?);
            out.push(Token::new(TokenKind::Comma, ","));
            out.push(imm_token(offset)?);
            out.push(Token::new(TokenKind::RBrack, "]"));
        }
        IrInst::Store { base, src, offset } => {
            out.push(Token::new(TokenKind::Id, "stur"));
            out.push(reg_token(src)?);
            out.push(Token::new(TokenKind::Comma, ","));
            out.push(Token::new(TokenKind::LBrack, "["));
            out.push(reg_token(base)?);
            out.push(Token::new(TokenKind::Comma, ","));
            out.push(imm_token(offset)?);
            out.push(Token::new(TokenKind::RBrack, "]"));
        }
        IrInst::CmpBranch { lhs, rhs, cond, target } => {
            out.push(Token::new(TokenKind::Id, "cmp"));
            out.push(reg_token(lhs)?);
            out.push(Token::new(TokenKind::Comma, ","));
            out.push(reg_token(rhs)?);
            out.push(Token::newline());
            out.push(Token::new(TokenKind::Id, "b"));
            out.push(Token::new(TokenKind::DotId, cond.suffix()));
            out.push(imm_token(target)?);
        }
        IrInst::Branch { target } => {
            out.push(Token::new(TokenKind::Id, "b"));
            out.push(imm_token(target)?);
        }
        IrInst::Call { target } => {
            out.push(Token::new(TokenKind::Id, "blr"));
            out.push(reg_token(target)?);
        }
        IrInst::Ret => {
            out.push(Token::new(TokenKind::Id, "br"));
            out.push(Token::new(TokenKind::Reg, "x30"));
        }
        IrInst::Data8 { value } => {
            out.push(Token::new(TokenKind::DotId, ".8byte"));
            out.push(imm_token(value)?);
        }
    }
    Ok(())
}

fn push_three_reg(
    mnemonic: &str,
    a: &str,
    b: &str,
    c: &str,
    out: &mut Vec<Token>,
) -> Result<()> {
    out.push(Token::new(TokenKind::Id, mnemonic));
    out.push(reg_token(a)?);
    out.push(Token::new(TokenKind::Comma, ","));
    out.push(reg_token(b)?);
    out.push(Token::new(TokenKind::Comma, ","));
    out.push(reg_token(c)?);
    Ok(())
}

fn reg_token(lexeme: &str) -> Result<Token> {
    if lexeme == "xzr" {
        return Ok(Token::new(TokenKind::ZReg, lexeme));
    }
    if lexeme == "sp" {
        return Ok(Token::new(TokenKind::Id, lexeme));
    }
    let bytes = lexeme.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'x' && bytes[1].is_ascii_digit() {
        return Ok(Token::new(TokenKind::Reg, lexeme));
    }
    Err(Error::InvalidRegister(lexeme.to_string()))
}

/// Classify an immediate lexeme: hex, signed decimal, or a label reference.
fn imm_token(lexeme: &str) -> Result<Token> {
    if lexeme.is_empty() {
        return Err(Error::MissingOperand("empty immediate or label".to_string()));
    }
    if lexeme.len() > 2 && (lexeme.starts_with("0x") || lexeme.starts_with("0X")) {
        return Ok(Token::new(TokenKind::HexInt, lexeme));
    }
    let digits = match lexeme.as_bytes().first() {
        Some(b'-') | Some(b'+') => &lexeme[1..],
        _ => lexeme,
    };
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Ok(Token::new(TokenKind::Int, lexeme));
    }
    Ok(Token::new(TokenKind::Id, lexeme))
}
