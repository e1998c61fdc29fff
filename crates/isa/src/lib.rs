use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("unknown instruction '{mnemonic}'")]
    UnknownMnemonic { mnemonic: String },
    #[error("invalid register '{lexeme}'")]
    InvalidRegister { lexeme: String },
    #[error("register out of range '{lexeme}'")]
    RegisterOutOfRange { lexeme: String },
    #[error("invalid register value {value}")]
    InvalidRegisterValue { value: i64 },
    #[error("invalid immediate '{lexeme}'")]
    InvalidImmediate { lexeme: String },
    #[error("immediate out of range for {mnemonic}")]
    ImmediateOutOfRange { mnemonic: &'static str },
    #[error("{mnemonic} offset must be divisible by 4")]
    MisalignedOffset { mnemonic: &'static str },
    #[error("invalid condition code {value}")]
    InvalidConditionValue { value: i64 },
    #[error("unknown condition '{suffix}'")]
    UnknownCondition { suffix: String },
}

/// Encode one instruction into its 32-bit machine word. Operands arrive as
/// up to three integer slots already decoded by the assembler; unused slots
/// are zero.
pub fn encode(mnemonic: &str, a: i64, b: i64, c: i64) -> Result<u32, EncodeError> {
    match mnemonic {
        "add" => encode_rrr(0x8B20_6000, a, b, c),
        "sub" => encode_rrr(0xCB20_6000, a, b, c),
        "mul" => encode_rrr(0x9B00_7C00, a, b, c),
        "smulh" => encode_rrr(0x9B40_7C00, a, b, c),
        "umulh" => encode_rrr(0x9BC0_7C00, a, b, c),
        "sdiv" => encode_rrr(0x9AC0_0C00, a, b, c),
        "udiv" => encode_rrr(0x9AC0_0800, a, b, c),
        "cmp" => encode_cmp(a, b),
        "br" => encode_branch_reg(0xD61F_0000, a),
        "blr" => encode_branch_reg(0xD63F_0000, a),
        "ldur" => encode_mem(0xF840_0000, "ldur", a, b, c),
        "stur" => encode_mem(0xF800_0000, "stur", a, b, c),
        "ldr" => encode_ldr(a, b),
        "b" => encode_branch(a),
        "b.cond" => encode_bcond(a, b),
        _ => Err(EncodeError::UnknownMnemonic {
            mnemonic: mnemonic.to_string(),
        }),
    }
}

/// Decode a register lexeme. `xzr` and `sp` both name register 31; `xN`
/// accepts only N in 0..=30.
pub fn read_reg(lexeme: &str) -> Result<u32, EncodeError> {
    if lexeme == "xzr" || lexeme == "sp" {
        return Ok(31);
    }
    let number = lexeme.strip_prefix('x').ok_or_else(|| EncodeError::InvalidRegister {
        lexeme: lexeme.to_string(),
    })?;
    if number.is_empty() || !number.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(EncodeError::InvalidRegister {
            lexeme: lexeme.to_string(),
        });
    }
    let value: u32 = number.parse().map_err(|_| EncodeError::RegisterOutOfRange {
        lexeme: lexeme.to_string(),
    })?;
    if value > 30 {
        return Err(EncodeError::RegisterOutOfRange {
            lexeme: lexeme.to_string(),
        });
    }
    Ok(value)
}

/// Parse an immediate lexeme: decimal with optional leading sign, or hex
/// with a case-insensitive `0x` prefix.
pub fn read_imm(lexeme: &str) -> Result<i64, EncodeError> {
    let invalid = || EncodeError::InvalidImmediate {
        lexeme: lexeme.to_string(),
    };
    let (negative, rest) = match lexeme.as_bytes().first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };
    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        rest.parse::<i64>()
    }
    .map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

pub fn valid_signed_imm(value: i64, bits: u32) -> bool {
    let lo = -(1i64 << (bits - 1));
    let hi = (1i64 << (bits - 1)) - 1;
    (lo..=hi).contains(&value)
}

/// Map a `b.cond` suffix to its 4-bit condition value.
pub fn cond_code(suffix: &str) -> Result<u32, EncodeError> {
    let value = match suffix {
        ".eq" => 0,
        ".ne" => 1,
        ".hs" => 2,
        ".lo" => 3,
        ".hi" => 8,
        ".ls" => 9,
        ".ge" => 10,
        ".lt" => 11,
        ".gt" => 12,
        ".le" => 13,
        _ => {
            return Err(EncodeError::UnknownCondition {
                suffix: suffix.to_string(),
            });
        }
    };
    Ok(value)
}

pub fn push_u32_le(out: &mut Vec<u8>, word: u32) {
    out.extend_from_slice(&word.to_le_bytes());
}

pub fn push_u64_le(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn require_reg(value: i64) -> Result<u32, EncodeError> {
    if (0..=31).contains(&value) {
        Ok(value as u32)
    } else {
        Err(EncodeError::InvalidRegisterValue { value })
    }
}

fn encode_rrr(base: u32, rd: i64, rn: i64, rm: i64) -> Result<u32, EncodeError> {
    let rd = require_reg(rd)?;
    let rn = require_reg(rn)?;
    let rm = require_reg(rm)?;
    Ok(base | rd | (rn << 5) | (rm << 16))
}

fn encode_cmp(rn: i64, rm: i64) -> Result<u32, EncodeError> {
    let rn = require_reg(rn)?;
    let rm = require_reg(rm)?;
    Ok(0xEB20_601F | (rn << 5) | (rm << 16))
}

fn encode_branch_reg(base: u32, rn: i64) -> Result<u32, EncodeError> {
    let rn = require_reg(rn)?;
    Ok(base | (rn << 5))
}

fn encode_mem(base: u32, mnemonic: &'static str, rt: i64, rn: i64, imm: i64) -> Result<u32, EncodeError> {
    let rt = require_reg(rt)?;
    let rn = require_reg(rn)?;
    if !valid_signed_imm(imm, 9) {
        return Err(EncodeError::ImmediateOutOfRange { mnemonic });
    }
    // negative offsets truncate to the 9-bit field
    let imm9 = (imm as u32) & 0x1FF;
    Ok(base | rt | (rn << 5) | (imm9 << 12))
}

fn encode_ldr(rd: i64, offset: i64) -> Result<u32, EncodeError> {
    if offset % 4 != 0 {
        return Err(EncodeError::MisalignedOffset { mnemonic: "ldr" });
    }
    let rd = require_reg(rd)?;
    if !valid_signed_imm(offset / 4, 19) {
        return Err(EncodeError::ImmediateOutOfRange { mnemonic: "ldr" });
    }
    let imm19 = ((offset / 4) as u32) & 0x7FFFF;
    Ok(0x5800_0000 | rd | (imm19 << 5))
}

fn encode_branch(offset: i64) -> Result<u32, EncodeError> {
    if offset % 4 != 0 {
        return Err(EncodeError::MisalignedOffset { mnemonic: "b" });
    }
    if !valid_signed_imm(offset / 4, 26) {
        return Err(EncodeError::ImmediateOutOfRange { mnemonic: "b" });
    }
    let imm26 = ((offset / 4) as u32) & 0x3FF_FFFF;
    Ok(0x1400_0000 | imm26)
}

fn encode_bcond(cond: i64, offset: i64) -> Result<u32, EncodeError> {
    if offset % 4 != 0 {
        return Err(EncodeError::MisalignedOffset { mnemonic: "b.cond" });
    }
    if !valid_signed_imm(offset / 4, 19) {
        return Err(EncodeError::ImmediateOutOfRange { mnemonic: "b.cond" });
    }
    if !(0..=13).contains(&cond) {
        return Err(EncodeError::InvalidConditionValue { value: cond });
    }
    let imm19 = ((offset / 4) as u32) & 0x7FFFF;
    Ok(0x5400_0000 | (imm19 << 5) | ((cond as u32) & 0x1F))
}
