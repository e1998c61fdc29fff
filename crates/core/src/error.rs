use thiserror::Error;

use asm64_isa::EncodeError;

/// Every failure in the pipeline is fatal; the front-end reports the first
/// one and exits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Syntax(String),
    #[error("unknown instruction '{0}'")]
    UnknownInstruction(String),
    #[error("invalid register '{0}'")]
    InvalidRegister(String),
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),
    #[error("missing operand: {0}")]
    MissingOperand(String),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
