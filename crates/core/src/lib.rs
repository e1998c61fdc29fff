pub mod asm;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod pseudo;
pub mod symtab;
pub mod token;

pub use asm::AssembleOutput;
pub use driver::{assemble_high, assemble_raw, assemble_tokenized, parse_pseudo};
pub use error::{Error, Result};
