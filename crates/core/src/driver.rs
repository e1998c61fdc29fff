use crate::asm::{AssembleOutput, assemble};
use crate::codegen::lower;
use crate::error::Result;
use crate::ir::IrInst;
use crate::lexer::lex_raw;
use crate::pseudo;
use crate::token::read_tokenized;

/// Assemble pre-tokenized `KIND LEXEME` input.
pub fn assemble_tokenized(input: &str) -> Result<AssembleOutput> {
    let tokens = read_tokenized(input)?;
    assemble(&tokens)
}

/// Assemble raw ARM64 assembly text.
pub fn assemble_raw(input: &str) -> Result<AssembleOutput> {
    let tokens = lex_raw(input)?;
    assemble(&tokens)
}

/// Compile pseudocode down through IR and instruction selection, then
/// assemble the lowered token stream.
pub fn assemble_high(input: &str) -> Result<AssembleOutput> {
    let ir = pseudo::parse(input)?;
    let tokens = lower(&ir)?;
    assemble(&tokens)
}

/// Parse pseudocode into IR without assembling (the `--dump-ir` path).
pub fn parse_pseudo(input: &str) -> Result<Vec<IrInst>> {
    pseudo::parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_and_tokenized_modes_agree() {
        let raw = "loop:\nadd x1, x1, x3\nb loop\n";
        let tokenized = "LABEL loop: NEWLINE \
                         ID add REG x1 COMMA , REG x1 COMMA , REG x3 NEWLINE \
                         ID b ID loop NEWLINE";
        let from_raw = assemble_raw(raw).expect("assemble raw");
        let from_tokenized = assemble_tokenized(tokenized).expect("assemble tokenized");
        assert_eq!(from_raw.bytes, from_tokenized.bytes);
    }

    #[test]
    fn high_mode_matches_its_lowered_assembly() {
        let pseudo = "label loop\nif x1 == x2 goto done\nx1 = x1 + x3\ngoto loop\nlabel done\nret\n";
        let raw = "loop:\ncmp x1, x2\nb.eq done\nadd x1, x1, x3\nb loop\ndone:\nbr x30\n";
        let from_high = assemble_high(pseudo).expect("assemble high");
        let from_raw = assemble_raw(raw).expect("assemble raw");
        assert_eq!(from_high.bytes, from_raw.bytes);
        assert_eq!(from_high.symbols.lookup("loop").expect("lookup"), 0);
        assert_eq!(from_high.symbols.lookup("done").expect("lookup"), 16);
    }

    #[test]
    fn modulo_assignment_emits_twelve_bytes() {
        let output = assemble_high("x4 = x5 % x6\n").expect("assemble");
        assert_eq!(output.bytes.len(), 12);
    }

    #[test]
    fn output_length_tracks_statement_counts() {
        let source = "label top\n.8byte 1\n.8byte top\nx1 = x2\nret\n";
        let output = assemble_high(source).expect("assemble");
        // two data words plus two instructions
        assert_eq!(output.bytes.len(), 8 + 8 + 4 + 4);
    }

    #[test]
    fn data_labels_resolve_after_instructions() {
        let source = ".8byte target\nlabel target\nret\n";
        let output = assemble_high(source).expect("assemble");
        assert_eq!(output.bytes[..8], [8, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(output.bytes[8..], 0xD61F_03C0u32.to_le_bytes());
    }
}
