use std::fmt::Write as _;

/// Target-independent instruction set produced by the pseudocode parser.
/// Register operands and immediates stay as source lexemes; classification
/// into token kinds happens at lowering time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrInst {
    Label { name: String },
    Bin { op: BinOp, dst: String, lhs: String, rhs: String },
    Mov { dst: String, src: String },
    Load { dst: String, base: String, offset: String },
    Store { base: String, src: String, offset: String },
    CmpBranch { lhs: String, rhs: String, cond: CondOp, target: String },
    Branch { target: String },
    Call { target: String },
    Ret,
    Data8 { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn name(self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Mod => "MOD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CondOp {
    /// The comparison operator as written in pseudocode.
    pub fn symbol(self) -> &'static str {
        match self {
            CondOp::Eq => "==",
            CondOp::Ne => "!=",
            CondOp::Lt => "<",
            CondOp::Le => "<=",
            CondOp::Gt => ">",
            CondOp::Ge => ">=",
        }
    }

    /// The matching `b.cond` suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            CondOp::Eq => ".eq",
            CondOp::Ne => ".ne",
            CondOp::Lt => ".lt",
            CondOp::Le => ".le",
            CondOp::Gt => ".gt",
            CondOp::Ge => ".ge",
        }
    }
}

/// Render the IR in the human-readable form used by `--dump-ir`.
pub fn dump(instructions: &[IrInst]) -> String {
    let mut out = String::new();
    for inst in instructions {
        match inst {
            IrInst::Label { name } => {
                let _ = writeln!(out, "{name}:");
            }
            IrInst::Bin { op, dst, lhs, rhs } => {
                let _ = writeln!(out, "  {} {dst}, {lhs}, {rhs}", op.name());
            }
            IrInst::Mov { dst, src } => {
                let _ = writeln!(out, "  MOV {dst}, {src}");
            }
            IrInst::Load { dst, base, offset } => {
                let _ = writeln!(out, "  LOAD {dst}, [{base} + {offset}]");
            }
            IrInst::Store { base, src, offset } => {
                let _ = writeln!(out, "  STORE [{base} + {offset}], {src}");
            }
            IrInst::CmpBranch { lhs, rhs, cond, target } => {
                let _ = writeln!(out, "  CMP_BRANCH {lhs} {} {rhs}, {target}", cond.symbol());
            }
            IrInst::Branch { target } => {
                let _ = writeln!(out, "  BRANCH {target}");
            }
            IrInst::Call { target } => {
                let _ = writeln!(out, "  CALL {target}");
            }
            IrInst::Ret => {
                let _ = writeln!(out, "  RET");
            }
            IrInst::Data8 { value } => {
                let _ = writeln!(out, "  DATA8 {value}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_renders_every_variant() {
        let instructions = vec![
            IrInst::Label { name: "loop".to_string() },
            IrInst::Bin {
                op: BinOp::Add,
                dst: "x1".to_string(),
                lhs: "x2".to_string(),
                rhs: "x3".to_string(),
            },
            IrInst::Mov { dst: "x4".to_string(), src: "x5".to_string() },
            IrInst::Load {
                dst: "x1".to_string(),
                base: "x2".to_string(),
                offset: "8".to_string(),
            },
            IrInst::Store {
                base: "x6".to_string(),
                src: "x7".to_string(),
                offset: "0".to_string(),
            },
            IrInst::CmpBranch {
                lhs: "x1".to_string(),
                rhs: "x2".to_string(),
                cond: CondOp::Ne,
                target: "loop".to_string(),
            },
            IrInst::Branch { target: "loop".to_string() },
            IrInst::Call { target: "x9".to_string() },
            IrInst::Ret,
            IrInst::Data8 { value: "0x10".to_string() },
        ];

        let rendered = dump(&instructions);
        assert_eq!(
            rendered,
            "loop:\n\
             \x20 ADD x1, x2, x3\n\
             \x20 MOV x4, x5\n\
             \x20 LOAD x1, [x2 + 8]\n\
             \x20 STORE [x6 + 0], x7\n\
             \x20 CMP_BRANCH x1 != x2, loop\n\
             \x20 BRANCH loop\n\
             \x20 CALL x9\n\
             \x20 RET\n\
             \x20 DATA8 0x10\n"
        );
    }
}
