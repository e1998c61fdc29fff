use chumsky::{
    IterParser, Parser as _,
    input::ValueInput,
    prelude::{SimpleSpan, end, just},
};

use crate::ir::{BinOp, CondOp, IrInst};

use super::lexer::PseudoToken;

pub(super) type ParseError<'src> = chumsky::error::Rich<'src, PseudoToken>;
type ParseExtra<'src> = chumsky::extra::Err<ParseError<'src>>;

/// Register lexemes: `xzr`, `sp`, or `xN` with an all-decimal N.
pub(super) fn is_register(lexeme: &str) -> bool {
    if lexeme == "xzr" || lexeme == "sp" {
        return true;
    }
    lexeme
        .strip_prefix('x')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()))
}

fn reg_parser<'src, I>() -> impl chumsky::Parser<'src, I, String, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    chumsky::select! { PseudoToken::Ident(name) if is_register(&name) => name }
}

fn ident_parser<'src, I>() -> impl chumsky::Parser<'src, I, String, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    chumsky::select! { PseudoToken::Ident(name) => name }
}

fn number_parser<'src, I>() -> impl chumsky::Parser<'src, I, String, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    chumsky::select! { PseudoToken::Number(text) => text }
}

/// A `.8byte` operand: numeric literal or label reference.
fn value_parser<'src, I>() -> impl chumsky::Parser<'src, I, String, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    chumsky::select! {
        PseudoToken::Number(text) => text,
        PseudoToken::Ident(name) => name,
    }
}

fn cmp_op_parser<'src, I>() -> impl chumsky::Parser<'src, I, CondOp, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    just(PseudoToken::EqEq)
        .to(CondOp::Eq)
        .or(just(PseudoToken::BangEq).to(CondOp::Ne))
        .or(just(PseudoToken::LtEq).to(CondOp::Le))
        .or(just(PseudoToken::GtEq).to(CondOp::Ge))
        .or(just(PseudoToken::Lt).to(CondOp::Lt))
        .or(just(PseudoToken::Gt).to(CondOp::Gt))
}

fn bin_op_parser<'src, I>() -> impl chumsky::Parser<'src, I, BinOp, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    just(PseudoToken::Plus)
        .to(BinOp::Add)
        .or(just(PseudoToken::Minus).to(BinOp::Sub))
        .or(just(PseudoToken::Star).to(BinOp::Mul))
        .or(just(PseudoToken::Slash).to(BinOp::Div))
        .or(just(PseudoToken::Percent).to(BinOp::Mod))
}

/// A dereferenced address: `*reg`, `*(reg)`, or `*(reg + imm)`. Produces
/// the base register and the offset lexeme (`0` when absent).
fn address_parser<'src, I>() -> impl chumsky::Parser<'src, I, (String, String), ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    let bare = reg_parser().map(|base| (base, "0".to_string()));
    let parenthesised = just(PseudoToken::LParen)
        .ignore_then(reg_parser())
        .then(just(PseudoToken::Plus).ignore_then(number_parser()).or_not())
        .then_ignore(just(PseudoToken::RParen))
        .map(|(base, offset)| (base, offset.unwrap_or_else(|| "0".to_string())));
    just(PseudoToken::Star).ignore_then(parenthesised.or(bare))
}

enum AssignRhs {
    Load { base: String, offset: String },
    Bin { op: BinOp, lhs: String, rhs: String },
    Mov { src: String },
}

pub(super) fn stmt_parser<'src, I>() -> impl chumsky::Parser<'src, I, IrInst, ParseExtra<'src>> + Clone
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    let label_stmt = just(PseudoToken::Label)
        .ignore_then(ident_parser())
        .map(|name| IrInst::Label { name });

    let goto_stmt = just(PseudoToken::Goto)
        .ignore_then(ident_parser())
        .map(|target| IrInst::Branch { target });

    let call_stmt = just(PseudoToken::Call)
        .ignore_then(reg_parser())
        .map(|target| IrInst::Call { target });

    let ret_stmt = just(PseudoToken::Ret).to(IrInst::Ret);

    let data_stmt = just(PseudoToken::Data8)
        .ignore_then(value_parser())
        .map(|value| IrInst::Data8 { value });

    let if_stmt = just(PseudoToken::If)
        .ignore_then(reg_parser())
        .then(cmp_op_parser())
        .then(reg_parser())
        .then_ignore(just(PseudoToken::Goto))
        .then(ident_parser())
        .map(|(((lhs, cond), rhs), target)| IrInst::CmpBranch { lhs, rhs, cond, target });

    let store_stmt = address_parser()
        .then_ignore(just(PseudoToken::Eq))
        .then(reg_parser())
        .map(|((base, offset), src)| IrInst::Store { base, src, offset });

    let load_rhs = address_parser().map(|(base, offset)| AssignRhs::Load { base, offset });
    let bin_rhs = reg_parser()
        .then(bin_op_parser())
        .then(reg_parser())
        .map(|((lhs, op), rhs)| AssignRhs::Bin { op, lhs, rhs });
    let mov_rhs = reg_parser().map(|src| AssignRhs::Mov { src });

    let assign_stmt = reg_parser()
        .then_ignore(just(PseudoToken::Eq))
        .then(load_rhs.or(bin_rhs).or(mov_rhs))
        .map(|(dst, rhs)| match rhs {
            AssignRhs::Load { base, offset } => IrInst::Load { dst, base, offset },
            AssignRhs::Bin { op, lhs, rhs } => IrInst::Bin { op, dst, lhs, rhs },
            AssignRhs::Mov { src } => IrInst::Mov { dst, src },
        });

    label_stmt
        .or(goto_stmt)
        .or(call_stmt)
        .or(ret_stmt)
        .or(data_stmt)
        .or(if_stmt)
        .or(store_stmt)
        .or(assign_stmt)
        .boxed()
}

pub(super) fn file_parser<'src, I>() -> impl chumsky::Parser<'src, I, Vec<IrInst>, ParseExtra<'src>>
where
    I: ValueInput<'src, Token = PseudoToken, Span = SimpleSpan>,
{
    let separators = just(PseudoToken::Newline).repeated();
    separators
        .clone()
        .ignore_then(
            stmt_parser()
                .then_ignore(separators.clone())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}
