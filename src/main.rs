use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "asm64",
    version,
    about = "Two-pass ARM64 assembler with raw-assembly and pseudocode front-ends",
    long_about = None,
    after_help = "Examples:\n  asm64 --raw program.s > program.bin\n  asm64 --high program.hl > program.bin\n  asm64 --high --dump-ir program.hl\n  cat tokens.txt | asm64"
)]
#[command(group(ArgGroup::new("mode").args(["tokenized", "raw", "high"])))]
struct Cli {
    /// Input is the pre-tokenized `KIND LEXEME` format (default).
    #[arg(long)]
    tokenized: bool,

    /// Input is raw ARM64 assembly text.
    #[arg(long)]
    raw: bool,

    /// Input is high-level pseudocode.
    #[arg(long)]
    high: bool,

    /// Dump the parsed IR to stderr and exit without assembling.
    #[arg(long = "dump-ir", requires = "high")]
    dump_ir: bool,

    /// Input file; omitted or `-` reads standard input.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let source = read_input(cli.input.as_deref())?;

    if cli.dump_ir {
        let ir = asm64_core::parse_pseudo(&source)?;
        eprint!("{}", asm64_core::ir::dump(&ir));
        return Ok(());
    }

    let output = if cli.high {
        asm64_core::assemble_high(&source)?
    } else if cli.raw {
        asm64_core::assemble_raw(&source)?
    } else {
        asm64_core::assemble_tokenized(&source)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output.bytes)?;
    stdout.flush()?;

    for (name, address) in output.symbols.iter() {
        eprintln!("{name} {address}");
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("cannot open file '{}'", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            Ok(source)
        }
    }
}
