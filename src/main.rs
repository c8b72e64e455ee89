//! `php2json`: converts a PHP array literal read from a file or stdin into
//! JSON on stdout.

use anyhow::Context;
use clap::{ArgAction, Parser};
use clap_verbosity_flag::WarnLevel;
use php_array_json::{convert_with, ConvertOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// PHP file to convert; reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Fail on characters the converter does not understand instead of skipping them
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Print compact JSON on a single line
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,

    /// Maximum array nesting depth
    #[arg(long, value_name = "N", default_value_t = php_array_json::options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<WarnLevel>,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions::default()
            .strict(self.strict)
            .pretty(!self.compact)
            .max_depth(self.max_depth)
    }

    fn read_source(&self) -> anyhow::Result<String> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            _ => {
                let mut source = String::new();
                io::stdin()
                    .read_to_string(&mut source)
                    .context("failed to read stdin")?;
                Ok(source)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let source = cli.read_source()?;
    let options = cli.options();
    info!(bytes = source.len(), strict = options.strict, "converting");

    let json = convert_with(&source, &options).context("conversion failed")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).context("failed to write output")?;
    Ok(())
}
