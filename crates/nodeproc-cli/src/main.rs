//! nodeproc - Command Line Entry Point
//!
//! Loads an HTML fragment from a file or stdin and prints it back through
//! the processor, or lists the tags a handler registry would be offered.

use std::io::Read;

use anyhow::{bail, Context, Result};
use nodeproc::{NodeProcessor, ProcessorConfig};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const SKIP_TAGS_ENV: &str = "NODEPROC_SKIP_TAGS";

const USAGE: &str = "\
usage: nodeproc [--tags] [FILE]

Reads FILE (or stdin when FILE is absent or `-`) and prints the normalized
HTML fragment.

options:
  --tags      print the dispatchable tag names instead, one per line
  -h, --help  print this help

environment:
  NODEPROC_SKIP_TAGS  comma-separated tags never offered to handlers
  RUST_LOG            log filter (default: warn)";

#[derive(Debug, Default, PartialEq)]
struct Options {
    list_tags: bool,
    help: bool,
    input: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--tags" => options.list_tags = true,
            "-h" | "--help" => options.help = true,
            "-" => options.input = None,
            flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
            path => {
                if options.input.is_some() {
                    bail!("more than one input file given");
                }
                options.input = Some(path.to_string());
            }
        }
    }
    Ok(options)
}

fn parse_skip_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

fn config_from_env() -> ProcessorConfig {
    let mut config = ProcessorConfig::default();
    if let Ok(value) = std::env::var(SKIP_TAGS_ENV) {
        config.skip_tags = parse_skip_tags(&value);
    }
    config
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        None => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("failed to read stdin")?;
            Ok(html)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args(std::env::args().skip(1)).context("invalid arguments")?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let html = read_input(options.input.as_deref())?;
    let mut processor = NodeProcessor::new(config_from_env());
    processor.load(&html);

    if options.list_tags {
        for tag in processor.dispatchable_tags(&[]) {
            println!("{tag}");
        }
    } else {
        println!("{}", processor.get_html());
    }

    tracing::debug!("nodeproc {} done", nodeproc::VERSION);
    Ok(())
}
