//! # mvcol
//!
//! Prints the rows of a multi-value column file.
//!
//! ```bash
//! # int column with 3 documents, memory-mapped
//! mvcol segment/tags.mv --docs 3 --type int
//!
//! # 16-byte string column, loaded into memory, rows 100..110
//! mvcol segment/names.mv --docs 5000 --type string --element-size 16 \
//!     --mode load --start 100 --limit 10
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

mod inspect;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mvcolumn::{AccessMode, CellType, MultiValueColumnReader, ReaderOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Map the file read-only.
    Mmap,
    /// Read the file into memory.
    Load,
}

impl From<Mode> for AccessMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mmap => AccessMode::MemoryMapped,
            Mode::Load => AccessMode::LoadToMemory,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mvcol", version, about = "Inspect multi-value column files")]
struct Cli {
    /// Column file to read.
    path: PathBuf,

    /// Number of documents (rows) in the column.
    #[arg(long)]
    docs: usize,

    /// Value type: int, short, long, float, double, char, string or bytes.
    #[arg(long = "type", value_parser = parse_cell_type)]
    value_type: CellType,

    /// Bytes per value. Defaults to the natural width of --type.
    #[arg(long)]
    element_size: Option<usize>,

    #[arg(long, value_enum, default_value_t = Mode::Mmap)]
    mode: Mode,

    /// First row to print.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Maximum number of rows to print.
    #[arg(long)]
    limit: Option<usize>,

    /// Skip the header contiguity check at open.
    #[arg(long)]
    no_verify: bool,
}

fn parse_cell_type(s: &str) -> Result<CellType, String> {
    s.parse()
}

fn init_tracing() {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let element_size = inspect::resolve_element_size(cli.value_type, cli.element_size)?;
    if cli.no_verify {
        warn!("header verification disabled");
    }
    let options = ReaderOptions::default()
        .with_access_mode(cli.mode.into())
        .with_verify_header(!cli.no_verify);

    let mut reader = MultiValueColumnReader::open(&cli.path, cli.docs, element_size, options)
        .with_context(|| format!("failed to open column file '{}'", cli.path.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "# {}", reader.metadata())?;

    let end = cli
        .limit
        .map_or(reader.num_docs(), |limit| cli.start.saturating_add(limit));
    inspect::dump_rows(&reader, cli.value_type, cli.start..end, &mut out)?;
    out.flush()?;

    if !reader.close() {
        warn!(path = %cli.path.display(), "failed to close column file");
    }
    Ok(())
}
