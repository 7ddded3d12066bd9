//! CLI for bib-pipeline - Split a BibTeX file and render a publication list.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{info, Level};

use bib_pipeline::{
    config::{DEFAULT_BIB_DIR, DEFAULT_INPUT, DEFAULT_OUTPUT},
    render_from_dir, split_bibliography,
    split::SplitError,
    write_split,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Split a BibTeX file into category/topic files and render a publication list
#[derive(Parser)]
#[command(name = "bib-pipeline")]
#[command(version)]
#[command(after_help = "\
Examples:
  bib-pipeline split references.bib -o bib
  bib-pipeline render --bib-dir bib -o _generated/publications_body.qmd
  cat references.bib | bib-pipeline split -")]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an aggregate bibliography into category and topic files
    #[command(after_help = "\
Entries are classified by their `keywords` field (submitted, inprep, published)
and by their `topic` field. Every output file is written, empty ones with a
placeholder entry.")]
    Split {
        /// Aggregate bibliography (use '-' for stdin)
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Directory receiving the split files
        #[arg(short, long, default_value = DEFAULT_BIB_DIR)]
        out_dir: PathBuf,
    },

    /// Render the category files into a Markdown publication list
    Render {
        /// Directory holding published.bib, submitted.bib and inprep.bib
        #[arg(short, long, default_value = DEFAULT_BIB_DIR)]
        bib_dir: PathBuf,

        /// Output file (use '-' for stdout)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — aggregate bibliography unreadable
    InputFile(String),
    /// Exit 11 — a category bibliography exists but cannot be read
    BibFile(String),
    /// Exit 12 — cannot write an output file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::BibFile(_) => 11,
            AppError::OutputFile(_) => 12,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::BibFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: run 'bib-pipeline split' first, or check the --bib-dir path",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output location is writable",
                    msg
                )
            }
        }
    }
}

impl From<SplitError> for AppError {
    fn from(e: SplitError) -> Self {
        AppError::OutputFile(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Split { input, out_dir } => split_command(&input, &out_dir),
        Commands::Render { bib_dir, output } => render_command(&bib_dir, &output),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Split the aggregate bibliography into per-category and per-topic files.
fn split_command(input: &Path, out_dir: &Path) -> Result<(), AppError> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        buf
    } else if !input.exists() {
        info!(input = %input.display(), "no input found; skipping split");
        return Ok(());
    } else {
        fs::read_to_string(input)
            .map_err(|e| AppError::InputFile(format!("'{}': {}", input.display(), e)))?
    };

    let files = split_bibliography(&text);
    write_split(out_dir, &files)?;

    info!(files = files.len(), out_dir = %out_dir.display(), "split complete");
    Ok(())
}

/// Render the category files into the publication list fragment.
fn render_command(bib_dir: &Path, output: &Path) -> Result<(), AppError> {
    let document = render_from_dir(bib_dir).map_err(|e| {
        AppError::BibFile(format!("'{}': {}", bib_dir.display(), e))
    })?;

    if output == Path::new("-") {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", document)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
        return Ok(());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::OutputFile(format!("'{}': {}", parent.display(), e))
        })?;
    }
    fs::write(output, &document)
        .map_err(|e| AppError::OutputFile(format!("'{}': {}", output.display(), e)))?;

    info!(output = %output.display(), "wrote publication list");
    Ok(())
}
