// mushaf CLI - coverage, range, and merge reports over Quran text datasets

mod clean;
mod exit_codes;
mod job;
mod merge;
mod output;
mod quality;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use exit_codes::{io_exit_code, recon_exit_code, EXIT_SUCCESS};
use output::OutputArgs;

#[derive(Parser)]
#[command(name = "mushaf")]
#[command(about = "Verse coverage, translation ranges, and source merging for Quran datasets")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    /// Surah-scoped when the source has surah keys only, verse-scoped otherwise
    Auto,
    Verse,
    Surah,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which verses (or surahs) a source covers
    #[command(after_help = "\
Examples:
  mushaf coverage quran.mushaf.toml translation
  mushaf coverage quran.mushaf.toml tafsir --scope surah --json
  mushaf coverage quran.mushaf.toml translation --strict")]
    Coverage {
        /// Path to the .mushaf.toml job file
        job: PathBuf,
        /// Source name from the job's [sources.*] tables
        source: String,
        #[arg(long, value_enum, default_value = "auto")]
        scope: Scope,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Find consecutive verses sharing one translation
    #[command(after_help = "\
Examples:
  mushaf ranges quran.mushaf.toml translation
  mushaf ranges quran.mushaf.toml translation --output translation_ranges.json")]
    Ranges {
        job: PathBuf,
        source: String,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Find combined translations: identical text over differing originals
    #[command(after_help = "\
Examples:
  mushaf duplicates quran.mushaf.toml translation original
  mushaf duplicates quran.mushaf.toml translation original --json")]
    Duplicates {
        job: PathBuf,
        /// Source holding the translations
        translation: String,
        /// Source holding the original text
        original: String,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Run the job's [merge] table and write the merged artifact
    #[command(after_help = "\
Examples:
  mushaf merge tefsir.mushaf.toml
  mushaf merge tefsir.mushaf.toml --output merged.json --json")]
    Merge {
        job: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Strip OCR noise from a plain text file
    #[command(after_help = "\
Examples:
  mushaf clean page_12.txt
  cat page_12.txt | mushaf clean --job tefsir.mushaf.toml
  mushaf clean page_12.txt --output page_12.clean.txt")]
    Clean {
        /// Input file (omit to read from stdin)
        input: Option<PathBuf>,
        /// Take cleaner settings from this job's [cleaner] table
        #[arg(long)]
        job: Option<PathBuf>,
        /// Print a JSON summary (with the cleaned text) instead of the text
        #[arg(long)]
        json: bool,
        /// Write the cleaned text to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List verses sharing words with a target verse
    #[command(after_help = "\
Examples:
  mushaf similar quran.mushaf.toml translation 2:255
  mushaf similar quran.mushaf.toml translation 2:255 --min-common 5 --limit 3 --json")]
    Similar {
        job: PathBuf,
        source: String,
        /// Target verse key (surah:ayah)
        key: String,
        /// Minimum distinct shared words
        #[arg(long, default_value_t = mushaf_recon::similar::DEFAULT_MIN_COMMON_WORDS)]
        min_common: usize,
        #[arg(long, default_value_t = mushaf_recon::similar::DEFAULT_LIMIT)]
        limit: usize,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Scan a source for leftover HTML and mis-decoded text
    #[command(after_help = "\
Examples:
  mushaf quality quran.mushaf.toml translation
  mushaf quality quran.mushaf.toml translation --json --strict")]
    Quality {
        job: PathBuf,
        source: String,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Check footnote markers (N) in translations against a commentary source
    #[command(after_help = "\
Examples:
  mushaf references quran.mushaf.toml translation commentary")]
    References {
        job: PathBuf,
        translations: String,
        commentary: String,
        #[command(flatten)]
        out: OutputArgs,
    },

    /// Parse and validate a job file without loading any source
    #[command(after_help = "\
Examples:
  mushaf validate tefsir.mushaf.toml")]
    Validate {
        job: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<mushaf_io::IoError> for CliError {
    fn from(err: mushaf_io::IoError) -> Self {
        let code = io_exit_code(&err);
        let hint = match &err {
            mushaf_io::IoError::Shape(_) => {
                Some("set `shape` on the source (list_of_surahs, flat_dict, nested_dict, surah_dict)".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<mushaf_recon::ReconError> for CliError {
    fn from(err: mushaf_recon::ReconError) -> Self {
        Self::new(recon_exit_code(&err), err.to_string())
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  mushaf-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Coverage { job, source, scope, out } => report::cmd_coverage(job, source, scope, out),
        Commands::Ranges { job, source, out } => report::cmd_ranges(job, source, out),
        Commands::Duplicates { job, translation, original, out } => {
            report::cmd_duplicates(job, translation, original, out)
        }
        Commands::Merge { job, out } => merge::cmd_merge(job, out),
        Commands::Clean { input, job, json, output } => clean::cmd_clean(input, job, json, output),
        Commands::Similar { job, source, key, min_common, limit, out } => {
            report::cmd_similar(job, source, key, min_common, limit, out)
        }
        Commands::Quality { job, source, out } => quality::cmd_quality(job, source, out),
        Commands::References { job, translations, commentary, out } => {
            quality::cmd_references(job, translations, commentary, out)
        }
        Commands::Validate { job, json } => merge::cmd_validate(job, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
