//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "treepack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Materialize a JSON file structure and pack it into a ZIP archive
    Pack(PackArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Operation name reported in JSON output.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Pack(_) => "pack",
            Self::Completion { .. } => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Structure file to read ('-' or omitted reads stdin)
    #[arg(value_name = "INPUT", conflicts_with = "structure")]
    pub input: Option<PathBuf>,

    /// Inline JSON structure description
    #[arg(short, long, value_name = "JSON")]
    pub structure: Option<String>,

    /// Directory to write the archive into (default: current directory)
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store entries without compression
    #[arg(long, conflicts_with = "compression_level")]
    pub store: bool,

    /// Maximum number of declared entries
    #[arg(long, default_value = "10000", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_entries: u64,

    /// Maximum number of segments in a declared path
    #[arg(long, default_value = "32", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_depth: u64,

    /// Prefix for the generated archive filename
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Overwrite the archive if it already exists
    #[arg(short = 'f', long)]
    pub force: bool,
}
