//! ifrename-static CLI tool.
//!
//! Usage:
//! ```bash
//! ifrename-static check [FILE]
//! ifrename-static fmt [FILE] [--write] [--no-header]
//! ifrename-static resolve [FILE] --nics nics.json
//! ifrename-static init [--force]
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Inspect, normalise and resolve static network interface naming rules
#[derive(Parser)]
#[command(name = "ifrename-static")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "IFRENAME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rules file and report problems
    Check {
        /// Rules file (default: path from config)
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Print the rules file in canonical form
    Fmt {
        /// Rules file (default: path from config)
        file: Option<PathBuf>,

        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,

        /// Omit the explanatory header
        #[arg(long)]
        no_header: bool,
    },

    /// Resolve rules against a NIC snapshot
    Resolve {
        /// Rules file (default: path from config)
        file: Option<PathBuf>,

        /// JSON array of NIC descriptors
        #[arg(short, long)]
        nics: PathBuf,

        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Create an empty rules file with the header
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,

        /// Where to create it (default: path from config)
        file: Option<PathBuf>,
    },
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per item.
    Compact,
}

impl From<ifrename_core::Format> for OutputFormat {
    fn from(format: ifrename_core::Format) -> Self {
        match format {
            ifrename_core::Format::Text => Self::Text,
            ifrename_core::Format::Json => Self::Json,
            ifrename_core::Format::Compact => Self::Compact,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let config = config_resolver::resolve(&cwd, cli.config.as_deref()).load()?;
    let rules_path = |file: Option<PathBuf>| file.unwrap_or_else(|| config.rules.path.clone());
    let default_format = OutputFormat::from(config.output.format);

    match cli.command {
        Commands::Check { file, format } => {
            commands::check::run(&rules_path(file), format.unwrap_or(default_format))
        }
        Commands::Fmt {
            file,
            write,
            no_header,
        } => {
            let header = config.rules.write_header && !no_header;
            commands::fmt::run(&rules_path(file), write, header)
        }
        Commands::Resolve { file, nics, format } => commands::resolve::run(
            &rules_path(file),
            &nics,
            format.unwrap_or(default_format),
        ),
        Commands::Init { force, file } => commands::init::run(&rules_path(file), force),
    }
}
