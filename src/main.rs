//! # cvx CLI
//!
//! Browse, search and rank CVs processed by the OCR/NER backend.
//!
//! ## Usage
//!
//! ```bash
//! cvx --config ./config/cvx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cvx files` | List processed files (optionally of one day) |
//! | `cvx show <id>` | Show one file and its extracted data |
//! | `cvx search` | Filter and rank files by technology and name |
//! | `cvx technologies` | List the technology filter catalog |
//! | `cvx health` | Check the backend |
//! | `cvx upload <pdf>` | Upload a CV |
//! | `cvx download <id>` | Download the original document |
//! | `cvx settings show` | Print the effective settings |
//! | `cvx settings set-base-url <url>` | Persist a new backend URL |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cvx::config::load_config;
use cvx::{files, search, settings, transfer};

/// Browse, search and rank processed CVs.
///
/// All commands accept a `--config` flag pointing to a TOML settings file.
/// The file is optional; defaults apply when it does not exist.
#[derive(Parser)]
#[command(
    name = "cvx",
    about = "Browse, search and rank CVs processed by an OCR/NER backend",
    version
)]
struct Cli {
    /// Path to the settings file (TOML).
    #[arg(
        long,
        global = true,
        env = "CVX_CONFIG",
        default_value = "./config/cvx.toml"
    )]
    config: PathBuf,

    /// Backend base URL for this invocation only (not persisted).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List processed files.
    ///
    /// Prints name, creation date, processing status and id of every file
    /// the backend knows about. An empty backend prints "No records.".
    Files {
        /// Only files created on this day (dd-mm-yyyy or yyyy-mm-dd).
        #[arg(long)]
        date: Option<String>,

        /// Print normalized rows as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one file with its detected technologies and extracted data.
    Show {
        /// File id.
        id: String,

        /// Print the record exactly as the backend returned it.
        #[arg(long, conflicts_with = "json")]
        raw: bool,

        /// Print the normalized record and extracted view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Filter files by technology and name, ranked by relevance.
    ///
    /// With several `--tech` flags a file matches when it mentions at least
    /// one of them; files mentioning more rank higher.
    Search {
        /// Technology tag to filter by (repeatable). See `cvx technologies`.
        #[arg(long = "tech", short = 't')]
        tech: Vec<String>,

        /// Case-insensitive substring of the file name.
        #[arg(long)]
        query: Option<String>,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the technology filter catalog.
    Technologies,

    /// Check that the backend answers.
    Health,

    /// Upload a PDF for processing.
    Upload {
        /// Path to the PDF.
        path: PathBuf,
    },

    /// Download the original document of a file.
    Download {
        /// File id.
        id: String,

        /// Output file or directory (default: `<id>.pdf`).
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Inspect or change persisted settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings.
    Show,
    /// Validate and persist a new backend base URL.
    SetBaseUrl {
        /// Absolute http(s) URL, e.g. http://localhost:8000
        url: String,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut cfg = load_config(&cli.config)?;
    if let Some(ref url) = cli.base_url {
        cfg.set_base_url(url)?;
    }

    match cli.command {
        Commands::Files { date, json } => {
            files::run_files(&cfg, date.as_deref(), json).await?;
        }
        Commands::Show { id, raw, json } => {
            files::run_show(&cfg, &id, raw, json).await?;
        }
        Commands::Search {
            tech,
            query,
            limit,
            json,
        } => {
            search::run_search(&cfg, &tech, query.as_deref(), limit, json).await?;
        }
        Commands::Technologies => {
            search::run_technologies()?;
        }
        Commands::Health => {
            transfer::run_health(&cfg).await?;
        }
        Commands::Upload { path } => {
            transfer::run_upload(&cfg, &path).await?;
        }
        Commands::Download { id, out } => {
            transfer::run_download(&cfg, &id, out.as_deref()).await?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => settings::run_settings_show(&cli.config, &cfg)?,
            // Persists from the file on disk, never the `--base-url` override.
            SettingsAction::SetBaseUrl { url } => settings::run_set_base_url(&cli.config, &url)?,
        },
    }

    Ok(())
}
