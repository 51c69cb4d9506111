//! Clap derive structures for the `habindex` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// habindex -- build a queryable item index from an openHAB server
#[derive(Debug, Parser)]
#[command(
    name = "habindex",
    version,
    about = "Crawl an openHAB server's REST API into a semantic item index",
    long_about = "Fetches the full item set from an openHAB server, derives the\n\
        Location -> Equipment -> Point semantic tree, and atomically writes\n\
        index.json and rest_root.json for offline consumers.\n\n\
        Designed to run periodically from a scheduler; a failed run never\n\
        disturbs the previously written snapshot.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "OPENHAB_PROFILE", global = true)]
    pub profile: Option<String>,

    /// openHAB base URL, e.g. http://openhab:8080 (overrides profile)
    #[arg(long, short = 'u', env = "OPENHAB_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// API bearer token for authenticated servers
    #[arg(long, env = "OPENHAB_API_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Directory the index artifacts are written to / read from
    #[arg(long, short = 'd', env = "OPENHAB_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "OPENHAB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl the server and rebuild the index artifacts
    #[command(alias = "c")]
    Crawl(CrawlArgs),

    /// Summarize a previously written index
    #[command(alias = "s")]
    Show(ShowArgs),
}

// ── Crawl ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Fetch per-item detail records after the listing
    #[arg(long)]
    pub details: bool,

    /// Concurrent per-item detail fetches (1-16)
    #[arg(long, env = "OPENHAB_CONCURRENCY")]
    pub concurrency: Option<usize>,
}

// ── Show ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Print a single item record instead of the index summary
    pub item: Option<String>,
}
