//! CLI argument definitions for coinhist.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `history` | Fetch, normalize and export the price history of one coin |
//! | `lookup` | List every coin sharing a symbol |
//! | `trending` | List coins currently trending on the provider |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--provider` | `web-api` | Provider API generation |
//! | `--timeout-ms` | transport default | Request timeout in ms |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! # Daily BTC history for a window, written to BTC_USD_15-10-2017_25-10-2017.csv
//! coinhist history BTC -s 15-10-2017 -e 25-10-2017
//!
//! # Disambiguate a shared symbol
//! coinhist history SOL --coin-name solana --format json
//!
//! # Numeric id wins over the symbol
//! coinhist history --id 5426 --print
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use coinhist_core::{ExportFormat, ProviderId};

#[derive(Debug, Parser)]
#[command(
    name = "coinhist",
    author,
    version,
    about = "Historical cryptocurrency prices as CSV, TSV, JSON, YAML or XLSX"
)]
pub struct Cli {
    /// Provider API generation to query.
    #[arg(long, global = true, value_enum, default_value_t = ProviderSelector::WebApi)]
    pub provider: ProviderSelector,

    /// Request timeout in milliseconds (overrides COINHIST_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderSelector {
    /// Structured JSON API.
    WebApi,
    /// Legacy HTML pages (no id lookup, no trending).
    Legacy,
}

impl From<ProviderSelector> for ProviderId {
    fn from(selector: ProviderSelector) -> Self {
        match selector {
            ProviderSelector::WebApi => Self::WebApi,
            ProviderSelector::Legacy => Self::Legacy,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, normalize and export the price history of one coin.
    History(HistoryArgs),
    /// List every coin sharing a symbol.
    Lookup(LookupArgs),
    /// List coins currently trending on the provider.
    Trending,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    /// Coin symbol, e.g. BTC. Optional when --id is given.
    #[arg(value_name = "COIN_CODE")]
    pub coin_code: Option<String>,

    /// First day, dd-mm-yyyy. Both dates unset means all time.
    #[arg(short = 's', long)]
    pub start_date: Option<String>,

    /// Last day, dd-mm-yyyy.
    #[arg(short = 'e', long)]
    pub end_date: Option<String>,

    /// Ignore any dates and fetch the whole available history.
    #[arg(long, default_value_t = false)]
    pub all_time: bool,

    /// Coin name picking one of several coins sharing the symbol.
    #[arg(long)]
    pub coin_name: Option<String>,

    /// Provider numeric id; authoritative over the symbol.
    #[arg(long)]
    pub id: Option<u64>,

    /// Quote currency.
    #[arg(long, default_value = coinhist_core::DEFAULT_FIAT)]
    pub fiat: String,

    /// Output format: csv, tsv, json, yaml or xlsx.
    #[arg(short, long, value_parser = parse_format, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file name; the format extension is appended when missing.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory.
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Oldest row first (newest first by default).
    #[arg(long, default_value_t = false)]
    pub ascending: bool,

    /// Print the rows as comma-separated lines instead of writing a file.
    #[arg(long, default_value_t = false, conflicts_with = "stdout")]
    pub print: bool,

    /// Write the rendered format to stdout instead of a file.
    #[arg(long, default_value_t = false)]
    pub stdout: bool,
}

#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    /// Coin symbol to look up.
    pub symbol: String,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse::<ExportFormat>().map_err(|error| error.to_string())
}
