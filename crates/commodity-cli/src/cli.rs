//! CLI argument definitions for commodity-registry.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resolve` | Resolve an ISIN, name, FIGI or ticker to a canonical commodity |
//! | `lint` | Validate registry data, optionally against live providers |
//! | `add` | Add or update a commodity in a user data file |
//! | `fetch` | Look a security up across providers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--registry-path` | `$PATH_COMMODITY_REGISTRY` or `data/commodities/` | User data file or directory (repeatable) |
//! | `--no-bundled` | `false` | Skip the bundled data |
//! | `--mock` | `false` | Use deterministic offline providers |
//! | `--verbose` | `false` | Debug logging on stderr |
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! commodity-registry resolve US0378331005
//! commodity-registry resolve IE00B4L5Y983 --currency EUR --date 2024-01-02 --price 82.55 --mock
//! commodity-registry lint --verify --only AAPL --mock
//! commodity-registry --registry-path ./my-data add GB00B00FHZ82 --fetch --mock \
//!     --instrument-type ETC --asset-class CommodityETF --dry-run
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use commodity_core::default_registry_path;

/// Resolve financial instrument identifiers to canonical commodity records.
#[derive(Debug, Parser)]
#[command(
    name = "commodity-registry",
    author,
    version,
    about = "Commodity registry CLI",
    long_about = "Resolves ISINs, FIGIs, names and provider tickers to canonical commodity \
records merged from bundled and user YAML data files.\n\
\n\
Use 'commodity-registry <command> --help' for command-specific help."
)]
pub struct Cli {
    /// User registry file or directory, loaded after the bundled data.
    ///
    /// Repeat to load several; later paths override earlier ones.
    #[arg(long = "registry-path", global = true, value_name = "PATH")]
    pub registry_paths: Vec<PathBuf>,

    /// Do not load the bundled data.
    #[arg(long, global = true, default_value_t = false)]
    pub no_bundled: bool,

    /// Use deterministic offline providers instead of live ones.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Log debug output to stderr.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Registry paths as given, or the default user directory when none are.
    pub fn registry_paths(&self) -> Vec<PathBuf> {
        if self.registry_paths.is_empty() {
            vec![default_registry_path()]
        } else {
            self.registry_paths.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a token (ISIN, name, FIGI or ticker) to a canonical commodity.
    ///
    /// With --date and --price, candidates are checked against that day's
    /// trading range and only a verified candidate is accepted.
    ///
    /// # Examples
    ///
    ///   commodity-registry resolve US0378331005
    ///   commodity-registry resolve XAID.L --provider yahoo
    Resolve(ResolveArgs),

    /// Validate registry data.
    ///
    /// Reports files that failed to load and ISINs shared by different
    /// records. --verify adds a live audit of tickers, currencies and
    /// validation points.
    Lint(LintArgs),

    /// Add a commodity to the first registry path.
    ///
    /// An existing entry with the same ISIN or name is replaced.
    Add(AddArgs),

    /// Look a security up across providers.
    Fetch(FetchArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// ISIN, name, FIGI or provider ticker.
    pub token: String,

    /// Provider to try the token against as a ticker (yahoo, ibkr, google, ...).
    #[arg(long)]
    pub provider: Option<String>,

    /// Currency of the wanted listing, for dual-listed instruments.
    #[arg(long)]
    pub currency: Option<String>,

    /// Verification date (YYYY-MM-DD).
    #[arg(long, requires = "price")]
    pub date: Option<String>,

    /// Expected price on the verification date.
    #[arg(long, requires = "date")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub struct LintArgs {
    /// Lint this file or directory alone instead of the configured registry.
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Cross-check records against live providers.
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// Restrict the live audit to one commodity name.
    #[arg(long, requires = "verify")]
    pub only: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// ISIN or ticker (optional if --isin or --ticker is given).
    pub token: Option<String>,

    /// Canonical name (e.g. AAPL). Derived from the ticker when omitted.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub isin: Option<String>,

    /// Ticker symbol (Yahoo style).
    #[arg(long)]
    pub ticker: Option<String>,

    /// Instrument type (ETF, ETC, ETN, Stock, Index, Future, Crypto, Cash).
    #[arg(long)]
    pub instrument_type: Option<String>,

    /// Asset class (EquityETF, FixedIncomeETF, CommodityETF, ...).
    #[arg(long)]
    pub asset_class: Option<String>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub figi: Option<String>,

    /// Validation date (YYYY-MM-DD).
    #[arg(long)]
    pub validation_date: Option<String>,

    /// Validation price.
    #[arg(long)]
    pub validation_price: Option<f64>,

    /// Search providers for missing metadata first.
    #[arg(long, default_value_t = false)]
    pub fetch: bool,

    /// Print the resulting document without saving.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("query").required(true).args(["isin", "ticker"])))]
pub struct FetchArgs {
    /// ISIN to search every provider for.
    #[arg(long)]
    pub isin: Option<String>,

    /// Ticker to fetch metadata for.
    #[arg(long)]
    pub ticker: Option<String>,
}
