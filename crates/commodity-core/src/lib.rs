//! # Commodity Core
//!
//! Canonical commodity records, merged from layered YAML data files and
//! resolvable by ISIN, FIGI, name or provider ticker.
//!
//! ## Overview
//!
//! - **Validated domain models** (ISIN with Luhn checksum, names, currencies)
//! - **Layered loading** of bundled and user data with per-file error tracking
//! - **Multi-key indices** with last-wins overrides and multi-listing ISINs
//! - **Resolution** of free-form tokens with provider-ticker fallback
//! - **Verification** of candidates against historical prices via [`DataProvider`]
//! - **Lint and add workflows** over data files
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bundled`] | Data files compiled into the library |
//! | [`config`] | Registry layer configuration |
//! | [`discovery`] | Online metadata lookups |
//! | [`domain`] | Record model and validators |
//! | [`error`] | Core error types |
//! | [`index`] | Lookup indices |
//! | [`lint`] | Duplicate-ISIN check and live audit |
//! | [`loader`] | Layered file loading |
//! | [`provider`] | Provider capability trait and errors |
//! | [`provider_set`] | Provider registration |
//! | [`providers`] | Offline mock providers |
//! | [`registry`] | Registry and resolver |
//! | [`source`] | Provider identifiers |
//! | [`verify`] | Price verification and disambiguation |
//! | [`writer`] | Building and saving new records |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use commodity_core::{resolve_candidates, CommodityRegistry, RegistryConfig};
//!
//! let registry = CommodityRegistry::new(&RegistryConfig::from_env());
//! for candidate in resolve_candidates(&registry, "US0378331005", None, None) {
//!     println!("{} ({})", candidate.name, candidate.currency);
//! }
//! ```
//!
//! ## Precedence
//!
//! ```text
//! bundled files (sorted) ─▶ extra path 1 (sorted walk) ─▶ extra path 2 ...
//!                                                            later wins
//! name / FIGI / ticker : last record loaded wins
//! ISIN                 : every record kept, last loaded first
//! ```

pub mod bundled;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod error;
pub mod index;
pub mod lint;
pub mod loader;
pub mod provider;
pub mod provider_set;
pub mod providers;
pub mod registry;
pub mod source;
pub mod verify;
pub mod writer;

// Configuration
pub use config::{default_registry_path, RegistryConfig, REGISTRY_PATH_ENV};

// Discovery
pub use discovery::{fetch_metadata, search_isin};

// Domain models
pub use domain::{
    validate_currency_code, validate_isin, AssetClass, Commodity, CommodityFile, CommodityName,
    Currency, InstrumentType, Isin, Liquidity, RiskProfile, TickerMap, TradeDate, ValidationPoint,
};

// Error types
pub use error::{CoreError, LoadError, ValidationError, WriteError};

// Lint
pub use lint::{duplicate_isins, lint, AuditEntry, AuditStatus, LintOptions, LintReport};

// Loading
pub use loader::{LoadOutcome, RegistrySource};

// Providers
pub use provider::{
    DataProvider, ProviderError, ProviderErrorKind, ProviderSymbol, SearchResult,
    SecurityCriteria,
};
pub use provider_set::{ProviderSet, ProviderSetBuilder};
pub use providers::{MockListing, MockProvider};

// Registry and resolution
pub use registry::{resolve_candidates, CommodityLookup, CommodityRegistry};

// Source identifiers
pub use source::ProviderId;

// Verification
pub use verify::{disambiguate, verify_ticker, Verification};

// Writing
pub use writer::{build_commodity, resolve_target, save_commodity, CommodityDraft, SaveOutcome};
