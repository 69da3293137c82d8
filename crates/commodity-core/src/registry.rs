//! In-memory commodity registry.
//!
//! A registry is built once from its configured layers and never mutated
//! afterwards. Writers that append to data files do not touch a live
//! registry; build a new one to observe their changes.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::index::RegistryIndex;
use crate::loader::{self, LoadOutcome};
use crate::{Commodity, ProviderId};

/// Read-only lookups over commodity records.
pub trait CommodityLookup {
    /// All records matching an ISIN, name or FIGI, optionally filtered by currency.
    fn find_candidates(&self, token: &str, currency: Option<&str>) -> Vec<&Commodity>;

    /// Record listed under `ticker` at `provider`.
    fn find_by_ticker(&self, provider: &str, ticker: &str) -> Option<&Commodity>;

    /// First candidate for an ISIN (or name/FIGI) token.
    fn find_by_isin(&self, isin: &str, currency: Option<&str>) -> Option<&Commodity> {
        self.find_candidates(isin, currency).into_iter().next()
    }
}

/// Ordered records plus their lookup indices.
#[derive(Debug, Clone, Default)]
pub struct CommodityRegistry {
    records: Vec<Commodity>,
    load_errors: Vec<String>,
    index: RegistryIndex,
}

impl CommodityRegistry {
    /// Load every configured layer and build the indices.
    pub fn new(config: &RegistryConfig) -> Self {
        let LoadOutcome { records, errors } = loader::load(&config.sources());
        let registry = Self::from_parts(records, errors);
        info!(
            records = registry.records.len(),
            load_errors = registry.load_errors.len(),
            "commodity registry ready"
        );
        registry
    }

    /// Build a registry directly from records, in precedence order.
    pub fn from_records(records: Vec<Commodity>) -> Self {
        Self::from_parts(records, Vec::new())
    }

    fn from_parts(records: Vec<Commodity>, load_errors: Vec<String>) -> Self {
        let index = RegistryIndex::build(&records);
        Self {
            records,
            load_errors,
            index,
        }
    }

    /// Every loaded record, in load order.
    pub fn all(&self) -> &[Commodity] {
        &self.records
    }

    /// One message per file that failed to load.
    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Commodity> {
        self.index
            .name(&name.trim().to_ascii_uppercase())
            .map(|position| &self.records[position])
    }
}

impl CommodityLookup for CommodityRegistry {
    /// Probe order: ISIN (all listings, stored order), then name, then FIGI.
    ///
    /// Duplicates are dropped by canonical name keeping the first, so an ISIN
    /// match outranks a name or FIGI match of the same record. The currency
    /// filter is case-insensitive and keeps relative order; a blank currency
    /// does not filter.
    fn find_candidates(&self, token: &str, currency: Option<&str>) -> Vec<&Commodity> {
        let key = token.trim().to_ascii_uppercase();
        if key.is_empty() {
            return Vec::new();
        }

        let positions = self
            .index
            .isin(&key)
            .iter()
            .copied()
            .chain(self.index.name(&key))
            .chain(self.index.figi(&key));

        let currency = currency.map(str::trim).filter(|currency| !currency.is_empty());
        let mut seen = HashSet::new();
        let candidates = positions
            .map(|position| &self.records[position])
            .filter(|record| seen.insert(record.name.as_str()))
            .filter(|record| currency.map_or(true, |currency| record.currency.matches(currency)))
            .collect::<Vec<_>>();

        debug!(token = %key, count = candidates.len(), "candidate lookup");
        candidates
    }

    fn find_by_ticker(&self, provider: &str, ticker: &str) -> Option<&Commodity> {
        self.index
            .ticker(provider, ticker)
            .map(|position| &self.records[position])
    }
}

/// Resolve a token to candidates, falling back to raw provider tickers.
///
/// When no ISIN, name or FIGI matches, the token is tried as a ticker of
/// `provider`, or of each provider in [`ProviderId::TICKER_FALLBACK_ORDER`]
/// until one hits. The currency filter applies to the static lookup only.
pub fn resolve_candidates<'a, L>(
    lookup: &'a L,
    token: &str,
    currency: Option<&str>,
    provider: Option<&str>,
) -> Vec<&'a Commodity>
where
    L: CommodityLookup + ?Sized,
{
    let candidates = lookup.find_candidates(token, currency);
    if !candidates.is_empty() {
        return candidates;
    }

    let fallback = match provider {
        Some(provider) => lookup.find_by_ticker(provider, token),
        None => ProviderId::TICKER_FALLBACK_ORDER
            .iter()
            .find_map(|provider| lookup.find_by_ticker(provider, token)),
    };

    if let Some(record) = fallback {
        debug!(token, name = %record.name, "resolved through provider ticker");
    }
    fallback.into_iter().collect()
}
