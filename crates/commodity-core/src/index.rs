//! Lookup indices over the ordered record sequence.
//!
//! Indices store positions into the record slice they were built from.
//!
//! | Index | Key | Override rule |
//! |-------|-----|---------------|
//! | by name | uppercased name | last record wins |
//! | by FIGI | uppercased FIGI | last record wins |
//! | by ticker | `PROVIDER:TICKER`, uppercased | last record wins |
//! | by ISIN | uppercased ISIN | all records kept, most recently loaded first |
//!
//! The ISIN index keeps every record because one ISIN can legitimately map to
//! several listings in different currencies.

use std::collections::HashMap;

use crate::Commodity;

#[derive(Debug, Clone, Default)]
pub struct RegistryIndex {
    by_isin: HashMap<String, Vec<usize>>,
    by_figi: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_ticker: HashMap<String, usize>,
}

impl RegistryIndex {
    /// Build all four indices in one pass over `records`.
    pub fn build(records: &[Commodity]) -> Self {
        let mut index = Self::default();

        for (position, record) in records.iter().enumerate() {
            index
                .by_name
                .insert(record.name.as_str().to_ascii_uppercase(), position);

            if let Some(isin) = &record.isin {
                index
                    .by_isin
                    .entry(isin.as_str().to_ascii_uppercase())
                    .or_default()
                    .push(position);
            }

            if let Some(figi) = record.figi.as_deref().filter(|figi| !figi.is_empty()) {
                index.by_figi.insert(figi.to_ascii_uppercase(), position);
            }

            for (provider, ticker) in record.tickers.iter() {
                if ticker.is_empty() {
                    continue;
                }
                index
                    .by_ticker
                    .insert(ticker_key(provider.as_str(), ticker), position);
            }
        }

        // Appended in load order; flip so the latest record is the default candidate.
        for positions in index.by_isin.values_mut() {
            positions.reverse();
        }

        index
    }

    /// Positions for an ISIN, most recently loaded first. Key must be uppercase.
    pub fn isin(&self, key: &str) -> &[usize] {
        self.by_isin.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn figi(&self, key: &str) -> Option<usize> {
        self.by_figi.get(key).copied()
    }

    pub fn name(&self, key: &str) -> Option<usize> {
        self.by_name.get(key).copied()
    }

    pub fn ticker(&self, provider: &str, ticker: &str) -> Option<usize> {
        self.by_ticker.get(&ticker_key(provider, ticker)).copied()
    }

    pub fn isin_count(&self) -> usize {
        self.by_isin.len()
    }

    pub fn ticker_count(&self) -> usize {
        self.by_ticker.len()
    }
}

/// Key of the ticker index: `"<PROVIDER>:<TICKER>"`, both uppercased.
pub fn ticker_key(provider: &str, ticker: &str) -> String {
    format!(
        "{}:{}",
        provider.trim().to_ascii_uppercase(),
        ticker.trim().to_ascii_uppercase()
    )
}
