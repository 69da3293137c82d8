use tracing::trace;

use crate::{
    DataProvider, ProviderError, ProviderId, ProviderSymbol, SecurityCriteria, TradeDate,
};

/// Half-width of the simulated daily trading range, as a fraction of its midpoint.
const DAY_RANGE_BAND: f64 = 0.03;

/// One listing known to a [`MockProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockListing {
    pub ticker: String,
    pub name: String,
    pub currency: String,
    pub isin: Option<String>,
    /// Midpoint the simulated daily ranges drift around.
    pub reference_price: f64,
}

impl MockListing {
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        isin: Option<&str>,
        reference_price: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            currency: currency.into(),
            isin: isin.map(str::to_owned),
            reference_price,
        }
    }
}

/// Offline provider answering from a fixed catalog.
///
/// Daily ranges are derived from the ticker and date alone, so the same
/// question always gets the same answer. A price equal to the listing's
/// reference price validates on every date.
#[derive(Debug, Clone)]
pub struct MockProvider {
    id: ProviderId,
    catalog: Vec<MockListing>,
}

impl MockProvider {
    pub fn new(id: ProviderId, catalog: Vec<MockListing>) -> Self {
        Self { id, catalog }
    }

    pub fn yahoo() -> Self {
        Self::new(ProviderId::builtin(ProviderId::YAHOO), yahoo_catalog())
    }

    pub fn ft() -> Self {
        Self::new(ProviderId::builtin(ProviderId::FT), ft_catalog())
    }

    pub fn catalog(&self) -> &[MockListing] {
        &self.catalog
    }

    /// Simulated `(low, high)` for `ticker` on `date`, or `None` when unlisted.
    pub fn day_range(&self, ticker: &str, date: TradeDate) -> Option<(f64, f64)> {
        let listing = self.listing(ticker)?;
        let seed = ticker_seed(&listing.ticker)
            .wrapping_add(date.into_inner().to_julian_day().unsigned_abs() as u64);
        // Midpoint drifts within +/-1% of the reference price.
        let drift = (seed % 201) as f64 / 10_000.0 - 0.01;
        let mid = listing.reference_price * (1.0 + drift);
        Some((mid * (1.0 - DAY_RANGE_BAND), mid * (1.0 + DAY_RANGE_BAND)))
    }

    fn listing(&self, ticker: &str) -> Option<&MockListing> {
        let ticker = ticker.trim();
        self.catalog
            .iter()
            .find(|listing| listing.ticker.eq_ignore_ascii_case(ticker))
    }
}

impl DataProvider for MockProvider {
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    fn resolve(&self, criteria: &SecurityCriteria) -> Result<Option<ProviderSymbol>, ProviderError> {
        if criteria.is_empty() {
            return Err(ProviderError::invalid_request(
                "criteria must include an ISIN or a symbol",
            ));
        }

        let currency_ok = |listing: &MockListing| {
            criteria
                .currency
                .as_deref()
                .map_or(true, |currency| listing.currency.eq_ignore_ascii_case(currency.trim()))
        };

        let found = match (&criteria.isin, &criteria.symbol) {
            (Some(isin), _) => self.catalog.iter().find(|listing| {
                listing
                    .isin
                    .as_deref()
                    .is_some_and(|known| known.eq_ignore_ascii_case(isin.trim()))
                    && currency_ok(listing)
            }),
            (None, Some(symbol)) => self.listing(symbol).filter(|listing| currency_ok(listing)),
            (None, None) => None,
        };

        trace!(provider = %self.id, hit = found.is_some(), "mock resolve");
        Ok(found.map(|listing| {
            ProviderSymbol::new(listing.ticker.clone())
                .with_name(listing.name.clone())
                .with_currency(listing.currency.clone())
        }))
    }

    fn validate(&self, ticker: &str, date: TradeDate, price: f64) -> Result<bool, ProviderError> {
        let (low, high) = self.day_range(ticker, date).ok_or_else(|| {
            ProviderError::not_found(format!("{} has no history for '{ticker}'", self.id))
        })?;
        Ok(low <= price && price <= high)
    }
}

fn yahoo_catalog() -> Vec<MockListing> {
    vec![
        MockListing::new("AAPL", "Apple Inc.", "USD", Some("US0378331005"), 185.64),
        MockListing::new("MSFT", "Microsoft Corporation", "USD", Some("US5949181045"), 370.87),
        MockListing::new(
            "IWDA.AS",
            "iShares Core MSCI World UCITS ETF",
            "EUR",
            Some("IE00B4L5Y983"),
            82.55,
        ),
        MockListing::new(
            "SWDA.L",
            "iShares Core MSCI World UCITS ETF",
            "GBP",
            Some("IE00B4L5Y983"),
            79.10,
        ),
        MockListing::new("4GLD.DE", "Xetra-Gold", "EUR", Some("DE000A0S9GB0"), 61.20),
        MockListing::new("XAID.L", "WisdomTree Aluminium", "GBP", Some("GB00B00FHZ82"), 1.52),
    ]
}

fn ft_catalog() -> Vec<MockListing> {
    vec![
        MockListing::new("AAPL:NSQ", "Apple Inc", "USD", Some("US0378331005"), 185.64),
        MockListing::new(
            "IWDA:AEX:EUR",
            "iShares Core MSCI World UCITS ETF USD (Acc)",
            "EUR",
            Some("IE00B4L5Y983"),
            82.55,
        ),
        MockListing::new("4GLD:GER:EUR", "Xetra-Gold", "EUR", Some("DE000A0S9GB0"), 61.20),
    ]
}

fn ticker_seed(ticker: &str) -> u64 {
    ticker
        .to_ascii_uppercase()
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(byte as u64))
}
