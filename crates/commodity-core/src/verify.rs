//! Live price verification and candidate disambiguation.
//!
//! Provider failures never escape this module: an unregistered provider or a
//! provider error is logged and counts as "not verified".

use serde::Serialize;
use tracing::{debug, warn};

use crate::{Commodity, ProviderId, ProviderSet, TradeDate};

/// Check that `ticker` traded around `price` on `date` according to `provider`.
pub fn verify_ticker(
    providers: &ProviderSet,
    ticker: &str,
    date: TradeDate,
    price: f64,
    provider: &str,
) -> bool {
    let source = match providers.require(provider) {
        Ok(source) => source,
        Err(error) => {
            warn!(ticker, %date, %error, "cannot verify ticker");
            return false;
        }
    };

    match source.validate(ticker, date, price) {
        Ok(verified) => {
            debug!(ticker, %date, price, provider, verified, "ticker verification");
            verified
        }
        Err(error) => {
            warn!(ticker, %date, provider, %error, "error verifying ticker");
            false
        }
    }
}

/// The candidate, provider and ticker that matched a price check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification<'a> {
    pub commodity: &'a Commodity,
    pub provider: ProviderId,
    pub ticker: String,
}

/// Pick the first candidate with a ticker that verifies against `date`/`price`.
///
/// Candidates are tried in the order given and each candidate's tickers in
/// ticker-map order, each against its own provider. `None` means nothing
/// verified; the first candidate is not picked as a fallback.
pub fn disambiguate<'a>(
    candidates: &[&'a Commodity],
    date: TradeDate,
    price: f64,
    providers: &ProviderSet,
) -> Option<Verification<'a>> {
    candidates.iter().find_map(|&commodity| {
        commodity
            .tickers
            .iter()
            .find(|(provider, ticker)| {
                verify_ticker(providers, ticker, date, price, provider.as_str())
            })
            .map(|(provider, ticker)| Verification {
                commodity,
                provider: provider.clone(),
                ticker: ticker.to_owned(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetClass, InstrumentType, ProviderSetBuilder};

    fn date() -> TradeDate {
        TradeDate::parse("2024-01-02").expect("valid date")
    }

    fn record(name: &str, tickers: &[(&str, &str)]) -> Commodity {
        tickers.iter().fold(
            Commodity::new(name, InstrumentType::Etf, AssetClass::CommodityEtf, "EUR")
                .expect("valid record"),
            |record, (provider, ticker)| record.with_ticker(provider, ticker).expect("ticker"),
        )
    }

    #[test]
    fn unregistered_provider_does_not_verify() {
        let providers = ProviderSet::empty();
        assert!(!verify_ticker(&providers, "AAPL", date(), 185.64, "yahoo"));
    }

    #[test]
    fn provider_error_does_not_verify() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        assert!(!verify_ticker(&providers, "UNLISTED", date(), 1.0, "yahoo"));
        assert!(verify_ticker(&providers, "AAPL", date(), 185.64, "YAHOO"));
    }

    #[test]
    fn picks_first_candidate_that_verifies() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let unlisted = record("X.NONE", &[("yahoo", "NONE.DE")]);
        let gold = record("X.4GLD", &[("google", "ETR:4GLD"), ("ft", "4GLD:GER:EUR")]);

        let verification =
            disambiguate(&[&unlisted, &gold], date(), 61.2, &providers).expect("verified");
        assert_eq!(verification.commodity.name.as_str(), "X.4GLD");
        assert_eq!(verification.provider.as_str(), "ft");
        assert_eq!(verification.ticker, "4GLD:GER:EUR");
    }

    #[test]
    fn nothing_verifies_means_no_pick() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let gold = record("X.4GLD", &[("yahoo", "4GLD.DE")]);
        assert!(disambiguate(&[&gold], date(), 5_000.0, &providers).is_none());
    }
}
