//! Online metadata lookups over a [`ProviderSet`].

use tracing::{debug, error};

use crate::{ProviderSet, ProviderSymbol, SearchResult, SecurityCriteria};

/// Ask `provider` for the listing behind `ticker` (and `isin`, when known).
///
/// Any failure, including an unregistered provider, yields `None`.
pub fn fetch_metadata(
    providers: &ProviderSet,
    ticker: &str,
    isin: Option<&str>,
    provider: &str,
) -> Option<ProviderSymbol> {
    let source = match providers.require(provider) {
        Ok(source) => source,
        Err(err) => {
            error!(%err, "provider not available");
            return None;
        }
    };

    let criteria = SecurityCriteria::by_symbol(ticker).with_isin(isin.map(str::to_owned));
    match source.resolve(&criteria) {
        Ok(symbol) => symbol,
        Err(err) => {
            error!(provider, ticker, %err, "error fetching metadata");
            None
        }
    }
}

/// Ask every registered provider, in registration order, to resolve `criteria`.
pub fn search_isin(providers: &ProviderSet, criteria: &SecurityCriteria) -> Vec<SearchResult> {
    providers
        .iter()
        .filter_map(|source| {
            let provider = source.id();
            match source.resolve(criteria) {
                Ok(symbol) => symbol.map(|symbol| SearchResult { provider, symbol }),
                Err(err) => {
                    debug!(%provider, isin = ?criteria.isin, %err, "search failed");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderSetBuilder;

    #[test]
    fn fetches_from_named_provider() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let symbol = fetch_metadata(&providers, "XAID.L", None, "yahoo").expect("listed");
        assert_eq!(symbol.currency.as_deref(), Some("GBP"));
        assert!(fetch_metadata(&providers, "XAID.L", None, "ft").is_none());
        assert!(fetch_metadata(&providers, "XAID.L", None, "google").is_none());
    }

    #[test]
    fn searches_every_provider() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let results = search_isin(&providers, &SecurityCriteria::by_isin("DE000A0S9GB0"));
        let hits = results
            .iter()
            .map(|result| (result.provider.as_str(), result.symbol.ticker.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(hits, vec![("yahoo", "4GLD.DE"), ("ft", "4GLD:GER:EUR")]);
    }

    #[test]
    fn search_swallows_provider_errors() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        assert!(search_isin(&providers, &SecurityCriteria::default()).is_empty());
    }
}
