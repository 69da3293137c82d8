use commodity_core::{fetch_metadata, search_isin, ProviderId, ProviderSet, SecurityCriteria};
use serde_json::json;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::CommandReport;

/// Providers asked, in order, when fetching by ticker.
const TICKER_PROVIDERS: [&str; 2] = [ProviderId::YAHOO, ProviderId::FT];

pub fn run(args: &FetchArgs, providers: &ProviderSet) -> Result<CommandReport, CliError> {
    match (&args.isin, &args.ticker) {
        (Some(isin), _) => by_isin(isin, providers),
        (None, Some(ticker)) => by_ticker(ticker, providers),
        (None, None) => Err(CliError::Command(String::from(
            "please provide --isin or --ticker",
        ))),
    }
}

fn by_isin(isin: &str, providers: &ProviderSet) -> Result<CommandReport, CliError> {
    let results = search_isin(providers, &SecurityCriteria::by_isin(isin));
    let mut lines = vec![format!("Searching for ISIN: {isin}...")];

    if results.is_empty() {
        lines.push(String::from("No results found."));
    } else {
        lines.push(String::new());
        lines.push(String::from("Found Identifiers:"));
        for result in &results {
            lines.push(format!("- [{}]", result.provider.as_str().to_ascii_uppercase()));
            lines.push(format!("  Ticker:   {}", result.symbol.ticker));
            lines.push(format!("  Name:     {}", display(result.symbol.name.as_deref())));
            lines.push(format!(
                "  Currency: {}",
                display(result.symbol.currency.as_deref())
            ));
        }
    }

    let data = json!({ "isin": isin, "results": results });
    Ok(CommandReport::new(data).with_lines(lines))
}

fn by_ticker(ticker: &str, providers: &ProviderSet) -> Result<CommandReport, CliError> {
    let mut lines = Vec::new();
    let mut found = serde_json::Map::new();

    for provider in TICKER_PROVIDERS {
        lines.push(String::new());
        lines.push(format!(
            "Checking [{}] for {ticker}...",
            provider.to_ascii_uppercase()
        ));
        match fetch_metadata(providers, ticker, None, provider) {
            Some(symbol) => {
                lines.push(format!("  Name:     {}", display(symbol.name.as_deref())));
                lines.push(format!("  Currency: {}", display(symbol.currency.as_deref())));
                found.insert(provider.to_owned(), serde_json::to_value(&symbol)?);
            }
            None => {
                lines.push(String::from("  Not found."));
                found.insert(provider.to_owned(), serde_json::Value::Null);
            }
        }
    }

    let data = json!({ "ticker": ticker, "providers": found });
    Ok(CommandReport::new(data).with_lines(lines))
}

fn display(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

#[cfg(test)]
mod tests {
    use super::*;
    use commodity_core::ProviderSetBuilder;

    #[test]
    fn isin_search_lists_each_provider() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let report = by_isin("US0378331005", &providers).expect("command runs");
        assert!(report.lines.contains(&String::from("- [YAHOO]")));
        assert!(report.lines.contains(&String::from("- [FT]")));
        assert_eq!(report.data["results"][1]["ticker"], "AAPL:NSQ");
    }

    #[test]
    fn ticker_fetch_reports_misses() {
        let providers = ProviderSetBuilder::new().with_mock_mode().build();
        let report = by_ticker("XAID.L", &providers).expect("command runs");
        assert!(report.success);
        assert_eq!(report.data["providers"]["yahoo"]["currency"], "GBP");
        assert!(report.data["providers"]["ft"].is_null());
        assert!(report.lines.contains(&String::from("  Not found.")));
    }
}
