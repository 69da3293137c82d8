use commodity_core::{
    disambiguate, resolve_candidates, Commodity, CommodityRegistry, ProviderSet, TradeDate,
    Verification,
};
use serde::Serialize;

use crate::cli::ResolveArgs;
use crate::error::CliError;

use super::CommandReport;

#[derive(Debug, Serialize)]
struct ResolveResponseData<'a> {
    token: &'a str,
    candidates: Vec<&'a Commodity>,
    resolved: Option<&'a Commodity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<Verification<'a>>,
}

pub fn run(
    args: &ResolveArgs,
    registry: &CommodityRegistry,
    providers: &ProviderSet,
) -> Result<CommandReport, CliError> {
    let candidates = resolve_candidates(
        registry,
        &args.token,
        args.currency.as_deref(),
        args.provider.as_deref(),
    );

    let mut lines = Vec::new();
    let mut data = ResolveResponseData {
        token: &args.token,
        candidates: candidates.clone(),
        resolved: None,
        verification: None,
    };

    if candidates.is_empty() {
        lines.push(format!("Could not resolve '{}'", args.token));
        return Ok(CommandReport::new(serde_json::to_value(&data)?)
            .with_lines(lines)
            .failed());
    }

    let (Some(date), Some(price)) = (args.date.as_deref(), args.price) else {
        data.resolved = candidates.first().copied();
        lines.push(format!("Resolved: {}", candidates[0].name));
        return Ok(CommandReport::new(serde_json::to_value(&data)?).with_lines(lines));
    };

    let date = TradeDate::parse(date)?;
    lines.push(format!(
        "Verifying {} candidate(s) against price {price} on {date}...",
        candidates.len()
    ));

    match disambiguate(&candidates, date, price, providers) {
        Some(verification) => {
            lines.push(format!(
                "  [OK] Verified {} via {} ({})",
                verification.commodity.name,
                verification.provider.as_str().to_ascii_uppercase(),
                verification.ticker
            ));
            lines.push(format!("Resolved: {}", verification.commodity.name));
            data.resolved = Some(verification.commodity);
            data.verification = Some(verification);
            Ok(CommandReport::new(serde_json::to_value(&data)?).with_lines(lines))
        }
        None => {
            let names = candidates
                .iter()
                .map(|candidate| candidate.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!(
                "  [!] FAILED: Price {price} on {date} does not match any known tickers for candidates: {names}"
            ));
            Ok(CommandReport::new(serde_json::to_value(&data)?)
                .with_lines(lines)
                .failed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commodity_core::{ProviderSetBuilder, RegistryConfig};

    fn args(token: &str) -> ResolveArgs {
        ResolveArgs {
            token: token.to_owned(),
            provider: None,
            currency: None,
            date: None,
            price: None,
        }
    }

    fn bundled() -> CommodityRegistry {
        CommodityRegistry::new(&RegistryConfig::new())
    }

    #[test]
    fn resolves_bundled_isin() {
        let report = run(&args("us0378331005"), &bundled(), &ProviderSet::empty())
            .expect("command runs");
        assert!(report.success);
        assert_eq!(report.lines, vec!["Resolved: AAPL"]);
        assert_eq!(report.data["resolved"]["name"], "AAPL");
    }

    #[test]
    fn unknown_token_fails() {
        let report =
            run(&args("NOPE"), &bundled(), &ProviderSet::empty()).expect("command runs");
        assert!(!report.success);
        assert_eq!(report.lines, vec!["Could not resolve 'NOPE'"]);
    }

    #[test]
    fn verification_picks_verified_candidate() {
        let mut args = args("DE000A0S9GB0");
        args.date = Some(String::from("2024-01-02"));
        args.price = Some(61.2);
        let providers = ProviderSetBuilder::new().with_mock_mode().build();

        let report = run(&args, &bundled(), &providers).expect("command runs");
        assert!(report.success);
        assert_eq!(report.lines.last().map(String::as_str), Some("Resolved: X.4GLD"));
        assert_eq!(report.data["verification"]["provider"], "yahoo");
    }

    #[test]
    fn verification_without_providers_fails() {
        let mut args = args("AAPL");
        args.date = Some(String::from("2024-01-02"));
        args.price = Some(185.64);

        let report = run(&args, &bundled(), &ProviderSet::empty()).expect("command runs");
        assert!(!report.success);
        assert!(report.lines[1].contains("[!] FAILED"));
    }
}
