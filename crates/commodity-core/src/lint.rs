//! Registry lint: load errors, duplicate ISINs and an optional live audit.
//!
//! Errors fail a lint, warnings never do. Schema problems surface here as
//! load errors because invalid records never get past the loader.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::discovery::fetch_metadata;
use crate::verify::verify_ticker;
use crate::{Commodity, CommodityRegistry, CoreError, ProviderId, ProviderSet};

/// Report every ISIN that reappears under a different record name.
///
/// A record repeating an earlier record's name is an override, not a
/// duplicate, and is not reported.
pub fn duplicate_isins(records: &[Commodity]) -> Vec<String> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut errors = Vec::new();

    for record in records {
        let Some(isin) = &record.isin else {
            continue;
        };
        let name = record.name.as_str();
        if let Some(previous) = seen.insert(isin.as_str(), name) {
            if previous != name {
                errors.push(format!("Duplicate ISIN {isin} in {name} and {previous}"));
            }
        }
    }

    errors
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Cross-check records against live providers.
    pub verify: bool,
    /// Restrict the live audit to records with this name.
    pub only: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Ok,
    Failed,
    Skipped,
}

/// Outcome of auditing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub name: String,
    pub provider: Option<ProviderId>,
    pub ticker: Option<String>,
    pub status: AuditStatus,
    /// Human-readable audit log, one line per check.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub checked: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub audits: Vec<AuditEntry>,
}

impl LintReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lint a loaded registry.
///
/// Returns [`CoreError::UnknownCommodity`] when `options.only` names no record.
pub fn lint(
    registry: &CommodityRegistry,
    providers: &ProviderSet,
    options: &LintOptions,
) -> Result<LintReport, CoreError> {
    let records = registry.all();
    let mut report = LintReport {
        checked: records.len(),
        errors: registry.load_errors().to_vec(),
        ..LintReport::default()
    };
    report.errors.extend(duplicate_isins(records));

    if options.verify {
        let targets = match options.only.as_deref() {
            Some(only) => {
                let targets = records
                    .iter()
                    .filter(|record| record.name.as_str().eq_ignore_ascii_case(only.trim()))
                    .collect::<Vec<_>>();
                if targets.is_empty() {
                    return Err(CoreError::UnknownCommodity(only.to_owned()));
                }
                targets
            }
            None => records.iter().collect(),
        };

        info!(targets = targets.len(), "starting live audit");
        for record in targets {
            let entry = audit(record, providers, &mut report.warnings);
            report.audits.push(entry);
        }
    }

    Ok(report)
}

/// Tickers in audit preference order.
fn audit_tickers(record: &Commodity) -> Vec<(&'static str, &str)> {
    ProviderId::AUDIT_ORDER
        .iter()
        .filter_map(|&provider| record.tickers.get(provider).map(|ticker| (provider, ticker)))
        .collect()
}

fn audit(record: &Commodity, providers: &ProviderSet, warnings: &mut Vec<String>) -> AuditEntry {
    let name = record.name.to_string();
    let tickers = audit_tickers(record);

    let Some(&(provider, ticker)) = tickers.first() else {
        return AuditEntry {
            name,
            provider: None,
            ticker: None,
            status: AuditStatus::Skipped,
            details: vec![String::from("No compatible ticker")],
        };
    };

    let mut details = Vec::new();
    let mut success = true;

    match fetch_metadata(providers, ticker, None, provider) {
        None => {
            details.push(format!("[!] FAILED: No external data found for {ticker}"));
            warnings.push(format!("{name}: No external metadata found"));
            success = false;
        }
        Some(metadata) => {
            details.push(format!(
                "ISIN:     {}",
                record.isin.as_ref().map_or("N/A", |isin| isin.as_str())
            ));

            let currency_matches = metadata
                .currency
                .as_deref()
                .is_some_and(|currency| record.currency.matches(currency));
            if currency_matches {
                details.push(format!("Currency: {} [OK]", record.currency));
            } else {
                details.push(format!(
                    "Currency: {} [MISMATCH: {}]",
                    record.currency,
                    metadata.currency.as_deref().unwrap_or("unknown")
                ));
                warnings.push(format!("{name}: Currency mismatch"));
                success = false;
            }

            if let Some(figi) = &record.figi {
                details.push(format!("FIGI:     {figi}"));
            }

            if record.validation_points.is_empty() {
                details.push(String::from(
                    "Historical Verification: [SKIPPED: No validation points]",
                ));
            } else {
                details.push(String::from("Historical Verification:"));
                for point in &record.validation_points {
                    details.push(format!("  - {} (Target: {}):", point.date, point.price));
                    let mut verified = 0;
                    for &(check_provider, check_ticker) in &tickers {
                        let ok = verify_ticker(
                            providers,
                            check_ticker,
                            point.date,
                            point.price,
                            check_provider,
                        );
                        let label = if ok { "[OK: Range Match]" } else { "[FAILED]" };
                        details.push(format!(
                            "    * {}: {label}",
                            check_provider.to_ascii_uppercase()
                        ));
                        verified += usize::from(ok);
                    }
                    if verified == 0 {
                        warnings.push(format!(
                            "{name}: Price verification failed on {}",
                            point.date
                        ));
                        success = false;
                    }
                }
            }
        }
    }

    AuditEntry {
        name,
        provider: Some(ProviderId::builtin(provider)),
        ticker: Some(ticker.to_owned()),
        status: if success {
            AuditStatus::Ok
        } else {
            AuditStatus::Failed
        },
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetClass, InstrumentType};

    fn etf(name: &str, isin: &str) -> Commodity {
        Commodity::new(name, InstrumentType::Etf, AssetClass::EquityEtf, "EUR")
            .and_then(|record| record.with_isin(isin))
            .expect("valid record")
    }

    #[test]
    fn flags_isin_shared_by_different_names() {
        let records = vec![
            etf("IWDA", "IE00B4L5Y983"),
            etf("SWDA", "IE00B4L5Y983"),
            etf("CSPX", "IE00B5BMR087"),
        ];
        assert_eq!(
            duplicate_isins(&records),
            vec!["Duplicate ISIN IE00B4L5Y983 in SWDA and IWDA"]
        );
    }

    #[test]
    fn same_name_override_is_not_a_duplicate() {
        let records = vec![etf("IWDA", "IE00B4L5Y983"), etf("IWDA", "IE00B4L5Y983")];
        assert!(duplicate_isins(&records).is_empty());
    }

    #[test]
    fn records_without_tickers_are_skipped() {
        let entry = audit(
            &etf("IWDA", "IE00B4L5Y983"),
            &ProviderSet::empty(),
            &mut Vec::new(),
        );
        assert_eq!(entry.status, AuditStatus::Skipped);
        assert_eq!(entry.ticker, None);
    }

    #[test]
    fn audit_prefers_yahoo_then_ft_then_google() {
        let record = etf("IWDA", "IE00B4L5Y983")
            .with_ticker("google", "AMS:IWDA")
            .and_then(|record| record.with_ticker("ft", "IWDA:AEX:EUR"))
            .expect("tickers");
        let order = audit_tickers(&record)
            .into_iter()
            .map(|(provider, _)| provider)
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["ft", "google"]);
    }
}
