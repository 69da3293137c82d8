//! Building new records and merging them into a data file on disk.
//!
//! Writes never touch a live [`CommodityRegistry`](crate::CommodityRegistry);
//! load a new registry to see the result.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::{
    AssetClass, Commodity, CommodityName, Currency, InstrumentType, Isin, SearchResult, TickerMap,
    TradeDate, ValidationPoint, WriteError,
};

/// File created inside a directory target.
pub const MANUAL_FILE_NAME: &str = "manual.yaml";

const COMMODITIES_KEY: &str = "commodities";

/// Loosely-typed input for a new record, as collected from a user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommodityDraft {
    pub isin: Option<String>,
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub figi: Option<String>,
    pub instrument_type: Option<InstrumentType>,
    pub asset_class: Option<AssetClass>,
    pub validation_date: Option<String>,
    pub validation_price: Option<f64>,
}

impl CommodityDraft {
    /// Fill the ticker and currency from an online match where the user gave none.
    pub fn fill_from(&mut self, metadata: &SearchResult) {
        if self.ticker.is_none() {
            self.ticker = Some(metadata.symbol.ticker.clone());
        }
        if self.currency.is_none() {
            self.currency = metadata.symbol.currency.clone();
        }
    }

    /// Required fields still missing, in the order they are reported.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.isin.is_none() && self.ticker.is_none() {
            missing.push("isin or ticker");
        }
        if self.instrument_type.is_none() {
            missing.push("instrument type");
        }
        if self.asset_class.is_none() {
            missing.push("asset class");
        }
        if self.currency.is_none() {
            missing.push("currency");
        }
        missing
    }
}

/// Turn a draft into a validated record.
///
/// The name is the explicit one if given, otherwise derived from the ticker
/// with [`CommodityName::from_ticker`]. Tickers are stored only for an online
/// match. A validation point is recorded when both date and price are set.
pub fn build_commodity(
    draft: &CommodityDraft,
    metadata: Option<&SearchResult>,
) -> Result<Commodity, WriteError> {
    let missing = draft.missing_fields();
    let (Some(instrument_type), Some(asset_class), Some(currency)) =
        (draft.instrument_type, draft.asset_class, draft.currency.as_deref())
    else {
        return Err(WriteError::MissingFields(missing));
    };
    if !missing.is_empty() {
        return Err(WriteError::MissingFields(missing));
    }

    let name = match (draft.name.as_deref(), draft.ticker.as_deref()) {
        (Some(name), _) => CommodityName::parse(&name.trim().to_ascii_uppercase())?,
        (None, Some(ticker)) => CommodityName::from_ticker(ticker)?,
        (None, None) => return Err(WriteError::MissingFields(vec!["name or ticker"])),
    };

    let mut tickers = TickerMap::new();
    if let Some(found) = metadata {
        tickers.insert(found.provider.clone(), found.symbol.ticker.clone());
    }

    let validation_points = match (draft.validation_date.as_deref(), draft.validation_price) {
        (Some(date), Some(price)) => vec![ValidationPoint::new(TradeDate::parse(date)?, price)?],
        _ => Vec::new(),
    };

    Ok(Commodity {
        name,
        isin: draft.isin.as_deref().map(Isin::parse).transpose()?,
        figi: draft.figi.clone(),
        instrument_type,
        asset_class,
        currency: Currency::parse(&currency.trim().to_ascii_uppercase())?,
        issuer: None,
        underlying: None,
        tickers,
        validation_points,
        provider: None,
        risk_profile: None,
        liquidity: None,
    })
}

/// Result of [`save_commodity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Dry run: the document that would be written, nothing touched.
    Preview { target: PathBuf, rendered: String },
    /// An entry with the same ISIN or name was replaced.
    Updated { path: PathBuf },
    /// The record was appended.
    Appended { path: PathBuf },
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Preview { target, .. } => target,
            Self::Updated { path } | Self::Appended { path } => path,
        }
    }
}

/// Where a record aimed at `target` is written.
///
/// A directory, or a path without an extension, gets `manual.yaml` inside it.
pub fn resolve_target(target: &Path) -> PathBuf {
    if target.is_dir() || target.extension().is_none() {
        target.join(MANUAL_FILE_NAME)
    } else {
        target.to_path_buf()
    }
}

/// Merge `commodity` into the document at `target`.
///
/// An existing entry matching by ISIN, then by name, is replaced whole;
/// otherwise the record is appended. Top-level keys other than `commodities`
/// are kept. A bare list document is rewritten under `commodities`.
pub fn save_commodity(
    commodity: &Commodity,
    target: &Path,
    dry_run: bool,
) -> Result<SaveOutcome, WriteError> {
    let path = resolve_target(target);
    let entry = serde_yaml::to_value(commodity)?;

    if dry_run {
        let mut preview = Mapping::new();
        preview.insert(COMMODITIES_KEY.into(), Value::Sequence(vec![entry]));
        let rendered = serde_yaml::to_string(&preview)?;
        return Ok(SaveOutcome::Preview {
            target: path,
            rendered,
        });
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }

    let mut document = read_document(&path)?;
    let key = Value::from(COMMODITIES_KEY);
    let mut entries = match document.get(&key) {
        Some(Value::Sequence(entries)) => entries.clone(),
        _ => Vec::new(),
    };

    let position = entries
        .iter()
        .position(|existing| matches_record(existing, commodity));
    let updated = match position {
        Some(position) => {
            entries[position] = entry;
            true
        }
        None => {
            entries.push(entry);
            false
        }
    };
    // Re-inserting an existing key keeps its position among the other keys.
    document.insert(key, Value::Sequence(entries));

    let rendered = serde_yaml::to_string(&document)?;
    fs::write(&path, rendered).map_err(|source| io_error(&path, source))?;

    if updated {
        info!(name = %commodity.name, path = %path.display(), "updated existing record");
        Ok(SaveOutcome::Updated { path })
    } else {
        info!(name = %commodity.name, path = %path.display(), "appended record");
        Ok(SaveOutcome::Appended { path })
    }
}

/// Existing document at `path` as a mapping, or an empty one when absent.
fn read_document(path: &Path) -> Result<Mapping, WriteError> {
    if !path.exists() {
        debug!(path = %path.display(), "creating new data file");
        return Ok(Mapping::new());
    }

    let contents = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let value: Value =
        serde_yaml::from_str(&contents).map_err(|source| WriteError::ExistingDocument {
            path: path.display().to_string(),
            source,
        })?;

    Ok(match value {
        Value::Mapping(mapping) => mapping,
        Value::Sequence(entries) => {
            let mut mapping = Mapping::new();
            mapping.insert(COMMODITIES_KEY.into(), Value::Sequence(entries));
            mapping
        }
        _ => Mapping::new(),
    })
}

fn matches_record(existing: &Value, commodity: &Commodity) -> bool {
    let field = |key: &str| existing.get(key).and_then(Value::as_str);
    match &commodity.isin {
        Some(isin) if field("isin") == Some(isin.as_str()) => true,
        _ => field("name") == Some(commodity.name.as_str()),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderId;
    use crate::ProviderSymbol;
    use tempfile::tempdir;

    fn draft() -> CommodityDraft {
        CommodityDraft {
            isin: Some(String::from("GB00B00FHZ82")),
            ticker: Some(String::from("alum.l")),
            currency: Some(String::from("gbp")),
            instrument_type: Some(InstrumentType::Etc),
            asset_class: Some(AssetClass::CommodityEtf),
            ..CommodityDraft::default()
        }
    }

    fn yahoo_hit(ticker: &str) -> SearchResult {
        SearchResult {
            provider: ProviderId::parse("yahoo").expect("valid id"),
            symbol: ProviderSymbol::new(ticker).with_currency("GBP"),
        }
    }

    #[test]
    fn reports_every_missing_field() {
        let error = build_commodity(&CommodityDraft::default(), None).expect_err("incomplete");
        assert_eq!(
            error.to_string(),
            "missing required fields: isin or ticker, instrument type, asset class, currency"
        );
    }

    #[test]
    fn derives_name_and_skips_tickers_without_online_match() {
        let record = build_commodity(&draft(), None).expect("complete draft");
        assert_eq!(record.name.as_str(), "ALUM.L");
        assert_eq!(record.currency.as_str(), "GBP");
        assert!(record.tickers.is_empty());
        assert!(record.validation_points.is_empty());
    }

    #[test]
    fn stores_online_ticker_and_validation_point() {
        let mut draft = draft();
        draft.validation_date = Some(String::from("2024-01-02"));
        draft.validation_price = Some(1.52);

        let record = build_commodity(&draft, Some(&yahoo_hit("XAID.L"))).expect("complete");
        assert_eq!(record.tickers.get("yahoo"), Some("XAID.L"));
        assert_eq!(record.validation_points.len(), 1);
    }

    #[test]
    fn validation_point_needs_date_and_price() {
        let mut draft = draft();
        draft.validation_price = Some(1.52);
        let record = build_commodity(&draft, None).expect("complete");
        assert!(record.validation_points.is_empty());
    }

    #[test]
    fn invalid_isin_is_rejected() {
        let mut draft = draft();
        draft.isin = Some(String::from("GB00B00FHZ83"));
        assert!(matches!(
            build_commodity(&draft, None),
            Err(WriteError::Validation(_))
        ));
    }

    #[test]
    fn fill_from_keeps_user_values() {
        let mut draft = CommodityDraft {
            currency: Some(String::from("EUR")),
            ..CommodityDraft::default()
        };
        draft.fill_from(&yahoo_hit("XAID.L"));
        assert_eq!(draft.ticker.as_deref(), Some("XAID.L"));
        assert_eq!(draft.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn directory_and_extensionless_targets_get_manual_yaml() {
        let dir = tempdir().expect("tempdir");
        assert_eq!(resolve_target(dir.path()), dir.path().join("manual.yaml"));
        assert_eq!(
            resolve_target(&dir.path().join("user")),
            dir.path().join("user/manual.yaml")
        );
        assert_eq!(
            resolve_target(&dir.path().join("mine.yml")),
            dir.path().join("mine.yml")
        );
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().expect("tempdir");
        let record = build_commodity(&draft(), None).expect("complete");
        let outcome = save_commodity(&record, &dir.path().join("new"), true).expect("preview");

        let SaveOutcome::Preview { target, rendered } = outcome else {
            panic!("expected preview");
        };
        assert_eq!(target, dir.path().join("new/manual.yaml"));
        assert!(rendered.starts_with("commodities:"));
        assert!(rendered.contains("name: ALUM.L"));
        assert!(!dir.path().join("new").exists());
    }

    #[test]
    fn corrupt_existing_file_is_left_alone() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "commodities: [\n").expect("write");

        let record = build_commodity(&draft(), None).expect("complete");
        let error = save_commodity(&record, &path, false).expect_err("refuses");
        assert!(matches!(error, WriteError::ExistingDocument { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), "commodities: [\n");
    }
}
