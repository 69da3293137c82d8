use commodity_core::{
    build_commodity, save_commodity, search_isin, AssetClass, CommodityDraft, InstrumentType,
    ProviderSet, SaveOutcome, SecurityCriteria, WriteError,
};
use serde_json::json;

use crate::cli::{AddArgs, Cli};
use crate::error::CliError;

use super::CommandReport;

/// Country prefixes that mark a positional token as an ISIN.
const ISIN_PREFIXES: [&str; 5] = ["US", "GB", "DE", "FR", "NL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Isin,
    Ticker,
}

fn classify_token(token: &str) -> TokenKind {
    let upper = token.trim().to_ascii_uppercase();
    if ISIN_PREFIXES.iter().any(|prefix| upper.starts_with(prefix)) {
        TokenKind::Isin
    } else {
        TokenKind::Ticker
    }
}

fn draft_from_args(args: &AddArgs) -> Result<CommodityDraft, CliError> {
    let mut isin = args.isin.clone();
    let mut ticker = args.ticker.clone();
    if let Some(token) = &args.token {
        match classify_token(token) {
            TokenKind::Isin => isin = isin.or_else(|| Some(token.clone())),
            TokenKind::Ticker => ticker = ticker.or_else(|| Some(token.clone())),
        }
    }

    Ok(CommodityDraft {
        isin,
        ticker,
        name: args.name.clone(),
        currency: args.currency.clone(),
        figi: args.figi.clone(),
        instrument_type: args
            .instrument_type
            .as_deref()
            .map(str::parse::<InstrumentType>)
            .transpose()?,
        asset_class: args
            .asset_class
            .as_deref()
            .map(str::parse::<AssetClass>)
            .transpose()?,
        validation_date: args.validation_date.clone(),
        validation_price: args.validation_price,
    })
}

pub fn run(args: &AddArgs, cli: &Cli, providers: &ProviderSet) -> Result<CommandReport, CliError> {
    let registry_paths = cli.registry_paths();
    let Some(target) = registry_paths.first() else {
        return Err(CliError::Command(String::from("no registry path to write to")));
    };

    let mut draft = draft_from_args(args)?;
    let mut lines = Vec::new();
    let mut metadata = None;

    if args.fetch {
        lines.push(String::from("Searching for metadata..."));
        let criteria = SecurityCriteria {
            isin: draft.isin.clone(),
            symbol: draft.ticker.clone(),
            currency: draft.currency.clone(),
        };

        match search_isin(providers, &criteria).into_iter().next() {
            Some(found) => {
                lines.push(format!(
                    "Found candidate: {} ({}) - {}",
                    found.symbol.ticker,
                    found.provider,
                    found.symbol.name.as_deref().unwrap_or("unnamed")
                ));
                draft.fill_from(&found);
                metadata = Some(found);
            }
            None => {
                lines.push(String::from("No online metadata found."));
                if draft.isin.is_none() && draft.ticker.is_none() {
                    return Err(CliError::Command(String::from(
                        "no ticker or ISIN provided and no online match found",
                    )));
                }
            }
        }
    }

    let commodity = build_commodity(&draft, metadata.as_ref()).map_err(|error| {
        if matches!(error, WriteError::MissingFields(_)) {
            CliError::Command(format!(
                "{error}; use --fetch with --isin or --ticker to auto-populate some fields"
            ))
        } else {
            CliError::Write(error)
        }
    })?;

    let outcome = save_commodity(&commodity, target, args.dry_run)?;
    let action = match &outcome {
        SaveOutcome::Preview { target, rendered } => {
            lines.push(String::new());
            lines.push(format!("[DRY RUN] Would save to: {}", target.display()));
            lines.extend(rendered.lines().map(str::to_owned));
            "preview"
        }
        SaveOutcome::Updated { path } => {
            let file = path.file_name().unwrap_or(path.as_os_str());
            lines.push(format!(
                "Updating existing record for {} in {}",
                commodity.name,
                file.to_string_lossy()
            ));
            "updated"
        }
        SaveOutcome::Appended { path } => {
            lines.push(format!("Auto-added {} to {}", commodity.name, path.display()));
            "appended"
        }
    };
    lines.push(format!("Successfully processed {}", commodity.name));

    let data = json!({
        "action": action,
        "path": outcome.path().display().to_string(),
        "commodity": serde_json::to_value(&commodity)?,
    });
    Ok(CommandReport::new(data).with_lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AddArgs {
        AddArgs {
            token: None,
            name: None,
            isin: None,
            ticker: None,
            instrument_type: None,
            asset_class: None,
            currency: None,
            figi: None,
            validation_date: None,
            validation_price: None,
            fetch: false,
            dry_run: false,
        }
    }

    #[test]
    fn classifies_tokens_by_country_prefix() {
        assert_eq!(classify_token("gb00b00fhz82"), TokenKind::Isin);
        assert_eq!(classify_token("NL0010273215"), TokenKind::Isin);
        assert_eq!(classify_token("IE00B4L5Y983"), TokenKind::Ticker);
        assert_eq!(classify_token("XAID.L"), TokenKind::Ticker);
    }

    #[test]
    fn explicit_flags_win_over_positional_token() {
        let mut args = args();
        args.token = Some(String::from("US0378331005"));
        args.isin = Some(String::from("US5949181045"));
        let draft = draft_from_args(&args).expect("valid args");
        assert_eq!(draft.isin.as_deref(), Some("US5949181045"));
        assert_eq!(draft.ticker, None);
    }

    #[test]
    fn enum_flags_are_parsed_case_insensitively() {
        let mut args = args();
        args.instrument_type = Some(String::from("etc"));
        args.asset_class = Some(String::from("commodityetf"));
        let draft = draft_from_args(&args).expect("valid args");
        assert_eq!(draft.instrument_type, Some(InstrumentType::Etc));
        assert_eq!(draft.asset_class, Some(AssetClass::CommodityEtf));
    }

    #[test]
    fn unknown_enum_value_is_a_validation_error() {
        let mut args = args();
        args.instrument_type = Some(String::from("Bond"));
        let error = draft_from_args(&args).expect_err("invalid");
        assert_eq!(error.exit_code(), 1);
        assert!(error.to_string().contains("expected one of"));
    }
}
