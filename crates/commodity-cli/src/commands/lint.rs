use commodity_core::{
    lint, AuditStatus, CommodityRegistry, LintOptions, LintReport, ProviderSet, RegistryConfig,
};

use crate::cli::{Cli, LintArgs};
use crate::error::CliError;

use super::{load_registry, CommandReport};

pub fn run(args: &LintArgs, cli: &Cli, providers: &ProviderSet) -> Result<CommandReport, CliError> {
    let mut lines = Vec::new();

    let registry = match &args.path {
        Some(path) => {
            lines.push(format!("Linting external path: {}", path.display()));
            CommodityRegistry::new(&RegistryConfig::new().without_bundled().with_path(path))
        }
        None => {
            let registry = load_registry(cli);
            lines.push(format!("Linting registry ({} commodities)...", registry.len()));
            registry
        }
    };

    let options = LintOptions {
        verify: args.verify,
        only: args.only.clone(),
    };
    let report = lint(&registry, providers, &options)?;

    if args.verify {
        lines.extend(audit_lines(&report));
    }

    lines.extend(summary_lines(&report));

    let result = CommandReport::new(serde_json::to_value(&report)?).with_lines(lines);
    if report.passed() {
        Ok(result)
    } else {
        Ok(result.failed())
    }
}

/// Errors alone on failure; warnings and the pass line otherwise.
fn summary_lines(report: &LintReport) -> Vec<String> {
    if !report.passed() {
        return report
            .errors
            .iter()
            .map(|error| format!("ERROR: {error}"))
            .collect();
    }

    report
        .warnings
        .iter()
        .map(|warning| format!("WARNING: {warning}"))
        .chain(std::iter::once(String::from("All checks passed.")))
        .collect()
}

fn audit_lines(report: &LintReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "=== Granular Data Audit (Live) - {} items ===",
            report.audits.len()
        ),
    ];

    for audit in &report.audits {
        let (Some(provider), Some(ticker)) = (&audit.provider, &audit.ticker) else {
            lines.push(format!("{}: [SKIPPED: No compatible ticker]", audit.name));
            continue;
        };

        let status = match audit.status {
            AuditStatus::Ok => "OK",
            AuditStatus::Failed => "FAILED",
            AuditStatus::Skipped => "SKIPPED",
        };
        lines.push(format!("{}({provider} {ticker}): {status}", audit.name));

        if audit.status == AuditStatus::Failed {
            lines.extend(audit.details.iter().map(|detail| format!("  {detail}")));
        }
    }

    lines
}
