use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::CommandReport;
use crate::error::CliError;

pub fn render(report: &CommandReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            for line in &report.lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            let payload = json!({
                "success": report.success,
                "data": report.data,
            });
            let payload = if pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{payload}");
        }
    }

    Ok(())
}
