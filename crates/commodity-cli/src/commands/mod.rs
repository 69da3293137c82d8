mod add;
mod fetch;
mod lint;
mod resolve;

use commodity_core::{CommodityRegistry, ProviderSet, ProviderSetBuilder, RegistryConfig};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command has to say: text lines, a JSON payload and an outcome.
pub struct CommandReport {
    pub lines: Vec<String>,
    pub data: Value,
    pub success: bool,
}

impl CommandReport {
    pub fn new(data: Value) -> Self {
        Self {
            lines: Vec::new(),
            data,
            success: true,
        }
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }
}

pub fn run(cli: &Cli) -> Result<CommandReport, CliError> {
    let providers = build_providers(cli.mock);

    match &cli.command {
        Command::Resolve(args) => resolve::run(args, &load_registry(cli), &providers),
        Command::Lint(args) => lint::run(args, cli, &providers),
        Command::Add(args) => add::run(args, cli, &providers),
        Command::Fetch(args) => fetch::run(args, &providers),
    }
}

/// Registry configuration described by the global flags.
fn registry_config(cli: &Cli) -> RegistryConfig {
    RegistryConfig::new()
        .with_bundled(!cli.no_bundled)
        .with_paths(cli.registry_paths())
}

fn load_registry(cli: &Cli) -> CommodityRegistry {
    CommodityRegistry::new(&registry_config(cli))
}

fn build_providers(mock: bool) -> ProviderSet {
    if mock {
        return ProviderSetBuilder::new().with_mock_mode().build();
    }

    debug!("no live market-data providers configured");
    ProviderSetBuilder::new().build()
}
