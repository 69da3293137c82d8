use std::env;
use std::path::PathBuf;

use crate::loader::RegistrySource;

/// Environment variable overriding the default user data directory.
pub const REGISTRY_PATH_ENV: &str = "PATH_COMMODITY_REGISTRY";

/// User data directory used when the environment does not name one.
pub const DEFAULT_REGISTRY_PATH: &str = "data/commodities/";

/// Which layers a registry is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub include_bundled: bool,
    pub extra_paths: Vec<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_bundled: true,
            extra_paths: Vec::new(),
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundled data plus the user directory from [`default_registry_path`].
    pub fn from_env() -> Self {
        Self::new().with_path(default_registry_path())
    }

    pub fn without_bundled(mut self) -> Self {
        self.include_bundled = false;
        self
    }

    pub fn with_bundled(mut self, include_bundled: bool) -> Self {
        self.include_bundled = include_bundled;
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_paths.push(path.into());
        self
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.extra_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Load order: bundled first (if enabled), then extra paths as given.
    pub fn sources(&self) -> Vec<RegistrySource> {
        let bundled = self.include_bundled.then_some(RegistrySource::Bundled);
        bundled
            .into_iter()
            .chain(self.extra_paths.iter().cloned().map(RegistrySource::Path))
            .collect()
    }
}

/// User data directory: `$PATH_COMMODITY_REGISTRY`, else `data/commodities/`.
pub fn default_registry_path() -> PathBuf {
    env::var_os(REGISTRY_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_layer_loads_first() {
        let config = RegistryConfig::new().with_path("a").with_path("b");
        assert_eq!(
            config.sources(),
            vec![
                RegistrySource::Bundled,
                RegistrySource::Path(PathBuf::from("a")),
                RegistrySource::Path(PathBuf::from("b")),
            ]
        );
    }

    #[test]
    fn bundled_layer_can_be_disabled() {
        let config = RegistryConfig::new().without_bundled().with_paths(["x"]);
        assert_eq!(config.sources(), vec![RegistrySource::Path(PathBuf::from("x"))]);
    }
}
