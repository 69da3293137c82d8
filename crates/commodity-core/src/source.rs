use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Market-data provider identifier (`yahoo`, `ft`, `google`, ...).
///
/// The set is open: any non-empty id is accepted and stored lowercase, so new
/// providers need no schema change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderId(String);

impl ProviderId {
    pub const YAHOO: &'static str = "yahoo";
    pub const FT: &'static str = "ft";
    pub const GOOGLE: &'static str = "google";
    pub const IBKR: &'static str = "ibkr";

    /// Provider order probed when a token is tried as a raw provider ticker.
    pub const TICKER_FALLBACK_ORDER: [&'static str; 3] = [Self::YAHOO, Self::IBKR, Self::GOOGLE];

    /// Provider order used when picking the ticker to audit a record with.
    pub const AUDIT_ORDER: [&'static str; 3] = [Self::YAHOO, Self::FT, Self::GOOGLE];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyProvider);
        }
        Ok(Self(normalized))
    }

    /// Wrap one of the lowercase id constants above.
    pub(crate) fn builtin(id: &'static str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ProviderId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProviderId> for String {
    fn from(value: ProviderId) -> Self {
        value.0
    }
}

impl PartialEq<str> for ProviderId {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}
