use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical commodity name as used in ledger files (`^[A-Z][A-Z0-9._-]*$`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommodityName(String);

impl CommodityName {
    /// Parse a canonical name. No case folding: lowercase input is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let mut chars = input.chars();
        let valid_start = chars.next().is_some_and(|ch| ch.is_ascii_uppercase());
        let valid_rest = chars.all(|ch| {
            ch.is_ascii_uppercase() || ch.is_ascii_digit() || matches!(ch, '.' | '_' | '-')
        });

        if !(valid_start && valid_rest) {
            return Err(ValidationError::NameFormat {
                value: input.to_owned(),
            });
        }

        Ok(Self(input.to_owned()))
    }

    /// Derive a canonical name from a free-form ticker such as `ALUM.L` or `4GLD:GER:EUR`.
    ///
    /// Takes the part before the first `:`, uppercases it, replaces disallowed
    /// characters with `.`, collapses runs of `.`, trims them from both ends and
    /// prefixes `X.` when the result does not start with a letter.
    pub fn from_ticker(ticker: &str) -> Result<Self, ValidationError> {
        let base = ticker.split(':').next().unwrap_or_default().to_ascii_uppercase();

        let mut cleaned = String::with_capacity(base.len());
        for ch in base.chars() {
            let ch = if ch.is_ascii_uppercase()
                || ch.is_ascii_digit()
                || matches!(ch, '.' | '_' | '-')
            {
                ch
            } else {
                '.'
            };
            if ch == '.' && cleaned.ends_with('.') {
                continue;
            }
            cleaned.push(ch);
        }
        let cleaned = cleaned.trim_matches('.');

        if cleaned.starts_with(|ch: char| ch.is_ascii_uppercase()) {
            Self::parse(cleaned)
        } else {
            Self::parse(&format!("X.{cleaned}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CommodityName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CommodityName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CommodityName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CommodityName> for String {
    fn from(value: CommodityName) -> Self {
        value.0
    }
}
