//! Market-data provider capability.
//!
//! The registry never talks to the network itself. Anything that can map an
//! identifier to a listing, or check a historical price against a listing's
//! trading range, implements [`DataProvider`] and is registered in a
//! [`ProviderSet`](crate::ProviderSet).
//!
//! All calls are blocking. Implementations own their own timeouts; callers
//! degrade every [`ProviderError`] to "absent" or `false`.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{ProviderId, TradeDate};

/// Lookup criteria passed to [`DataProvider::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityCriteria {
    pub isin: Option<String>,
    pub symbol: Option<String>,
    pub currency: Option<String>,
}

impl SecurityCriteria {
    pub fn by_isin(isin: impl Into<String>) -> Self {
        Self {
            isin: Some(isin.into()),
            ..Self::default()
        }
    }

    pub fn by_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    pub fn with_isin(mut self, isin: Option<String>) -> Self {
        self.isin = isin;
        self
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        self.currency = currency;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.isin.is_none() && self.symbol.is_none()
    }
}

/// Listing returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSymbol {
    pub ticker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ProviderSymbol {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            currency: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// One provider's answer to a multi-provider search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub provider: ProviderId,
    #[serde(flatten)]
    pub symbol: ProviderSymbol,
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Unavailable,
    NotFound,
    InvalidRequest,
    Internal,
}

/// Structured provider error. Callers log it and degrade, they never raise it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
    retryable: bool,
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_registered(provider: &str) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: format!("provider '{provider}' is not registered"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::NotFound => "provider.not_found",
            ProviderErrorKind::InvalidRequest => "provider.invalid_request",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// A named market-data source.
pub trait DataProvider {
    /// Returns the provider id tickers are stored under.
    fn id(&self) -> ProviderId;

    /// Looks up the listing matching `criteria`.
    ///
    /// `Ok(None)` means the provider answered and knows no such listing.
    fn resolve(&self, criteria: &SecurityCriteria) -> Result<Option<ProviderSymbol>, ProviderError>;

    /// Checks whether `price` lies within the low/high range `ticker` traded
    /// at on `date`.
    fn validate(&self, ticker: &str, date: TradeDate, price: f64) -> Result<bool, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_code() {
        let error = ProviderError::not_registered("ft");
        assert_eq!(error.kind(), ProviderErrorKind::Unavailable);
        assert!(!error.retryable());
        assert_eq!(
            error.to_string(),
            "provider 'ft' is not registered (provider.unavailable)"
        );
    }

    #[test]
    fn criteria_builders() {
        let criteria = SecurityCriteria::by_symbol("AAPL").with_currency(Some("USD".into()));
        assert_eq!(criteria.symbol.as_deref(), Some("AAPL"));
        assert_eq!(criteria.currency.as_deref(), Some("USD"));
        assert!(!criteria.is_empty());
        assert!(SecurityCriteria::default().is_empty());
    }

    #[test]
    fn search_result_serializes_flat() {
        let result = SearchResult {
            provider: ProviderId::parse("yahoo").expect("valid id"),
            symbol: ProviderSymbol::new("AAPL").with_currency("USD"),
        };
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["provider"], "yahoo");
        assert_eq!(json["ticker"], "AAPL");
        assert!(json.get("name").is_none());
    }
}
