use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CommodityName, Isin, ProviderId, TradeDate, ValidationError};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:tt),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| ValidationError::UnknownVariant {
                        kind: $kind,
                        value: value.to_owned(),
                        expected: Self::ALL
                            .iter()
                            .map(|variant| variant.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

string_enum! {
    /// Legal form of the listed instrument.
    InstrumentType, "instrument type" {
        Etf => "ETF",
        Etc => "ETC",
        Etn => "ETN",
        Stock => "Stock",
        Index => "Index",
        Future => "Future",
        Crypto => "Crypto",
        Cash => "Cash",
    }
}

string_enum! {
    /// Economic exposure class.
    AssetClass, "asset class" {
        EquityEtf => "EquityETF",
        FixedIncomeEtf => "FixedIncomeETF",
        CommodityEtf => "CommodityETF",
        MoneyMarketEtf => "MoneyMarketETF",
        Stock => "Stock",
        Cash => "Cash",
        Crypto => "Crypto",
        Commodity => "Commodity",
    }
}

string_enum! {
    RiskProfile, "risk profile" {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Speculative => "Speculative",
    }
}

string_enum! {
    Liquidity, "liquidity" {
        Instant => "Instant",
        TPlus2 => "T+2",
        Locked => "Locked",
    }
}

/// ISO 4217 currency code, exactly three uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        validate_currency_code(input).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

/// Validate a currency code. Lowercase input is rejected, not normalized.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let is_valid = input.len() == 3 && input.chars().all(|ch| ch.is_ascii_uppercase());

    if !is_valid {
        return Err(ValidationError::CurrencyFormat {
            value: input.to_owned(),
        });
    }

    Ok(input.to_owned())
}

/// Provider id to ticker mapping, kept in document order.
///
/// Null and empty tickers are dropped on load; absence means no known listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerMap(Vec<(ProviderId, String)>);

impl TickerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the ticker for `provider`, keeping its original position.
    pub fn insert(&mut self, provider: ProviderId, ticker: impl Into<String>) {
        let ticker = ticker.into();
        match self.0.iter_mut().find(|(id, _)| *id == provider) {
            Some(entry) => entry.1 = ticker,
            None => self.0.push((provider, ticker)),
        }
    }

    pub fn get(&self, provider: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(id, _)| id == provider)
            .map(|(_, ticker)| ticker.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProviderId, &str)> {
        self.0.iter().map(|(id, ticker)| (id, ticker.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TickerMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (provider, ticker) in &self.0 {
            map.serialize_entry(provider.as_str(), ticker)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TickerMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TickerMapVisitor;

        impl<'de> Visitor<'de> for TickerMapVisitor {
            type Value = TickerMap;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a mapping of provider id to ticker")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(ProviderId, String)> = Vec::new();
                while let Some((provider, ticker)) =
                    access.next_entry::<String, Option<String>>()?
                {
                    let provider = ProviderId::parse(&provider).map_err(A::Error::custom)?;
                    if entries.iter().any(|(id, _)| *id == provider) {
                        return Err(A::Error::custom(ValidationError::DuplicateTicker {
                            provider: provider.to_string(),
                        }));
                    }
                    match ticker {
                        Some(ticker) if !ticker.trim().is_empty() => {
                            entries.push((provider, ticker.trim().to_owned()))
                        }
                        _ => {}
                    }
                }
                Ok(TickerMap(entries))
            }
        }

        deserializer.deserialize_map(TickerMapVisitor)
    }
}

/// Historical price expected to fall within the day's observed low/high range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationPoint {
    pub date: TradeDate,
    #[serde(deserialize_with = "deserialize_finite_price")]
    pub price: f64,
}

impl ValidationPoint {
    pub fn new(date: TradeDate, price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }
        Ok(Self { date, price })
    }
}

/// Canonical commodity record.
///
/// Every field carrying a format constraint is a validated newtype, so a
/// record that deserializes or constructs successfully is schema-valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: CommodityName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isin: Option<Isin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figi: Option<String>,
    pub instrument_type: InstrumentType,
    pub asset_class: AssetClass,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_null_default",
        skip_serializing_if = "TickerMap::is_empty"
    )]
    pub tickers: TickerMap,
    #[serde(
        default,
        deserialize_with = "deserialize_null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validation_points: Vec<ValidationPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<RiskProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<Liquidity>,
}

impl Commodity {
    pub fn new(
        name: &str,
        instrument_type: InstrumentType,
        asset_class: AssetClass,
        currency: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: CommodityName::parse(name)?,
            isin: None,
            figi: None,
            instrument_type,
            asset_class,
            currency: Currency::parse(currency)?,
            issuer: None,
            underlying: None,
            tickers: TickerMap::new(),
            validation_points: Vec::new(),
            provider: None,
            risk_profile: None,
            liquidity: None,
        })
    }

    pub fn with_isin(mut self, isin: &str) -> Result<Self, ValidationError> {
        self.isin = Some(Isin::parse(isin)?);
        Ok(self)
    }

    pub fn with_figi(mut self, figi: impl Into<String>) -> Self {
        self.figi = Some(figi.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_ticker(mut self, provider: &str, ticker: &str) -> Result<Self, ValidationError> {
        self.tickers.insert(ProviderId::parse(provider)?, ticker);
        Ok(self)
    }

    pub fn with_validation_point(
        mut self,
        date: &str,
        price: f64,
    ) -> Result<Self, ValidationError> {
        self.validation_points
            .push(ValidationPoint::new(TradeDate::parse(date)?, price)?);
        Ok(self)
    }
}

/// On-disk document layout: a list of records under `commodities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityFile {
    pub commodities: Vec<Commodity>,
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_finite_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom(ValidationError::NonFiniteValue {
            field: "price",
        }));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(yaml: &str) -> Result<Commodity, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    #[test]
    fn validates_currency() {
        assert_eq!(validate_currency_code("USD").expect("valid"), "USD");
        for raw in ["usd", "USDT", "US", "U5D"] {
            assert!(matches!(
                validate_currency_code(raw),
                Err(ValidationError::CurrencyFormat { .. })
            ));
        }
    }

    #[test]
    fn enum_text_matches_data_files() {
        assert_eq!(AssetClass::EquityEtf.as_str(), "EquityETF");
        assert_eq!(InstrumentType::Etf.to_string(), "ETF");
        assert_eq!(Liquidity::TPlus2.as_str(), "T+2");
        assert_eq!("etf".parse::<InstrumentType>(), Ok(InstrumentType::Etf));
        assert!(matches!(
            "InvalidType".parse::<InstrumentType>(),
            Err(ValidationError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn builds_minimal_record() {
        let record = Commodity::new("TEST_ETF", InstrumentType::Etf, AssetClass::EquityEtf, "USD")
            .expect("valid record");
        assert_eq!(record.name.as_str(), "TEST_ETF");
        assert!(record.tickers.is_empty());
        assert!(record.validation_points.is_empty());
    }

    #[test]
    fn parses_full_record() {
        let record = parse_one(
            "name: TEST\n\
             isin: us0378331005\n\
             instrument_type: Stock\n\
             asset_class: Stock\n\
             currency: USD\n\
             tickers:\n  yahoo: TEST\n  ft: 'TEST:NSQ'\n  google: null\n\
             validation_points:\n  - date: 2024-01-01\n    price: 100.0\n\
             risk_profile: Medium\n\
             liquidity: T+2\n",
        )
        .expect("valid record");

        assert_eq!(record.isin.as_ref().map(Isin::as_str), Some("US0378331005"));
        assert_eq!(record.tickers.get("yahoo"), Some("TEST"));
        assert_eq!(record.tickers.get("ft"), Some("TEST:NSQ"));
        assert_eq!(record.tickers.get("google"), None);
        assert_eq!(record.tickers.len(), 2);
        assert_eq!(record.validation_points.len(), 1);
        assert_eq!(record.liquidity, Some(Liquidity::TPlus2));
    }

    #[test]
    fn null_collections_default_to_empty() {
        let record = parse_one(
            "name: CASH\ninstrument_type: Cash\nasset_class: Cash\ncurrency: EUR\n\
             tickers: null\nvalidation_points: null\n",
        )
        .expect("valid record");
        assert!(record.tickers.is_empty());
        assert!(record.validation_points.is_empty());
    }

    #[test]
    fn rejects_invalid_fields_at_parse_time() {
        let bad_currency = parse_one(
            "name: Test\ninstrument_type: ETF\nasset_class: EquityETF\ncurrency: INVALID\n",
        );
        assert!(bad_currency.is_err());

        let bad_isin = parse_one(
            "name: BAD\nisin: US0378331006\ninstrument_type: Stock\nasset_class: Stock\ncurrency: USD\n",
        )
        .expect_err("must fail");
        assert!(bad_isin.to_string().contains("checksum"));

        let bad_enum = parse_one(
            "name: BAD\ninstrument_type: Bond\nasset_class: Stock\ncurrency: USD\n",
        );
        assert!(bad_enum.is_err());
    }

    #[test]
    fn ticker_map_rejects_case_folded_duplicates() {
        let err = serde_yaml::from_str::<TickerMap>("yahoo: A\nYAHOO: B\n").expect_err("must fail");
        assert!(err.to_string().contains("duplicate ticker"));
    }

    #[test]
    fn serializes_without_empty_fields() {
        let record = Commodity::new("AAPL", InstrumentType::Stock, AssetClass::Stock, "USD")
            .and_then(|record| record.with_isin("US0378331005"))
            .and_then(|record| record.with_ticker("yahoo", "AAPL"))
            .expect("valid record");
        let yaml = serde_yaml::to_string(&record).expect("serializable");
        assert!(yaml.contains("isin: US0378331005"));
        assert!(yaml.contains("yahoo: AAPL"));
        assert!(!yaml.contains("figi"));
        assert!(!yaml.contains("validation_points"));
    }
}
