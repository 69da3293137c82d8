//! # Domain Models
//!
//! Typed schema for commodity records.
//!
//! Every type with a format constraint validates on construction and on
//! deserialization, so an invalid field fails the record (and its file)
//! instead of reaching the index.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Commodity`] | Canonical record merged from data files |
//! | [`Isin`] | ISIN with verified Luhn checksum |
//! | [`CommodityName`] | Ledger-style canonical name |
//! | [`Currency`] | 3-letter uppercase ISO code |
//! | [`TickerMap`] | Provider id to ticker mapping |
//! | [`ValidationPoint`] | Historical (date, price) check |
//! | [`TradeDate`] | `YYYY-MM-DD` calendar date |

mod date;
mod isin;
mod models;
mod name;

pub use date::TradeDate;
pub use isin::{validate_isin, Isin};
pub use models::{
    validate_currency_code, AssetClass, Commodity, CommodityFile, Currency, InstrumentType,
    Liquidity, RiskProfile, TickerMap, ValidationPoint,
};
pub use name::CommodityName;
