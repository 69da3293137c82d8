use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const ISIN_LEN: usize = 12;

/// International Securities Identification Number with a verified checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isin(String);

impl Isin {
    /// Parse an ISIN, normalizing to uppercase.
    ///
    /// Checks run in order: length and charset, country prefix, checksum.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.to_ascii_uppercase();

        let well_formed = normalized.len() == ISIN_LEN
            && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !well_formed {
            return Err(ValidationError::Format {
                value: input.to_owned(),
            });
        }

        if !normalized.chars().take(2).all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ValidationError::CountryCode { value: normalized });
        }

        if luhn_sum(&normalized) % 10 != 0 {
            return Err(ValidationError::Checksum { value: normalized });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 3166 country prefix.
    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }
}

/// Validate a raw ISIN string. Alias of [`Isin::parse`].
pub fn validate_isin(raw: &str) -> Result<Isin, ValidationError> {
    Isin::parse(raw)
}

/// Luhn sum over the ISIN digit stream. Letters expand to two digits (A=10 .. Z=35).
fn luhn_sum(normalized: &str) -> u32 {
    let mut digits = Vec::with_capacity(ISIN_LEN * 2);
    for ch in normalized.chars() {
        match ch.to_digit(10) {
            Some(digit) => digits.push(digit),
            None => {
                let value = ch as u32 - 55;
                digits.push(value / 10);
                digits.push(value % 10);
            }
        }
    }

    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(index, &digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum()
}

impl Display for Isin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Isin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Isin {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Isin> for String {
    fn from(value: Isin) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_valid_isin() {
        let isin = Isin::parse("us0378331005").expect("apple isin is valid");
        assert_eq!(isin.as_str(), "US0378331005");
        assert_eq!(isin.country_code(), "US");
    }

    #[test]
    fn accepts_isins_with_letters_in_body() {
        for raw in ["GB00B00FHZ82", "IE00B4L5Y983", "DE000A0S9GB0", "XS2434891219"] {
            assert!(validate_isin(raw).is_ok(), "{raw} should validate");
        }
    }

    #[test]
    fn rejects_wrong_length_and_charset() {
        assert!(matches!(
            Isin::parse("US123"),
            Err(ValidationError::Format { .. })
        ));
        assert!(matches!(
            Isin::parse("US03783310-5"),
            Err(ValidationError::Format { .. })
        ));
    }

    #[test]
    fn rejects_numeric_country_prefix() {
        let err = Isin::parse("120378331005").expect_err("must fail");
        assert!(matches!(err, ValidationError::CountryCode { .. }));
    }

    #[test]
    fn rejects_bad_checksum() {
        let err = Isin::parse("US0378331006").expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::Checksum {
                value: String::from("US0378331006")
            }
        );
    }

    #[test]
    fn any_other_check_digit_fails() {
        for digit in 0..=9 {
            if digit == 5 {
                continue;
            }
            let raw = format!("US037833100{digit}");
            assert!(
                matches!(Isin::parse(&raw), Err(ValidationError::Checksum { .. })),
                "{raw} should fail checksum"
            );
        }
    }

    #[test]
    fn deserializes_through_validation() {
        let err = serde_yaml::from_str::<Isin>("US0378331006").expect_err("must fail");
        assert!(err.to_string().contains("checksum"));
    }
}
