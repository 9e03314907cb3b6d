//! # Currency Code
//!
//! ISO 4217-style three-letter currency identifier.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An upper-case, three ASCII letter currency code such as `NGN` or `USD`.
///
/// Input is trimmed and upper-cased, so `" ngn"` parses to `NGN`.
///
/// # Examples
///
/// ```
/// use country_cache::domain::value_objects::CurrencyCode;
///
/// let code = CurrencyCode::new("ngn").unwrap();
/// assert_eq!(code.as_str(), "NGN");
/// assert!(CurrencyCode::new("naira").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalises a currency code.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCurrencyCode` if the trimmed value is not
    /// exactly three ASCII letters.
    pub fn new(value: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(DomainError::InvalidCurrencyCode(value.as_ref().to_string()))
        }
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalises_case_and_whitespace() {
        assert_eq!(CurrencyCode::new(" eur ").unwrap().as_str(), "EUR");
    }

    #[test]
    fn rejects_wrong_length_and_symbols() {
        assert!(CurrencyCode::new("").is_err());
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("USDT").is_err());
        assert!(CurrencyCode::new("U$D").is_err());
        assert!(CurrencyCode::new("(none)").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let ok: CurrencyCode = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(ok.as_str(), "GBP");
        assert!(serde_json::from_str::<CurrencyCode>("\"pounds\"").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut codes = vec![
            CurrencyCode::new("USD").unwrap(),
            CurrencyCode::new("EUR").unwrap(),
            CurrencyCode::new("NGN").unwrap(),
        ];
        codes.sort();
        let rendered: Vec<&str> = codes.iter().map(CurrencyCode::as_str).collect();
        assert_eq!(rendered, vec!["EUR", "NGN", "USD"]);
    }
}
