//! Donation amount and currency value objects.
//!
//! Donors enter amounts in major units (dollars). Stripe expects integer
//! minor units (cents), so conversion happens once, here, before anything
//! leaves the process.

use std::fmt;

use serde_json::Value;

use super::errors::DonationError;

/// Largest amount Stripe accepts for a two-decimal currency, in minor units.
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999;

/// Currency used when the client does not send one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Currencies whose smallest unit is not 1/100 of the major unit.
const NON_DECIMAL_CURRENCIES: &[&str] = &[
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf", "bhd", "jod", "kwd", "omr", "tnd",
];

/// A validated, strictly positive donation amount held in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DonationAmount {
    minor_units: i64,
}

impl DonationAmount {
    /// Builds an amount from whole major units (e.g. dollars).
    pub fn from_major_units(major: i64) -> Result<Self, DonationError> {
        if major <= 0 {
            return Err(non_positive());
        }
        let minor = major.checked_mul(100).ok_or_else(too_large)?;
        Self::from_minor_units(minor)
    }

    /// Builds an amount from a decimal major-unit value such as `12.5`.
    ///
    /// The value must resolve to a whole number of cents.
    pub fn from_decimal(major: f64) -> Result<Self, DonationError> {
        if !major.is_finite() {
            return Err(DonationError::validation("amount", "must be a finite number"));
        }
        if major <= 0.0 {
            return Err(non_positive());
        }

        let minor = major * 100.0;
        let rounded = minor.round();
        if (minor - rounded).abs() > 1e-6 {
            return Err(DonationError::validation(
                "amount",
                "must not contain fractions of a cent",
            ));
        }
        if rounded > MAX_AMOUNT_MINOR as f64 {
            return Err(too_large());
        }

        Self::from_minor_units(rounded as i64)
    }

    /// Builds an amount already expressed in minor units.
    pub fn from_minor_units(minor_units: i64) -> Result<Self, DonationError> {
        if minor_units <= 0 {
            return Err(non_positive());
        }
        if minor_units > MAX_AMOUNT_MINOR {
            return Err(too_large());
        }
        Ok(Self { minor_units })
    }

    /// Coerces a JSON request value into an amount.
    ///
    /// Numbers are taken as-is; strings are accepted when they parse as a
    /// number. Everything else (null, booleans, objects) is rejected.
    pub fn from_json(value: &Value) -> Result<Self, DonationError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::from_major_units(i)
                } else if n.as_u64().is_some() {
                    Err(too_large())
                } else {
                    n.as_f64()
                        .ok_or_else(not_a_number)
                        .and_then(Self::from_decimal)
                }
            }
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    Self::from_major_units(i)
                } else {
                    s.parse::<f64>()
                        .map_err(|_| not_a_number())
                        .and_then(Self::from_decimal)
                }
            }
            Value::Null => Err(DonationError::validation("amount", "is required")),
            _ => Err(not_a_number()),
        }
    }

    /// Amount in minor units (cents), as sent to the processor.
    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }
}

impl fmt::Display for DonationAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.minor_units / 100, self.minor_units % 100)
    }
}

fn non_positive() -> DonationError {
    DonationError::validation("amount", "must be greater than zero")
}

fn too_large() -> DonationError {
    DonationError::validation("amount", "exceeds the maximum donation")
}

fn not_a_number() -> DonationError {
    DonationError::validation("amount", "must be a number")
}

/// Lowercase ISO 4217 currency code with two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Parses a currency code, normalizing to lowercase.
    pub fn parse(code: &str) -> Result<Self, DonationError> {
        let code = code.trim().to_ascii_lowercase();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(DonationError::validation(
                "currency",
                "must be a three-letter ISO 4217 code",
            ));
        }
        if NON_DECIMAL_CURRENCIES.contains(&code.as_str()) {
            return Err(DonationError::validation(
                "currency",
                format!("'{}' is not a two-decimal currency", code),
            ));
        }
        Ok(Self(code))
    }

    /// Parses an optional code, falling back to [`DEFAULT_CURRENCY`].
    pub fn parse_or_default(code: Option<&str>) -> Result<Self, DonationError> {
        match code {
            Some(code) => Self::parse(code),
            None => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
