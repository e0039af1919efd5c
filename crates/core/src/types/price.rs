//! Integer price amounts in CFA francs.
//!
//! The CFA franc has no minor unit, so an amount is a whole number of francs.
//! Catalog files may still carry the older display form (`"15 000 CFA"`);
//! that form is accepted on deserialization and parsed once, after which all
//! arithmetic happens on integers.

use core::fmt;
use std::iter::Sum;

use serde::{Deserialize, Deserializer, Serialize};

/// Currency suffix used when formatting amounts.
pub const CURRENCY_SUFFIX: &str = "CFA";

/// A non-negative amount of CFA francs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole amount of francs.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the amount in francs.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Parse a display label such as `"15 000 CFA"`.
    ///
    /// Every non-digit character is discarded. Labels without digits, or
    /// whose digits overflow, yield zero.
    #[must_use]
    pub fn parse_label(label: &str) -> Self {
        let digits: String = label.chars().filter(char::is_ascii_digit).collect();
        Self(digits.parse().unwrap_or(0))
    }

    /// Multiply by a quantity, saturating on overflow.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Format with thousands grouping, e.g. `75 000 CFA`.
    #[must_use]
    pub fn display(self) -> String {
        format!("{} {CURRENCY_SUFFIX}", group_thousands(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display())
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(0u64, |acc, p| acc.saturating_add(p.0)))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPrice {
            Amount(u64),
            Label(String),
        }

        Ok(match RawPrice::deserialize(deserializer)? {
            RawPrice::Amount(amount) => Self(amount),
            RawPrice::Label(label) => Self::parse_label(&label),
        })
    }
}

/// Insert a space between every group of three digits.
fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
