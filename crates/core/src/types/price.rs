//! Catalog prices and the analytics price buckets.
//!
//! Prices are whole currency units (the shop sells in RWF, which has no
//! minor unit in practice), so a plain `u64` is enough.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a non-negative whole number.
    #[error("price must be a non-negative whole number, got {0:?}")]
    Invalid(String),
}

/// A non-negative price in whole currency units.
///
/// Deserializes leniently: the backend may hand back an integer, a float or
/// a numeric string, and a missing or `null` price means zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from whole currency units.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in whole currency units.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Parse a price typed into a form field.
    ///
    /// An empty (or whitespace-only) input is zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] for anything that isn't a
    /// non-negative integer.
    pub fn parse_input(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| PriceError::Invalid(trimmed.to_owned()))
    }

    /// The analytics bucket this price falls into.
    #[must_use]
    pub const fn bucket(self) -> PriceBucket {
        PriceBucket::for_price(self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Group thousands: 125000 -> 125,000
        let digits = self.0.to_string();
        let len = digits.len();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                f.write_str(",")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(" RWF")
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Int(u64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for Price {
    /// Accepts whole numbers, floats and numeric strings. Anything that
    /// isn't a non-negative amount reads as [`Price::ZERO`] with a warning.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawPrice>::deserialize(deserializer)?;
        let price = match raw {
            None => Self::ZERO,
            Some(RawPrice::Int(n)) => Self(n),
            Some(RawPrice::Float(f)) if f.is_finite() && f >= 0.0 => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked above
                let amount = f.round() as u64;
                Self(amount)
            }
            Some(RawPrice::Float(f)) => {
                tracing::warn!(price = f, "Invalid product price, using 0");
                Self::ZERO
            }
            Some(RawPrice::Text(s)) => Self::parse_input(&s).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid product price, using 0");
                Self::ZERO
            }),
            Some(RawPrice::Other(_)) => {
                tracing::warn!("Non-numeric product price, using 0");
                Self::ZERO
            }
        };
        Ok(price)
    }
}

/// Fixed price ranges used by the analytics view.
///
/// Ranges are half-open: each boundary belongs to the upper bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceBucket {
    /// Below 50,000.
    UpTo50k,
    /// 50,000 up to (not including) 100,000.
    From50kTo100k,
    /// 100,000 up to (not including) 200,000.
    From100kTo200k,
    /// 200,000 and above.
    Above200k,
}

impl PriceBucket {
    /// All buckets in ascending order.
    pub const ALL: [Self; 4] = [
        Self::UpTo50k,
        Self::From50kTo100k,
        Self::From100kTo200k,
        Self::Above200k,
    ];

    /// Pick the bucket for a price.
    #[must_use]
    pub const fn for_price(price: Price) -> Self {
        match price.amount() {
            0..50_000 => Self::UpTo50k,
            50_000..100_000 => Self::From50kTo100k,
            100_000..200_000 => Self::From100kTo200k,
            _ => Self::Above200k,
        }
    }

    /// Short label shown in charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo50k => "0-50k",
            Self::From50kTo100k => "50k-100k",
            Self::From100kTo200k => "100k-200k",
            Self::Above200k => "200k+",
        }
    }

    /// Position of the bucket in [`PriceBucket::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::UpTo50k => 0,
            Self::From50kTo100k => 1,
            Self::From100kTo200k => 2,
            Self::Above200k => 3,
        }
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
