//! Monetary amounts in integer minor currency units.
//!
//! All balances, rates, and gateway figures are naira expressed in kobo
//! (`i64`), so arithmetic is exact and the same representation flows through
//! the database, the gateway adapter, and the HTTP surface. No floating
//! point anywhere.

use std::fmt;

use serde::{Deserialize, Serialize};

const MINOR_PER_MAJOR: i64 = 100;

/// A signed amount of money in kobo.
///
/// # Examples
/// ```
/// use backend::domain::Amount;
///
/// let rate = Amount::from_major(1_000);
/// assert_eq!(rate.minor(), 100_000);
/// assert_eq!(rate.to_string(), "\u{20a6}1,000");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Zero kobo.
    pub const ZERO: Self = Self(0);

    /// Construct from kobo.
    pub const fn from_minor(kobo: i64) -> Self {
        Self(kobo)
    }

    /// Construct from whole naira.
    pub const fn from_major(naira: i64) -> Self {
        Self(naira * MINOR_PER_MAJOR)
    }

    /// The amount in kobo.
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Checked addition, `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction, `None` on overflow.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// True when strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Amount {
    /// Formats as naira with thousands separators, e.g. `₦1,500` or
    /// `₦1,500.50`, with a leading minus for negative amounts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let magnitude = self.0.unsigned_abs();
        let naira = magnitude / 100;
        let kobo = magnitude % 100;

        let digits = naira.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (offset, ch) in digits.chars().enumerate() {
            if offset > 0 && (digits.len() - offset) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if negative {
            f.write_str("-")?;
        }
        write!(f, "\u{20a6}{grouped}")?;
        if kobo > 0 {
            write!(f, ".{kobo:02}")?;
        }
        Ok(())
    }
}
