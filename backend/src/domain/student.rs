//! Student aggregate and lunch eligibility rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::ids::{StudentId, UserId};
use super::money::Amount;

/// Lifecycle status of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
}

impl StudentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Parse failure for [`StudentStatus`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown student status: {0}")]
pub struct UnknownStudentStatus(pub String);

impl std::str::FromStr for StudentStatus {
    type Err = UnknownStudentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UnknownStudentStatus(other.to_owned())),
        }
    }
}

/// A student attached to a parent account. Balance is kobo and may go
/// negative: serving lunch is never blocked by an insufficient balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    /// Owning parent. Admin-created students may be unattached.
    pub parent_id: Option<UserId>,
    pub name: String,
    pub grade: String,
    pub admission_number: String,
    pub dietary_preferences: Vec<String>,
    pub allergies: Vec<String>,
    pub other_allergies: Option<String>,
    pub additional_notes: Option<String>,
    pub balance: Amount,
    pub status: StudentStatus,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// True when the given parent owns this student.
    pub fn is_owned_by(&self, parent_id: UserId) -> bool {
        self.parent_id == Some(parent_id)
    }
}

/// Lunch eligibility derived from balance against the daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    /// Balance covers at least one day.
    Eligible,
    /// Balance is positive but below one day's rate.
    Warning,
    /// Balance is zero or negative.
    Ineligible,
}

impl EligibilityStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::Warning => "warning",
            Self::Ineligible => "ineligible",
        }
    }
}

/// Pure eligibility function over a balance and the configured daily rate.
///
/// # Examples
/// ```
/// use backend::domain::{Amount, EligibilityStatus, eligibility};
///
/// let rate = Amount::from_major(1_000);
/// assert_eq!(
///     eligibility(Amount::from_major(1_200), rate),
///     EligibilityStatus::Eligible
/// );
/// ```
pub fn eligibility(balance: Amount, daily_rate: Amount) -> EligibilityStatus {
    if balance >= daily_rate {
        EligibilityStatus::Eligible
    } else if balance.is_positive() {
        EligibilityStatus::Warning
    } else {
        EligibilityStatus::Ineligible
    }
}
