//! Stored notifications delivered to account inboxes.
//!
//! Notifications are storage only: no external delivery channels. The
//! category set is a closed enum so filtering stays type-checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::ids::{NotificationId, UserId};

/// Closed set of notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Payment,
    Support,
    Student,
    Lunch,
    System,
}

impl NotificationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Support => "support",
            Self::Student => "student",
            Self::Lunch => "lunch",
            Self::System => "system",
        }
    }
}

/// Parse failure for [`NotificationType`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown notification type: {0}")]
pub struct UnknownNotificationType(pub String);

impl std::str::FromStr for NotificationType {
    type Err = UnknownNotificationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(Self::Payment),
            "support" => Ok(Self::Support),
            "student" => Ok(Self::Student),
            "lunch" => Ok(Self::Lunch),
            "system" => Ok(Self::System),
            other => Err(UnknownNotificationType(other.to_owned())),
        }
    }
}

/// Display priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl NotificationPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Parse failure for [`NotificationPriority`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown notification priority: {0}")]
pub struct UnknownNotificationPriority(pub String);

impl std::str::FromStr for NotificationPriority {
    type Err = UnknownNotificationPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownNotificationPriority(other.to_owned())),
        }
    }
}

/// A stored notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub title: String,
    pub body: String,
    pub kind: NotificationType,
    pub priority: NotificationPriority,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification dated now.
    pub fn new(
        recipient_id: UserId,
        kind: NotificationType,
        priority: NotificationPriority,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            recipient_id,
            title: title.into(),
            body: body.into(),
            kind,
            priority,
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("payment", NotificationType::Payment)]
    #[case("support", NotificationType::Support)]
    #[case("student", NotificationType::Student)]
    #[case("lunch", NotificationType::Lunch)]
    #[case("system", NotificationType::System)]
    fn kind_round_trips(#[case] raw: &str, #[case] expected: NotificationType) {
        assert_eq!(
            raw.parse::<NotificationType>().expect("known kind"),
            expected
        );
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn new_notifications_start_unread() {
        let note = Notification::new(
            UserId::random(),
            NotificationType::Payment,
            NotificationPriority::Medium,
            "Payment Successful",
            "Your payment has been received",
        );
        assert!(!note.read);
    }
}
