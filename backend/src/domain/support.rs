//! Support ticketing: tickets, replies, and status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::ids::{ReplyId, TicketId, UserId};

/// Ticket workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

/// Parse failure for [`TicketStatus`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown ticket status: {0}")]
pub struct UnknownTicketStatus(pub String);

impl std::str::FromStr for TicketStatus {
    type Err = UnknownTicketStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(UnknownTicketStatus(other.to_owned())),
        }
    }
}

/// Ticket priority chosen at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TicketPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Parse failure for [`TicketPriority`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown ticket priority: {0}")]
pub struct UnknownTicketPriority(pub String);

impl std::str::FromStr for TicketPriority {
    type Err = UnknownTicketPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownTicketPriority(other.to_owned())),
        }
    }
}

/// Which side of the conversation authored a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyAuthor {
    Parent,
    Admin,
}

impl ReplyAuthor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Admin => "admin",
        }
    }
}

/// Parse failure for [`ReplyAuthor`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("unknown reply author: {0}")]
pub struct UnknownReplyAuthor(pub String);

impl std::str::FromStr for ReplyAuthor {
    type Err = UnknownReplyAuthor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Self::Parent),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownReplyAuthor(other.to_owned())),
        }
    }
}

/// One message appended to a ticket's conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketReply {
    pub id: ReplyId,
    pub ticket_id: TicketId,
    pub author: ReplyAuthor,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A support ticket raised by a parent.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportTicket {
    pub id: TicketId,
    pub parent_id: UserId,
    pub subject: String,
    pub message: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    /// Relative path of the optional uploaded attachment.
    pub attachment_path: Option<String>,
    /// First admin reply, duplicated here for summary displays.
    pub admin_response: Option<String>,
    pub admin_response_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket plus its conversation, ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketWithReplies {
    pub ticket: SupportTicket,
    pub replies: Vec<TicketReply>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("open", TicketStatus::Open)]
    #[case("in_progress", TicketStatus::InProgress)]
    #[case("resolved", TicketStatus::Resolved)]
    #[case("closed", TicketStatus::Closed)]
    fn status_round_trips(#[case] raw: &str, #[case] expected: TicketStatus) {
        assert_eq!(raw.parse::<TicketStatus>().expect("known status"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("pending")]
    #[case("inprogress")]
    #[case("")]
    fn status_rejects_unknown_values(#[case] raw: &str) {
        assert!(raw.parse::<TicketStatus>().is_err());
    }

    #[rstest]
    fn priority_defaults_to_medium() {
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
    }
}
