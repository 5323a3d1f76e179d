//! Strongly typed identifiers for domain aggregates.
//!
//! Each aggregate gets its own UUID newtype so identifiers cannot be mixed
//! up across table boundaries.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Borrow the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Identifier for a registered account (parent or admin).
    UserId
);
entity_id!(
    /// Identifier for a student record.
    StudentId
);
entity_id!(
    /// Identifier for a payment record.
    PaymentId
);
entity_id!(
    /// Identifier for a menu item.
    MenuItemId
);
entity_id!(
    /// Identifier for a lunch order.
    LunchOrderId
);
entity_id!(
    /// Identifier for a support ticket.
    TicketId
);
entity_id!(
    /// Identifier for a single support ticket reply.
    ReplyId
);
entity_id!(
    /// Identifier for a stored notification.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn display_round_trips_through_from_str() {
        let id = PaymentId::random();
        let parsed: PaymentId = id.to_string().parse().expect("valid uuid text");
        assert_eq!(parsed, id);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("1234")]
    fn rejects_malformed_input(#[case] raw: &str) {
        assert!(raw.parse::<StudentId>().is_err());
    }

    #[rstest]
    fn serde_is_transparent() {
        let id = UserId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).expect("serialises");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
