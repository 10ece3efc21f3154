//! Strongly typed identifiers for every stored resource.
//!
//! Each collection is keyed by a system-generated UUID. Wrapping them keeps a
//! nurse id from being passed where a user id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a care-seeking user account.
    UserId
);
define_id!(
    /// Identifier of a nurse account.
    NurseId
);
define_id!(
    /// Identifier of a patient owned by a user.
    PatientId
);
define_id!(
    /// Identifier of a service request.
    ServiceRequestId
);
define_id!(
    /// Identifier of a message.
    MessageId
);
define_id!(
    /// Identifier of a review.
    ReviewId
);
define_id!(
    /// Identifier of a payment transaction.
    TransactionId
);
define_id!(
    /// Identifier of a support ticket.
    SupportRequestId
);
define_id!(
    /// Identifier of a FAQ entry.
    FaqId
);
