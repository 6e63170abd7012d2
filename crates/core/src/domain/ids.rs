// Surrogate identifiers
//
// Names are display fields and may repeat; every entity is addressed by an
// opaque ID assigned at registration time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

surrogate_id!(
    /// Attendee identifier
    AttendeeId
);
surrogate_id!(
    /// Stage identifier
    StageId
);
surrogate_id!(
    /// Band identifier
    BandId
);
surrogate_id!(
    /// Performance identifier
    PerformanceId
);
