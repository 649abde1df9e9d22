//! Wire types shared between the hotel operations API and its clients.
//!
//! Entities are owned by the backend. The client treats them as passthrough
//! records, so nearly every field besides the id is optional and unknown
//! enum variants deserialize into an `Other` catch-all instead of failing.

pub mod api_client;
pub mod endpoints;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientError};
pub use endpoints::Endpoints;
pub use responses::{
    Booking, Event, Floor, Invoice, Room, RoomType, RoomTypeRef, Task, User,
};

use derive_more::Display;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Ids arrive from forms and route params, where "missing" is
            /// often an empty string rather than an absent value.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    )*};
}

id_type!(
    /// Id wrapper helps ensure we don't mix up ids for different resources.
    BookingId,
    RoomId,
    RoomTypeId,
    FloorId,
    TaskId,
    InvoiceId,
    UserId,
    EventId,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(other)]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Void,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Receptionist,
    Housekeeper,
    Maintenance,
    #[serde(other)]
    Other,
}
