use crate::{
    BookingId, BookingStatus, EventId, FloorId, InvoiceId, InvoiceStatus,
    RoomId, RoomStatus, RoomTypeId, TaskId, TaskPriority, TaskStatus, UserId,
    UserRole,
};
use jiff::Timestamp;
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A guest's stay in one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: BookingId,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub room_id: Option<RoomId>,
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
    pub status: Option<BookingStatus>,
    pub total_price: Option<Decimal>,
}

/// The room type as embedded in a room record. Older rooms carry only the
/// id, so the label may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeRef {
    #[serde(rename = "_id")]
    pub id: Option<RoomTypeId>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: RoomId,
    pub room_number: Option<String>,
    pub description: Option<String>,
    pub floor_id: Option<FloorId>,
    pub room_type: Option<RoomTypeRef>,
    pub status: Option<RoomStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    #[serde(rename = "_id")]
    pub id: RoomTypeId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    #[serde(rename = "_id")]
    pub id: FloorId,
    pub name: Option<String>,
    pub number: Option<i32>,
}

/// A housekeeping or maintenance task, optionally assigned to a
/// housekeeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub room_id: Option<RoomId>,
    pub housekeeper_id: Option<UserId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: InvoiceId,
    pub booking_id: Option<BookingId>,
    pub amount: Option<Decimal>,
    pub status: Option<InvoiceStatus>,
    pub issued_at: Option<Timestamp>,
}

/// Staff member with access to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// Calendar event shown on the front-office schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: EventId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}
