//! Endpoint map for the hotel operations API.
//!
//! Every resource has a collection path (`list`) and a base path for single
//! records and actions (`details`). Detail and action paths are always
//! derived from `details`, never spelled out at call sites.

/// Collection and record base paths for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub list: &'static str,
    pub details: &'static str,
}

impl Endpoints {
    /// `/api/booking/<id>`
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}/{id}", self.details)
    }

    /// `/api/booking/cancelBooking/<id>`
    pub fn action_path(&self, action: &str, id: &str) -> String {
        format!("{}/{action}/{id}", self.details)
    }

    /// `/api/task/housekeeper/<id>`
    pub fn scoped_path(&self, scope: &str, value: &str) -> String {
        format!("{}/{scope}/{value}", self.list)
    }
}

pub const BOOKING: Endpoints = Endpoints {
    list: "/api/booking",
    details: "/api/booking",
};

pub const ROOM: Endpoints = Endpoints {
    list: "/api/room",
    details: "/api/room",
};

pub const ROOM_TYPE: Endpoints = Endpoints {
    list: "/api/roomtype",
    details: "/api/roomtype",
};

pub const FLOOR: Endpoints = Endpoints {
    list: "/api/floor",
    details: "/api/floor",
};

pub const TASK: Endpoints = Endpoints {
    list: "/api/task",
    details: "/api/task",
};

pub const INVOICE: Endpoints = Endpoints {
    list: "/api/invoice",
    details: "/api/invoice",
};

pub const USER: Endpoints = Endpoints {
    list: "/api/user",
    details: "/api/user",
};

pub const EVENT: Endpoints = Endpoints {
    list: "/api/event",
    details: "/api/event",
};

/// Action suffixes under `BOOKING.details`.
pub mod booking_actions {
    pub const CANCEL: &str = "cancelBooking";
    pub const CHECKOUT: &str = "checkout";
    pub const EXTEND_STAY: &str = "extendstay";
}

/// Action suffix for status transitions on rooms and tasks.
pub const STATUS_ACTION: &str = "status";

const ALL: &[(&str, Endpoints)] = &[
    ("booking", BOOKING),
    ("room", ROOM),
    ("roomType", ROOM_TYPE),
    ("floor", FLOOR),
    ("task", TASK),
    ("invoice", INVOICE),
    ("user", USER),
    ("event", EVENT),
];

/// Every resource and its endpoints, keyed by resource name.
pub fn all() -> &'static [(&'static str, Endpoints)] {
    ALL
}
