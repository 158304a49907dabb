use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    Pending,
    Approved,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
    Held,
    Blocked,
}

pub const ALL_STATUSES: [ParcelStatus; 10] = [
    ParcelStatus::Pending,
    ParcelStatus::Approved,
    ParcelStatus::PickedUp,
    ParcelStatus::InTransit,
    ParcelStatus::OutForDelivery,
    ParcelStatus::Delivered,
    ParcelStatus::Cancelled,
    ParcelStatus::Returned,
    ParcelStatus::Held,
    ParcelStatus::Blocked,
];

pub const PUBLIC_FORWARD_PATH: [ParcelStatus; 5] = [
    ParcelStatus::Pending,
    ParcelStatus::PickedUp,
    ParcelStatus::InTransit,
    ParcelStatus::OutForDelivery,
    ParcelStatus::Delivered,
];

impl ParcelStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ParcelStatus::Delivered | ParcelStatus::Cancelled | ParcelStatus::Returned
        )
    }

    pub fn is_hold(self) -> bool {
        matches!(self, ParcelStatus::Held | ParcelStatus::Blocked)
    }

    // Held additionally admits the status it was held from, which depends on
    // the parcel's history; see engine::lifecycle::allowed_targets.
    pub fn forward_targets(self) -> &'static [ParcelStatus] {
        match self {
            ParcelStatus::Pending => &[ParcelStatus::Approved, ParcelStatus::Cancelled],
            ParcelStatus::Approved => &[
                ParcelStatus::PickedUp,
                ParcelStatus::Cancelled,
                ParcelStatus::Held,
            ],
            ParcelStatus::PickedUp => &[
                ParcelStatus::InTransit,
                ParcelStatus::Held,
                ParcelStatus::Returned,
            ],
            ParcelStatus::InTransit => &[
                ParcelStatus::OutForDelivery,
                ParcelStatus::Held,
                ParcelStatus::Returned,
            ],
            ParcelStatus::OutForDelivery => &[
                ParcelStatus::Delivered,
                ParcelStatus::Returned,
                ParcelStatus::Held,
            ],
            ParcelStatus::Held => &[ParcelStatus::Cancelled, ParcelStatus::Blocked],
            ParcelStatus::Blocked => &[ParcelStatus::Cancelled, ParcelStatus::Held],
            ParcelStatus::Delivered | ParcelStatus::Cancelled | ParcelStatus::Returned => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParcelStatus::Pending => "Pending",
            ParcelStatus::Approved => "Approved",
            ParcelStatus::PickedUp => "Picked Up",
            ParcelStatus::InTransit => "In Transit",
            ParcelStatus::OutForDelivery => "Out for Delivery",
            ParcelStatus::Delivered => "Delivered",
            ParcelStatus::Cancelled => "Cancelled",
            ParcelStatus::Returned => "Returned",
            ParcelStatus::Held => "Held",
            ParcelStatus::Blocked => "Blocked",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ParcelStatus::Pending => "Parcel request created and awaiting pickup",
            ParcelStatus::Approved => "Parcel approved and scheduled for pickup",
            ParcelStatus::PickedUp => "Parcel collected from sender",
            ParcelStatus::InTransit => "Parcel is on its way to destination",
            ParcelStatus::OutForDelivery => "Parcel is out for final delivery",
            ParcelStatus::Delivered => "Parcel successfully delivered",
            ParcelStatus::Cancelled => "Parcel delivery cancelled",
            ParcelStatus::Returned | ParcelStatus::Held | ParcelStatus::Blocked => "Status update",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            ParcelStatus::Pending => "PENDING",
            ParcelStatus::Approved => "APPROVED",
            ParcelStatus::PickedUp => "PICKED_UP",
            ParcelStatus::InTransit => "IN_TRANSIT",
            ParcelStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            ParcelStatus::Delivered => "DELIVERED",
            ParcelStatus::Cancelled => "CANCELLED",
            ParcelStatus::Returned => "RETURNED",
            ParcelStatus::Held => "HELD",
            ParcelStatus::Blocked => "BLOCKED",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
