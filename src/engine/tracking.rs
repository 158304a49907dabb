use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::engine::lifecycle::hold_origin;
use crate::models::parcel::{DeliveryType, Dimensions, Parcel};
use crate::models::status::{ParcelStatus, PUBLIC_FORWARD_PATH};

const ESTIMATED_TRANSIT_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub status: ParcelStatus,
    pub label: &'static str,
    pub location: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub completed: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub tracking_id: String,
    pub status: ParcelStatus,
    pub sender: String,
    pub receiver: String,
    pub origin: String,
    pub destination: String,
    pub estimated_delivery: DateTime<Utc>,
    pub cost: f64,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub delivery_type: DeliveryType,
    pub created_at: DateTime<Utc>,
    pub timeline: Vec<TrackingEvent>,
}

pub fn project(parcel: &Parcel) -> TrackingView {
    let mut timeline: Vec<TrackingEvent> = parcel
        .status_history
        .iter()
        .map(|entry| TrackingEvent {
            status: entry.status,
            label: entry.status.label(),
            location: entry.location.clone(),
            timestamp: Some(entry.timestamp),
            completed: true,
            description: entry
                .note
                .clone()
                .unwrap_or_else(|| entry.status.description().to_string()),
        })
        .collect();

    timeline.extend(future_steps(parcel));

    TrackingView {
        tracking_id: parcel.tracking_id.clone(),
        status: parcel.status,
        sender: parcel.sender.name.clone(),
        receiver: parcel.receiver.name.clone(),
        origin: parcel.pickup_address.city_state(),
        destination: parcel.receiver.address.city_state(),
        estimated_delivery: parcel
            .estimated_delivery
            .unwrap_or(parcel.created_at + Duration::days(ESTIMATED_TRANSIT_DAYS)),
        cost: parcel.cost,
        weight: parcel.weight,
        dimensions: parcel.dimensions,
        delivery_type: parcel.delivery_type,
        created_at: parcel.created_at,
        timeline,
    }
}

fn future_steps(parcel: &Parcel) -> Vec<TrackingEvent> {
    if parcel.status.is_terminal() {
        return Vec::new();
    }

    let position = public_position(parcel);
    PUBLIC_FORWARD_PATH
        .iter()
        .skip(position + 1)
        .map(|&status| TrackingEvent {
            status,
            label: status.label(),
            location: "Estimated".to_string(),
            timestamp: None,
            completed: false,
            description: status.description().to_string(),
        })
        .collect()
}

fn public_position(parcel: &Parcel) -> usize {
    let reference = if parcel.status.is_hold() {
        hold_origin(parcel).unwrap_or(ParcelStatus::Pending)
    } else {
        parcel.status
    };

    // APPROVED has no public slot; it projects from PENDING's.
    let reference = if reference == ParcelStatus::Approved {
        ParcelStatus::Pending
    } else {
        reference
    };

    PUBLIC_FORWARD_PATH
        .iter()
        .position(|&status| status == reference)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::engine::lifecycle::apply_transition;
    use crate::models::parcel::{Address, NewParcel, Party};

    fn address(street: &str, city: &str, state: &str, zip: &str) -> Address {
        Address {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
        }
    }

    fn pending_parcel() -> Parcel {
        let payload = NewParcel {
            sender: Party {
                name: "Ann Sender".to_string(),
                email: "ann@example.com".to_string(),
                phone: "555-0100".to_string(),
                address: address("1 Main St", "Springfield", "IL", "62701"),
            },
            receiver: Party {
                name: "Bob Receiver".to_string(),
                email: "bob@example.com".to_string(),
                phone: "555-0101".to_string(),
                address: address("9 Oak Ave", "Portland", "OR", "97201"),
            },
            pickup_address: address("1 Main St", "Springfield", "IL", "62701"),
            parcel_type: "Documents".to_string(),
            weight: 2.0,
            dimensions: Dimensions {
                length: 10.0,
                width: 10.0,
                height: 10.0,
            },
            value: 50.0,
            delivery_type: DeliveryType::Standard,
            notes: None,
        };

        Parcel::create(payload, "SPTRACK0001".to_string(), 11.49, Utc::now())
    }

    fn at_status(targets: &[ParcelStatus]) -> Parcel {
        targets.iter().fold(pending_parcel(), |parcel, &target| {
            apply_transition(&parcel, target, "admin", "Distribution Center", None, Utc::now())
                .expect("transition accepted")
        })
    }

    fn future_statuses(view: &TrackingView) -> Vec<ParcelStatus> {
        view.timeline
            .iter()
            .filter(|event| !event.completed)
            .map(|event| event.status)
            .collect()
    }

    #[test]
    fn projection_leaves_history_untouched() {
        let parcel = at_status(&[ParcelStatus::Approved, ParcelStatus::PickedUp]);
        let before = parcel.status_history.clone();

        let _ = project(&parcel);

        assert_eq!(parcel.status_history, before);
    }

    #[test]
    fn completed_entries_mirror_recorded_history() {
        let parcel = at_status(&[ParcelStatus::Approved]);
        let view = project(&parcel);

        assert_eq!(view.timeline[0].status, ParcelStatus::Pending);
        assert!(view.timeline[0].completed);
        assert_eq!(view.timeline[0].location, "1 Main St, Springfield, IL, 62701");
        assert!(view.timeline[0].timestamp.is_some());
        assert_eq!(
            view.timeline[0].description,
            "Parcel created and ready for pickup"
        );

        assert_eq!(view.timeline[1].status, ParcelStatus::Approved);
        assert_eq!(view.timeline[1].label, "Approved");
        assert_eq!(view.timeline[1].location, "Distribution Center");
        assert_eq!(
            view.timeline[1].description,
            "Parcel approved and scheduled for pickup"
        );
    }

    #[test]
    fn entry_note_overrides_the_canonical_description() {
        let parcel = pending_parcel();
        let parcel = apply_transition(
            &parcel,
            ParcelStatus::Approved,
            "admin",
            "Hub 7",
            Some("approved after inspection".to_string()),
            Utc::now(),
        )
        .unwrap();

        let view = project(&parcel);
        assert_eq!(view.timeline[1].description, "approved after inspection");
    }

    #[test]
    fn in_transit_parcel_projects_only_the_remaining_public_steps() {
        let parcel = at_status(&[
            ParcelStatus::Approved,
            ParcelStatus::PickedUp,
            ParcelStatus::InTransit,
        ]);
        let view = project(&parcel);

        assert_eq!(view.timeline.len(), 6);
        assert_eq!(
            future_statuses(&view),
            vec![ParcelStatus::OutForDelivery, ParcelStatus::Delivered]
        );

        for event in view.timeline.iter().filter(|event| !event.completed) {
            assert_eq!(event.location, "Estimated");
            assert!(event.timestamp.is_none());
        }
        assert_eq!(view.timeline[4].label, "Out for Delivery");
    }

    #[test]
    fn pending_parcel_projects_the_whole_public_path_ahead() {
        let view = project(&pending_parcel());

        assert_eq!(
            future_statuses(&view),
            vec![
                ParcelStatus::PickedUp,
                ParcelStatus::InTransit,
                ParcelStatus::OutForDelivery,
                ParcelStatus::Delivered,
            ]
        );
    }

    #[test]
    fn approved_parcel_projects_from_pendings_slot() {
        let view = project(&at_status(&[ParcelStatus::Approved]));

        assert_eq!(
            future_statuses(&view),
            vec![
                ParcelStatus::PickedUp,
                ParcelStatus::InTransit,
                ParcelStatus::OutForDelivery,
                ParcelStatus::Delivered,
            ]
        );
    }

    #[test]
    fn held_parcel_projects_from_its_hold_origin() {
        let parcel = at_status(&[
            ParcelStatus::Approved,
            ParcelStatus::PickedUp,
            ParcelStatus::InTransit,
            ParcelStatus::Held,
        ]);

        assert_eq!(
            future_statuses(&project(&parcel)),
            vec![ParcelStatus::OutForDelivery, ParcelStatus::Delivered]
        );
    }

    #[test]
    fn delivered_parcel_gets_no_synthetic_steps() {
        let parcel = at_status(&[
            ParcelStatus::Approved,
            ParcelStatus::PickedUp,
            ParcelStatus::InTransit,
            ParcelStatus::OutForDelivery,
            ParcelStatus::Delivered,
        ]);
        let view = project(&parcel);

        assert_eq!(view.timeline.len(), parcel.status_history.len());
        assert!(view.timeline.iter().all(|event| event.completed));
    }

    #[test]
    fn cancelled_parcel_gets_no_synthetic_steps() {
        let view = project(&at_status(&[ParcelStatus::Cancelled]));
        assert_eq!(view.timeline.len(), 2);
        assert!(future_statuses(&view).is_empty());
    }

    #[test]
    fn returned_parcel_gets_no_synthetic_steps() {
        let parcel = at_status(&[
            ParcelStatus::Approved,
            ParcelStatus::PickedUp,
            ParcelStatus::Returned,
        ]);

        assert!(future_statuses(&project(&parcel)).is_empty());
    }

    #[test]
    fn eta_falls_back_to_three_days_after_creation() {
        let parcel = pending_parcel();
        let view = project(&parcel);

        assert_eq!(view.estimated_delivery, parcel.created_at + Duration::days(3));
    }

    #[test]
    fn explicit_eta_wins_over_the_fallback() {
        let mut parcel = pending_parcel();
        let eta = parcel.created_at + Duration::days(1);
        parcel.estimated_delivery = Some(eta);

        assert_eq!(project(&parcel).estimated_delivery, eta);
    }

    #[test]
    fn labels_and_summary_come_from_the_parcel() {
        let view = project(&pending_parcel());

        assert_eq!(view.origin, "Springfield, IL");
        assert_eq!(view.destination, "Portland, OR");
        assert_eq!(view.sender, "Ann Sender");
        assert_eq!(view.receiver, "Bob Receiver");
        assert_eq!(view.cost, 11.49);
        assert_eq!(view.tracking_id, "SPTRACK0001");
    }
}
