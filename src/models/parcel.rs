use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::status::ParcelStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn single_line(&self) -> String {
        [&self.street, &self.city, &self.state, &self.zip]
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn city_state(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryType {
    Standard,
    Express,
    SameDay,
}

impl DeliveryType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryType::Standard => "standard",
            DeliveryType::Express => "express",
            DeliveryType::SameDay => "same-day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub updated_by: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: Uuid,
    pub tracking_id: String,
    pub sender: Party,
    pub receiver: Party,
    pub pickup_address: Address,
    pub parcel_type: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub value: f64,
    pub delivery_type: DeliveryType,
    pub status: ParcelStatus,
    pub status_history: Vec<StatusHistoryEntry>,
    pub cost: f64,
    pub notes: Option<String>,
    pub delivery_man_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParcel {
    pub sender: Party,
    pub receiver: Party,
    pub pickup_address: Address,
    pub parcel_type: String,
    pub weight: f64,
    pub dimensions: Dimensions,
    pub value: f64,
    pub delivery_type: DeliveryType,
    pub notes: Option<String>,
}

impl Parcel {
    pub fn create(
        payload: NewParcel,
        tracking_id: String,
        cost: f64,
        now: DateTime<Utc>,
    ) -> Parcel {
        let initial_entry = StatusHistoryEntry {
            status: ParcelStatus::Pending,
            timestamp: now,
            location: payload.pickup_address.single_line(),
            updated_by: payload.sender.email.clone(),
            note: Some("Parcel created and ready for pickup".to_string()),
        };

        Parcel {
            id: Uuid::new_v4(),
            tracking_id,
            sender: payload.sender,
            receiver: payload.receiver,
            pickup_address: payload.pickup_address,
            parcel_type: payload.parcel_type,
            weight: payload.weight,
            dimensions: payload.dimensions,
            value: payload.value,
            delivery_type: payload.delivery_type,
            status: ParcelStatus::Pending,
            status_history: vec![initial_entry],
            cost,
            notes: payload.notes,
            delivery_man_id: None,
            created_at: now,
            updated_at: now,
            estimated_delivery: None,
            actual_delivery: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub parcel_id: Uuid,
    pub tracking_id: String,
    pub status: ParcelStatus,
    pub location: String,
    pub updated_by: String,
    pub timestamp: DateTime<Utc>,
}

const TRACKING_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TRACKING_SUFFIX_LEN: usize = 9;

pub fn generate_tracking_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TRACKING_SUFFIX_LEN)
        .map(|_| TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())] as char)
        .collect();

    format!("SP{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(name: &str, email: &str) -> Party {
        Party {
            name: name.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
            },
        }
    }

    fn new_parcel() -> NewParcel {
        NewParcel {
            sender: party("Ann Sender", "ann@example.com"),
            receiver: party("Bob Receiver", "bob@example.com"),
            pickup_address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
            },
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
        }
    }

    #[test]
    fn tracking_id_has_sp_prefix_and_nine_uppercase_alphanumerics() {
        let id = generate_tracking_id();

        assert_eq!(id.len(), 11);
        assert!(id.starts_with("SP"));
        assert!(
            id[2..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn tracking_ids_differ_between_calls() {
        let ids: Vec<String> = (0..32).map(|_| generate_tracking_id()).collect();
        let first = &ids[0];
        assert!(ids.iter().any(|id| id != first));
    }

    #[test]
    fn create_seeds_a_pending_parcel_with_one_history_entry() {
        let now = Utc::now();
        let parcel = Parcel::create(new_parcel(), "SPTEST00001".to_string(), 11.49, now);

        assert_eq!(parcel.status, ParcelStatus::Pending);
        assert_eq!(parcel.status_history.len(), 1);

        let entry = &parcel.status_history[0];
        assert_eq!(entry.status, ParcelStatus::Pending);
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.location, "1 Main St, Springfield, IL, 62701");
        assert_eq!(entry.updated_by, "ann@example.com");
        assert_eq!(parcel.cost, 11.49);
        assert_eq!(parcel.created_at, now);
        assert_eq!(parcel.updated_at, now);
        assert!(parcel.actual_delivery.is_none());
        assert!(parcel.delivery_man_id.is_none());
    }

    #[test]
    fn address_single_line_skips_blank_parts() {
        let address = Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "".to_string(),
            zip: "62701".to_string(),
        };

        assert_eq!(address.single_line(), "1 Main St, Springfield, 62701");
    }

    #[test]
    fn delivery_type_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&DeliveryType::SameDay).unwrap(),
            "\"same-day\""
        );
        let parsed: DeliveryType = serde_json::from_str("\"express\"").unwrap();
        assert_eq!(parsed, DeliveryType::Express);
    }

    #[test]
    fn parcel_serializes_with_camel_case_fields() {
        let parcel = Parcel::create(new_parcel(), "SPTEST00002".to_string(), 11.49, Utc::now());
        let json = serde_json::to_value(&parcel).unwrap();

        assert_eq!(json["trackingId"], "SPTEST00002");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["statusHistory"][0]["updatedBy"], "ann@example.com");
        assert_eq!(json["deliveryType"], "standard");
        assert!(json["actualDelivery"].is_null());
    }
}
