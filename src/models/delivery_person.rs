use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryPersonStatus {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPerson {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: DeliveryPersonStatus,
    pub assigned_parcels: u32,
    pub total_deliveries: u32,
    pub rating: f64,
    pub updated_at: DateTime<Utc>,
}
