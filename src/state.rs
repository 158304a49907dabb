use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::delivery_person::DeliveryPerson;
use crate::models::parcel::StatusEvent;
use crate::observability::metrics::Metrics;
use crate::store::ParcelStore;

pub struct AppState {
    pub parcels: ParcelStore,
    pub personnel: DashMap<Uuid, DeliveryPerson>,
    pub status_events_tx: broadcast::Sender<StatusEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (status_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            parcels: ParcelStore::new(),
            personnel: DashMap::new(),
            status_events_tx,
            metrics: Metrics::new(),
        }
    }
}
