use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::parcel::Parcel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parcel was modified concurrently; reload and retry")]
pub struct ConcurrentModification;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelSnapshot {
    #[serde(flatten)]
    pub parcel: Parcel,
    pub version: u64,
}

struct VersionedParcel {
    parcel: Parcel,
    version: u64,
}

pub struct ParcelStore {
    parcels: DashMap<Uuid, VersionedParcel>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self {
            parcels: DashMap::new(),
        }
    }

    pub fn insert(&self, parcel: Parcel) -> ParcelSnapshot {
        let snapshot = ParcelSnapshot {
            parcel: parcel.clone(),
            version: 1,
        };

        self.parcels.insert(
            parcel.id,
            VersionedParcel { parcel, version: 1 },
        );

        snapshot
    }

    pub fn load(&self, id: Uuid) -> Option<ParcelSnapshot> {
        self.parcels.get(&id).map(|entry| ParcelSnapshot {
            parcel: entry.parcel.clone(),
            version: entry.version,
        })
    }

    pub fn find_by_tracking_id(&self, tracking_id: &str) -> Option<ParcelSnapshot> {
        self.parcels.iter().find_map(|entry| {
            (entry.parcel.tracking_id == tracking_id).then(|| ParcelSnapshot {
                parcel: entry.parcel.clone(),
                version: entry.version,
            })
        })
    }

    // The version compare and bump happen under the map's shard lock, so a
    // racing writer with the same expected version loses cleanly.
    pub fn save(
        &self,
        parcel: Parcel,
        expected_version: u64,
    ) -> Result<ParcelSnapshot, ConcurrentModification> {
        let mut entry = self
            .parcels
            .get_mut(&parcel.id)
            .ok_or(ConcurrentModification)?;

        if entry.version != expected_version {
            return Err(ConcurrentModification);
        }

        entry.version += 1;
        entry.parcel = parcel.clone();

        Ok(ParcelSnapshot {
            parcel,
            version: entry.version,
        })
    }

    pub fn list(&self) -> Vec<Parcel> {
        self.parcels
            .iter()
            .map(|entry| entry.parcel.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }
}
