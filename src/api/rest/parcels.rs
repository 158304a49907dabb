use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::cost::estimate_cost;
use crate::engine::lifecycle::{
    allowed_targets, apply_transition, confirm_delivery, TransitionError,
};
use crate::engine::tracking::{project, TrackingView};
use crate::error::AppError;
use crate::models::delivery_person::DeliveryPersonStatus;
use crate::models::parcel::{
    generate_tracking_id, DeliveryType, Dimensions, NewParcel, Parcel, StatusEvent,
};
use crate::models::status::ParcelStatus;
use crate::state::AppState;
use crate::store::ParcelSnapshot;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/parcels", post(create_parcel).get(list_parcels))
        .route("/parcels/quote", post(quote_parcel))
        .route("/parcels/track", post(track_parcel))
        .route("/parcels/:id", get(get_parcel))
        .route("/parcels/:id/transitions", get(list_transitions))
        .route("/parcels/:id/status", patch(update_status))
        .route("/parcels/:id/confirm-delivery", post(confirm_parcel_delivery))
        .route("/parcels/:id/cancel", post(cancel_parcel))
        .route("/parcels/:id/assign", patch(assign_personnel))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParcelsQuery {
    pub status: Option<ParcelStatus>,
    pub sender: Option<String>,
    pub receiver_email: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ParcelStatus,
    pub actor: String,
    pub location: String,
    pub note: Option<String>,
    pub expected_version: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDeliveryRequest {
    pub note: Option<String>,
    pub expected_version: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub actor: String,
    pub note: Option<String>,
    pub expected_version: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub delivery_man_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub tracking_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub weight: f64,
    pub dimensions: Dimensions,
    pub delivery_type: DeliveryType,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub cost: f64,
}

async fn create_parcel(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewParcel>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    if payload.sender.name.trim().is_empty() {
        return Err(AppError::BadRequest("sender name cannot be empty".to_string()));
    }

    if payload.receiver.name.trim().is_empty() {
        return Err(AppError::BadRequest("receiver name cannot be empty".to_string()));
    }

    if payload.value <= 0.0 {
        return Err(AppError::BadRequest("declared value must be > 0".to_string()));
    }

    let cost = estimate_cost(payload.weight, payload.dimensions, payload.delivery_type)?;
    let parcel = Parcel::create(payload, generate_tracking_id(), cost, Utc::now());

    let snapshot = state.parcels.insert(parcel);
    state.metrics.parcels_created_total.inc();
    state.metrics.active_parcels.inc();

    info!(
        parcel_id = %snapshot.parcel.id,
        tracking_id = %snapshot.parcel.tracking_id,
        cost = snapshot.parcel.cost,
        "parcel created"
    );

    Ok(Json(snapshot))
}

async fn list_parcels(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListParcelsQuery>,
) -> Json<Vec<Parcel>> {
    let mut parcels: Vec<Parcel> = state
        .parcels
        .list()
        .into_iter()
        .filter(|parcel| filter.status.map_or(true, |status| parcel.status == status))
        .filter(|parcel| {
            filter
                .sender
                .as_deref()
                .map_or(true, |email| parcel.sender.email == email)
        })
        .filter(|parcel| {
            filter
                .receiver_email
                .as_deref()
                .map_or(true, |email| parcel.receiver.email == email)
        })
        .collect();

    parcels.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    Json(parcels)
}

async fn get_parcel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;

    Ok(Json(snapshot))
}

async fn list_transitions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ParcelStatus>>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;

    Ok(Json(allowed_targets(&snapshot.parcel)))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;
    let expected_version = payload.expected_version.unwrap_or(snapshot.version);

    let updated = apply_or_reject(
        &state,
        id,
        apply_transition(
            &snapshot.parcel,
            payload.status,
            &payload.actor,
            &payload.location,
            payload.note,
            Utc::now(),
        ),
    )?;

    let saved = state.parcels.save(updated, expected_version)?;
    record_transition(&state, &saved);

    Ok(Json(saved))
}

async fn confirm_parcel_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmDeliveryRequest>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;
    let expected_version = payload.expected_version.unwrap_or(snapshot.version);

    let updated = apply_or_reject(
        &state,
        id,
        confirm_delivery(&snapshot.parcel, payload.note, Utc::now()),
    )?;

    let saved = state.parcels.save(updated, expected_version)?;
    record_transition(&state, &saved);

    Ok(Json(saved))
}

async fn cancel_parcel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequest>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;
    let expected_version = payload.expected_version.unwrap_or(snapshot.version);

    let location = snapshot.parcel.pickup_address.single_line();
    let updated = apply_or_reject(
        &state,
        id,
        apply_transition(
            &snapshot.parcel,
            ParcelStatus::Cancelled,
            &payload.actor,
            &location,
            payload.note,
            Utc::now(),
        ),
    )?;

    let saved = state.parcels.save(updated, expected_version)?;
    record_transition(&state, &saved);

    Ok(Json(saved))
}

async fn assign_personnel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<ParcelSnapshot>, AppError> {
    let snapshot = state
        .parcels
        .load(id)
        .ok_or_else(|| AppError::NotFound(format!("parcel {} not found", id)))?;

    if snapshot.parcel.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "cannot assign personnel to a {} parcel",
            snapshot.parcel.status
        )));
    }

    if snapshot.parcel.delivery_man_id == Some(payload.delivery_man_id) {
        return Ok(Json(snapshot));
    }

    {
        let person = state
            .personnel
            .get(&payload.delivery_man_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "delivery person {} not found",
                    payload.delivery_man_id
                ))
            })?;

        if person.status != DeliveryPersonStatus::Available {
            return Err(AppError::BadRequest(
                "delivery person is not available".to_string(),
            ));
        }
    }

    let previous_id = snapshot.parcel.delivery_man_id;

    let mut updated = snapshot.parcel;
    updated.delivery_man_id = Some(payload.delivery_man_id);
    updated.updated_at = Utc::now();

    let saved = state.parcels.save(updated, snapshot.version)?;

    if let Some(mut person) = state.personnel.get_mut(&payload.delivery_man_id) {
        person.assigned_parcels += 1;
        person.updated_at = Utc::now();
    }

    if let Some(previous_id) = previous_id {
        if let Some(mut previous) = state.personnel.get_mut(&previous_id) {
            previous.assigned_parcels = previous.assigned_parcels.saturating_sub(1);
            previous.updated_at = Utc::now();
        }
    }

    info!(
        parcel_id = %id,
        delivery_man_id = %payload.delivery_man_id,
        "delivery personnel assigned"
    );

    Ok(Json(saved))
}

async fn track_parcel(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrackRequest>,
) -> Result<Json<TrackingView>, AppError> {
    let tracking_id = payload.tracking_id.trim();
    let snapshot = state
        .parcels
        .find_by_tracking_id(tracking_id)
        .ok_or_else(|| AppError::NotFound(format!("no parcel with tracking id {tracking_id}")))?;

    Ok(Json(project(&snapshot.parcel)))
}

async fn quote_parcel(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let cost = estimate_cost(payload.weight, payload.dimensions, payload.delivery_type)?;
    state.metrics.quotes_total.inc();

    Ok(Json(QuoteResponse { cost }))
}

fn apply_or_reject(
    state: &AppState,
    parcel_id: Uuid,
    result: Result<Parcel, TransitionError>,
) -> Result<Parcel, AppError> {
    result.map_err(|err| {
        state
            .metrics
            .transitions_total
            .with_label_values(&["rejected"])
            .inc();
        warn!(parcel_id = %parcel_id, error = %err, "transition rejected");
        err.into()
    })
}

fn record_transition(state: &AppState, snapshot: &ParcelSnapshot) {
    let parcel = &snapshot.parcel;

    state
        .metrics
        .transitions_total
        .with_label_values(&["accepted"])
        .inc();

    if parcel.status.is_terminal() {
        state.metrics.active_parcels.dec();
    }

    if parcel.status == ParcelStatus::Delivered {
        let turnaround_hours =
            (parcel.updated_at - parcel.created_at).num_seconds() as f64 / 3600.0;
        state
            .metrics
            .delivery_turnaround_hours
            .with_label_values(&[parcel.delivery_type.as_str()])
            .observe(turnaround_hours);

        if let Some(person_id) = parcel.delivery_man_id {
            if let Some(mut person) = state.personnel.get_mut(&person_id) {
                person.assigned_parcels = person.assigned_parcels.saturating_sub(1);
                person.total_deliveries += 1;
                person.updated_at = Utc::now();
            }
        }
    }

    if let Some(entry) = parcel.status_history.last() {
        let _ = state.status_events_tx.send(StatusEvent {
            parcel_id: parcel.id,
            tracking_id: parcel.tracking_id.clone(),
            status: entry.status,
            location: entry.location.clone(),
            updated_by: entry.updated_by.clone(),
            timestamp: entry.timestamp,
        });
    }

    info!(
        parcel_id = %parcel.id,
        tracking_id = %parcel.tracking_id,
        status = %parcel.status,
        version = snapshot.version,
        "parcel status updated"
    );
}
