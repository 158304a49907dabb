use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::delivery_person::{DeliveryPerson, DeliveryPersonStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/personnel", post(create_person).get(list_personnel))
        .route("/personnel/:id/status", patch(update_person_status))
}

#[derive(Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub rating: f64,
}

#[derive(Deserialize)]
pub struct ListPersonnelQuery {
    pub status: Option<DeliveryPersonStatus>,
}

#[derive(Deserialize)]
pub struct UpdatePersonStatusRequest {
    pub status: DeliveryPersonStatus,
}

async fn create_person(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreatePersonRequest>,
) -> Result<Json<DeliveryPerson>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("email cannot be empty".to_string()));
    }

    let person = DeliveryPerson {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        location: payload.location,
        status: DeliveryPersonStatus::Available,
        assigned_parcels: 0,
        total_deliveries: 0,
        rating: payload.rating.clamp(0.0, 5.0),
        updated_at: Utc::now(),
    };

    state.personnel.insert(person.id, person.clone());
    Ok(Json(person))
}

async fn list_personnel(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListPersonnelQuery>,
) -> Json<Vec<DeliveryPerson>> {
    let personnel = state
        .personnel
        .iter()
        .filter(|entry| filter.status.map_or(true, |status| entry.value().status == status))
        .map(|entry| entry.value().clone())
        .collect();
    Json(personnel)
}

async fn update_person_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePersonStatusRequest>,
) -> Result<Json<DeliveryPerson>, AppError> {
    let mut person = state
        .personnel
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("delivery person {} not found", id)))?;

    person.status = payload.status;
    person.updated_at = Utc::now();

    Ok(Json(person.clone()))
}
