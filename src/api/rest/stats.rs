use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::engine::cost::round2;
use crate::models::parcel::Parcel;
use crate::models::status::ParcelStatus;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParcelStats {
    pub total_parcels: usize,
    pub pending_parcels: usize,
    pub in_transit_parcels: usize,
    pub delivered_parcels: usize,
    pub cancelled_parcels: usize,
    pub total_revenue: f64,
    pub delivery_success_rate: f64,
    pub average_delivery_time_hours: f64,
    pub monthly_growth: f64,
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ParcelStats> {
    let parcels = state.parcels.list();
    Json(compute_stats(&parcels, Utc::now()))
}

pub fn compute_stats(parcels: &[Parcel], now: DateTime<Utc>) -> ParcelStats {
    let count_with = |status: ParcelStatus| parcels.iter().filter(|p| p.status == status).count();

    let total_revenue: f64 = parcels
        .iter()
        .filter(|p| p.status != ParcelStatus::Cancelled)
        .map(|p| p.cost)
        .sum();

    let delivered = count_with(ParcelStatus::Delivered);
    let terminal = parcels.iter().filter(|p| p.status.is_terminal()).count();
    let delivery_success_rate = if terminal == 0 {
        0.0
    } else {
        round2(delivered as f64 / terminal as f64 * 100.0)
    };

    let delivery_hours: Vec<f64> = parcels
        .iter()
        .filter_map(|p| {
            p.actual_delivery
                .map(|delivered_at| (delivered_at - p.created_at).num_seconds() as f64 / 3600.0)
        })
        .collect();
    let average_delivery_time_hours = if delivery_hours.is_empty() {
        0.0
    } else {
        round2(delivery_hours.iter().sum::<f64>() / delivery_hours.len() as f64)
    };

    let current_month = (now.year(), now.month());
    let previous_month = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    let created_in = |month: (i32, u32)| {
        parcels
            .iter()
            .filter(|p| (p.created_at.year(), p.created_at.month()) == month)
            .count()
    };
    let current = created_in(current_month);
    let previous = created_in(previous_month);
    let monthly_growth = if previous == 0 {
        if current > 0 { 100.0 } else { 0.0 }
    } else {
        round2((current as f64 - previous as f64) / previous as f64 * 100.0)
    };

    ParcelStats {
        total_parcels: parcels.len(),
        pending_parcels: count_with(ParcelStatus::Pending),
        in_transit_parcels: count_with(ParcelStatus::InTransit),
        delivered_parcels: delivered,
        cancelled_parcels: count_with(ParcelStatus::Cancelled),
        total_revenue: round2(total_revenue),
        delivery_success_rate,
        average_delivery_time_hours,
        monthly_growth,
    }
}
