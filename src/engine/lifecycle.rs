use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::parcel::{Parcel, StatusHistoryEntry};
use crate::models::status::ParcelStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition {
        from: ParcelStatus,
        to: ParcelStatus,
    },

    #[error("parcel is already in terminal state {0}")]
    TerminalState(ParcelStatus),

    #[error("actor is required")]
    MissingActor,

    #[error("location is required")]
    MissingLocation,

    #[error("delivery can only be confirmed while out for delivery, not {0}")]
    NotReadyForConfirmation(ParcelStatus),
}

pub fn apply_transition(
    parcel: &Parcel,
    target: ParcelStatus,
    actor: &str,
    location: &str,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<Parcel, TransitionError> {
    if actor.trim().is_empty() {
        return Err(TransitionError::MissingActor);
    }

    if location.trim().is_empty() {
        return Err(TransitionError::MissingLocation);
    }

    if parcel.status.is_terminal() {
        return Err(TransitionError::TerminalState(parcel.status));
    }

    if !allowed_targets(parcel).contains(&target) {
        return Err(TransitionError::InvalidTransition {
            from: parcel.status,
            to: target,
        });
    }

    let mut updated = parcel.clone();
    updated.status_history.push(StatusHistoryEntry {
        status: target,
        timestamp: now,
        location: location.to_string(),
        updated_by: actor.to_string(),
        note,
    });
    updated.status = target;
    updated.updated_at = now;

    if target == ParcelStatus::Delivered {
        updated.actual_delivery = Some(now);
    }

    Ok(updated)
}

pub fn confirm_delivery(
    parcel: &Parcel,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<Parcel, TransitionError> {
    if parcel.status != ParcelStatus::OutForDelivery {
        return Err(TransitionError::NotReadyForConfirmation(parcel.status));
    }

    let location = parcel.receiver.address.single_line();
    apply_transition(
        parcel,
        ParcelStatus::Delivered,
        "receiver",
        &location,
        note,
        now,
    )
}

pub fn allowed_targets(parcel: &Parcel) -> Vec<ParcelStatus> {
    let mut targets = parcel.status.forward_targets().to_vec();

    if parcel.status == ParcelStatus::Held {
        if let Some(origin) = hold_origin(parcel) {
            targets.insert(0, origin);
        }
    }

    targets
}

// The state a hold resumes to: the most recent history entry that is
// neither HELD nor BLOCKED.
pub fn hold_origin(parcel: &Parcel) -> Option<ParcelStatus> {
    parcel
        .status_history
        .iter()
        .rev()
        .map(|entry| entry.status)
        .find(|status| !status.is_hold())
}
