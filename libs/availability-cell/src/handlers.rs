use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AvailabilityType, SaveScheduleRequest, SlotKey, ToggleDayRequest, UpdateSlotRequest,
};
use crate::services::{manager::SlotManager, store::AvailabilityStore};

fn default_availability_type() -> AvailabilityType {
    AvailabilityType::Clinic
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    #[serde(default = "default_availability_type")]
    pub availability_type: AvailabilityType,
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let store = AvailabilityStore::new(&state);

    let slots = store
        .get_availability(doctor_id, auth.token())
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(json!({
        "doctorId": doctor_id,
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn get_day_summary(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<Value>, AppError> {
    let mut manager = SlotManager::new(doctor_id, &state);
    manager.load(auth.token()).await?;

    let days = manager.day_summary(query.availability_type);

    Ok(Json(json!({
        "doctorId": doctor_id,
        "availabilityType": query.availability_type,
        "days": days
    })))
}

/// Full save cycle: merge the submitted edits and new slots into the current
/// remote schedule, validate everything, then create/update/refetch.
#[axum::debug_handler]
pub async fn save_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<SaveScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let mut manager = SlotManager::new(doctor_id, &state);
    manager.load(auth.token()).await?;

    for edited in &request.edited_slots {
        let id = edited
            .id
            .ok_or_else(|| AppError::BadRequest("Edited slots must carry an id".to_string()))?;
        let patch = UpdateSlotRequest::from_slot(edited);
        manager.update_slot(SlotKey::Persisted(id), &patch)?;
    }

    for new_slot in &request.new_slots {
        manager.add_slot(new_slot)?;
    }

    manager.save(auth.token()).await?;

    Ok(Json(json!({
        "doctorId": doctor_id,
        "slots": manager.current_slots()
    })))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path((doctor_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut manager = SlotManager::new(doctor_id, &state);
    manager.load(auth.token()).await?;

    manager
        .remove_slot(SlotKey::Persisted(slot_id), auth.token())
        .await?;

    Ok(Json(json!({
        "doctorId": doctor_id,
        "deleted": slot_id
    })))
}

#[axum::debug_handler]
pub async fn toggle_day(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<ToggleDayRequest>,
) -> Result<Json<Value>, AppError> {
    let mut manager = SlotManager::new(doctor_id, &state);
    manager.load(auth.token()).await?;

    manager
        .toggle_day(request.day_of_week, request.active, auth.token())
        .await?;

    Ok(Json(json!({
        "doctorId": doctor_id,
        "dayOfWeek": request.day_of_week,
        "active": request.active,
        "slots": manager.current_slots()
    })))
}
