use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_backend::client::BackendClient;
use shared_config::AppConfig;

use crate::models::{DayOfWeek, Slot, UpdateSlotRequest};

/// Remote availability store, spoken over the portal backend's REST API.
/// Times cross this boundary as `HH:MM[:SS]` strings; deserialization
/// truncates seconds, so everything local is minute-resolution.
pub struct AvailabilityStore {
    backend: BackendClient,
}

impl AvailabilityStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    /// Full current weekly availability for a doctor.
    pub async fn get_availability(&self, doctor_id: Uuid, auth_token: &str) -> Result<Vec<Slot>> {
        debug!("Fetching availability for doctor: {}", doctor_id);

        let path = format!("/api/v1/availability/doctor/{}", doctor_id);
        self.backend
            .request(Method::GET, &path, Some(auth_token), None)
            .await
    }

    /// Bulk-create; the response carries the same slots with assigned ids.
    pub async fn create_availability(
        &self,
        slots: &[Slot],
        auth_token: &str,
    ) -> Result<Vec<Slot>> {
        debug!("Bulk-creating {} availability slots", slots.len());

        let created: Vec<Slot> = self
            .backend
            .request(
                Method::POST,
                "/api/v1/availability",
                Some(auth_token),
                Some(serde_json::to_value(slots)?),
            )
            .await?;

        if created.len() != slots.len() {
            warn!(
                "Bulk create returned {} slots for {} submitted",
                created.len(),
                slots.len()
            );
        }

        Ok(created)
    }

    /// Patch one persisted slot by id.
    pub async fn update_availability(
        &self,
        patch: &UpdateSlotRequest,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<Slot> {
        debug!("Updating availability slot: {}", slot_id);

        let path = format!("/api/v1/availability/{}", slot_id);
        self.backend
            .request(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(serde_json::to_value(patch)?),
            )
            .await
    }

    pub async fn delete_availability(&self, slot_id: Uuid, auth_token: &str) -> Result<()> {
        debug!("Deleting availability slot: {}", slot_id);

        let path = format!("/api/v1/availability/{}", slot_id);
        self.backend
            .execute(Method::DELETE, &path, Some(auth_token), None)
            .await
    }

    /// Day-level batch flag: activate or deactivate every slot on a weekday
    /// in one call, independent of per-slot updates.
    pub async fn set_day_active(
        &self,
        day: DayOfWeek,
        active: bool,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Setting day {} active={}", day, active);

        self.backend
            .execute(
                Method::PATCH,
                "/api/v1/availability/day",
                Some(auth_token),
                Some(json!({ "dayOfWeek": day, "active": active })),
            )
            .await
    }
}
