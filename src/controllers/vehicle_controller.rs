use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::dto::vehicle_dto::UpdateAvailabilityRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::Vehicle;
use crate::repositories::VehicleStore;
use crate::utils::errors::{forbidden_error, not_found_error, AppResult};

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        self.store.list_all().await
    }

    pub async fn set_availability(
        &self,
        id: Uuid,
        request: UpdateAvailabilityRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<Vehicle> {
        let vehicle = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        // Verificar que pertenece al propietario
        if !user.can_act_for(vehicle.owner_id) {
            return Err(forbidden_error("update vehicle", "vehicle belongs to another owner"));
        }

        let updated = self.store.set_availability(id, request.is_available).await?;
        info!(
            "🚗 Vehículo {} disponible={} por {}",
            updated.license_plate, updated.is_available, user.user_id
        );

        Ok(updated)
    }
}
