use serde::{Deserialize, Serialize};

// Request para activar/desactivar la disponibilidad de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}
