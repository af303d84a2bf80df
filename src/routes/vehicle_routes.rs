use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::put,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::VehicleController;
use crate::dto::vehicle_dto::UpdateAvailabilityRequest;
use crate::dto::ApiResponse;
use crate::middleware::{auth_middleware, AuthenticatedUser};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:id/availability", put(update_availability))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn update_availability(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Vehicle>>> {
    let controller = VehicleController::new(state.vehicles.clone());
    let vehicle = controller.set_availability(id, request, &user).await?;
    Ok(Json(ApiResponse::success_with_message(vehicle, "Vehicle availability updated")))
}
