use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::controllers::{UserController, VehicleController};
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware};
use crate::models::user::{DirectoryOutcome, UserFilters, UserProfile, UserRole};
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Directorios por rol (rutas /auth/...) y directorio agregado, solo admin
pub fn create_user_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/admin/all-drivers", get(list_drivers))
        .route("/auth/admin/all-vehicles", get(list_vehicles))
        .route("/auth/client/all", get(list_clients))
        .route("/auth/vehicle-owner/all", get(list_vehicle_owners))
        .route("/auth/business-owner/all", get(list_business_owners))
        .route("/api/admin/users", get(user_directory))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn list_role(
    state: &AppState,
    role: UserRole,
    filters: &UserFilters,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    let controller = UserController::new(state.users.clone());
    let users = controller.list_role(role, filters).await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn list_drivers(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    list_role(&state, UserRole::Driver, &filters).await
}

async fn list_clients(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    list_role(&state, UserRole::Client, &filters).await
}

async fn list_vehicle_owners(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    list_role(&state, UserRole::VehicleOwner, &filters).await
}

async fn list_business_owners(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<ApiResponse<Vec<UserProfile>>>> {
    list_role(&state, UserRole::BusinessOwner, &filters).await
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Vehicle>>>> {
    let controller = VehicleController::new(state.vehicles.clone());
    let vehicles = controller.list_all().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn user_directory(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> Response {
    let controller = UserController::new(state.users.clone());
    let aggregate = controller.directory(&filters).await;

    let status = match aggregate.outcome {
        DirectoryOutcome::Failed => StatusCode::BAD_GATEWAY,
        DirectoryOutcome::Complete | DirectoryOutcome::Partial => StatusCode::OK,
    };

    let body = ApiResponse {
        success: aggregate.outcome != DirectoryOutcome::Failed,
        message: aggregate.message.clone(),
        data: Some(aggregate),
    };

    (status, Json(body)).into_response()
}
