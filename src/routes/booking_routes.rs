use axum::{
    extract::{Path, Query, State},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::BookingController;
use crate::dto::booking_dto::{
    BookingListParams, BookingListResponse, CancelBookingRequest, ClientBookingParams,
    CreateReviewRequest, UpdateBookingStatusRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::booking::{Booking, BookingStatusHistory};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin/all", get(list_admin_bookings))
        .route("/:id/status", put(update_booking_status))
        .route("/:id/history", get(get_booking_history))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let authenticated = Router::new()
        .route("/:id", get(get_booking))
        .route("/client/:client_id", get(list_client_bookings))
        .route("/:id/cancel", put(cancel_booking))
        .route("/:id/review", post(review_booking))
        .route_layer(from_fn_with_state(state, auth_middleware));

    admin.merge(authenticated)
}

async fn list_admin_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<ApiResponse<BookingListResponse>>> {
    let controller = BookingController::new(state.bookings.clone());
    let response = controller
        .list_admin(params, state.config.default_page_size, state.config.max_page_size)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let controller = BookingController::new(state.bookings.clone());
    let booking = controller.get_for_user(id, &user).await?;
    Ok(Json(ApiResponse::success(booking)))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let controller = BookingController::new(state.bookings.clone());
    let booking = controller.update_status(id, request, &user).await?;
    let message = format!("Booking status updated to {}", booking.status);
    Ok(Json(ApiResponse::success_with_message(booking, message)))
}

async fn get_booking_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<BookingStatusHistory>>>> {
    let controller = BookingController::new(state.bookings.clone());
    let history = controller.history(id).await?;
    Ok(Json(ApiResponse::success(history)))
}

async fn list_client_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(client_id): Path<Uuid>,
    Query(params): Query<ClientBookingParams>,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let controller = BookingController::new(state.bookings.clone());
    let bookings = controller.list_for_client(client_id, params, &user).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelBookingRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let controller = BookingController::new(state.bookings.clone());
    let booking = controller.cancel(id, request, &user).await?;
    Ok(Json(ApiResponse::success_with_message(booking, "Booking cancelled")))
}

async fn review_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let controller = BookingController::new(state.bookings.clone());
    let booking = controller.add_review(id, request, &user).await?;
    Ok(Json(ApiResponse::success_with_message(booking, "Review submitted")))
}
