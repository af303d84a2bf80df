use axum::{
    extract::{Query, State},
    http::header,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::controllers::ReportController;
use crate::dto::report_dto::{ReportFormat, ReportParams};
use crate::dto::ApiResponse;
use crate::middleware::{admin_only_middleware, auth_middleware};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_report_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/generate", get(generate_report))
        .route_layer(from_fn(admin_only_middleware))
        .route_layer(from_fn_with_state(state, auth_middleware))
}

async fn generate_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Response> {
    let controller = ReportController::new(state.bookings.clone());
    let report = controller.generate(&params).await?;

    let response = match params.format.unwrap_or_default() {
        ReportFormat::Json => Json(ApiResponse::success(report)).into_response(),
        ReportFormat::Csv => {
            let disposition = format!("attachment; filename=\"{}\"", report.csv_filename());
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.to_csv(),
            )
                .into_response()
        }
    };

    Ok(response)
}
