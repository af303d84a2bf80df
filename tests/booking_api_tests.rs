mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{authorized, sample_booking, TestContext};
use rental_marketplace::dto::booking_dto::BookingListResponse;
use rental_marketplace::dto::ApiResponse;
use rental_marketplace::models::booking::{Booking, BookingStatusHistory};
use rental_marketplace::models::booking_status::BookingStatus;
use rental_marketplace::models::user::UserRole;

fn admin_token(ctx: &TestContext) -> String {
    ctx.token(Uuid::new_v4(), UserRole::Admin)
}

#[tokio::test]
async fn test_confirm_pending_booking_without_reason() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let admin_id = Uuid::new_v4();
    let token = ctx.token(admin_id, UserRole::Admin);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({ "status": "confirmed", "reason": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    let updated = body.data.unwrap();
    assert_eq!(updated.status, BookingStatus::Confirmed);
    assert_eq!(updated.approved_by, Some(admin_id));
    assert_eq!(updated.status_reason, None);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({ "status": "rejected", "reason": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "REASON_REQUIRED");
    assert_eq!(ctx.bookings.get(booking.id).unwrap().status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_reject_with_reason_records_history() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({ "status": "rejected", "reason": "no availability" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    assert_eq!(body.data.unwrap().status_reason.as_deref(), Some("no availability"));

    let response = authorized(ctx.server.get(&format!("/api/bookings/{}/history", booking.id)), &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let history: ApiResponse<Vec<BookingStatusHistory>> = response.json();
    let history = history.data.unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_status, BookingStatus::Pending);
    assert_eq!(history[0].to_status, BookingStatus::Rejected);
    assert_eq!(history[0].notes.as_deref(), Some("no availability"));
}

#[tokio::test]
async fn test_terminal_state_cannot_move() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Completed);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({ "status": "active" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");
}

#[tokio::test]
async fn test_same_status_is_rejected() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Paid);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({ "status": "paid" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "STATUS_UNCHANGED");
}

#[tokio::test]
async fn test_stale_expected_status_conflicts() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = admin_token(&ctx);

    // Otro admin confirmó la reserva mientras tanto
    ctx.bookings.force_status(booking.id, BookingStatus::Confirmed);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({
            "status": "rejected",
            "reason": "no availability",
            "expectedStatus": "pending"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "STALE_BOOKING_STATUS");
    assert_eq!(ctx.bookings.get(booking.id).unwrap().status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_status_update_requires_admin() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let path = format!("/api/bookings/{}/status", booking.id);

    let response = ctx.server.put(&path).json(&json!({ "status": "confirmed" })).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let client_token = ctx.token(booking.client_id, UserRole::Client);
    let response = authorized(ctx.server.put(&path), &client_token)
        .json(&json!({ "status": "confirmed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let ctx = TestContext::with_bookings(vec![]);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", Uuid::new_v4())), &token)
        .json(&json!({ "status": "confirmed" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_list_filters_and_paginates() {
    let client = Uuid::new_v4();
    let mut bookings: Vec<_> = (0..3)
        .map(|_| sample_booking(client, BookingStatus::Pending))
        .collect();
    bookings.push(sample_booking(client, BookingStatus::Completed));
    let ctx = TestContext::with_bookings(bookings);
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.get("/api/bookings/admin/all?status=pending&page=1&limit=2"), &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<BookingListResponse> = response.json();
    let list = body.data.unwrap();

    assert_eq!(list.bookings.len(), 2);
    assert!(list.bookings.iter().all(|b| b.status == BookingStatus::Pending));
    assert_eq!(list.pagination.total, 3);
    assert_eq!(list.pagination.total_pages, 2);

    let response = authorized(ctx.server.get("/api/bookings/admin/all?status=all"), &token).await;
    let body: ApiResponse<BookingListResponse> = response.json();
    assert_eq!(body.data.unwrap().pagination.total, 4);

    let response = authorized(ctx.server.get("/api/bookings/admin/all?status=archived"), &token).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_sees_only_own_bookings() {
    let owner = Uuid::new_v4();
    let booking = sample_booking(owner, BookingStatus::Confirmed);
    let ctx = TestContext::with_bookings(vec![booking.clone(), sample_booking(Uuid::new_v4(), BookingStatus::Pending)]);

    let token = ctx.token(owner, UserRole::Client);
    let response = authorized(ctx.server.get(&format!("/api/bookings/client/{}", owner)), &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Vec<Booking>> = response.json();
    let bookings = body.data.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, booking.id);

    let other = ctx.token(Uuid::new_v4(), UserRole::Client);
    let response = authorized(ctx.server.get(&format!("/api/bookings/client/{}", owner)), &other).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = authorized(ctx.server.get(&format!("/api/bookings/{}", booking.id)), &other).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_client_cancels_with_reason() {
    let client = Uuid::new_v4();
    let booking = sample_booking(client, BookingStatus::Confirmed);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let token = ctx.token(client, UserRole::Client);
    let path = format!("/api/bookings/{}/cancel", booking.id);

    let response = authorized(ctx.server.put(&path), &token)
        .json(&json!({ "reason": "  " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = authorized(ctx.server.put(&path), &token)
        .json(&json!({ "reason": "change of plans" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    let cancelled = body.data.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(client));

    // Ya cancelada: mismo estado
    let response = authorized(ctx.server.put(&path), &token)
        .json(&json!({ "reason": "again" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "STATUS_UNCHANGED");
}

#[tokio::test]
async fn test_review_only_once_after_completion() {
    let client = Uuid::new_v4();
    let active = sample_booking(client, BookingStatus::Active);
    let completed = sample_booking(client, BookingStatus::Completed);
    let ctx = TestContext::with_bookings(vec![active.clone(), completed.clone()]);
    let token = ctx.token(client, UserRole::Client);
    let review = json!({ "rating": 5, "comment": "Impecable" });

    let response = authorized(ctx.server.post(&format!("/api/bookings/{}/review", active.id)), &token)
        .json(&review)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let path = format!("/api/bookings/{}/review", completed.id);
    let response = authorized(ctx.server.post(&path), &token).json(&review).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    assert_eq!(body.data.unwrap().review.map(|r| r.rating), Some(5));

    let response = authorized(ctx.server.post(&path), &token).json(&review).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_keeps_existing_approver() {
    let original_approver = Uuid::new_v4();
    let mut booking = sample_booking(Uuid::new_v4(), BookingStatus::Paid);
    booking.approved_by = Some(original_approver);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let admin_id = Uuid::new_v4();
    let token = ctx.token(admin_id, UserRole::Admin);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({
            "status": "cancelled",
            "reason": "vehicle damaged",
            "approvedBy": Uuid::new_v4()
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    let updated = body.data.unwrap();
    assert_eq!(updated.approved_by, Some(original_approver));
    assert_eq!(updated.cancelled_by, Some(admin_id));
}

#[tokio::test]
async fn test_confirm_ignores_cancelled_by() {
    let booking = sample_booking(Uuid::new_v4(), BookingStatus::Pending);
    let ctx = TestContext::with_bookings(vec![booking.clone()]);
    let approver = Uuid::new_v4();
    let token = admin_token(&ctx);

    let response = authorized(ctx.server.put(&format!("/api/bookings/{}/status", booking.id)), &token)
        .json(&json!({
            "status": "confirmed",
            "approvedBy": approver,
            "cancelledBy": Uuid::new_v4()
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Booking> = response.json();
    let updated = body.data.unwrap();
    assert_eq!(updated.approved_by, Some(approver));
    assert_eq!(updated.cancelled_by, None);
}
