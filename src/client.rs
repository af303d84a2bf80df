//! Cliente HTTP del marketplace
//!
//! Envoltorio tipado sobre la API REST, equivalente a la capa de servicios
//! del frontend. Los cambios de estado se validan localmente con la misma
//! tabla de transiciones antes de enviarse.

use std::time::Duration;

use futures::future::join_all;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::dto::booking_dto::{
    BookingListResponse, CancelBookingRequest, CreateReviewRequest, UpdateBookingStatusRequest,
};
use crate::dto::report_dto::{ReportFormat, ReportParams};
use crate::dto::ApiResponse;
use crate::models::booking::{Booking, BookingStatusHistory};
use crate::models::booking_status::{BookingStatus, StatusChange, TransitionError};
use crate::models::report::BookingReport;
use crate::models::user::{UserDirectoryAggregate, UserProfile, UserRole};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid status change: {0}")]
    InvalidStatusChange(#[from] TransitionError),

    #[error("Empty response body")]
    EmptyResponse,

    #[error("No directory endpoint for role '{0}'")]
    UnsupportedRole(UserRole),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Configuración del cliente
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Filtros opcionales del listado admin
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
}

pub struct MarketplaceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MarketplaceClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(&self, builder: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => (error.code, error.message),
            Err(_) => (None, body),
        };

        tracing::warn!("⚠️ API {} respondió {}: {}", self.base_url, status, message);
        Err(ClientError::Api { status, code, message })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let envelope: ApiResponse<T> = self.send_raw(builder).await?.json().await?;
        envelope.data.ok_or(ClientError::EmptyResponse)
    }

    pub async fn list_admin_bookings(&self, query: &BookingListQuery) -> ClientResult<BookingListResponse> {
        self.send(self.request(Method::GET, "/api/bookings/admin/all").query(query))
            .await
    }

    pub async fn get_booking(&self, id: Uuid) -> ClientResult<Booking> {
        self.send(self.request(Method::GET, &format!("/api/bookings/{}", id)))
            .await
    }

    /// Validar el cambio contra el estado actual y enviarlo.
    /// Sin `notes`, el motivo se envía también como notas.
    pub async fn update_booking_status(
        &self,
        booking: &Booking,
        new_status: BookingStatus,
        reason: Option<String>,
        notes: Option<String>,
    ) -> ClientResult<Booking> {
        let change = StatusChange::new(booking.status, new_status, reason, notes)?;
        let body = UpdateBookingStatusRequest::from(&change);

        self.send(
            self.request(Method::PUT, &format!("/api/bookings/{}/status", booking.id))
                .json(&body),
        )
        .await
    }

    pub async fn booking_history(&self, id: Uuid) -> ClientResult<Vec<BookingStatusHistory>> {
        self.send(self.request(Method::GET, &format!("/api/bookings/{}/history", id)))
            .await
    }

    pub async fn client_bookings(
        &self,
        client_id: Uuid,
        status: Option<BookingStatus>,
    ) -> ClientResult<Vec<Booking>> {
        let mut builder = self.request(Method::GET, &format!("/api/bookings/client/{}", client_id));
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        self.send(builder).await
    }

    pub async fn cancel_booking(&self, booking: &Booking, reason: &str) -> ClientResult<Booking> {
        StatusChange::new(booking.status, BookingStatus::Cancelled, Some(reason.to_string()), None)?;

        let body = CancelBookingRequest {
            reason: reason.trim().to_string(),
        };
        self.send(
            self.request(Method::PUT, &format!("/api/bookings/{}/cancel", booking.id))
                .json(&body),
        )
        .await
    }

    pub async fn review_booking(&self, id: Uuid, review: &CreateReviewRequest) -> ClientResult<Booking> {
        self.send(
            self.request(Method::POST, &format!("/api/bookings/{}/review", id))
                .json(review),
        )
        .await
    }

    pub async fn generate_report(&self, params: &ReportParams) -> ClientResult<BookingReport> {
        let params = ReportParams {
            format: Some(ReportFormat::Json),
            ..params.clone()
        };
        self.send(
            self.request(Method::GET, "/api/admin-reports/generate")
                .query(&params),
        )
        .await
    }

    /// Reporte en CSV tal como lo sirve la API
    pub async fn download_report_csv(&self, params: &ReportParams) -> ClientResult<String> {
        let params = ReportParams {
            format: Some(ReportFormat::Csv),
            ..params.clone()
        };
        let response = self
            .send_raw(
                self.request(Method::GET, "/api/admin-reports/generate")
                    .query(&params),
            )
            .await?;
        Ok(response.text().await?)
    }

    pub async fn list_users(&self, role: UserRole) -> ClientResult<Vec<UserProfile>> {
        let path = role_path(role).ok_or(ClientError::UnsupportedRole(role))?;
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn list_vehicles(&self) -> ClientResult<Vec<Vehicle>> {
        self.send(self.request(Method::GET, "/auth/admin/all-vehicles"))
            .await
    }

    /// Cargar los cuatro directorios por rol; los fallos se agregan, no se propagan
    pub async fn fetch_all_users(&self) -> UserDirectoryAggregate {
        let fetches = UserRole::DIRECTORY
            .into_iter()
            .map(|role| async move { (role, self.list_users(role).await) });

        UserDirectoryAggregate::from_results(join_all(fetches).await)
    }
}

/// Ruta del directorio de cada rol (los admins no tienen listado)
pub fn role_path(role: UserRole) -> Option<&'static str> {
    match role {
        UserRole::Driver => Some("/auth/admin/all-drivers"),
        UserRole::Client => Some("/auth/client/all"),
        UserRole::VehicleOwner => Some("/auth/vehicle-owner/all"),
        UserRole::BusinessOwner => Some("/auth/business-owner/all"),
        UserRole::Admin => None,
    }
}
