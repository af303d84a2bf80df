//! Repositorios de acceso a datos
//!
//! Cada recurso expone un trait de almacenamiento; los controladores
//! dependen del trait y `AppState` guarda la implementación PostgreSQL.

pub mod booking_repository;
pub mod user_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::models::booking::{
    Booking, BookingQuery, BookingStatusHistory, NewReview, StatusChangeActor,
};
use crate::models::booking_status::StatusChange;
use crate::models::user::{UserProfile, UserRole};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

pub use booking_repository::PgBookingRepository;
pub use user_repository::PgUserRepository;
pub use vehicle_repository::PgVehicleRepository;

/// Parámetros de paginación (página base 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Página de resultados
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Listado paginado, más recientes primero
    async fn list(&self, query: &BookingQuery, pagination: Pagination) -> AppResult<Page<Booking>>;

    /// Listado completo sin paginar (reservas de un cliente, reportes)
    async fn list_all(&self, query: &BookingQuery) -> AppResult<Vec<Booking>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Aplicar un cambio de estado solo si el estado persistido sigue siendo
    /// `change.from`, y registrar la entrada de historial en la misma transacción.
    /// Devuelve `NotFound` si la reserva no existe y `StaleStatus` si cambió.
    async fn update_status(
        &self,
        id: Uuid,
        change: &StatusChange,
        actor: &StatusChangeActor,
    ) -> AppResult<Booking>;

    async fn status_history(&self, id: Uuid) -> AppResult<Vec<BookingStatusHistory>>;

    /// Devuelve `Conflict` si la reserva ya tiene reseña
    async fn add_review(&self, id: Uuid, review: &NewReview) -> AppResult<Booking>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Vehicle>;
}
