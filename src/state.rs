//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::{
    BookingStore, PgBookingRepository, PgUserRepository, PgVehicleRepository, UserDirectory,
    VehicleStore,
};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub bookings: Arc<dyn BookingStore>,
    pub users: Arc<dyn UserDirectory>,
    pub vehicles: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        bookings: Arc<dyn BookingStore>,
        users: Arc<dyn UserDirectory>,
        vehicles: Arc<dyn VehicleStore>,
    ) -> Self {
        let jwt = JwtConfig::from(&config);
        Self {
            config,
            jwt,
            bookings,
            users,
            vehicles,
        }
    }

    /// Estado con los repositorios PostgreSQL sobre un mismo pool
    pub fn with_pool(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self::new(
            config,
            Arc::new(PgBookingRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgVehicleRepository::new(pool)),
        )
    }
}
