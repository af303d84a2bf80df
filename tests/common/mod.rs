//! Utilidades compartidas por los tests de integración: almacenes en memoria
//! con la misma semántica que los repositorios PostgreSQL.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use rental_marketplace::config::EnvironmentConfig;
use rental_marketplace::models::booking::{
    Booking, BookingQuery, BookingReview, BookingStatusHistory, Location, NewReview,
    PricingBreakdown, RentalPeriod, StatusChangeActor,
};
use rental_marketplace::models::booking_status::{BookingStatus, StatusChange};
use rental_marketplace::models::user::{AccountStatus, UserProfile, UserRole};
use rental_marketplace::models::vehicle::{Vehicle, VehicleStatus};
use rental_marketplace::repositories::{
    BookingStore, Page, Pagination, UserDirectory, VehicleStore,
};
use rental_marketplace::utils::errors::{not_found_error, AppError, AppResult};
use rental_marketplace::utils::jwt::{generate_token, JwtConfig};
use rental_marketplace::{create_app_router, AppState};

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
    history: Mutex<Vec<BookingStatusHistory>>,
}

impl InMemoryBookingStore {
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        let store = Self::default();
        {
            let mut map = store.bookings.lock().unwrap();
            for booking in bookings {
                map.insert(booking.id, booking);
            }
        }
        store
    }

    /// Cambiar el estado por fuera de la API (otro admin concurrente)
    pub fn force_status(&self, id: Uuid, status: BookingStatus) {
        if let Some(booking) = self.bookings.lock().unwrap().get_mut(&id) {
            booking.status = status;
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Booking> {
        self.bookings.lock().unwrap().get(&id).cloned()
    }

    fn filtered(&self, query: &BookingQuery) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list(&self, query: &BookingQuery, pagination: Pagination) -> AppResult<Page<Booking>> {
        let all = self.filtered(query);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect();

        Ok(Page {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        })
    }

    async fn list_all(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        Ok(self.filtered(query))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.get(id))
    }

    async fn update_status(
        &self,
        id: Uuid,
        change: &StatusChange,
        actor: &StatusChangeActor,
    ) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        if booking.status != change.from {
            return Err(AppError::StaleStatus(format!(
                "booking is '{}', expected '{}'",
                booking.status, change.from
            )));
        }

        let now = Utc::now();
        booking.status = change.to;
        booking.status_reason = change.reason.clone();
        booking.approved_by = actor.approved_by.or(booking.approved_by);
        booking.cancelled_by = actor.cancelled_by.or(booking.cancelled_by);
        booking.version += 1;
        booking.updated_at = now;

        self.history.lock().unwrap().push(BookingStatusHistory {
            id: Uuid::new_v4(),
            booking_id: id,
            from_status: change.from,
            to_status: change.to,
            reason: change.reason.clone(),
            notes: change.notes.clone(),
            changed_by: actor.changed_by,
            changed_at: now,
        });

        Ok(booking.clone())
    }

    async fn status_history(&self, id: Uuid) -> AppResult<Vec<BookingStatusHistory>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.booking_id == id)
            .cloned()
            .collect())
    }

    async fn add_review(&self, id: Uuid, review: &NewReview) -> AppResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        if booking.review.is_some() {
            return Err(AppError::Conflict("Booking already has a review".to_string()));
        }

        booking.review = Some(BookingReview {
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: Utc::now(),
        });
        Ok(booking.clone())
    }
}

/// Directorio en memoria; los roles marcados devuelven error
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Vec<UserProfile>,
    failing: HashSet<UserRole>,
}

impl InMemoryUserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self {
            users,
            failing: HashSet::new(),
        }
    }

    pub fn failing(mut self, roles: &[UserRole]) -> Self {
        self.failing.extend(roles.iter().copied());
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<UserProfile>> {
        if self.failing.contains(&role) {
            return Err(AppError::Internal(format!("{} directory unavailable", role)));
        }
        Ok(self.users.iter().filter(|u| u.role == role).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryVehicleStore {
    vehicles: Mutex<HashMap<Uuid, Vehicle>>,
}

impl InMemoryVehicleStore {
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        let store = Self::default();
        {
            let mut map = store.vehicles.lock().unwrap();
            for vehicle in vehicles {
                map.insert(vehicle.id, vehicle);
            }
        }
        store
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleStore {
    async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.vehicles.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.lock().unwrap().get(&id).cloned())
    }

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Vehicle> {
        let mut vehicles = self.vehicles.lock().unwrap();
        let vehicle = vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
        vehicle.is_available = is_available;
        Ok(vehicle.clone())
    }
}

/// Contexto de test: servidor más acceso directo a los almacenes
pub struct TestContext {
    pub server: TestServer,
    pub bookings: Arc<InMemoryBookingStore>,
    pub jwt: JwtConfig,
}

impl TestContext {
    pub fn new(
        bookings: InMemoryBookingStore,
        users: InMemoryUserDirectory,
        vehicles: InMemoryVehicleStore,
    ) -> Self {
        let config = EnvironmentConfig::default();
        let jwt = JwtConfig::from(&config);
        let bookings = Arc::new(bookings);

        let state = AppState::new(config, bookings.clone(), Arc::new(users), Arc::new(vehicles));
        let server = TestServer::new(create_app_router(state)).unwrap();

        Self { server, bookings, jwt }
    }

    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self::new(
            InMemoryBookingStore::with_bookings(bookings),
            InMemoryUserDirectory::default(),
            InMemoryVehicleStore::default(),
        )
    }

    pub fn token(&self, user_id: Uuid, role: UserRole) -> String {
        generate_token(user_id, role, &self.jwt).unwrap()
    }
}

/// Añadir el header Authorization a una request de test
pub fn authorized(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub fn sample_booking(client_id: Uuid, status: BookingStatus) -> Booking {
    let now = Utc::now();
    let start_date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let total = Decimal::from_str("165.00").unwrap();

    Booking {
        id: Uuid::new_v4(),
        reference_code: format!("BK-{}", &Uuid::new_v4().simple().to_string()[..8]),
        client_id,
        vehicle_id: Uuid::new_v4(),
        vehicle_owner_id: Uuid::new_v4(),
        rental_period: RentalPeriod {
            start_date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_date: start_date + Duration::days(3),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            total_days: 3,
        },
        pricing: PricingBreakdown {
            daily_rate: Decimal::from(50),
            subtotal: Decimal::from(150),
            service_fee: Decimal::from(10),
            taxes: Decimal::from(5),
            security_deposit: Decimal::from(300),
            total,
        },
        pickup_location: Location {
            address: "12 rue de la Paix".to_string(),
            city: Some("Paris".to_string()),
        },
        dropoff_location: Location {
            address: "12 rue de la Paix".to_string(),
            city: Some("Paris".to_string()),
        },
        special_requirements: None,
        status,
        status_reason: None,
        approved_by: None,
        cancelled_by: None,
        review: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_user(role: UserRole, first_name: &str) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        role,
        first_name: first_name.to_string(),
        last_name: "Martin".to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        phone: None,
        address: None,
        license_number: None,
        business_name: None,
        status: AccountStatus::Active,
        created_at: Utc::now(),
    }
}

pub fn sample_vehicle(owner_id: Uuid) -> Vehicle {
    Vehicle {
        id: Uuid::new_v4(),
        owner_id,
        make: "Renault".to_string(),
        model: "Clio".to_string(),
        year: Some(2022),
        license_plate: "AB-123-CD".to_string(),
        vehicle_type: Some("compact".to_string()),
        specifications: None,
        pricing: None,
        documents: Vec::new(),
        is_available: true,
        status: VehicleStatus::Active,
        created_at: Utc::now(),
    }
}
