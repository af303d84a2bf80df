//! Modelo de Vehicle
//!
//! Vehículos publicados por los propietarios, con especificaciones, tarifas
//! y documentos opcionales.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
pub enum VehicleStatus {
    Active,
    Maintenance,
    Inactive,
    PendingApproval,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSpecifications {
    pub seats: Option<i16>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePricing {
    pub daily_rate: Decimal,
    pub security_deposit: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDocument {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub document_type: String,
    pub url: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Vehicle principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vehicle_type: Option<String>,
    pub specifications: Option<VehicleSpecifications>,
    pub pricing: Option<VehiclePricing>,
    pub documents: Vec<VehicleDocument>,
    pub is_available: bool,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

/// Fila de la tabla vehicles (sin documentos)
#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vehicle_type: Option<String>,
    pub seats: Option<i16>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub daily_rate: Option<Decimal>,
    pub security_deposit: Option<Decimal>,
    pub is_available: bool,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

impl VehicleRow {
    pub fn into_vehicle(self, documents: Vec<VehicleDocument>) -> Vehicle {
        let specifications = (self.seats.is_some()
            || self.transmission.is_some()
            || self.fuel_type.is_some())
        .then(|| VehicleSpecifications {
            seats: self.seats,
            transmission: self.transmission,
            fuel_type: self.fuel_type,
        });

        let pricing = self.daily_rate.map(|daily_rate| VehiclePricing {
            daily_rate,
            security_deposit: self.security_deposit,
        });

        Vehicle {
            id: self.id,
            owner_id: self.owner_id,
            make: self.make,
            model: self.model,
            year: self.year,
            license_plate: self.license_plate,
            vehicle_type: self.vehicle_type,
            specifications,
            pricing,
            documents,
            is_available: self.is_available,
            status: self.status,
            created_at: self.created_at,
        }
    }
}
