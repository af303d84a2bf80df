//! Modelos de usuarios del marketplace
//!
//! Clientes, conductores, propietarios de vehículos, empresas y admins.
//! Son registros planos con sub-objetos opcionales; el único comportamiento
//! es el filtrado de listados y la agregación del directorio completo.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Driver,
    VehicleOwner,
    BusinessOwner,
    Admin,
}

impl UserRole {
    /// Roles que componen el directorio agregado de usuarios
    pub const DIRECTORY: [UserRole; 4] = [
        UserRole::Client,
        UserRole::Driver,
        UserRole::VehicleOwner,
        UserRole::BusinessOwner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Driver => "driver",
            UserRole::VehicleOwner => "vehicle_owner",
            UserRole::BusinessOwner => "business_owner",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de la cuenta - mapea al ENUM account_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    PendingVerification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Perfil de usuario común a todos los roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
    /// Número de licencia (conductores)
    pub license_number: Option<String>,
    /// Razón social (empresas)
    pub business_name: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Fila de la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub license_number: Option<String>,
    pub business_name: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        let has_address = row.street.is_some()
            || row.city.is_some()
            || row.postal_code.is_some()
            || row.country.is_some();

        let address = has_address.then(|| Address {
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
        });

        Self {
            id: row.id,
            role: row.role,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address,
            license_number: row.license_number,
            business_name: row.business_name,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Filtros para listados de usuarios
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
}

impl UserFilters {
    /// Búsqueda sin distinguir mayúsculas sobre nombre, email y teléfono
    pub fn matches(&self, user: &UserProfile) -> bool {
        if let Some(status) = self.status {
            if user.status != status {
                return false;
            }
        }

        let needle = match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return true,
        };

        let haystacks = [
            Some(user.full_name()),
            Some(user.email.clone()),
            user.phone.clone(),
            user.business_name.clone(),
        ];

        haystacks
            .iter()
            .flatten()
            .any(|h| h.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, users: Vec<UserProfile>) -> Vec<UserProfile> {
        users.into_iter().filter(|u| self.matches(u)).collect()
    }
}

/// Resultado de cargar el directorio completo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryOutcome {
    Complete,
    Partial,
    Failed,
}

/// Directorio agregado de todos los roles, con los roles que fallaron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectoryAggregate {
    pub users: Vec<UserProfile>,
    pub failed_roles: Vec<UserRole>,
    pub outcome: DirectoryOutcome,
    pub message: Option<String>,
}

impl UserDirectoryAggregate {
    pub const PARTIAL_MESSAGE: &'static str = "Some data could not be loaded";
    pub const FAILED_MESSAGE: &'static str = "Failed to load users";

    /// Agregar los resultados por rol; los que fallan se cuentan y se omiten
    pub fn from_results<E>(results: Vec<(UserRole, Result<Vec<UserProfile>, E>)>) -> Self
    where
        E: fmt::Display,
    {
        let total = results.len();
        let mut users = Vec::new();
        let mut failed_roles = Vec::new();

        for (role, result) in results {
            match result {
                Ok(mut batch) => users.append(&mut batch),
                Err(e) => {
                    tracing::warn!("⚠️ No se pudo cargar el rol {}: {}", role, e);
                    failed_roles.push(role);
                }
            }
        }

        let (outcome, message) = if failed_roles.is_empty() {
            (DirectoryOutcome::Complete, None)
        } else if failed_roles.len() == total {
            (DirectoryOutcome::Failed, Some(Self::FAILED_MESSAGE.to_string()))
        } else {
            (DirectoryOutcome::Partial, Some(Self::PARTIAL_MESSAGE.to_string()))
        };

        Self { users, failed_roles, outcome, message }
    }
}
