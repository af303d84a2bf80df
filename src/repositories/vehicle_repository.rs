use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::VehicleStore;
use crate::models::vehicle::{Vehicle, VehicleDocument, VehicleRow};
use crate::utils::errors::{not_found_error, AppResult};

const VEHICLE_COLUMNS: &str = r#"
    id, owner_id, make, model, year, license_plate, vehicle_type,
    seats, transmission, fuel_type, daily_rate, security_deposit,
    is_available, status, created_at
"#;

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn documents_for(&self, vehicle_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<VehicleDocument>>> {
        let documents = sqlx::query_as::<_, VehicleDocument>(
            r#"
            SELECT id, vehicle_id, document_type, url, uploaded_at
            FROM vehicle_documents
            WHERE vehicle_id = ANY($1)
            ORDER BY uploaded_at DESC NULLS LAST
            "#,
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_vehicle: HashMap<Uuid, Vec<VehicleDocument>> = HashMap::new();
        for document in documents {
            by_vehicle.entry(document.vehicle_id).or_default().push(document);
        }
        Ok(by_vehicle)
    }

    async fn with_documents(&self, rows: Vec<VehicleRow>) -> AppResult<Vec<Vehicle>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut documents = self.documents_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let docs = documents.remove(&row.id).unwrap_or_default();
                row.into_vehicle(docs)
            })
            .collect())
    }
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles ORDER BY created_at DESC", VEHICLE_COLUMNS);
        let rows = sqlx::query_as::<_, VehicleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        self.with_documents(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles WHERE id = $1", VEHICLE_COLUMNS);
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_documents(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn set_availability(&self, id: Uuid, is_available: bool) -> AppResult<Vehicle> {
        let sql = format!(
            "UPDATE vehicles SET is_available = $2 WHERE id = $1 RETURNING {}",
            VEHICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .bind(is_available)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        self.with_documents(vec![row])
            .await?
            .pop()
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }
}
