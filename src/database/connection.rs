//! Conexión a PostgreSQL
//! 
//! Este módulo abre el pool de conexiones y aplica las migraciones
//! embebidas desde `migrations/`.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Conexión a la base de datos con su pool
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abrir el pool con la configuración dada
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️ Conectando a {}", config.masked_url());

        let pool = config
            .create_pool()
            .await
            .with_context(|| format!("Error conectando a {}", config.masked_url()))?;

        Ok(Self { pool })
    }

    /// Abrir el pool leyendo la configuración del entorno
    pub async fn new_default() -> Result<Self> {
        let config = DatabaseConfig::from_env()?;
        Self::connect(&config).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Error ejecutando migraciones")?;
        info!("✅ Migraciones aplicadas");
        Ok(())
    }

    /// Verificar que la conexión funciona
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
