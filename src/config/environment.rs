//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Tope absoluto del tamaño de página de los listados
pub const MAX_PAGE_SIZE_LIMIT: u32 = 100;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub run_migrations: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "development-secret".to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            default_page_size: 10,
            max_page_size: 100,
            run_migrations: false,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno. JWT_SECRET es obligatorio.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: parse_var("MAX_PAGE_SIZE", defaults.max_page_size)?,
            run_migrations: parse_var("RUN_MIGRATIONS", defaults.run_migrations)?,
        };

        config.check_page_sizes()?;
        Ok(config)
    }

    /// Límites de página: MAX_PAGE_SIZE en 1..=100 y DEFAULT_PAGE_SIZE en 1..=MAX_PAGE_SIZE
    pub fn check_page_sizes(&self) -> Result<()> {
        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE_LIMIT {
            bail!(
                "MAX_PAGE_SIZE must be between 1 and {}, got {}",
                MAX_PAGE_SIZE_LIMIT,
                self.max_page_size
            );
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            bail!(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE ({}), got {}",
                self.max_page_size,
                self.default_page_size
            );
        }
        Ok(())
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert!(config.default_page_size <= config.max_page_size);
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(EnvironmentConfig::default().check_page_sizes().is_ok());

        let zero_max = EnvironmentConfig {
            max_page_size: 0,
            ..Default::default()
        };
        assert!(zero_max.check_page_sizes().is_err());

        let above_cap = EnvironmentConfig {
            max_page_size: 500,
            ..Default::default()
        };
        assert!(above_cap.check_page_sizes().is_err());

        let default_above_max = EnvironmentConfig {
            default_page_size: 50,
            max_page_size: 20,
            ..Default::default()
        };
        assert!(default_above_max.check_page_sizes().is_err());

        let zero_default = EnvironmentConfig {
            default_page_size: 0,
            ..Default::default()
        };
        assert!(zero_default.check_page_sizes().is_err());
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let value: u32 = parse_var("RENTAL_MARKETPLACE_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
