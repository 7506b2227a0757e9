use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::CoachLayout;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub coach: CoachConfig,
    pub storage: StorageConfig,
}

// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Coach layout
#[derive(Debug, Clone, Deserialize)]
pub struct CoachConfig {
    pub total_seats: u32,
    pub seats_per_row: u32,
}

// Durable record location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub db_file_path: PathBuf,
}

impl CoachConfig {
    pub fn layout(&self) -> CoachLayout {
        CoachLayout::new(self.total_seats, self.seats_per_row)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: AppConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                environment: "development".to_string(),
                rust_log: "train_reservation=debug,tower_http=debug".to_string(),
            },
            coach: CoachConfig {
                total_seats: CoachLayout::DEFAULT_TOTAL_SEATS,
                seats_per_row: CoachLayout::DEFAULT_SEATS_PER_ROW,
            },
            storage: StorageConfig {
                db_file_path: PathBuf::from("./data/db.json"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let config = Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or(defaults.app.host),
                port: parse_var("PORT", "port number", defaults.app.port)?,
                environment: env::var("ENVIRONMENT").unwrap_or(defaults.app.environment),
                rust_log: env::var("RUST_LOG").unwrap_or(defaults.app.rust_log),
            },
            coach: CoachConfig {
                total_seats: parse_var("TOTAL_SEATS", "seat count", defaults.coach.total_seats)?,
                seats_per_row: parse_var(
                    "SEATS_PER_ROW",
                    "seat count",
                    defaults.coach.seats_per_row,
                )?,
            },
            storage: StorageConfig {
                db_file_path: env::var("DB_FILE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.db_file_path),
            },
        };

        if config.coach.total_seats == 0 {
            return Err(ConfigError::Zero("TOTAL_SEATS"));
        }
        if config.coach.seats_per_row == 0 {
            return Err(ConfigError::Zero("SEATS_PER_ROW"));
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
