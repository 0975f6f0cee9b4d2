use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

pub const SERVICE_ACCOUNT_SECRET: &str = "FIREBASE_SERVICE_ACCOUNT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("Failed to read secret {name}: {source}")]
    Secret {
        name: &'static str,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub firebase_project_id: String,
    pub storage_bucket: String,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let firebase_project_id =
            var("FIREBASE_PROJECT_ID").ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?;

        let storage_bucket = var("FIREBASE_STORAGE_BUCKET").unwrap_or_else(|| {
            let bucket = format!("{firebase_project_id}.appspot.com");
            info!("FIREBASE_STORAGE_BUCKET not set, using default: {bucket}");
            bucket
        });

        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            environment: try_load("APP_ENV", "development")?,
            firebase_project_id,
            storage_bucket,
            cors_origin: var("CORS_ORIGIN"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .map_err(|_| {
            warn!("Environment variable {key} not found");
        })
        .ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn secret_path(secret_name: &str) -> String {
    format!("{SECRETS_DIR}/{secret_name}")
}

pub fn read_secret(secret_name: &'static str) -> Result<String, ConfigError> {
    read_to_string(secret_path(secret_name))
        .map(|s| s.trim().to_string())
        .map_err(|source| {
            warn!("Failed to read {secret_name} from file: {source}");
            ConfigError::Secret {
                name: secret_name,
                source,
            }
        })
}
