//! Shared domain types and configuration for PetFinder.
//!
//! The [`Pet`] record is the only domain entity. It is produced either by
//! converting third-party breed listings or by the built-in fallback
//! catalog in [`catalog`].

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod pet;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, GeoConfig};
pub use catalog::{load_catalog, local_image_for, local_pets, CatalogFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use pet::{filter_pets, Pet, PetId, Species, SpeciesFilter};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid species filter: {0:?}")]
    InvalidSpecies(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
