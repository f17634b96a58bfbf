//! Device position lookup for the load cycle.
//!
//! The position is only logged; nothing downstream uses the coordinates.
//! A lookup failure never blocks loading pets.

use std::future::Future;
use std::time::Duration;

use petfinder_core::GeoConfig;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Inline notice rendered when no position source exists.
pub const UNSUPPORTED_NOTICE: &str = "Geolocation is not supported by this browser";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoOptions {
    /// Without high accuracy, reported coordinates are coarsened to two
    /// decimal places (roughly 1 km).
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached position that may be returned instead of a fresh one.
    pub max_age: Duration,
}

impl GeoOptions {
    #[must_use]
    pub fn from_config(config: &GeoConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            max_age: Duration::from_secs(config.max_age_secs),
        }
    }
}

impl Default for GeoOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("position lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

pub trait Geolocator: Send + Sync {
    fn current_position(
        &self,
        options: &GeoOptions,
    ) -> impl Future<Output = Result<Position, GeoError>> + Send;
}

/// Reports a configured position, optionally after a delay. Coordinates
/// outside the valid latitude/longitude ranges are reported unavailable.
#[derive(Debug, Clone)]
pub struct FixedGeolocator {
    latitude: f64,
    longitude: f64,
    delay: Duration,
}

impl FixedGeolocator {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Geolocator for FixedGeolocator {
    async fn current_position(&self, options: &GeoOptions) -> Result<Position, GeoError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::Unavailable(format!(
                "invalid coordinates ({}, {})",
                self.latitude, self.longitude
            )));
        }
        let (latitude, longitude) = if options.high_accuracy {
            (self.latitude, self.longitude)
        } else {
            (coarsen(self.latitude), coarsen(self.longitude))
        };
        Ok(Position {
            latitude,
            longitude,
            captured_at: Instant::now(),
        })
    }
}

fn coarsen(degrees: f64) -> f64 {
    (degrees * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGeolocator;

impl Geolocator for UnsupportedGeolocator {
    async fn current_position(&self, _options: &GeoOptions) -> Result<Position, GeoError> {
        Err(GeoError::Unsupported)
    }
}

/// Wraps a geolocator with the lookup timeout and a cached last position
/// honoured up to `max_age`.
#[derive(Debug)]
pub struct CachedGeolocator<G> {
    inner: G,
    last: Mutex<Option<Position>>,
}

impl<G: Geolocator> CachedGeolocator<G> {
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }
}

impl<G: Geolocator> Geolocator for CachedGeolocator<G> {
    async fn current_position(&self, options: &GeoOptions) -> Result<Position, GeoError> {
        let mut last = self.last.lock().await;
        if let Some(cached) = *last {
            if cached.captured_at.elapsed() <= options.max_age {
                return Ok(cached);
            }
        }

        let position = tokio::time::timeout(options.timeout, self.inner.current_position(options))
            .await
            .map_err(|_| GeoError::Timeout(options.timeout))??;
        *last = Some(position);
        Ok(position)
    }
}

/// The geolocator selected by configuration: configured coordinates when
/// present, otherwise unsupported.
#[derive(Debug)]
pub enum DeviceGeolocator {
    Fixed(CachedGeolocator<FixedGeolocator>),
    Unsupported(UnsupportedGeolocator),
}

impl DeviceGeolocator {
    #[must_use]
    pub fn from_config(config: &GeoConfig) -> Self {
        match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Self::Fixed(CachedGeolocator::new(
                FixedGeolocator::new(latitude, longitude),
            )),
            _ => Self::Unsupported(UnsupportedGeolocator),
        }
    }
}

impl Geolocator for DeviceGeolocator {
    async fn current_position(&self, options: &GeoOptions) -> Result<Position, GeoError> {
        match self {
            Self::Fixed(geo) => geo.current_position(options).await,
            Self::Unsupported(geo) => geo.current_position(options).await,
        }
    }
}
