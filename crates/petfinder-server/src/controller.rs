//! The page controller: one load cycle per page view, plus the session
//! state the species filter reads between loads.

use petfinder_breeds::{
    acquire_pets, fallback_image, resolve_image, AcquireOptions, BreedClient, BreedSources,
    BreedsError, ImageCdn, ImageSearchCache, PetSource,
};
use petfinder_core::{filter_pets, load_catalog, local_pets, AppConfig, ConfigError, Pet, SpeciesFilter};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::locate::{DeviceGeolocator, GeoError, GeoOptions, Geolocator, UNSUPPORTED_NOTICE};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Breeds(#[from] BreedsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Session state written by the load cycle.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// API-derived list from the last load; empty when it fell back.
    pub api_pets: Vec<Pet>,
    /// `None` until the first load completes.
    pub source: Option<PetSource>,
    pub image_cache: ImageSearchCache,
    pub notice: Option<String>,
}

impl PageState {
    /// The list the filter operates on: the API list if present, else `local`.
    #[must_use]
    pub fn active_list<'a>(&'a self, local: &'a [Pet]) -> &'a [Pet] {
        if self.api_pets.is_empty() {
            local
        } else {
            &self.api_pets
        }
    }
}

/// A pet plus the image URLs its card shows.
#[derive(Debug, Clone, Serialize)]
pub struct PetCard {
    #[serde(flatten)]
    pub pet: Pet,
    pub image: String,
    pub fallback_image: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PetListing {
    pub source: PetSource,
    pub filter: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub pets: Vec<PetCard>,
}

pub struct PageController<G = DeviceGeolocator> {
    client: BreedClient,
    sources: BreedSources,
    options: AcquireOptions,
    cdn: ImageCdn,
    local: Vec<Pet>,
    geolocator: G,
    geo_options: GeoOptions,
    state: RwLock<PageState>,
}

impl PageController<DeviceGeolocator> {
    /// Builds the controller from configuration, loading the local catalog
    /// from `catalog_path` when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the catalog
    /// file cannot be read or fails validation.
    pub fn from_config(config: &AppConfig) -> Result<Self, ControllerError> {
        let local = match &config.catalog_path {
            Some(path) => load_catalog(path)?.pets,
            None => local_pets(),
        };
        Ok(Self::new(
            BreedClient::from_config(config)?,
            BreedSources::from_config(config),
            AcquireOptions::from_config(config),
            ImageCdn::from_config(config),
            local,
            DeviceGeolocator::from_config(&config.geo),
        )
        .with_geo_options(GeoOptions::from_config(&config.geo)))
    }
}

impl<G: Geolocator> PageController<G> {
    #[must_use]
    pub fn new(
        client: BreedClient,
        sources: BreedSources,
        options: AcquireOptions,
        cdn: ImageCdn,
        local: Vec<Pet>,
        geolocator: G,
    ) -> Self {
        Self {
            client,
            sources,
            options,
            cdn,
            local,
            geolocator,
            geo_options: GeoOptions::default(),
            state: RwLock::new(PageState::default()),
        }
    }

    #[must_use]
    pub fn with_geo_options(mut self, options: GeoOptions) -> Self {
        self.geo_options = options;
        self
    }

    #[must_use]
    pub fn sources(&self) -> &BreedSources {
        &self.sources
    }

    /// Runs a full load cycle: geolocation, then acquisition, then the
    /// session state update. Never fails; every stage recovers locally.
    pub async fn load(&self) -> PetSource {
        let notice = self.locate().await;

        let acquisition =
            acquire_pets(&self.client, &self.sources, &self.options, &self.local).await;

        let mut state = self.state.write().await;
        state.api_pets = match acquisition.source {
            PetSource::Api => acquisition.pets,
            PetSource::LocalFallback => Vec::new(),
        };
        state.source = Some(acquisition.source);
        state.image_cache = acquisition.image_cache;
        state.notice = notice;
        acquisition.source
    }

    async fn locate(&self) -> Option<String> {
        match self.geolocator.current_position(&self.geo_options).await {
            Ok(position) => {
                tracing::info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    "location obtained"
                );
                None
            }
            Err(GeoError::Unsupported) => {
                tracing::warn!("geolocation unsupported");
                Some(UNSUPPORTED_NOTICE.to_owned())
            }
            Err(e) => {
                tracing::info!(error = %e, "using default location");
                None
            }
        }
    }

    /// The filtered active list with resolved images. Runs a load cycle
    /// first if none has completed yet.
    pub async fn listing(&self, filter: SpeciesFilter) -> PetListing {
        let loaded = self.state.read().await.source.is_some();
        if !loaded {
            self.load().await;
        }

        let state = self.state.read().await;
        let pets = filter_pets(state.active_list(&self.local), filter)
            .into_iter()
            .map(|pet| PetCard {
                image: resolve_image(&pet, &state.image_cache, &self.cdn),
                fallback_image: fallback_image(&pet),
                pet,
            })
            .collect();

        PetListing {
            source: state.source.unwrap_or(PetSource::LocalFallback),
            filter: filter.as_param(),
            notice: state.notice.clone(),
            pets,
        }
    }

    pub async fn state(&self) -> PageState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
