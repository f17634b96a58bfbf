//! Live-or-fallback acquisition of the pet list.
//!
//! Both species are requested concurrently and each request is isolated:
//! a failed or non-2xx response only empties that species' contribution.
//! When nothing usable comes back, the caller's fallback list is used
//! unchanged. Acquisition never fails.

use petfinder_core::{AppConfig, Pet};
use serde::Serialize;

use crate::client::{BreedApi, BreedClient, BreedSources};
use crate::error::BreedsError;
use crate::images::ImageSearchCache;
use crate::normalize::convert_breeds;
use crate::types::{Breed, BreedImage};

#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Entries taken from each species' breed list.
    pub per_species_limit: usize,
    /// `Some(limit)` enables the image-search requests.
    pub image_search_limit: Option<u32>,
}

impl AcquireOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            per_species_limit: config.per_species_limit,
            image_search_limit: config
                .image_search_enabled
                .then_some(config.image_search_limit),
        }
    }
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            per_species_limit: 2,
            image_search_limit: None,
        }
    }
}

/// Where the active list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PetSource {
    Api,
    LocalFallback,
}

#[derive(Debug, Clone)]
pub struct Acquisition {
    pub pets: Vec<Pet>,
    pub source: PetSource,
    pub image_cache: ImageSearchCache,
}

/// Fetches both breed lists (and, when enabled, both image searches)
/// concurrently and converts them into pets.
pub async fn acquire_pets(
    client: &BreedClient,
    sources: &BreedSources,
    options: &AcquireOptions,
    fallback: &[Pet],
) -> Acquisition {
    tracing::info!("fetching pets from breed APIs");

    let (dogs, cats, dog_images, cat_images) = tokio::join!(
        client.fetch_breeds(&sources.dogs),
        client.fetch_breeds(&sources.cats),
        search_images(client, &sources.dogs, options.image_search_limit),
        search_images(client, &sources.cats, options.image_search_limit),
    );

    let dogs = breeds_or_empty(&sources.dogs, dogs);
    let cats = breeds_or_empty(&sources.cats, cats);

    let mut image_cache = ImageSearchCache::default();
    for (api, images) in [(&sources.dogs, dog_images), (&sources.cats, cat_images)] {
        match images {
            Some(Ok(images)) => image_cache.extend_from(&images),
            Some(Err(e)) => {
                tracing::warn!(
                    species = %api.species,
                    error = %e,
                    "image search failed"
                );
            }
            None => {}
        }
    }

    let now_millis = chrono::Utc::now().timestamp_millis();
    let pets = convert_breeds(
        &dogs,
        &cats,
        options.per_species_limit,
        &mut rand::rng(),
        now_millis,
    );

    if pets.is_empty() {
        tracing::info!(
            count = fallback.len(),
            "no usable API data, using local pets"
        );
        return Acquisition {
            pets: fallback.to_vec(),
            source: PetSource::LocalFallback,
            image_cache,
        };
    }

    tracing::info!(count = pets.len(), "pets loaded from breed APIs");
    Acquisition {
        pets,
        source: PetSource::Api,
        image_cache,
    }
}

async fn search_images(
    client: &BreedClient,
    api: &BreedApi,
    limit: Option<u32>,
) -> Option<Result<Vec<BreedImage>, BreedsError>> {
    match limit {
        Some(limit) => Some(client.search_images(api, limit).await),
        None => None,
    }
}

fn breeds_or_empty(api: &BreedApi, result: Result<Vec<Breed>, BreedsError>) -> Vec<Breed> {
    match result {
        Ok(breeds) => {
            tracing::info!(
                species = %api.species,
                count = breeds.len(),
                "breed list loaded"
            );
            breeds
        }
        Err(e) => {
            tracing::warn!(
                species = %api.species,
                error = %e,
                "breed list fetch failed"
            );
            Vec::new()
        }
    }
}
