//! Built-in fallback catalog and its optional YAML replacement.
//!
//! The fallback list is shown whenever neither breed API yields usable
//! data, so it must always satisfy [`Pet::has_display_fields`].

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::pet::{Pet, PetId, Species};
use crate::ConfigError;

/// Bundled images keyed by pet name.
const LOCAL_IMAGES: &[(&str, &str)] = &[
    ("Rick", "images/rick-golden.jpg"),
    ("Lana", "images/lana-frajola.jpg"),
    ("Bob", "images/bob-bulldog.jpg"),
    ("Lulu", "images/lulu.jpg"),
];

fn local_pet(
    id: i64,
    name: &str,
    species: Species,
    breed: &str,
    age: &str,
    location: &str,
    distance: &str,
) -> Pet {
    Pet {
        id: PetId::Number(id),
        name: name.to_owned(),
        species,
        breed: breed.to_owned(),
        age: age.to_owned(),
        location: location.to_owned(),
        distance: distance.to_owned(),
        temperament: None,
        reference_image_id: None,
        is_from_api: false,
    }
}

/// The four built-in pets.
#[must_use]
pub fn local_pets() -> Vec<Pet> {
    vec![
        local_pet(
            1,
            "Rick",
            Species::Dog,
            "Golden Retriever",
            "3 years",
            "Boa Viagem, PE",
            "5 km",
        ),
        local_pet(
            2,
            "Lana",
            Species::Cat,
            "Frajola",
            "2 years",
            "Várzea, Recife",
            "0.8 km",
        ),
        local_pet(
            3,
            "Bob",
            Species::Dog,
            "French Bulldog",
            "3 years",
            "Casa Amarela, Recife",
            "10 km",
        ),
        local_pet(
            4,
            "Lulu",
            Species::Cat,
            "Tricolor",
            "2 years",
            "Várzea, Recife",
            "0.8 km",
        ),
    ]
}

/// Bundled image path for a pet name, if one ships with the page.
#[must_use]
pub fn local_image_for(name: &str) -> Option<&'static str> {
    LOCAL_IMAGES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, path)| *path)
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub pets: Vec<Pet>,
}

/// Load and validate a replacement fallback catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    if catalog.pets.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must contain at least one pet".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for pet in &catalog.pets {
        if !pet.has_display_fields() {
            return Err(ConfigError::Validation(format!(
                "pet '{}' is missing a display field (name, breed, age, location, distance)",
                pet.id
            )));
        }

        if !seen_ids.insert(pet.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate pet id: '{}'",
                pet.id
            )));
        }
    }

    Ok(())
}
