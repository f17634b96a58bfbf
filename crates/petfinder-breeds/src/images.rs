//! Picture selection for pet cards.
//!
//! Precedence: API reference image, then an image-search hit for the pet's
//! breed id, then the bundled image for the pet's name, then a generated
//! placeholder.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use petfinder_core::{local_image_for, AppConfig, Pet, PetId, Species};

use crate::types::BreedImage;

const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/300x200/4ECDC4/white?text=Pet+";

/// Per-species CDN roots used to expand `reference_image_id`.
#[derive(Debug, Clone)]
pub struct ImageCdn {
    pub dogs: String,
    pub cats: String,
}

impl ImageCdn {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            dogs: config.dog_image_cdn.clone(),
            cats: config.cat_image_cdn.clone(),
        }
    }

    #[must_use]
    pub fn image_url(&self, species: Species, reference_image_id: &str) -> String {
        let root = match species {
            Species::Dog => &self.dogs,
            Species::Cat => &self.cats,
        };
        format!("{}/{reference_image_id}.jpg", root.trim_end_matches('/'))
    }
}

/// Image-search results indexed by the breed id they picture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSearchCache {
    by_breed: HashMap<String, String>,
}

impl ImageSearchCache {
    /// Indexes every image under each breed it pictures. The first image
    /// seen for a breed wins.
    pub fn extend_from<'a>(&mut self, images: impl IntoIterator<Item = &'a BreedImage>) {
        for image in images {
            for breed in &image.breeds {
                self.by_breed
                    .entry(breed.id.to_string())
                    .or_insert_with(|| image.url.clone());
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &PetId) -> Option<&str> {
        self.by_breed.get(&id.as_key()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_breed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_breed.is_empty()
    }
}

/// Picks the image URL for a card.
#[must_use]
pub fn resolve_image(pet: &Pet, cache: &ImageSearchCache, cdn: &ImageCdn) -> String {
    if let Some(reference) = pet
        .reference_image_id
        .as_deref()
        .filter(|r| !r.is_empty())
    {
        return cdn.image_url(pet.species, reference);
    }

    if let Some(url) = cache.get(&pet.id) {
        return url.to_owned();
    }

    fallback_image(pet)
}

/// Image shown when the resolved one fails to load: the bundled image for
/// the pet's name, else the placeholder.
#[must_use]
pub fn fallback_image(pet: &Pet) -> String {
    local_image_for(&pet.name).map_or_else(|| placeholder_url(&pet.name), str::to_owned)
}

#[must_use]
pub fn placeholder_url(name: &str) -> String {
    format!(
        "{PLACEHOLDER_BASE}{}",
        utf8_percent_encode(name, NON_ALPHANUMERIC)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BreedId, ImageBreed};

    fn cdn() -> ImageCdn {
        ImageCdn {
            dogs: "https://cdn2.thedogapi.com/images".to_owned(),
            cats: "https://cdn2.thecatapi.com/images/".to_owned(),
        }
    }

    fn pet(id: PetId, name: &str, species: Species, reference: Option<&str>) -> Pet {
        Pet {
            id,
            name: name.to_owned(),
            species,
            breed: name.to_owned(),
            age: "1 year".to_owned(),
            location: "Pina, Recife".to_owned(),
            distance: "0.5 km".to_owned(),
            temperament: None,
            reference_image_id: reference.map(str::to_owned),
            is_from_api: true,
        }
    }

    fn cache_with(breed_id: BreedId, url: &str) -> ImageSearchCache {
        let mut cache = ImageSearchCache::default();
        cache.extend_from(&[BreedImage {
            id: "img".to_owned(),
            url: url.to_owned(),
            breeds: vec![ImageBreed {
                id: breed_id,
                name: None,
            }],
        }]);
        cache
    }

    #[test]
    fn reference_image_wins_over_everything() {
        let cache = cache_with(BreedId::Text("abys".to_owned()), "https://search/abys.jpg");
        let p = pet(PetId::from("abys"), "Lana", Species::Cat, Some("0XYvRd7oD"));
        assert_eq!(
            resolve_image(&p, &cache, &cdn()),
            "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg"
        );
    }

    #[test]
    fn dog_reference_uses_dog_cdn() {
        let p = pet(PetId::Number(1), "Akita", Species::Dog, Some("BFRYBufpm"));
        assert_eq!(
            resolve_image(&p, &ImageSearchCache::default(), &cdn()),
            "https://cdn2.thedogapi.com/images/BFRYBufpm.jpg"
        );
    }

    #[test]
    fn image_search_hit_used_without_reference() {
        let cache = cache_with(BreedId::Number(6), "https://search/akita.jpg");
        let p = pet(PetId::Number(6), "Rick", Species::Dog, None);
        assert_eq!(resolve_image(&p, &cache, &cdn()), "https://search/akita.jpg");
    }

    #[test]
    fn local_name_map_used_without_search_hit() {
        let cache = cache_with(BreedId::Number(99), "https://search/other.jpg");
        let p = pet(PetId::Number(6), "Rick", Species::Dog, None);
        assert_eq!(resolve_image(&p, &cache, &cdn()), "images/rick-golden.jpg");
    }

    #[test]
    fn placeholder_is_last_resort() {
        let p = pet(PetId::Number(6), "Shiba Inu", Species::Dog, None);
        assert_eq!(
            resolve_image(&p, &ImageSearchCache::default(), &cdn()),
            "https://via.placeholder.com/300x200/4ECDC4/white?text=Pet+Shiba%20Inu"
        );
    }

    #[test]
    fn fallback_prefers_local_image() {
        let p = pet(PetId::Number(2), "Lana", Species::Cat, Some("x"));
        assert_eq!(fallback_image(&p), "images/lana-frajola.jpg");
        let q = pet(PetId::Number(3), "Milo", Species::Cat, Some("x"));
        assert_eq!(fallback_image(&q), placeholder_url("Milo"));
    }

    #[test]
    fn first_image_per_breed_wins() {
        let mut cache = cache_with(BreedId::Text("beng".to_owned()), "https://first.jpg");
        cache.extend_from(&[BreedImage {
            id: "second".to_owned(),
            url: "https://second.jpg".to_owned(),
            breeds: vec![ImageBreed {
                id: BreedId::Text("beng".to_owned()),
                name: Some("Bengal".to_owned()),
            }],
        }]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&PetId::from("beng")), Some("https://first.jpg"));
    }
}
