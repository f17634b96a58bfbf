//! Response types for the dog and cat breed APIs.
//!
//! Both services share one schema. Only `name` is guaranteed; everything
//! else is optional and varies by species:
//!
//! - `id` is an integer for dogs (`1`) and a short code for cats (`"abys"`).
//! - `reference_image_id` names an image on the species CDN
//!   (`https://cdn2.thedogapi.com/images/{id}.jpg`).
//! - `temperament` is a single comma-separated string
//!   (`"Docile, Alert, Responsive"`), not an array.

use serde::Deserialize;

use petfinder_core::PetId;

/// Breed identifier in either of the shapes the two APIs use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BreedId {
    Number(i64),
    Text(String),
}

impl From<BreedId> for PetId {
    fn from(id: BreedId) -> Self {
        match id {
            BreedId::Number(n) => PetId::Number(n),
            BreedId::Text(s) => PetId::Text(s),
        }
    }
}

impl std::fmt::Display for BreedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreedId::Number(n) => write!(f, "{n}"),
            BreedId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of `GET /breeds`.
#[derive(Debug, Clone, Deserialize)]
pub struct Breed {
    #[serde(default)]
    pub id: Option<BreedId>,

    /// Breed display name. Entries with an empty name are skipped during
    /// conversion.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub reference_image_id: Option<String>,

    #[serde(default)]
    pub temperament: Option<String>,
}

/// One entry of `GET /images/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct BreedImage {
    pub id: String,
    pub url: String,

    /// Breeds pictured. Empty for images without breed metadata.
    #[serde(default)]
    pub breeds: Vec<ImageBreed>,
}

/// Breed summary embedded in an image-search result.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageBreed {
    pub id: BreedId,
    #[serde(default)]
    pub name: Option<String>,
}
