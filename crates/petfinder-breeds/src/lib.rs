//! Breed-list and image-search clients for the public dog and cat APIs,
//! plus conversion of their listings into displayable [`petfinder_core::Pet`]
//! records.

pub mod acquire;
pub mod client;
pub mod error;
pub mod images;
pub mod normalize;
pub mod types;

mod rate_limit;

pub use acquire::{acquire_pets, AcquireOptions, Acquisition, PetSource};
pub use client::{BreedApi, BreedClient, BreedSources};
pub use error::BreedsError;
pub use images::{fallback_image, placeholder_url, resolve_image, ImageCdn, ImageSearchCache};
pub use normalize::convert_breeds;
pub use types::{Breed, BreedId, BreedImage, ImageBreed};
