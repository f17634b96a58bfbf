//! Conversion from breed listings to [`Pet`] records.
//!
//! The APIs only describe breeds, so the adoption-board fields (age,
//! location, distance) are drawn from fixed sets. They are assigned once
//! here and never re-rolled.

use rand::Rng;

use petfinder_core::{Pet, PetId, Species};

use crate::types::Breed;

/// Display names longer than this are cut; the full name stays in `breed`.
pub const MAX_NAME_CHARS: usize = 10;

/// Offset added to synthesized cat ids so they cannot collide with dog ids
/// generated in the same conversion.
const CAT_ID_OFFSET: i64 = 1000;

const AGES: &[&str] = &["1 year", "2 years", "3 years", "4 years", "5 years"];

const LOCATIONS: &[&str] = &[
    "Boa Viagem, PE",
    "Várzea, Recife",
    "Casa Amarela, Recife",
    "Boa Vista, Recife",
    "Pina, Recife",
];

const DISTANCES: &[&str] = &["0.5 km", "1.2 km", "2.8 km", "3.5 km", "5 km", "7.2 km"];

/// Converts the first `limit` entries of each listing into pets, dogs first.
///
/// Entries without a name are skipped (they still count toward `limit`).
/// Breeds without an id get `now_millis + index`, plus [`CAT_ID_OFFSET`] for
/// cats.
pub fn convert_breeds<R: Rng + ?Sized>(
    dogs: &[Breed],
    cats: &[Breed],
    limit: usize,
    rng: &mut R,
    now_millis: i64,
) -> Vec<Pet> {
    let mut pets = Vec::with_capacity(limit.saturating_mul(2));
    pets.extend(convert_species(dogs, Species::Dog, limit, rng, now_millis));
    pets.extend(convert_species(
        cats,
        Species::Cat,
        limit,
        rng,
        now_millis.saturating_add(CAT_ID_OFFSET),
    ));

    tracing::debug!(count = pets.len(), "converted breed listings to pets");
    pets
}

fn convert_species<R: Rng + ?Sized>(
    breeds: &[Breed],
    species: Species,
    limit: usize,
    rng: &mut R,
    id_base: i64,
) -> Vec<Pet> {
    breeds
        .iter()
        .take(limit)
        .zip(0_i64..)
        .filter(|(breed, _)| !breed.name.trim().is_empty())
        .map(|(breed, idx)| Pet {
            id: breed
                .id
                .clone()
                .map_or_else(|| PetId::Number(id_base.saturating_add(idx)), PetId::from),
            name: truncate_name(&breed.name),
            species,
            breed: breed.name.clone(),
            age: pick(rng, AGES),
            location: pick(rng, LOCATIONS),
            distance: pick(rng, DISTANCES),
            temperament: breed.temperament.clone().filter(|t| !t.trim().is_empty()),
            reference_image_id: breed
                .reference_image_id
                .clone()
                .filter(|r| !r.trim().is_empty()),
            is_from_api: true,
        })
        .collect()
}

/// Cuts `name` to [`MAX_NAME_CHARS`] characters (not bytes).
#[must_use]
pub fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_CHARS).collect()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&str]) -> String {
    options[rng.random_range(0..options.len())].to_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
