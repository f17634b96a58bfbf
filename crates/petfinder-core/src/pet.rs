use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the species dropdown. The empty option and `"all"` both mean
/// "no filtering".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeciesFilter {
    #[default]
    All,
    Only(Species),
}

impl SpeciesFilter {
    /// Parses an optional query/select value, treating a missing value the
    /// same as the empty option.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSpecies`] for anything other than
    /// `""`, `"all"`, `"dog"` or `"cat"`.
    pub fn from_param(value: Option<&str>) -> Result<Self, CoreError> {
        value.map_or(Ok(Self::All), str::parse)
    }

    #[must_use]
    pub fn matches(self, species: Species) -> bool {
        match self {
            SpeciesFilter::All => true,
            SpeciesFilter::Only(wanted) => wanted == species,
        }
    }

    /// Value written back into the `<select>` so the current choice stays selected.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            SpeciesFilter::All => "",
            SpeciesFilter::Only(species) => species.as_str(),
        }
    }
}

impl FromStr for SpeciesFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(SpeciesFilter::All),
            "dog" => Ok(SpeciesFilter::Only(Species::Dog)),
            "cat" => Ok(SpeciesFilter::Only(Species::Cat)),
            other => Err(CoreError::InvalidSpecies(other.to_owned())),
        }
    }
}

/// Pet identifier: the dog API uses numeric breed ids, the cat API short
/// string codes (`"abys"`), and locally generated ids are numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PetId {
    Number(i64),
    Text(String),
}

impl PetId {
    /// Key used to look up image-search results for this pet.
    #[must_use]
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetId::Number(n) => write!(f, "{n}"),
            PetId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PetId {
    fn from(value: i64) -> Self {
        PetId::Number(value)
    }
}

impl From<&str> for PetId {
    fn from(value: &str) -> Self {
        PetId::Text(value.to_owned())
    }
}

/// A displayable adoptable pet.
///
/// Random display fields (`age`, `location`, `distance`) are assigned once
/// when the record is built and never re-rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    #[serde(rename = "type")]
    pub species: Species,
    pub breed: String,
    pub age: String,
    pub location: String,
    pub distance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image_id: Option<String>,
    #[serde(default)]
    pub is_from_api: bool,
}

impl Pet {
    /// First two comma-separated temperament traits, re-joined with `", "`.
    #[must_use]
    pub fn temperament_summary(&self) -> Option<String> {
        let raw = self.temperament.as_deref()?;
        let traits: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .take(2)
            .collect();
        if traits.is_empty() {
            None
        } else {
            Some(traits.join(", "))
        }
    }

    #[must_use]
    pub fn has_display_fields(&self) -> bool {
        [
            &self.name,
            &self.breed,
            &self.age,
            &self.location,
            &self.distance,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Returns the pets matching `filter`, preserving their relative order.
#[must_use]
pub fn filter_pets(pets: &[Pet], filter: SpeciesFilter) -> Vec<Pet> {
    pets.iter()
        .filter(|pet| filter.matches(pet.species))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "pet_test.rs"]
mod tests;
