use petfinder_breeds::PetSource;
use petfinder_core::{AppConfig, SpeciesFilter};
use petfinder_server::{PageController, PetListing};

/// Runs one load cycle without the server and prints the active list.
///
/// # Errors
///
/// Returns an error for an unknown species filter or if the controller
/// cannot be built from configuration.
pub(crate) async fn run_pets(config: &AppConfig, species: Option<&str>) -> anyhow::Result<()> {
    let filter = SpeciesFilter::from_param(species)?;
    let controller = PageController::from_config(config)?;
    controller.load().await;
    let listing = controller.listing(filter).await;

    if let Some(notice) = &listing.notice {
        eprintln!("{notice}");
    }
    for line in format_table(&listing) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn format_table(listing: &PetListing) -> Vec<String> {
    let source = match listing.source {
        PetSource::Api => "api",
        PetSource::LocalFallback => "local",
    };

    if listing.pets.is_empty() {
        return vec!["No pets found in your area.".to_owned()];
    }

    let mut lines = vec![format!(
        "{:<7}{:<8}{:<12}{:<9}{:<26}{:<10}{:<22}{:<10}IMAGE",
        "SOURCE", "ID", "NAME", "SPECIES", "BREED", "AGE", "LOCATION", "DISTANCE"
    )];
    for card in &listing.pets {
        let pet = &card.pet;
        lines.push(format!(
            "{:<7}{:<8}{:<12}{:<9}{:<26}{:<10}{:<22}{:<10}{}",
            source,
            pet.id.to_string(),
            pet.name,
            pet.species.as_str(),
            truncate(&pet.breed, 24),
            pet.age,
            pet.location,
            pet.distance,
            card.image,
        ));
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_owned()
    }
}
