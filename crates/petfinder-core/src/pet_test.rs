use super::*;
use crate::catalog::local_pets;

fn api_pet(id: i64, name: &str, species: Species) -> Pet {
    Pet {
        id: PetId::Number(id),
        name: name.to_owned(),
        species,
        breed: name.to_owned(),
        age: "2 years".to_owned(),
        location: "Pina, Recife".to_owned(),
        distance: "1.2 km".to_owned(),
        temperament: None,
        reference_image_id: None,
        is_from_api: true,
    }
}

#[test]
fn filter_parses_empty_and_all_as_unfiltered() {
    assert_eq!("".parse::<SpeciesFilter>().unwrap(), SpeciesFilter::All);
    assert_eq!("all".parse::<SpeciesFilter>().unwrap(), SpeciesFilter::All);
    assert_eq!(
        SpeciesFilter::from_param(None).unwrap(),
        SpeciesFilter::All
    );
}

#[test]
fn filter_parses_species_values() {
    assert_eq!(
        "dog".parse::<SpeciesFilter>().unwrap(),
        SpeciesFilter::Only(Species::Dog)
    );
    assert_eq!(
        SpeciesFilter::from_param(Some("cat")).unwrap(),
        SpeciesFilter::Only(Species::Cat)
    );
}

#[test]
fn filter_rejects_unknown_species() {
    let err = "hamster".parse::<SpeciesFilter>().unwrap_err();
    assert!(matches!(err, CoreError::InvalidSpecies(ref v) if v == "hamster"));
}

#[test]
fn filter_pets_keeps_only_matching_species_in_order() {
    let pets = vec![
        api_pet(1, "Poodle", Species::Dog),
        api_pet(2, "Abyssinian", Species::Cat),
        api_pet(3, "Pug", Species::Dog),
        api_pet(4, "Bengal", Species::Cat),
    ];

    let dogs = filter_pets(&pets, SpeciesFilter::Only(Species::Dog));
    let names: Vec<&str> = dogs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Poodle", "Pug"]);

    let cats = filter_pets(&pets, SpeciesFilter::Only(Species::Cat));
    assert!(cats.iter().all(|p| p.species == Species::Cat));
    assert_eq!(cats.len(), 2);
}

#[test]
fn filter_all_returns_list_unchanged() {
    let pets = local_pets();
    assert_eq!(filter_pets(&pets, SpeciesFilter::All), pets);
}

#[test]
fn temperament_summary_takes_first_two_traits() {
    let mut pet = api_pet(1, "Akita", Species::Dog);
    pet.temperament = Some("Docile, Alert, Responsive, Dignified".to_owned());
    assert_eq!(pet.temperament_summary().as_deref(), Some("Docile, Alert"));
}

#[test]
fn temperament_summary_absent_or_blank() {
    let mut pet = api_pet(1, "Akita", Species::Dog);
    assert_eq!(pet.temperament_summary(), None);
    pet.temperament = Some(" , ".to_owned());
    assert_eq!(pet.temperament_summary(), None);
}

#[test]
fn pet_id_displays_both_shapes() {
    assert_eq!(PetId::Number(7).to_string(), "7");
    assert_eq!(PetId::from("abys").to_string(), "abys");
}

#[test]
fn pet_serializes_species_as_type() {
    let json = serde_json::to_value(api_pet(5, "Pug", Species::Dog)).expect("serialize");
    assert_eq!(json["type"], "dog");
    assert_eq!(json["id"], 5);
    assert_eq!(json["is_from_api"], true);
    assert!(json.get("temperament").is_none());
}

#[test]
fn has_display_fields_detects_blank_field() {
    let mut pet = api_pet(1, "Pug", Species::Dog);
    assert!(pet.has_display_fields());
    pet.location = "  ".to_owned();
    assert!(!pet.has_display_fields());
}
