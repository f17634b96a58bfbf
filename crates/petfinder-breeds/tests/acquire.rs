//! Integration tests for the breed clients and the acquisition pipeline.
//!
//! Each test stands up `wiremock` servers for the dog and cat APIs so no
//! real network traffic is made.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use petfinder_breeds::{
    acquire_pets, AcquireOptions, BreedApi, BreedClient, BreedSources, BreedsError, PetSource,
};
use petfinder_core::{local_pets, PetId, Species};

fn test_client() -> BreedClient {
    BreedClient::new(5, "petfinder-test/0.1", 0, 0, None).expect("failed to build test client")
}

fn sources(dog_base: &str, cat_base: &str) -> BreedSources {
    BreedSources {
        dogs: BreedApi::new(Species::Dog, dog_base),
        cats: BreedApi::new(Species::Cat, cat_base),
    }
}

/// Base URL of a port nothing listens on, so requests fail at the
/// connection level.
fn unreachable_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

async fn mount_breeds(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_breeds_parses_listing() {
    let server = MockServer::start().await;
    mount_breeds(
        &server,
        json!([
            {"id": 1, "name": "Affenpinscher", "reference_image_id": "BJa4kxc4X"},
            {"id": 2, "name": "Afghan Hound", "temperament": "Aloof, Clownish, Dignified"}
        ]),
    )
    .await;

    let api = BreedApi::new(Species::Dog, server.uri());
    let breeds = test_client().fetch_breeds(&api).await.expect("breeds");
    assert_eq!(breeds.len(), 2);
    assert_eq!(breeds[1].name, "Afghan Hound");
}

#[tokio::test]
async fn fetch_breeds_sends_api_key_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .and(wiremock::matchers::header("x-api-key", "live_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Pug"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = BreedClient::new(5, "petfinder-test/0.1", 0, 0, Some("live_test".to_owned()))
        .expect("client");
    let api = BreedApi::new(Species::Dog, server.uri());
    let breeds = client.fetch_breeds(&api).await.expect("breeds");
    assert_eq!(breeds[0].name, "Pug");
}

#[tokio::test]
async fn fetch_breeds_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = BreedApi::new(Species::Cat, server.uri());
    let err = test_client().fetch_breeds(&api).await.unwrap_err();
    assert!(matches!(err, BreedsError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn fetch_breeds_maps_429_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "17"))
        .mount(&server)
        .await;

    let api = BreedApi::new(Species::Dog, server.uri());
    let err = test_client().fetch_breeds(&api).await.unwrap_err();
    assert!(
        matches!(err, BreedsError::RateLimited { retry_after_secs: 17, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_breeds_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = BreedApi::new(Species::Dog, server.uri());
    let err = test_client().fetch_breeds(&api).await.unwrap_err();
    assert!(
        matches!(err, BreedsError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_breeds_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\":\"nope\"}"))
        .mount(&server)
        .await;

    let api = BreedApi::new(Species::Dog, server.uri());
    let err = test_client().fetch_breeds(&api).await.unwrap_err();
    assert!(matches!(err, BreedsError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn search_images_passes_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("limit", "3"))
        .and(query_param("has_breeds", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "url": "https://img/a1.jpg", "breeds": [{"id": "abys"}]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = BreedApi::new(Species::Cat, server.uri());
    let images = test_client().search_images(&api, 3).await.expect("images");
    assert_eq!(images[0].url, "https://img/a1.jpg");
}

// ---------------------------------------------------------------------------
// Acquisition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn both_sources_up_yields_two_dogs_then_two_cats() {
    let dog_server = MockServer::start().await;
    let cat_server = MockServer::start().await;
    mount_breeds(
        &dog_server,
        json!([{"id": 1, "name": "Akita"}, {"id": 2, "name": "Beagle"}, {"id": 3, "name": "Boxer"}]),
    )
    .await;
    mount_breeds(
        &cat_server,
        json!([{"id": "abys", "name": "Abyssinian"}, {"id": "beng", "name": "Bengal"}, {"id": "bomb", "name": "Bombay"}]),
    )
    .await;

    let result = acquire_pets(
        &test_client(),
        &sources(&dog_server.uri(), &cat_server.uri()),
        &AcquireOptions::default(),
        &local_pets(),
    )
    .await;

    assert_eq!(result.source, PetSource::Api);
    let summary: Vec<(String, Species)> = result
        .pets
        .iter()
        .map(|p| (p.breed.clone(), p.species))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Akita".to_owned(), Species::Dog),
            ("Beagle".to_owned(), Species::Dog),
            ("Abyssinian".to_owned(), Species::Cat),
            ("Bengal".to_owned(), Species::Cat),
        ]
    );
    assert_eq!(result.pets[2].id, PetId::from("abys"));
    assert!(result.pets.iter().all(|p| p.has_display_fields()));
}

#[tokio::test]
async fn cat_api_down_keeps_dog_entries_without_fallback() {
    let dog_server = MockServer::start().await;
    mount_breeds(&dog_server, json!([{"name": "Poodle"}, {"name": "Pug"}])).await;
    let cat_base = unreachable_base();

    let result = acquire_pets(
        &test_client(),
        &sources(&dog_server.uri(), &cat_base),
        &AcquireOptions::default(),
        &local_pets(),
    )
    .await;

    assert_eq!(result.source, PetSource::Api);
    assert_eq!(result.pets.len(), 2);
    assert!(result.pets.iter().all(|p| p.species == Species::Dog));
    let names: Vec<&str> = result.pets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Poodle", "Pug"]);
    assert!(result.pets.iter().all(|p| p.is_from_api));
}

#[tokio::test]
async fn both_sources_down_uses_local_list_unchanged() {
    let dog_base = unreachable_base();
    let cat_base = unreachable_base();

    let result = acquire_pets(
        &test_client(),
        &sources(&dog_base, &cat_base),
        &AcquireOptions::default(),
        &local_pets(),
    )
    .await;

    assert_eq!(result.source, PetSource::LocalFallback);
    assert_eq!(result.pets, local_pets());
}

#[tokio::test]
async fn error_status_and_empty_list_fall_back() {
    let dog_server = MockServer::start().await;
    let cat_server = MockServer::start().await;
    mount_breeds(&dog_server, json!([])).await;
    Mock::given(method("GET"))
        .and(path("/breeds"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&cat_server)
        .await;

    let result = acquire_pets(
        &test_client(),
        &sources(&dog_server.uri(), &cat_server.uri()),
        &AcquireOptions::default(),
        &local_pets(),
    )
    .await;

    assert_eq!(result.source, PetSource::LocalFallback);
    assert_eq!(result.pets.len(), 4);
}

#[tokio::test]
async fn image_search_results_populate_cache() {
    let dog_server = MockServer::start().await;
    let cat_server = MockServer::start().await;
    mount_breeds(&dog_server, json!([{"id": 6, "name": "Akita"}])).await;
    mount_breeds(&cat_server, json!([{"id": "abys", "name": "Abyssinian"}])).await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "d1", "url": "https://dogs/d1.jpg", "breeds": [{"id": 6, "name": "Akita"}]}
        ])))
        .mount(&dog_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&cat_server)
        .await;

    let options = AcquireOptions {
        per_species_limit: 2,
        image_search_limit: Some(10),
    };
    let result = acquire_pets(
        &test_client(),
        &sources(&dog_server.uri(), &cat_server.uri()),
        &options,
        &local_pets(),
    )
    .await;

    assert_eq!(result.source, PetSource::Api);
    assert_eq!(result.pets.len(), 2);
    assert_eq!(
        result.image_cache.get(&PetId::Number(6)),
        Some("https://dogs/d1.jpg")
    );
    assert_eq!(result.image_cache.get(&PetId::from("abys")), None);
}

#[tokio::test]
async fn image_search_disabled_makes_no_search_requests() {
    let dog_server = MockServer::start().await;
    let cat_server = MockServer::start().await;
    mount_breeds(&dog_server, json!([{"name": "Pug"}])).await;
    mount_breeds(&cat_server, json!([{"name": "Bengal"}])).await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&dog_server)
        .await;

    let result = acquire_pets(
        &test_client(),
        &sources(&dog_server.uri(), &cat_server.uri()),
        &AcquireOptions::default(),
        &local_pets(),
    )
    .await;

    assert_eq!(result.pets.len(), 2);
    assert!(result.image_cache.is_empty());
}
