use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use clap::Parser;
use petfinder_breeds::PetSource;
use petfinder_core::{local_pets, PetId};
use petfinder_offline::{FetchPolicy, HttpFetcher, MemoryCacheStorage, OfflineWorker, Precache};
use petfinder_server::{PetCard, PetListing};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::proxy::{build_proxy_app, parse_origin, CACHE_STATUS_HEADER, LIVE_PATHS};

#[test]
fn parses_pets_command_with_type() {
    let cli = Cli::try_parse_from(["petfinder-cli", "pets", "--type", "cat"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Pets { species: Some(ref s) } if s == "cat"
    ));
}

#[test]
fn parses_pets_command_without_type() {
    let cli = Cli::try_parse_from(["petfinder-cli", "pets"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Pets { species: None }));
}

#[test]
fn parses_proxy_command_defaults() {
    let cli = Cli::try_parse_from([
        "petfinder-cli",
        "proxy",
        "--origin",
        "http://127.0.0.1:3000/",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Commands::Proxy {
            origin,
            bind,
            cache_name,
            strict,
        } => {
            assert_eq!(origin, "http://127.0.0.1:3000/");
            assert_eq!(bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
            assert!(cache_name.is_none());
            assert!(!strict);
        }
        Commands::Pets { .. } => panic!("expected proxy command"),
    }
}

#[test]
fn proxy_requires_origin() {
    assert!(Cli::try_parse_from(["petfinder-cli", "proxy"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["petfinder-cli"]).is_err());
}

#[test]
fn origin_gets_trailing_slash() {
    assert_eq!(
        parse_origin("https://example.github.io/petfinder")
            .unwrap()
            .as_str(),
        "https://example.github.io/petfinder/"
    );
    assert!(parse_origin("not a url").is_err());
}

#[test]
fn table_lists_every_pet_with_header() {
    let listing = PetListing {
        source: PetSource::LocalFallback,
        filter: "",
        notice: None,
        pets: local_pets()
            .into_iter()
            .map(|pet| PetCard {
                image: "images/x.jpg".to_owned(),
                fallback_image: "images/x.jpg".to_owned(),
                pet,
            })
            .collect(),
    };
    let lines = pets::format_table(&listing);
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("SOURCE"));
    assert!(lines[1].starts_with("local"));
    assert!(lines[1].contains("Rick"));
    assert!(lines[3].contains("French Bulldog"));
    assert_eq!(listing.pets[0].pet.id, PetId::Number(1));
}

#[test]
fn empty_table_prints_message() {
    let listing = PetListing {
        source: PetSource::Api,
        filter: "dog",
        notice: None,
        pets: Vec::new(),
    };
    assert_eq!(
        pets::format_table(&listing),
        vec!["No pets found in your area."]
    );
}

async fn origin_with_assets() -> MockServer {
    let server = MockServer::start().await;
    for (asset, body) in [("/", "<html>home</html>"), ("/app.js", "console.log('hi')")] {
        Mock::given(method("GET"))
            .and(path(asset))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/v1/pets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\":[]}"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"stored\":false}"))
        .mount(&server)
        .await;
    server
}

async fn controlling_proxy(server: &MockServer) -> axum::Router {
    let origin = parse_origin(&server.uri()).unwrap();
    let worker = OfflineWorker::new(
        MemoryCacheStorage::new(),
        HttpFetcher::new(5, "petfinder-test/0.1").unwrap(),
        Precache::new("petfinder-v3").with_assets(["./", "./app.js"]),
        FetchPolicy::new(origin, vec!["api.thedogapi.com".to_owned()]).with_live_paths(LIVE_PATHS),
    );
    worker.install().await.unwrap();
    worker.activate().await.unwrap();
    build_proxy_app(Arc::new(worker))
}

#[tokio::test]
async fn proxy_serves_precached_asset_from_cache() {
    let server = origin_with_assets().await;
    let app = controlling_proxy(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CACHE_STATUS_HEADER], "cache");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"console.log('hi')");
}

#[tokio::test]
async fn proxy_passes_post_through_to_origin() {
    let server = origin_with_assets().await;
    let app = controlling_proxy(&server).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/photos")
                .body(Body::from("jpeg bytes"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CACHE_STATUS_HEADER], "network");
}

#[tokio::test]
async fn proxy_forwards_missing_asset_status() {
    let server = origin_with_assets().await;
    let app = controlling_proxy(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/nope.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[CACHE_STATUS_HEADER], "network");
}

#[tokio::test]
async fn proxy_never_serves_pet_listing_from_cache() {
    let server = origin_with_assets().await;
    let app = controlling_proxy(&server).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/pets?type=dog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "network");
    }
}
