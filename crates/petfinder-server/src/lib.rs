//! PetFinder page server: the load cycle, session state, HTML rendering
//! and JSON routes.

pub mod api;
pub mod controller;
pub mod locate;
pub mod middleware;
pub mod render;

pub use api::{build_app, AppState};
pub use controller::{ControllerError, PageController, PageState, PetCard, PetListing};
pub use locate::{
    CachedGeolocator, DeviceGeolocator, FixedGeolocator, GeoError, GeoOptions, Geolocator,
    Position, UnsupportedGeolocator,
};
