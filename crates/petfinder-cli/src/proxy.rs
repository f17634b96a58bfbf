//! Offline-capable reverse proxy: every request to the bound address goes
//! through the offline cache worker in front of `origin`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{uri::PathAndQuery, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use petfinder_breeds::BreedSources;
use petfinder_core::AppConfig;
use petfinder_offline::{
    CachedResponse, Destination, FetchPolicy, FetchRequest, HttpFetcher, MemoryCacheStorage,
    OfflineWorker, Precache,
};
use reqwest::Url;

pub(crate) const CACHE_STATUS_HEADER: &str = "x-petfinder-cache";

/// Page-server routes that relay live breed API data. Never cached.
pub(crate) const LIVE_PATHS: [&str; 2] = ["api/", "pets"];

/// Largest request body forwarded to the origin.
const MAX_REQUEST_BODY: usize = 10 * 1024 * 1024;

pub(crate) type ProxyWorker = OfflineWorker<MemoryCacheStorage, HttpFetcher>;

#[derive(Debug, Clone)]
pub(crate) struct ProxyOptions {
    pub origin: String,
    pub bind: SocketAddr,
    pub cache_name: String,
    pub strict: bool,
}

/// Installs and activates the worker, then serves until interrupted.
///
/// # Errors
///
/// Returns an error for an invalid origin URL, a strict-mode install
/// failure, or if the listener cannot be bound.
pub(crate) async fn run_proxy(config: &AppConfig, options: ProxyOptions) -> anyhow::Result<()> {
    let origin = parse_origin(&options.origin)?;
    let excluded_hosts = BreedSources::from_config(config).hosts();
    tracing::info!(
        origin = %origin,
        cache = %options.cache_name,
        excluded = ?excluded_hosts,
        live = ?LIVE_PATHS,
        "starting offline proxy"
    );

    let worker = OfflineWorker::new(
        MemoryCacheStorage::new(),
        HttpFetcher::new(config.http_timeout_secs, &config.user_agent)?,
        Precache::new(options.cache_name),
        FetchPolicy::new(origin, excluded_hosts).with_live_paths(LIVE_PATHS),
    )
    .with_strict_install(options.strict);

    let installed = worker.install().await?;
    if let Some(error) = &installed.error {
        tracing::warn!(error = %error, "running without precached assets");
    }
    let activated = worker.activate().await?;
    tracing::info!(
        cached = installed.cached,
        deleted = activated.deleted.len(),
        "offline worker controlling"
    );

    let app = build_proxy_app(Arc::new(worker));
    let listener = tokio::net::TcpListener::bind(options.bind).await?;
    tracing::info!(bind = %options.bind, "proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}

/// Origins are treated as directory scopes, so a missing trailing slash is added.
pub(crate) fn parse_origin(raw: &str) -> anyhow::Result<Url> {
    let mut origin = Url::parse(raw)?;
    if !origin.path().ends_with('/') {
        let path = format!("{}/", origin.path());
        origin.set_path(&path);
    }
    Ok(origin)
}

pub(crate) fn build_proxy_app(worker: Arc<ProxyWorker>) -> Router {
    Router::new().fallback(proxy_request).with_state(worker)
}

async fn proxy_request(State(worker): State<Arc<ProxyWorker>>, req: Request) -> Response {
    let (parts, body) = req.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", PathAndQuery::as_str);
    let scope = worker.scope();
    let url = match scope.join(path_and_query.trim_start_matches('/')) {
        Ok(url) if url.origin() == scope.origin() => url,
        Ok(url) => {
            return (StatusCode::BAD_REQUEST, format!("refusing to proxy {url}")).into_response()
        }
        Err(e) => {
            return (StatusCode::BAD_REQUEST, format!("invalid request path: {e}")).into_response()
        }
    };

    let body = match to_bytes(body, MAX_REQUEST_BODY).await {
        Ok(body) => body,
        Err(e) => {
            return (StatusCode::PAYLOAD_TOO_LARGE, format!("request body rejected: {e}"))
                .into_response()
        }
    };

    let destination = Destination::from_headers(&parts.headers);
    let request = FetchRequest::new(parts.method, url, destination)
        .with_headers(parts.headers)
        .with_body(body);

    match worker.handle_fetch(&request).await {
        Ok(outcome) => {
            let mut response = into_response(outcome.response);
            response.headers_mut().insert(
                CACHE_STATUS_HEADER,
                HeaderValue::from_static(outcome.served_from.as_str()),
            );
            response
        }
        Err(e) => {
            tracing::warn!(url = %request.url, error = %e, "request failed");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

fn into_response(cached: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = cached.status;
    *response.headers_mut() = cached.headers;
    response
}
