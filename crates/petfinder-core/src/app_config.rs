use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Geolocation query settings. The coordinates stand in for the device
/// position; when absent, geolocation is reported as unsupported.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub high_accuracy: bool,
    pub timeout_secs: u64,
    pub max_age_secs: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub public_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub dog_api_base: String,
    pub cat_api_base: String,
    pub dog_image_cdn: String,
    pub cat_image_cdn: String,
    pub api_key: Option<String>,
    pub per_species_limit: usize,
    pub image_search_enabled: bool,
    pub image_search_limit: u32,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub http_max_retries: u32,
    pub http_retry_backoff_secs: u64,
    pub geo: GeoConfig,
    pub cache_name: String,
    pub offline_strict_install: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("public_dir", &self.public_dir)
            .field("catalog_path", &self.catalog_path)
            .field("dog_api_base", &self.dog_api_base)
            .field("cat_api_base", &self.cat_api_base)
            .field("dog_image_cdn", &self.dog_image_cdn)
            .field("cat_image_cdn", &self.cat_image_cdn)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("per_species_limit", &self.per_species_limit)
            .field("image_search_enabled", &self.image_search_enabled)
            .field("image_search_limit", &self.image_search_limit)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("http_max_retries", &self.http_max_retries)
            .field("http_retry_backoff_secs", &self.http_retry_backoff_secs)
            .field("geo", &self.geo)
            .field("cache_name", &self.cache_name)
            .field("offline_strict_install", &self.offline_strict_install)
            .finish()
    }
}
