use crate::error::Result;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Default base URL of the Harvest API. Must keep its trailing slash.
pub const DEFAULT_BASE_URL: &str = "https://api.harvestapp.com/";

/// API version prefix joined between the base URL and each request path
pub const DEFAULT_API_VERSION: &str = "v2/";

/// User agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = concat!("harvest-rs/", env!("CARGO_PKG_VERSION"));

/// Create the HTTP client used for API requests
/// with pooling and timeouts taken from the configuration
pub fn create_http_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()?;
    Ok(client)
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for API requests. Should always end with a slash.
    pub base_url: Url,
    /// Version prefix, joined onto the base URL
    pub api_version: String,
    /// User agent header; not sent when empty
    pub user_agent: String,
    /// Total request timeout of the default transport
    pub timeout: Duration,
    /// Connect timeout of the default transport
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Create a configuration pointing at another base URL, e.g. a test server
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Config {
            base_url: Url::parse(base_url)?,
            ..Config::default()
        })
    }

    /// Set the API version prefix
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the user agent; an empty string disables the header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
