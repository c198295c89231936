use crate::static_files::StaticRouteSetting;
use serde::Deserialize;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Server settings that can be loaded from JSON.
///
/// ```
/// use uniweb::ServerConfig;
///
/// let config = ServerConfig::from_json_str(
///     r#"{ "static_routes": [{ "url_root": "/app", "root_dir": "www", "fallback_to_index_html": true }] }"#,
/// )
/// .unwrap();
/// assert_eq!(config.address, "0.0.0.0:8080");
/// assert_eq!(config.static_routes.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` to listen on.
    pub address: String,
    pub static_routes: Vec<StaticRouteSetting>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: DEFAULT_ADDRESS.to_string(), static_routes: vec![] }
    }
}

impl ServerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
