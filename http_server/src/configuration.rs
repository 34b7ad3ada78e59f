use lazy_static::lazy_static;
use mapserver::MapServerConfig;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Callers must present this value in `X-API-Key`. Unset means open
    /// access, matching local development.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            api_key: None,
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub mapserver: MapServerConfig,
}

lazy_static! {
    pub static ref SETTINGS_CONFIG: Settings =
        shared_kernel::configuration::config().expect("Expected settings to parse");
}
