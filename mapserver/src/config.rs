use secrecy::Secret;
use serde::Deserialize;

/// Process-wide upstream configuration, built once at startup and injected
/// into the client. Never mutated per-request.
#[derive(Clone, Debug, Deserialize)]
pub struct MapServerConfig {
    /// Root of the MapServer service, without a trailing layer index.
    pub base_url: String,
    #[serde(default = "default_address_layer")]
    pub address_layer: u32,
    #[serde(default = "default_parcels_layer")]
    pub parcels_layer: u32,
    /// Optional ArcGIS token, sent as the `token` query parameter.
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
    /// Upper bound on lot/plan clauses OR'd into one query. The service's
    /// real filter-length limit is undocumented, so this stays tunable.
    #[serde(default = "default_max_tokens_per_query")]
    pub max_tokens_per_query: usize,
    #[serde(default = "default_max_record_count")]
    pub max_record_count: u32,
}

fn default_address_layer() -> u32 {
    0
}

fn default_parcels_layer() -> u32 {
    4
}

fn default_max_tokens_per_query() -> usize {
    25
}

fn default_max_record_count() -> u32 {
    1000
}
