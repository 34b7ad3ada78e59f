pub mod configuration;
pub mod http_client;
mod non_empty_string;
pub mod tracing;
