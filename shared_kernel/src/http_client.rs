use anyhow::Context;
use lazy_static::lazy_static;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Upstream map services occasionally stall; a stalled call must become a
/// per-token resolution failure, never an open-ended wait.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

lazy_static! {
    static ref CLIENT: ClientWithMiddleware = {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Expected reqwest client to build");
        ClientBuilder::new(client)
            // Retry failed requests.
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(TracingMiddleware::default())
            .build()
    };
}

pub struct HttpClient;

impl HttpClient {
    pub async fn get_json<DTO: DeserializeOwned>(url: Url) -> anyhow::Result<DTO> {
        let response = CLIENT
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch request from {url}"))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("Request to {url} returned an error status"))?;
        let err_msg = format!("Failed to deserialize response from {url}");
        response.json::<DTO>().await.context(err_msg)
    }
}
