use anyhow::{bail, Context};
use cadastral::{AddressFields, AddressQuery, LotPlanToken, ParcelBatch, ResolutionFailure};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use geojson::FeatureCollection;
use secrecy::ExposeSecret;
use shared_kernel::http_client::HttpClient;
use tracing::error;
use url::Url;

use crate::config::MapServerConfig;
use crate::{decode, where_clause};

/// Client for the two consumed MapServer layers: Address resolution and
/// Parcel lookup. Holds nothing but the injected configuration, so one
/// instance serves every request.
#[derive(Clone, Debug)]
pub struct MapServerClient {
    config: MapServerConfig,
}

impl MapServerClient {
    pub fn new(config: MapServerConfig) -> Self {
        Self { config }
    }

    /// Queries the Address layer with free text and extracts the lot/plan
    /// attribute of each candidate record.
    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn resolve_address(&self, query: &AddressQuery) -> anyhow::Result<Vec<LotPlanToken>> {
        let clause = where_clause::free_text_address(query.as_str());
        let response = self.query_layer(self.config.address_layer, &clause).await?;
        Ok(decode::lotplan_tokens(response))
    }

    /// Same as [`Self::resolve_address`] but with a fielded WHERE clause
    /// built from a structured address.
    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn resolve_address_fields(
        &self,
        address: &AddressFields,
    ) -> anyhow::Result<Vec<LotPlanToken>> {
        let clause = where_clause::fielded_address(address)?;
        let response = self.query_layer(self.config.address_layer, &clause).await?;
        Ok(decode::lotplan_tokens(response))
    }

    /// Queries the Parcels layer for every token, chunked to respect the
    /// configured filter-length bound. Chunks run concurrently and join
    /// before returning; a chunk that exhausts its retries downgrades to
    /// per-token failures instead of aborting the batch.
    #[tracing::instrument(skip_all, fields(token_count = tokens.len()), level = "info")]
    pub async fn fetch_parcels(&self, tokens: &[LotPlanToken]) -> ParcelBatch {
        let mut in_flight: FuturesUnordered<_> = tokens
            .chunks(self.config.max_tokens_per_query.max(1))
            .map(|chunk| self.fetch_chunk(chunk))
            .collect();

        let mut batch = ParcelBatch::default();
        while let Some(outcome) = in_flight.next().await {
            match outcome {
                Ok(parcels) => batch.parcels.extend(parcels),
                Err((chunk, err)) => {
                    error!("parcel query failed for {} token(s): {err:#}", chunk.len());
                    batch.failures.extend(chunk.iter().map(|token| {
                        ResolutionFailure::new(token.canonical(), format!("{err:#}"))
                    }));
                }
            }
        }
        batch
    }

    async fn fetch_chunk<'a>(
        &self,
        chunk: &'a [LotPlanToken],
    ) -> Result<Vec<cadastral::ParcelFeature>, (&'a [LotPlanToken], anyhow::Error)> {
        let clause = where_clause::lotplan_batch(chunk);
        match self.query_layer(self.config.parcels_layer, &clause).await {
            Ok(response) => Ok(decode::parcel_features(response)),
            Err(err) => Err((chunk, err)),
        }
    }

    async fn query_layer(
        &self,
        layer: u32,
        where_clause: &str,
    ) -> anyhow::Result<FeatureCollection> {
        let url = self.layer_query_url(layer, where_clause)?;
        let raw = HttpClient::get_json::<serde_json::Value>(url).await?;
        // ArcGIS reports some failures as 200 + an error envelope.
        if let Some(err) = raw.get("error") {
            bail!("Map service returned an error payload: {err}");
        }
        serde_json::from_value::<FeatureCollection>(raw)
            .context("Failed to decode feature collection response")
    }

    fn layer_query_url(&self, layer: u32, where_clause: &str) -> anyhow::Result<Url> {
        let base = format!(
            "{}/{layer}/query",
            self.config.base_url.trim_end_matches('/')
        );
        let mut params = vec![
            ("where", where_clause.to_string()),
            ("f", "geojson".to_string()),
            ("outFields", "*".to_string()),
            ("returnGeometry", "true".to_string()),
            ("outSR", "4326".to_string()),
            (
                "resultRecordCount",
                self.config.max_record_count.to_string(),
            ),
        ];
        if let Some(token) = &self.config.auth_token {
            params.push(("token", token.expose_secret().clone()));
        }
        Url::parse_with_params(&base, &params).context("Failed to parse layer query url")
    }
}

#[async_trait::async_trait]
impl parcel_resolution::CadastralApi for MapServerClient {
    async fn resolve_address(&self, query: &AddressQuery) -> anyhow::Result<Vec<LotPlanToken>> {
        MapServerClient::resolve_address(self, query).await
    }

    async fn resolve_address_fields(
        &self,
        address: &AddressFields,
    ) -> anyhow::Result<Vec<LotPlanToken>> {
        MapServerClient::resolve_address_fields(self, address).await
    }

    async fn fetch_parcels(&self, tokens: &[LotPlanToken]) -> ParcelBatch {
        MapServerClient::fetch_parcels(self, tokens).await
    }
}
