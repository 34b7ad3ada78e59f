use std::sync::Arc;

use cadastral::{
    AddressFields, AddressQuery, LotPlanToken, ParcelBatch, ResolutionFailure, ResolutionResult,
};
use itertools::Itertools;

use crate::contracts::CadastralApi;

/// Tagged pipeline states for one request. Driving the transitions through
/// an explicit enum keeps the partial-failure paths visible and testable.
enum ResolutionState {
    PendingTokens(Vec<LotPlanToken>),
    Resolving(Vec<LotPlanToken>),
    Merging(ParcelBatch),
    Done(ResolutionResult),
}

pub struct ParcelResolver {
    api: Arc<dyn CadastralApi>,
}

impl ParcelResolver {
    pub fn new(api: Arc<dyn CadastralApi>) -> Self {
        Self { api }
    }

    #[tracing::instrument(skip_all, fields(token_count = tokens.len()), level = "info")]
    pub async fn resolve_tokens(&self, tokens: Vec<LotPlanToken>) -> ResolutionResult {
        let mut state = ResolutionState::PendingTokens(tokens);
        loop {
            state = match state {
                ResolutionState::PendingTokens(tokens) => {
                    ResolutionState::Resolving(tokens.into_iter().unique().collect())
                }
                ResolutionState::Resolving(tokens) if tokens.is_empty() => {
                    ResolutionState::Merging(ParcelBatch::default())
                }
                ResolutionState::Resolving(tokens) => {
                    ResolutionState::Merging(self.api.fetch_parcels(&tokens).await)
                }
                ResolutionState::Merging(batch) => ResolutionState::Done(merge(batch)),
                ResolutionState::Done(result) => break result,
            };
        }
    }

    /// Address path: resolve the address into tokens first, then reuse the
    /// token path. Zero candidate tokens is a "not found" outcome, not an
    /// error; an upstream failure on the address query itself fails the
    /// whole query subject.
    #[tracing::instrument(skip_all, level = "info")]
    pub async fn resolve_address(&self, query: &AddressQuery) -> ResolutionResult {
        match self.api.resolve_address(query).await {
            Ok(tokens) if tokens.is_empty() => ResolutionResult::new(),
            Ok(tokens) => self.resolve_tokens(tokens).await,
            Err(err) => failed_subject(query.as_str(), err),
        }
    }

    #[tracing::instrument(skip_all, level = "info")]
    pub async fn resolve_address_fields(&self, address: &AddressFields) -> ResolutionResult {
        match self.api.resolve_address_fields(address).await {
            Ok(tokens) if tokens.is_empty() => ResolutionResult::new(),
            Ok(tokens) => self.resolve_tokens(tokens).await,
            Err(err) => failed_subject(&address.label(), err),
        }
    }
}

fn merge(batch: ParcelBatch) -> ResolutionResult {
    let mut result = ResolutionResult::new();
    for parcel in batch.parcels {
        result.insert(parcel);
    }
    for failure in batch.failures {
        result.record_failure(failure);
    }
    result
}

fn failed_subject(subject: &str, err: anyhow::Error) -> ResolutionResult {
    let mut result = ResolutionResult::new();
    result.record_failure(ResolutionFailure::new(subject, format!("{err:#}")));
    result
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use cadastral::{
        AddressFields, AddressQuery, LotPlanToken, Outcome, ParcelAttributes, ParcelBatch,
        ParcelFeature, ResolutionFailure,
    };
    use geo::{LineString, MultiPolygon, Polygon};

    use super::ParcelResolver;
    use crate::contracts::CadastralApi;

    fn parcel(token: &LotPlanToken, origin: f64) -> ParcelFeature {
        ParcelFeature {
            lotplan: token.clone(),
            geometry: MultiPolygon::new(vec![Polygon::new(
                LineString::from(vec![
                    (origin, origin),
                    (origin + 1.0, origin),
                    (origin + 1.0, origin + 1.0),
                    (origin, origin),
                ]),
                vec![],
            )]),
            attributes: ParcelAttributes::default(),
        }
    }

    /// In-memory stand-in for the map service: canned parcels per token,
    /// canned token lists per address, and a set of tokens that always
    /// fail upstream.
    #[derive(Default)]
    struct FakeApi {
        parcels: HashMap<String, Vec<ParcelFeature>>,
        addresses: HashMap<String, Vec<LotPlanToken>>,
        failing: Vec<String>,
        address_error: bool,
    }

    impl FakeApi {
        fn with_parcel(mut self, token: &LotPlanToken, origin: f64) -> Self {
            self.parcels
                .entry(token.canonical())
                .or_default()
                .push(parcel(token, origin));
            self
        }
    }

    #[async_trait]
    impl CadastralApi for FakeApi {
        async fn resolve_address(
            &self,
            query: &AddressQuery,
        ) -> anyhow::Result<Vec<LotPlanToken>> {
            if self.address_error {
                return Err(anyhow!("address layer unreachable"));
            }
            Ok(self
                .addresses
                .get(query.as_str())
                .cloned()
                .unwrap_or_default())
        }

        async fn resolve_address_fields(
            &self,
            address: &AddressFields,
        ) -> anyhow::Result<Vec<LotPlanToken>> {
            if self.address_error {
                return Err(anyhow!("address layer unreachable"));
            }
            Ok(self
                .addresses
                .get(&address.label())
                .cloned()
                .unwrap_or_default())
        }

        async fn fetch_parcels(&self, tokens: &[LotPlanToken]) -> ParcelBatch {
            let mut batch = ParcelBatch::default();
            for token in tokens {
                let canonical = token.canonical();
                if self.failing.contains(&canonical) {
                    batch
                        .failures
                        .push(ResolutionFailure::new(canonical, "simulated timeout"));
                    continue;
                }
                if let Some(parcels) = self.parcels.get(&canonical) {
                    batch.parcels.extend(parcels.clone());
                }
            }
            batch
        }
    }

    fn tokens(list: &[(&str, &str)]) -> Vec<LotPlanToken> {
        list.iter()
            .map(|(lot, plan)| LotPlanToken::new(lot, plan))
            .collect()
    }

    #[tokio::test]
    async fn one_failed_token_leaves_a_partial_result() {
        let good = LotPlanToken::new("4", "RP30439");
        let mut api = FakeApi::default().with_parcel(&good, 0.0);
        api.failing = vec!["3RP048958".to_string()];
        let resolver = ParcelResolver::new(Arc::new(api));
        let result = resolver
            .resolve_tokens(tokens(&[("4", "RP30439"), ("3", "RP048958")]))
            .await;

        assert_eq!(result.outcome(), Outcome::Partial);
        assert_eq!(result.parcels().len(), 1);
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].subject, "3RP048958");
    }

    #[tokio::test]
    async fn duplicate_source_records_collapse() {
        let token = LotPlanToken::new("2", "RP12345");
        let api = FakeApi::default()
            .with_parcel(&token, 0.0)
            .with_parcel(&token, 0.0)
            .with_parcel(&token, 7.0);
        let resolver = ParcelResolver::new(Arc::new(api));
        let result = resolver.resolve_tokens(tokens(&[("2", "RP12345")])).await;

        // Exact repeats collapse; the survey-updated twin stays.
        assert_eq!(result.parcels().len(), 2);
        assert_eq!(result.outcome(), Outcome::Complete);
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent() {
        let token = LotPlanToken::new("2", "RP12345");
        let api = Arc::new(FakeApi::default().with_parcel(&token, 0.0));
        let resolver = ParcelResolver::new(api);

        let first = resolver
            .resolve_tokens(tokens(&[("2", "RP12345"), ("2", "RP12345")]))
            .await;
        let second = resolver.resolve_tokens(tokens(&[("2", "RP12345")])).await;
        assert_eq!(first.parcels(), second.parcels());
    }

    #[tokio::test]
    async fn address_with_no_candidates_is_not_found_rather_than_an_error() {
        let resolver = ParcelResolver::new(Arc::new(FakeApi::default()));
        let query = AddressQuery::try_from("12 Example Street, Brisbane QLD 4000").unwrap();
        let result = resolver.resolve_address(&query).await;

        assert_eq!(result.outcome(), Outcome::NothingFound);
        assert!(result.failures().is_empty());
    }

    #[tokio::test]
    async fn address_layer_outage_fails_the_query_subject() {
        let api = FakeApi {
            address_error: true,
            ..FakeApi::default()
        };
        let resolver = ParcelResolver::new(Arc::new(api));
        let query = AddressQuery::try_from("12 Example Street").unwrap();
        let result = resolver.resolve_address(&query).await;

        assert_eq!(result.outcome(), Outcome::AllFailed);
        assert_eq!(result.failures()[0].subject, "12 Example Street");
    }

    #[tokio::test]
    async fn address_tokens_feed_the_lotplan_path() {
        let token = LotPlanToken::new("2", "RP12345");
        let mut api = FakeApi::default().with_parcel(&token, 0.0);
        api.addresses.insert(
            "12 Example Street, Brisbane".to_string(),
            vec![token.clone()],
        );
        let resolver = ParcelResolver::new(Arc::new(api));
        let query = AddressQuery::try_from("12 Example Street, Brisbane").unwrap();
        let result = resolver.resolve_address(&query).await;

        assert_eq!(result.outcome(), Outcome::Complete);
        assert_eq!(result.parcels().len(), 1);
        assert_eq!(result.parcels()[0].lotplan, token);
    }
}
