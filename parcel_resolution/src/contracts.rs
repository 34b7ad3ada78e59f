use async_trait::async_trait;
use cadastral::{AddressFields, AddressQuery, LotPlanToken, ParcelBatch};

/// Seam to the upstream map service. Owned here, implemented by the
/// MapServer client crate, so the resolver and operations can be exercised
/// against in-memory fakes.
#[async_trait]
pub trait CadastralApi: Send + Sync {
    /// Candidate lot/plan tokens for a free-text address; empty means the
    /// address matched nothing.
    async fn resolve_address(&self, query: &AddressQuery) -> anyhow::Result<Vec<LotPlanToken>>;

    /// Candidate lot/plan tokens for a structured address.
    async fn resolve_address_fields(
        &self,
        address: &AddressFields,
    ) -> anyhow::Result<Vec<LotPlanToken>>;

    /// Parcel geometry for a token batch. Infallible at the batch level:
    /// tokens whose queries exhaust their retries come back in the failure
    /// list rather than aborting the rest.
    async fn fetch_parcels(&self, tokens: &[LotPlanToken]) -> ParcelBatch;
}
