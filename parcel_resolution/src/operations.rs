use std::sync::Arc;

use cadastral::{AddressFields, AddressQuery, LotPlanToken, Outcome, ResolutionFailure, ResolutionResult};
use itertools::Itertools;
use kmz_writer::{KmzDocument, KmzError};
use thiserror::Error;
use tracing::warn;

use crate::contracts::CadastralApi;
use crate::folder_name::safe_folder_name;
use crate::resolver::ParcelResolver;

/// Token cap for one scanned document.
const MAX_PDF_TOKENS: usize = 100;
/// Fallback address candidates tried for one scanned document.
const MAX_PDF_ADDRESSES: usize = 5;
const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("All lookups against the map service failed")]
    Upstream { failures: Vec<ResolutionFailure> },
    #[error(transparent)]
    Encoding(#[from] KmzError),
}

/// The finished download: archive bytes plus everything the transport
/// layer needs to present it.
#[derive(Debug)]
pub struct KmzOutput {
    pub document: KmzDocument,
    pub name: String,
    pub outcome: Outcome,
    pub failures: Vec<ResolutionFailure>,
}

/// Entry operations, one per request shape. Thin compositions over the
/// resolver and the KMZ writer.
pub struct App {
    resolver: ParcelResolver,
}

impl App {
    pub fn new(api: Arc<dyn CadastralApi>) -> Self {
        Self {
            resolver: ParcelResolver::new(api),
        }
    }

    /// PDF path: extract text, scan for lot/plan tokens, resolve. A
    /// document with no tokens falls back to any street addresses its text
    /// carries; the first address that produces parcels names the download.
    #[tracing::instrument(err, skip_all, level = "info")]
    pub async fn process_pdf_to_kmz(&self, pdf_bytes: &[u8]) -> Result<KmzOutput, OperationError> {
        let text = lotplan_parser::pdf::extract_text(pdf_bytes)
            .map_err(|err| OperationError::InvalidInput(format!("Could not read the PDF: {err:#}")))?;

        let tokens: Vec<LotPlanToken> = lotplan_parser::scanner::extract_tokens(&text)
            .into_iter()
            .take(MAX_PDF_TOKENS)
            .collect();
        if !tokens.is_empty() {
            let result = self.resolver.resolve_tokens(tokens).await;
            return finish(None, result);
        }

        for address in lotplan_parser::address::extract_addresses(&text)
            .into_iter()
            .take(MAX_PDF_ADDRESSES)
        {
            let result = self.resolver.resolve_address_fields(&address).await;
            if !result.parcels().is_empty() {
                return finish(Some(address.label()), result);
            }
        }

        finish(None, ResolutionResult::new())
    }

    /// Explicit comma/space-separated token list, e.g.
    /// `4 RP30439, 3 RP048958`.
    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn kmz_by_lotplan(&self, token_list: &str) -> Result<KmzOutput, OperationError> {
        let tokens = lotplan_parser::scanner::extract_tokens(token_list);
        if tokens.is_empty() {
            return Err(OperationError::InvalidInput(
                "Provide lotplan=2 RP12345 or a comma-separated list of tokens".to_string(),
            ));
        }
        let name: String = tokens
            .iter()
            .map(|token| token.canonical())
            .join(" & ")
            .chars()
            .take(MAX_NAME_LEN)
            .collect();
        let result = self.resolver.resolve_tokens(tokens).await;
        finish(Some(name), result)
    }

    /// Free-text address path.
    #[tracing::instrument(err, skip(self), level = "info")]
    pub async fn kmz_by_address(&self, address_text: &str) -> Result<KmzOutput, OperationError> {
        let query = AddressQuery::try_from(address_text)
            .map_err(|_| OperationError::InvalidInput("Provide a non-empty address".to_string()))?;
        let result = self.resolver.resolve_address(&query).await;
        finish(Some(query.inner()), result)
    }

    /// Legacy structured-address path.
    #[tracing::instrument(err, skip_all, level = "info")]
    pub async fn kmz_by_address_fields(
        &self,
        address: &AddressFields,
    ) -> Result<KmzOutput, OperationError> {
        if address.house_number.is_none() && !address.relax_no_number {
            return Err(OperationError::InvalidInput(
                "Missing house number; set relax_no_number to query without one".to_string(),
            ));
        }
        let result = self.resolver.resolve_address_fields(address).await;
        finish(Some(address.label()), result)
    }
}

fn finish(name: Option<String>, result: ResolutionResult) -> Result<KmzOutput, OperationError> {
    if result.outcome() == Outcome::AllFailed {
        return Err(OperationError::Upstream {
            failures: result.failures().to_vec(),
        });
    }
    if !result.failures().is_empty() {
        warn!(
            failed = result.failures().len(),
            resolved = result.parcels().len(),
            "completing with partial resolution: {:?}",
            result.failures()
        );
    }
    let name = name
        .or_else(|| {
            result
                .parcels()
                .first()
                .map(|parcel| parcel.lotplan.canonical())
        })
        .unwrap_or_else(|| "parcels".to_string());
    let name = safe_folder_name(&name);
    let document = kmz_writer::encode(&name, &result)?;
    Ok(KmzOutput {
        document,
        name,
        outcome: result.outcome(),
        failures: result.failures().to_vec(),
    })
}
