use crate::parcel::ParcelFeature;

/// A token or query that could not be resolved, kept for partial-failure
/// reporting alongside whatever did resolve.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolutionFailure {
    pub subject: String,
    pub reason: String,
}

impl ResolutionFailure {
    pub fn new(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

/// Raw output of one round of parcel queries, before merging.
#[derive(Debug, Default)]
pub struct ParcelBatch {
    pub parcels: Vec<ParcelFeature>,
    pub failures: Vec<ResolutionFailure>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every token resolved.
    Complete,
    /// Some tokens failed upstream but usable parcels remain.
    Partial,
    /// Nothing failed, nothing matched.
    NothingFound,
    /// Every lookup failed upstream.
    AllFailed,
}

/// The ordered, deduplicated set of parcels accumulated for one request.
/// Created empty, filled by the resolver, consumed once by the KMZ encoder.
#[derive(Debug, Default)]
pub struct ResolutionResult {
    parcels: Vec<ParcelFeature>,
    failures: Vec<ResolutionFailure>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep-first deduplication: a feature is a duplicate only when its
    /// canonical lot/plan string AND its geometry match an already-held
    /// feature. Same lot/plan with different geometry (e.g. survey updates)
    /// keeps both entries.
    pub fn insert(&mut self, parcel: ParcelFeature) -> bool {
        let duplicate = self.parcels.iter().any(|existing| {
            existing.lotplan == parcel.lotplan && existing.geometry == parcel.geometry
        });
        if duplicate {
            return false;
        }
        self.parcels.push(parcel);
        true
    }

    pub fn record_failure(&mut self, failure: ResolutionFailure) {
        self.failures.push(failure);
    }

    pub fn parcels(&self) -> &[ParcelFeature] {
        &self.parcels
    }

    pub fn failures(&self) -> &[ResolutionFailure] {
        &self.failures
    }

    pub fn outcome(&self) -> Outcome {
        match (self.parcels.is_empty(), self.failures.is_empty()) {
            (false, true) => Outcome::Complete,
            (false, false) => Outcome::Partial,
            (true, true) => Outcome::NothingFound,
            (true, false) => Outcome::AllFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiPolygon, Polygon};

    use super::{Outcome, ResolutionFailure, ResolutionResult};
    use crate::lotplan::LotPlanToken;
    use crate::parcel::{ParcelAttributes, ParcelFeature};

    fn parcel(lot: &str, plan: &str, ring: Vec<(f64, f64)>) -> ParcelFeature {
        ParcelFeature {
            lotplan: LotPlanToken::new(lot, plan),
            geometry: MultiPolygon::new(vec![Polygon::new(LineString::from(ring), vec![])]),
            attributes: ParcelAttributes::default(),
        }
    }

    fn square(origin: f64) -> Vec<(f64, f64)> {
        vec![
            (origin, origin),
            (origin + 1.0, origin),
            (origin + 1.0, origin + 1.0),
            (origin, origin + 1.0),
            (origin, origin),
        ]
    }

    #[test]
    fn identical_token_and_geometry_collapses_to_first() {
        let mut result = ResolutionResult::new();
        assert!(result.insert(parcel("2", "RP12345", square(0.0))));
        assert!(!result.insert(parcel("2", "RP12345", square(0.0))));
        assert_eq!(result.parcels().len(), 1);
    }

    #[test]
    fn same_token_different_geometry_keeps_both() {
        let mut result = ResolutionResult::new();
        assert!(result.insert(parcel("2", "RP12345", square(0.0))));
        assert!(result.insert(parcel("2", "RP12345", square(5.0))));
        assert_eq!(result.parcels().len(), 2);
    }

    #[test]
    fn outcome_classification() {
        let mut result = ResolutionResult::new();
        assert_eq!(result.outcome(), Outcome::NothingFound);

        result.record_failure(ResolutionFailure::new("2RP12345", "timeout"));
        assert_eq!(result.outcome(), Outcome::AllFailed);

        result.insert(parcel("3", "DP752379", square(0.0)));
        assert_eq!(result.outcome(), Outcome::Partial);

        let mut clean = ResolutionResult::new();
        clean.insert(parcel("3", "DP752379", square(0.0)));
        assert_eq!(clean.outcome(), Outcome::Complete);
    }
}
