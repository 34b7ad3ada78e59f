use geo::MultiPolygon;

use crate::lotplan::LotPlanToken;

/// A resolved cadastral unit. Owned for the duration of one request and
/// never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ParcelFeature {
    pub lotplan: LotPlanToken,
    /// Outer ring first, hole rings after, per polygon. Multi-part lots
    /// carry one polygon per part.
    pub geometry: MultiPolygon<f64>,
    pub attributes: ParcelAttributes,
}

/// Descriptive attributes returned by the parcels layer. All optional; the
/// KML encoder surfaces whichever are present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParcelAttributes {
    pub lot: Option<String>,
    pub plan: Option<String>,
    pub locality: Option<String>,
    pub shire_name: Option<String>,
    pub tenure: Option<String>,
}

impl ParcelAttributes {
    pub fn description_lines(&self) -> Vec<String> {
        [
            ("lot", &self.lot),
            ("plan", &self.plan),
            ("locality", &self.locality),
            ("shire_name", &self.shire_name),
            ("tenure", &self.tenure),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| format!("{key}: {value}")))
        .collect()
    }
}
