use cadastral::{LotPlanToken, ParcelAttributes, ParcelFeature};
use geo::MultiPolygon;
use geojson::FeatureCollection;
use itertools::Itertools;
use serde_json::Map;

use crate::fields;

/// Lot/plan values carried by Address-layer records, deduplicated in
/// response order. Records without the attribute are skipped.
pub(crate) fn lotplan_tokens(collection: FeatureCollection) -> Vec<LotPlanToken> {
    collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let properties = feature.properties?;
            let value = properties.get(fields::LOTPLAN)?.as_str()?.trim().to_string();
            LotPlanToken::from_lotplan_field(&value)
        })
        .unique()
        .collect()
}

/// Parcel-layer records decoded into the internal representation. Features
/// with missing, null or non-areal geometry are dropped rather than failing
/// the batch; ring and vertex order are preserved as returned.
pub(crate) fn parcel_features(collection: FeatureCollection) -> Vec<ParcelFeature> {
    collection
        .features
        .into_iter()
        .filter_map(decode_feature)
        .collect()
}

fn decode_feature(feature: geojson::Feature) -> Option<ParcelFeature> {
    let properties = feature.properties.unwrap_or_default();
    let lotplan = LotPlanToken::from_lotplan_field(properties.get(fields::LOTPLAN)?.as_str()?)?;
    let geometry = geo::Geometry::<f64>::try_from(feature.geometry?).ok()?;
    let geometry = match geometry {
        geo::Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
        geo::Geometry::MultiPolygon(multi) => multi,
        _ => return None,
    };
    Some(ParcelFeature {
        lotplan,
        geometry,
        attributes: attributes_from(&properties),
    })
}

fn attributes_from(properties: &Map<String, serde_json::Value>) -> ParcelAttributes {
    let text = |key: &str| {
        properties
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::to_string)
    };
    ParcelAttributes {
        lot: text(fields::LOT),
        plan: text(fields::PLAN),
        locality: text(fields::LOCALITY),
        shire_name: text(fields::SHIRE_NAME),
        tenure: text(fields::TENURE),
    }
}
