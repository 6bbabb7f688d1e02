// State-level map layer for the purchase table.
//
// The preferred layer is a choropleth over public state boundaries keyed by
// the `ST_NM` feature property. Fetching those boundaries is best-effort:
// any failure falls back to bubble points placed on a fixed centroid table.
use crate::error::{DashError, Result};
use crate::purchases::purchase_index;
use crate::types::StatePurchase;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_BOUNDARY_URL: &str = "https://gist.githubusercontent.com/jbrobst/56c13bbbf9d97d187fea01ca62ea5112/raw/e388c4cae20aa53cb5090210a42ebb9b765c0a36/india_states.geojson";
pub const BOUNDARY_NAME_PROPERTY: &str = "ST_NM";

/// Approximate (lat, lon) centroids for the bubble fallback.
static STATE_CENTROIDS: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("Maharashtra", (19.7515, 75.7139)),
        ("Karnataka", (15.3173, 75.7139)),
        ("Gujarat", (22.2587, 71.1924)),
        ("Rajasthan", (27.0238, 74.2179)),
        ("Tamil Nadu", (11.1271, 78.6569)),
        ("Andhra Pradesh", (15.9129, 79.7400)),
        ("Madhya Pradesh", (22.9734, 78.6569)),
        ("Uttar Pradesh", (26.8467, 80.9462)),
        ("West Bengal", (22.9868, 87.8550)),
        ("Bihar", (25.0961, 85.3131)),
        ("Telangana", (18.1124, 79.0193)),
        ("Kerala", (10.8505, 76.2711)),
        ("Odisha", (20.9517, 85.0985)),
        ("Punjab", (31.1471, 75.3412)),
        ("Haryana", (29.0588, 76.0856)),
        ("Jharkhand", (23.6102, 85.2799)),
        ("Chhattisgarh", (21.2787, 81.8661)),
        ("Assam", (26.2006, 92.9376)),
        ("Himachal Pradesh", (31.1048, 77.1734)),
        ("Uttarakhand", (30.0668, 79.0193)),
        ("Goa", (15.2993, 74.1240)),
        ("Tripura", (23.9408, 91.9882)),
        ("Manipur", (24.6637, 93.9063)),
        ("Meghalaya", (25.4670, 91.3662)),
        ("Nagaland", (26.1584, 94.5624)),
        ("Mizoram", (23.1645, 92.9376)),
        ("Arunachal Pradesh", (28.2180, 94.7278)),
        ("Sikkim", (27.5330, 88.5122)),
    ])
});

pub fn centroid(state: &str) -> Option<(f64, f64)> {
    STATE_CENTROIDS.get(state).copied()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShade {
    pub state: String,
    /// 0 when the boundary has no purchase row.
    pub purchased_kg: f64,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub purchased_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MapLayer {
    Choropleth(Vec<RegionShade>),
    Bubbles(Vec<BubblePoint>),
}

impl MapLayer {
    pub fn kind(&self) -> &'static str {
        match self {
            MapLayer::Choropleth(_) => "choropleth",
            MapLayer::Bubbles(_) => "bubbles",
        }
    }
}

/// Fetch the boundary dataset and return the state name of every feature.
///
/// One blocking GET bounded by `timeout`, no retries.
pub fn fetch_boundaries(url: &str, timeout: Duration) -> Result<Vec<String>> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
    let body: Value = client.get(url).send()?.error_for_status()?.json()?;
    parse_boundary_names(&body)
}

/// Extract `properties.ST_NM` from each feature of a GeoJSON FeatureCollection.
/// Features without the property are skipped.
pub fn parse_boundary_names(collection: &Value) -> Result<Vec<String>> {
    let features = collection
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| DashError::Fetch("GeoJSON has no `features` array".to_string()))?;
    let names: Vec<String> = features
        .iter()
        .filter_map(|f| {
            f.get("properties")
                .and_then(|p| p.get(BOUNDARY_NAME_PROPERTY))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
        })
        .collect();
    if names.is_empty() {
        return Err(DashError::Fetch(format!(
            "no feature carries a `{}` property",
            BOUNDARY_NAME_PROPERTY
        )));
    }
    Ok(names)
}

/// Left join of boundary names against purchases.
pub fn choropleth(boundaries: &[String], purchases: &[StatePurchase]) -> Vec<RegionShade> {
    let index = purchase_index(purchases);
    boundaries
        .iter()
        .map(|name| {
            let kg = index.get(name.as_str()).copied();
            RegionShade {
                state: name.clone(),
                purchased_kg: kg.unwrap_or(0.0),
                matched: kg.is_some(),
            }
        })
        .collect()
}

/// Purchases placed on the centroid table. States without a known centroid
/// are dropped. Output follows the first appearance of each state.
pub fn bubble_points(purchases: &[StatePurchase]) -> Vec<BubblePoint> {
    let index = purchase_index(purchases);
    let mut seen = std::collections::HashSet::new();
    purchases
        .iter()
        .filter(|p| seen.insert(p.state.as_str()))
        .filter_map(|p| {
            let (lat, lon) = centroid(&p.state)?;
            Some(BubblePoint {
                state: p.state.clone(),
                lat,
                lon,
                purchased_kg: index.get(p.state.as_str()).copied().unwrap_or(p.purchased_kg),
            })
        })
        .collect()
}

/// Build the map layer from whatever `fetch` yields. Never fails: a fetch
/// error is logged and the bubble fallback is returned instead.
pub fn build_map_layer_with<F>(fetch: F, purchases: &[StatePurchase]) -> MapLayer
where
    F: FnOnce() -> Result<Vec<String>>,
{
    match fetch() {
        Ok(boundaries) => {
            info!(features = boundaries.len(), "state boundaries loaded");
            MapLayer::Choropleth(choropleth(&boundaries, purchases))
        }
        Err(e) => {
            warn!(error = %e, "state boundaries unavailable, using centroid bubbles");
            MapLayer::Bubbles(bubble_points(purchases))
        }
    }
}

/// Fetch from `url` (or skip straight to the fallback when `None`).
pub fn build_map_layer(url: Option<&str>, timeout: Duration, purchases: &[StatePurchase]) -> MapLayer {
    match url {
        Some(url) => build_map_layer_with(|| fetch_boundaries(url, timeout), purchases),
        None => {
            info!("boundary fetch disabled, using centroid bubbles");
            MapLayer::Bubbles(bubble_points(purchases))
        }
    }
}
