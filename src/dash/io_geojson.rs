// The precinct boundaries: only the identifiers of the features are read.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Map;

use crate::dash::*;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Option<Map<String, JSValue>>,
}

/// The identifiers of the regions, in file order. Repeated identifiers
/// (multi-part precincts) are kept once.
pub fn read_region_ids(path: &str, id_property: &str) -> DashResult<Vec<String>> {
    let contents = fs::read_to_string(path).context(SourceUnavailableSnafu { path })?;
    let collection: FeatureCollection =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        let id = feature
            .properties
            .as_ref()
            .and_then(|p| p.get(id_property))
            .and_then(|v| v.as_str())
            .map(|id| id.trim())
            .context(GeometryMissingKeySnafu {
                path,
                index,
                key: id_property,
            })?;
        if seen.insert(id.to_string()) {
            res.push(id.to_string());
        } else {
            debug!("read_region_ids: {:?} appears more than once", id);
        }
    }
    info!("read_region_ids: {} regions in {}", res.len(), path);
    Ok(res)
}
