//! Overpass API wire contract: query construction and response parsing.
//!
//! The transport (HTTP, URL encoding, retries) is the embedder's concern;
//! this module only defines what goes over the wire and how a payload maps
//! onto `RawPlace` records. Overpass results carry no identifier the core
//! treats as stable, so every parsed place is anonymous.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use catalog::OsmTag;
use foundation::{Coordinate, Region};
use serde::Deserialize;

use crate::{RawPlace, SearchOutcome};

/// Builds an Overpass QL query for the given tag filters and region.
///
/// Returns `None` when there are no tags to query for. Each tag expands to a
/// `node` and a `way` clause; `out center` makes ways report a single
/// centroid coordinate.
pub fn build_query(tags: &[OsmTag], region: Region) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    // Overpass bbox order: south, west, north, east.
    let bbox = format!(
        "({:.6},{:.6},{:.6},{:.6})",
        region.min_lat(),
        region.min_lon(),
        region.max_lat(),
        region.max_lon()
    );

    let mut query = String::from("[out:json][timeout:25];(");
    for tag in tags {
        let filter = match &tag.value {
            Some(value) => format!("[\"{}\"=\"{}\"]", tag.key, value),
            None => format!("[\"{}\"]", tag.key),
        };
        let _ = write!(query, "node{filter}{bbox};way{filter}{bbox};");
    }
    query.push_str(");out center;");

    Some(query)
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    /// Ways report their centroid here when queried with `out center`.
    #[serde(default)]
    center: Option<Center>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

impl Element {
    fn coordinate(&self) -> Option<Coordinate> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some(Coordinate::new(lat, lon));
        }
        self.center.as_ref().map(|c| Coordinate::new(c.lat, c.lon))
    }
}

/// Parses an Overpass JSON payload into place records.
///
/// Elements without a `name` tag or without a usable coordinate are skipped
/// per-record; an unreadable payload as a whole collapses to `Empty`.
pub fn parse_places(body: &str) -> SearchOutcome {
    let Ok(response) = serde_json::from_str::<Response>(body) else {
        return SearchOutcome::Empty;
    };

    let mut places = Vec::new();
    for element in &response.elements {
        let Some(name) = element.tags.get("name") else {
            continue;
        };
        let Some(coordinate) = element.coordinate() else {
            continue;
        };
        places.push(RawPlace::anonymous(name.clone(), coordinate));
    }

    SearchOutcome::from_places(places)
}
