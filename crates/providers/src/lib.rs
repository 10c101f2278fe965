//! Place-search provider boundary.
//!
//! Two provider shapes exist in practice: a local-search style service whose
//! results carry provider-assigned stable identifiers, and an Overpass style
//! service whose results carry none (the aggregation layer synthesizes an
//! identifier for those). Transports stay with the embedder; this crate
//! defines the request/response contract and ships an in-memory provider
//! for tests and demos.

use catalog::Category;
use foundation::{Coordinate, Region};
use futures_util::future::BoxFuture;

pub mod canned;
pub mod overpass;

pub use canned::CannedProvider;

/// One place record as returned by a provider, before merging.
///
/// Discarded after the merge into an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPlace {
    /// Provider-scoped stable identifier, when the provider has one.
    pub external_id: Option<String>,
    pub name: String,
    pub coordinate: Coordinate,
}

impl RawPlace {
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        RawPlace {
            external_id: Some(id.into()),
            name: name.into(),
            coordinate,
        }
    }

    pub fn anonymous(name: impl Into<String>, coordinate: Coordinate) -> Self {
        RawPlace {
            external_id: None,
            name: name.into(),
            coordinate,
        }
    }
}

/// Outcome of a provider search.
///
/// Providers never fail toward the caller: transport errors, unparseable
/// payloads, and zero hits all collapse to `Empty`. "Request not yet made"
/// is a state the caller tracks, not a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Places(Vec<RawPlace>),
    Empty,
}

impl SearchOutcome {
    /// Wraps a result list, collapsing an empty one to `Empty`.
    pub fn from_places(places: Vec<RawPlace>) -> Self {
        if places.is_empty() {
            SearchOutcome::Empty
        } else {
            SearchOutcome::Places(places)
        }
    }

    pub fn into_places(self) -> Vec<RawPlace> {
        match self {
            SearchOutcome::Places(places) => places,
            SearchOutcome::Empty => Vec::new(),
        }
    }
}

/// Contract consumed by the aggregation layer.
///
/// `search` must resolve for every input; a provider with nothing to say
/// resolves to `SearchOutcome::Empty`.
pub trait PlaceProvider: Send + Sync {
    /// Short human-readable source name, recorded on each annotation.
    fn label(&self) -> &'static str;

    fn search(&self, category: Category, region: Region) -> BoxFuture<'static, SearchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::{RawPlace, SearchOutcome};
    use foundation::Coordinate;

    #[test]
    fn empty_place_list_collapses_to_empty() {
        assert_eq!(SearchOutcome::from_places(Vec::new()), SearchOutcome::Empty);
        assert_eq!(SearchOutcome::Empty.into_places(), Vec::new());
    }

    #[test]
    fn from_places_keeps_hits() {
        let place = RawPlace::anonymous("Cafe", Coordinate::new(1.0, 2.0));
        let outcome = SearchOutcome::from_places(vec![place.clone()]);
        assert_eq!(outcome.into_places(), vec![place]);
    }
}
