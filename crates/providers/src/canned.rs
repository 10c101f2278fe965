use std::collections::BTreeMap;

use catalog::Category;
use foundation::Region;
use futures_util::future::BoxFuture;

use crate::{PlaceProvider, RawPlace, SearchOutcome};

/// In-memory provider serving canned results, keyed by category title.
///
/// Region filtering mirrors a real provider: only places inside the
/// requested region are returned. Used by the demo binary and by scenario
/// tests that need deterministic provider behavior.
#[derive(Debug)]
pub struct CannedProvider {
    label: &'static str,
    places: BTreeMap<String, Vec<RawPlace>>,
}

impl CannedProvider {
    pub fn new(label: &'static str) -> Self {
        CannedProvider {
            label,
            places: BTreeMap::new(),
        }
    }

    pub fn with_places(mut self, category: &Category, places: Vec<RawPlace>) -> Self {
        self.places
            .entry(category.title.clone())
            .or_default()
            .extend(places);
        self
    }
}

impl PlaceProvider for CannedProvider {
    fn label(&self) -> &'static str {
        self.label
    }

    fn search(&self, category: Category, region: Region) -> BoxFuture<'static, SearchOutcome> {
        let hits: Vec<RawPlace> = self
            .places
            .get(&category.title)
            .map(|places| {
                places
                    .iter()
                    .filter(|p| region.contains(p.coordinate))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Box::pin(std::future::ready(SearchOutcome::from_places(hits)))
    }
}
