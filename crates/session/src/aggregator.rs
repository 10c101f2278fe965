use std::sync::Arc;

use annotations::{Annotation, AnnotationStore};
use catalog::{Category, CategorySelection};
use foundation::Region;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use parking_lot::Mutex;
use providers::{PlaceProvider, SearchOutcome};
use tracing::debug;

use crate::surface::{CommandSink, MapCommand};

/// Per-load accounting, mostly for logs and tests.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// New annotations inserted into the store.
    pub inserted: usize,
    /// Records whose identifier already existed.
    pub duplicates: usize,
    /// Records from batches that arrived after their category was
    /// deselected.
    pub stale: usize,
    /// Records outside the requested region.
    pub out_of_region: usize,
    /// Records dropped for missing fields.
    pub malformed: usize,
}

/// Merges provider results into the annotation store.
///
/// The store is the single source of truth and the aggregator is its only
/// writer; everything downstream just reads. Searches for one category run
/// against every provider concurrently, and each provider's batch merges
/// independently as it arrives, so one slow or empty provider never holds
/// up the other.
pub struct Aggregator {
    providers: Vec<Arc<dyn PlaceProvider>>,
    store: Arc<Mutex<AnnotationStore>>,
    selection: Arc<Mutex<CategorySelection>>,
    commands: Arc<Mutex<CommandSink>>,
}

impl Aggregator {
    pub fn new(
        providers: Vec<Arc<dyn PlaceProvider>>,
        store: Arc<Mutex<AnnotationStore>>,
        selection: Arc<Mutex<CategorySelection>>,
        commands: Arc<Mutex<CommandSink>>,
    ) -> Self {
        Aggregator {
            providers,
            store,
            selection,
            commands,
        }
    }

    /// Loads one category from every provider and merges the results.
    ///
    /// All searches are in flight simultaneously; completions merge in
    /// arrival order. The only suspension points are the provider futures
    /// themselves.
    pub async fn load_category(&self, category: &Category, region: Region) -> LoadReport {
        let mut searches: FuturesUnordered<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let category = category.clone();
                async move { (provider.label(), provider.search(category, region).await) }
            })
            .collect();

        let mut report = LoadReport::default();
        while let Some((source, outcome)) = searches.next().await {
            self.merge(category, region, source, outcome, &mut report);
        }

        debug!(
            category = %category.title,
            inserted = report.inserted,
            duplicates = report.duplicates,
            stale = report.stale,
            "category load merged"
        );
        report
    }

    /// Merges one provider batch. Synchronous: locks are never held across
    /// an await.
    fn merge(
        &self,
        category: &Category,
        region: Region,
        source: &'static str,
        outcome: SearchOutcome,
        report: &mut LoadReport,
    ) {
        let places = match outcome {
            SearchOutcome::Places(places) => places,
            SearchOutcome::Empty => return,
        };

        // The user may have toggled the category off while this search was
        // in flight; a stale batch is discarded, never inserted.
        if !self.selection.lock().is_selected(category) {
            report.stale += places.len();
            debug!(category = %category.title, source, "discarding stale batch");
            return;
        }

        let mut store = self.store.lock();
        let mut commands = self.commands.lock();
        for place in &places {
            if place.name.is_empty() {
                report.malformed += 1;
                continue;
            }
            if !region.contains(place.coordinate) {
                report.out_of_region += 1;
                continue;
            }

            let annotation = Annotation::from_raw(place, category, source);
            if store.insert(annotation.clone()) {
                commands.push(MapCommand::AddAnnotation(annotation));
                report.inserted += 1;
            } else {
                report.duplicates += 1;
            }
        }
    }

    /// Removes every annotation of the category as one atomic batch and
    /// emits fading remove commands. Returns how many were removed; the
    /// caller owes downstream exactly one refresh afterwards.
    pub fn remove_category(&self, category: &Category) -> usize {
        let removed = self.store.lock().remove_category(category);

        let mut commands = self.commands.lock();
        for annotation in &removed {
            commands.push(MapCommand::RemoveAnnotation {
                id: annotation.identifier.clone(),
                fade: true,
            });
        }
        removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Aggregator, LoadReport};
    use crate::surface::{CommandSink, MapCommand};
    use annotations::AnnotationStore;
    use catalog::CategorySelection;
    use foundation::{Coordinate, Region, Span};
    use parking_lot::Mutex;
    use providers::{CannedProvider, RawPlace};
    use std::sync::Arc;

    fn region() -> Region {
        Region::new(Coordinate::new(0.0, 0.0), Span::new(2.0, 2.0))
    }

    fn aggregator(
        providers: Vec<Arc<dyn providers::PlaceProvider>>,
    ) -> (
        Aggregator,
        Arc<Mutex<AnnotationStore>>,
        Arc<Mutex<CategorySelection>>,
        Arc<Mutex<CommandSink>>,
    ) {
        let store = Arc::new(Mutex::new(AnnotationStore::new()));
        let selection = Arc::new(Mutex::new(CategorySelection::new()));
        let commands = Arc::new(Mutex::new(CommandSink::new()));
        let aggregator = Aggregator::new(
            providers,
            Arc::clone(&store),
            Arc::clone(&selection),
            Arc::clone(&commands),
        );
        (aggregator, store, selection, commands)
    }

    #[tokio::test]
    async fn merges_both_providers_and_dedups_by_identifier() {
        let catalog = catalog::standard();
        let place = RawPlace::with_id("shared", "Twice Seen", Coordinate::new(0.1, 0.1));

        let a: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("A").with_places(&catalog[0], vec![place.clone()]),
        );
        let b: Arc<dyn providers::PlaceProvider> =
            Arc::new(CannedProvider::new("B").with_places(&catalog[0], vec![place]));

        let (aggregator, store, selection, commands) = aggregator(vec![a, b]);
        selection.lock().select(&catalog[0]);

        let report = aggregator.load_category(&catalog[0], region()).await;

        assert_eq!(report.inserted, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(store.lock().len(), 1);
        assert_eq!(commands.lock().commands().len(), 1);
    }

    #[tokio::test]
    async fn repeated_load_is_idempotent() {
        let catalog = catalog::standard();
        let provider: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("A").with_places(
                &catalog[0],
                vec![
                    RawPlace::with_id("1", "One", Coordinate::new(0.1, 0.1)),
                    RawPlace::with_id("2", "Two", Coordinate::new(0.2, 0.2)),
                ],
            ),
        );

        let (aggregator, store, selection, _) = aggregator(vec![provider]);
        selection.lock().select(&catalog[0]);

        let first = aggregator.load_category(&catalog[0], region()).await;
        let second = aggregator.load_category(&catalog[0], region()).await;

        assert_eq!(first.inserted, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(store.lock().len(), 2);
    }

    #[tokio::test]
    async fn one_empty_provider_does_not_block_the_other() {
        let catalog = catalog::standard();
        let empty: Arc<dyn providers::PlaceProvider> = Arc::new(CannedProvider::new("Empty"));
        let full: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("Full").with_places(
                &catalog[0],
                vec![RawPlace::with_id("1", "One", Coordinate::new(0.1, 0.1))],
            ),
        );

        let (aggregator, store, selection, _) = aggregator(vec![empty, full]);
        selection.lock().select(&catalog[0]);

        let report = aggregator.load_category(&catalog[0], region()).await;
        assert_eq!(report.inserted, 1);
        assert_eq!(store.lock().len(), 1);
    }

    #[tokio::test]
    async fn skips_malformed_and_out_of_region_records() {
        let catalog = catalog::standard();
        let provider: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("A").with_places(
                &catalog[0],
                vec![
                    RawPlace::with_id("ok", "Kept", Coordinate::new(0.1, 0.1)),
                    RawPlace::with_id("unnamed", "", Coordinate::new(0.2, 0.2)),
                ],
            ),
        );

        let (aggregator, store, selection, _) = aggregator(vec![provider]);
        selection.lock().select(&catalog[0]);

        let report = aggregator.load_category(&catalog[0], region()).await;
        assert_eq!(report.inserted, 1);
        assert_eq!(report.malformed, 1);
        assert_eq!(store.lock().len(), 1);
    }

    #[tokio::test]
    async fn unselected_category_batch_is_discarded() {
        let catalog = catalog::standard();
        let provider: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("A").with_places(
                &catalog[0],
                vec![RawPlace::with_id("1", "One", Coordinate::new(0.1, 0.1))],
            ),
        );

        // Selection never turned on: the batch arrives stale.
        let (aggregator, store, _, commands) = aggregator(vec![provider]);

        let report = aggregator.load_category(&catalog[0], region()).await;
        assert_eq!(
            report,
            LoadReport {
                stale: 1,
                ..LoadReport::default()
            }
        );
        assert!(store.lock().is_empty());
        assert!(commands.lock().commands().is_empty());
    }

    #[tokio::test]
    async fn remove_category_fades_the_whole_batch() {
        let catalog = catalog::standard();
        let provider: Arc<dyn providers::PlaceProvider> = Arc::new(
            CannedProvider::new("A")
                .with_places(
                    &catalog[0],
                    vec![RawPlace::with_id("1", "One", Coordinate::new(0.1, 0.1))],
                )
                .with_places(
                    &catalog[1],
                    vec![RawPlace::with_id("2", "Two", Coordinate::new(0.2, 0.2))],
                ),
        );

        let (aggregator, store, selection, commands) = aggregator(vec![provider]);
        selection.lock().select(&catalog[0]);
        selection.lock().select(&catalog[1]);
        aggregator.load_category(&catalog[0], region()).await;
        aggregator.load_category(&catalog[1], region()).await;
        commands.lock().drain();

        let removed = aggregator.remove_category(&catalog[0]);

        assert_eq!(removed, 1);
        assert_eq!(store.lock().len(), 1);
        let drained = commands.lock().drain();
        assert!(matches!(
            drained.as_slice(),
            [MapCommand::RemoveAnnotation { fade: true, .. }]
        ));
    }
}
