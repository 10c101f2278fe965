use std::collections::BTreeMap;

use catalog::Category;

use crate::annotation::{Annotation, AnnotationId};

/// The single source of truth for merged POI pins.
///
/// Set semantics keyed by identifier: at most one annotation per identifier
/// exists at any time. Only the aggregation layer mutates the store; the
/// viewport filter and the card list just read it.
///
/// Ordering contract:
/// - Iteration yields annotations in ascending identifier order.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: BTreeMap<AnnotationId, Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.annotations.contains_key(id)
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.values()
    }

    /// Inserts the annotation unless one with the same identifier exists.
    ///
    /// Returns `true` if the store changed. Existing annotations are never
    /// overwritten, which makes repeated merges of the same results
    /// idempotent.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        if self.annotations.contains_key(&annotation.identifier) {
            return false;
        }
        self.annotations
            .insert(annotation.identifier.clone(), annotation);
        true
    }

    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation> {
        self.annotations.remove(id)
    }

    /// Removes every annotation of the given category in one batch.
    ///
    /// The batch is atomic from a reader's point of view: callers hold the
    /// store exclusively for the duration, so no partial state is ever
    /// observable. Returns the removed annotations.
    pub fn remove_category(&mut self, category: &Category) -> Vec<Annotation> {
        let ids: Vec<AnnotationId> = self
            .annotations
            .values()
            .filter(|a| a.category == *category)
            .map(|a| a.identifier.clone())
            .collect();

        ids.iter()
            .filter_map(|id| self.annotations.remove(id))
            .collect()
    }
}
