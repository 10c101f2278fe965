use foundation::Region;

use crate::annotation::Annotation;
use crate::store::AnnotationStore;

/// The subset of stored annotations inside the viewport.
///
/// Pure O(n) filter, recomputed on every viewport or store change; at the
/// dozens-of-annotations scale this runs at, no spatial index is needed.
/// The store keeps its identifier ordering, so the result is deterministic
/// for a given store + viewport pair.
pub fn visible_annotations(store: &AnnotationStore, viewport: Region) -> Vec<Annotation> {
    store
        .iter()
        .filter(|a| viewport.contains(a.coordinate))
        .cloned()
        .collect()
}
