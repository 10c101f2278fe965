use std::cmp::Ordering;
use std::collections::BTreeSet;

use annotations::{Annotation, AnnotationId};

/// Result of a card refresh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// Visible membership did not change; ordering and page are untouched.
    Unchanged,
    /// Membership changed: cards were re-sorted and the page reset to 0.
    Reloaded { count: usize },
}

/// The paged result-card list over the currently visible annotations.
///
/// Ordering contract on reload:
/// - the annotation under the cursor (if still visible) comes first,
/// - everything else sorts ascending by title,
/// - title ties break by identifier, so the order is deterministic.
///
/// Membership is compared as an identifier set, so viewport jitter that
/// does not change which annotations are visible never reloads the cards.
#[derive(Debug, Default)]
pub struct ResultCards {
    annotations: Vec<Annotation>,
    current_ids: BTreeSet<AnnotationId>,
    page: usize,
    last_selected: Option<AnnotationId>,
    generation: u64,
}

impl ResultCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// The annotation under the cursor, if any.
    pub fn current(&self) -> Option<&Annotation> {
        self.annotations.get(self.page)
    }

    /// How many times the card list has been reloaded. Each `Reloaded`
    /// refresh is exactly one downstream notification.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_selected(&self) -> Option<&AnnotationId> {
        self.last_selected.as_ref()
    }

    pub fn set_last_selected(&mut self, id: Option<AnnotationId>) {
        self.last_selected = id;
    }

    /// Bounds-checked card lookup.
    pub fn select_card(&self, index: usize) -> Option<&Annotation> {
        self.annotations.get(index)
    }

    pub fn index_of(&self, id: &AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.identifier == *id)
    }

    /// Moves the cursor, ignoring out-of-range pages.
    pub fn set_page(&mut self, page: usize) {
        if page < self.annotations.len() {
            self.page = page;
        }
    }

    /// Replaces the card list with the new visible set.
    ///
    /// An unchanged identifier set is a no-op regardless of the order the
    /// annotations were discovered in.
    pub fn refresh(&mut self, new_visible: Vec<Annotation>) -> Refresh {
        let new_ids: BTreeSet<AnnotationId> = new_visible
            .iter()
            .map(|a| a.identifier.clone())
            .collect();

        if new_ids == self.current_ids {
            return Refresh::Unchanged;
        }

        let cursor = self.current().map(|a| a.identifier.clone());

        let mut sorted = new_visible;
        sorted.sort_by(|a, b| {
            let a_is_cursor = Some(&a.identifier) == cursor.as_ref();
            let b_is_cursor = Some(&b.identifier) == cursor.as_ref();
            match (a_is_cursor, b_is_cursor) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a
                    .title
                    .cmp(&b.title)
                    .then_with(|| a.identifier.cmp(&b.identifier)),
            }
        });

        let count = sorted.len();
        self.annotations = sorted;
        self.current_ids = new_ids;
        self.page = 0;
        self.generation += 1;

        Refresh::Reloaded { count }
    }
}

#[cfg(test)]
mod tests {
    use super::{Refresh, ResultCards};
    use annotations::Annotation;
    use foundation::Coordinate;
    use pretty_assertions::assert_eq;
    use providers::RawPlace;

    fn annotation(id: &str, title: &str) -> Annotation {
        let catalog = catalog::standard();
        let raw = RawPlace::with_id(id, title, Coordinate::new(1.0, 2.0));
        Annotation::from_raw(&raw, &catalog[0], "Local")
    }

    fn titles(cards: &ResultCards) -> Vec<&str> {
        cards.annotations().iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn sorts_alphabetically_without_a_cursor() {
        let mut cards = ResultCards::new();
        let refresh = cards.refresh(vec![
            annotation("b", "Banana Place"),
            annotation("a", "Apple Place"),
        ]);

        assert_eq!(refresh, Refresh::Reloaded { count: 2 });
        assert_eq!(titles(&cards), vec!["Apple Place", "Banana Place"]);
        assert_eq!(cards.page(), 0);
    }

    #[test]
    fn keeps_the_cursor_annotation_first() {
        let mut cards = ResultCards::new();
        cards.refresh(vec![
            annotation("a", "Apple Place"),
            annotation("b", "Banana Place"),
        ]);
        cards.set_page(1); // cursor on "Banana Place"

        cards.refresh(vec![
            annotation("a", "Apple Place"),
            annotation("b", "Banana Place"),
            annotation("c", "Cherry Place"),
        ]);

        assert_eq!(
            titles(&cards),
            vec!["Banana Place", "Apple Place", "Cherry Place"]
        );
        assert_eq!(cards.page(), 0);
    }

    #[test]
    fn unchanged_membership_is_a_no_op() {
        let mut cards = ResultCards::new();
        cards.refresh(vec![
            annotation("a", "Apple Place"),
            annotation("b", "Banana Place"),
        ]);
        cards.set_page(1);
        let generation = cards.generation();

        // Same identifiers, different discovery order.
        let refresh = cards.refresh(vec![
            annotation("b", "Banana Place"),
            annotation("a", "Apple Place"),
        ]);

        assert_eq!(refresh, Refresh::Unchanged);
        assert_eq!(cards.page(), 1);
        assert_eq!(cards.generation(), generation);
    }

    #[test]
    fn title_ties_break_by_identifier() {
        let mut cards = ResultCards::new();
        cards.refresh(vec![
            annotation("2", "Same Name"),
            annotation("1", "Same Name"),
        ]);

        let ids: Vec<&str> = cards
            .annotations()
            .iter()
            .map(|a| a.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn select_card_is_bounds_checked() {
        let mut cards = ResultCards::new();
        cards.refresh(vec![annotation("a", "Apple Place")]);

        assert!(cards.select_card(0).is_some());
        assert!(cards.select_card(1).is_none());
    }

    #[test]
    fn membership_change_resets_the_page() {
        let mut cards = ResultCards::new();
        cards.refresh(vec![
            annotation("a", "Apple Place"),
            annotation("b", "Banana Place"),
        ]);
        cards.set_page(1);

        cards.refresh(vec![annotation("a", "Apple Place")]);
        assert_eq!(cards.page(), 0);
        assert_eq!(titles(&cards), vec!["Apple Place"]);
    }
}
