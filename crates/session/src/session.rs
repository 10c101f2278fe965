use std::collections::BTreeSet;
use std::sync::Arc;

use annotations::{Annotation, AnnotationId, AnnotationStore, visible_annotations};
use catalog::{Category, CategorySelection};
use foundation::{Coordinate, Region, Span};
use parking_lot::Mutex;
use providers::PlaceProvider;
use sheet::{
    DragEffect, DragResolution, Pending, PendingAction, Refresh, ResultCards, SheetConfig,
    SheetMachine, SheetState, Transition,
};
use tracing::{debug, info};

use crate::aggregator::{Aggregator, LoadReport};
use crate::surface::{CommandSink, MapCommand};

/// Result of one presentation refresh pass (cards + sheet).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub cards: Refresh,
    pub sheet: Transition,
}

/// Result of a region change: the immediate pass runs against whatever the
/// store held at the time, the settled pass after the reloads completed.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionChange {
    pub immediate: RefreshOutcome,
    pub settled: RefreshOutcome,
    pub reports: Vec<LoadReport>,
}

/// Result of toggling a category.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Selected {
        report: LoadReport,
        refresh: RefreshOutcome,
    },
    Deselected {
        removed: usize,
        refresh: RefreshOutcome,
    },
}

struct SessionInner {
    catalog: Vec<Category>,
    selection: Arc<Mutex<CategorySelection>>,
    store: Arc<Mutex<AnnotationStore>>,
    commands: Arc<Mutex<CommandSink>>,
    aggregator: Aggregator,
    cards: Mutex<ResultCards>,
    sheet: Mutex<SheetMachine>,
    pending: Mutex<Pending>,
    selected_ids: Mutex<BTreeSet<AnnotationId>>,
    viewport: Mutex<Region>,
}

/// Wires the aggregation store, viewport filter, result cards and sheet
/// machine together and reacts to map-surface events.
///
/// All components are constructed once and connected by reference; nothing
/// is discovered at runtime. The session is cheap to clone (shared inner)
/// so in-flight loads can be driven as detached tasks by the embedder.
///
/// Locking: every lock is taken for a short synchronous scope and never
/// held across a provider await.
#[derive(Clone)]
pub struct MapSession {
    inner: Arc<SessionInner>,
}

impl MapSession {
    pub fn new(
        catalog: Vec<Category>,
        providers: Vec<Arc<dyn PlaceProvider>>,
        initial_viewport: Region,
        config: SheetConfig,
    ) -> Self {
        let selection = Arc::new(Mutex::new(CategorySelection::new()));
        let store = Arc::new(Mutex::new(AnnotationStore::new()));
        let commands = Arc::new(Mutex::new(CommandSink::new()));
        let aggregator = Aggregator::new(
            providers,
            Arc::clone(&store),
            Arc::clone(&selection),
            Arc::clone(&commands),
        );

        MapSession {
            inner: Arc::new(SessionInner {
                catalog,
                selection,
                store,
                commands,
                aggregator,
                cards: Mutex::new(ResultCards::new()),
                sheet: Mutex::new(SheetMachine::new(config)),
                pending: Mutex::new(Pending::new()),
                selected_ids: Mutex::new(BTreeSet::new()),
                viewport: Mutex::new(initial_viewport),
            }),
        }
    }

    pub fn catalog(&self) -> &[Category] {
        &self.inner.catalog
    }

    pub fn sheet_state(&self) -> SheetState {
        self.inner.sheet.lock().state()
    }

    pub fn sheet_config(&self) -> SheetConfig {
        *self.inner.sheet.lock().config()
    }

    pub fn card_page(&self) -> usize {
        self.inner.cards.lock().page()
    }

    pub fn card_count(&self) -> usize {
        self.inner.cards.lock().len()
    }

    /// Card reload counter; each membership change increments it once.
    pub fn cards_generation(&self) -> u64 {
        self.inner.cards.lock().generation()
    }

    pub fn annotation_count(&self) -> usize {
        self.inner.store.lock().len()
    }

    pub fn viewport(&self) -> Region {
        *self.inner.viewport.lock()
    }

    /// Annotations currently inside the viewport, in store order.
    pub fn visible(&self) -> Vec<Annotation> {
        let viewport = *self.inner.viewport.lock();
        visible_annotations(&self.inner.store.lock(), viewport)
    }

    /// Hands the accumulated map commands to the embedder.
    pub fn drain_commands(&self) -> Vec<MapCommand> {
        self.inner.commands.lock().drain()
    }

    /// Toggles a category on (load + refresh) or off (batch removal + one
    /// refresh). The select path suspends only at the provider boundary.
    pub async fn toggle_category(&self, category: &Category) -> ToggleOutcome {
        let now_selected = self.inner.selection.lock().toggle(category);

        if now_selected {
            info!(category = %category.title, "category selected");
            let region = self.viewport();
            let report = self.inner.aggregator.load_category(category, region).await;
            let refresh = self.refresh_presentation();
            ToggleOutcome::Selected { report, refresh }
        } else {
            info!(category = %category.title, "category deselected");
            let removed = self.inner.aggregator.remove_category(category);
            // One refresh for the whole batch, not one per annotation.
            let refresh = self.refresh_presentation();
            ToggleOutcome::Deselected { removed, refresh }
        }
    }

    /// The map camera is about to move.
    ///
    /// A maximized sheet drops to minimized and any selected pins are
    /// deselected, unless this is the echo of our own programmatic
    /// recenter.
    pub fn on_region_will_change(&self) -> Transition {
        if self
            .inner
            .pending
            .lock()
            .consume(&PendingAction::RegionShift)
        {
            return Transition::Unchanged;
        }

        let transition = {
            let mut machine = self.inner.sheet.lock();
            if machine.state() == SheetState::Maximized {
                machine.transition(SheetState::Minimized)
            } else {
                Transition::Unchanged
            }
        };

        self.deselect_all();
        transition
    }

    /// The map camera stopped on a new region.
    ///
    /// Runs, in order: viewport recompute, a presentation pass against the
    /// current store, concurrent reloads of every selected category, and a
    /// second presentation pass once the reloads have settled.
    pub async fn on_region_did_change(&self, region: Region) -> RegionChange {
        *self.inner.viewport.lock() = region;

        let selected: Vec<Category> = {
            let selection = self.inner.selection.lock();
            selection
                .selected_from(&self.inner.catalog)
                .into_iter()
                .cloned()
                .collect()
        };
        let reloads = futures_util::future::join_all(
            selected
                .iter()
                .map(|category| self.inner.aggregator.load_category(category, region)),
        );

        let immediate = self.refresh_presentation();
        debug!(?immediate, "presentation refreshed before reload settled");

        let reports = reloads.await;
        let settled = self.refresh_presentation();

        RegionChange {
            immediate,
            settled,
            reports,
        }
    }

    /// A pin was selected on the map.
    ///
    /// For a user tap this aligns the card cursor and maximizes the sheet;
    /// the echo of our own programmatic selection is consumed without any
    /// further effect, so a card-driven selection costs exactly one
    /// round-trip.
    pub fn on_annotation_selected(&self, id: &AnnotationId) -> Transition {
        self.inner.selected_ids.lock().insert(id.clone());

        if self
            .inner
            .pending
            .lock()
            .consume(&PendingAction::Select(id.clone()))
        {
            debug!(id = id.as_str(), "programmatic selection echo consumed");
            return Transition::Unchanged;
        }

        let moved = {
            let mut cards = self.inner.cards.lock();
            match cards.index_of(id) {
                Some(index) => {
                    cards.set_page(index);
                    cards.set_last_selected(Some(id.clone()));
                    true
                }
                None => false,
            }
        };
        if !moved {
            return Transition::Unchanged;
        }

        self.inner.sheet.lock().transition(SheetState::Maximized)
    }

    /// A pin was deselected on the map. The sheet consequence is evaluated
    /// by `resolve_deselection`, which the embedder calls after the
    /// configured grace period.
    pub fn on_annotation_deselected(&self, id: &AnnotationId) {
        self.inner.selected_ids.lock().remove(id);
    }

    /// Settles the sheet after deselection: no visible annotations hides
    /// it, no remaining selection minimizes it, anything else leaves it
    /// alone.
    pub fn resolve_deselection(&self) -> Transition {
        let visible_count = self.visible().len();
        let selection_empty = self.inner.selected_ids.lock().is_empty();

        let mut machine = self.inner.sheet.lock();
        if visible_count == 0 {
            machine.transition(SheetState::Hidden)
        } else if selection_empty {
            machine.transition(SheetState::Minimized)
        } else {
            Transition::Unchanged
        }
    }

    /// The card carousel settled on a page.
    ///
    /// Only a maximized sheet drives map selection from the carousel.
    pub fn on_card_scroll_ended(&self, page: usize) {
        if self.inner.sheet.lock().state() != SheetState::Maximized {
            return;
        }

        let target = {
            let mut cards = self.inner.cards.lock();
            cards.set_page(page);
            cards.select_card(page).map(|a| a.identifier.clone())
        };

        if let Some(id) = target {
            self.select_annotation(&id);
        }
    }

    pub fn on_drag_began(&self) {
        self.inner.sheet.lock().drag_began();
    }

    pub fn on_drag_changed(&self, translation: f64) -> f64 {
        self.inner.sheet.lock().drag_changed(translation)
    }

    /// A sheet drag ended; applies the resolved state's selection side
    /// effect (select the current card, or deselect everything).
    pub fn on_drag_ended(&self, velocity: f64) -> DragResolution {
        let resolution = self.inner.sheet.lock().drag_ended(velocity);

        match resolution.effect {
            DragEffect::SelectCurrentResult => {
                let current = self
                    .inner
                    .cards
                    .lock()
                    .current()
                    .map(|a| a.identifier.clone());
                if let Some(id) = current {
                    self.select_annotation(&id);
                }
            }
            DragEffect::DeselectAll => self.deselect_all(),
        }

        resolution
    }

    /// Recenters the map programmatically. The resulting region callbacks
    /// are our own echo; the pending token keeps the will-change handler
    /// from collapsing the sheet over it.
    pub fn center_map(&self, coordinate: Coordinate, span: Option<Span>) {
        self.inner.pending.lock().arm(PendingAction::RegionShift);

        let mut commands = self.inner.commands.lock();
        match span {
            Some(span) => commands.push(MapCommand::SetRegion(Region::new(coordinate, span))),
            None => commands.push(MapCommand::SetCenter(coordinate)),
        }
    }

    /// Selects a pin programmatically, deselecting the previous card-driven
    /// selection first. Arms the pending token so the selection callback
    /// echo is suppressed.
    fn select_annotation(&self, id: &AnnotationId) {
        let last = self.inner.cards.lock().last_selected().cloned();
        if let Some(last) = last
            && last != *id
        {
            self.inner
                .commands
                .lock()
                .push(MapCommand::DeselectAnnotation(last));
        }

        self.inner
            .pending
            .lock()
            .arm(PendingAction::Select(id.clone()));
        self.inner
            .commands
            .lock()
            .push(MapCommand::SelectAnnotation(id.clone()));
        self.inner.cards.lock().set_last_selected(Some(id.clone()));
    }

    fn deselect_all(&self) {
        let ids: Vec<AnnotationId> = self.inner.selected_ids.lock().iter().cloned().collect();
        if ids.is_empty() {
            return;
        }

        let mut commands = self.inner.commands.lock();
        for id in ids {
            commands.push(MapCommand::DeselectAnnotation(id));
        }
    }

    /// One presentation pass: viewport filter, card refresh, sheet
    /// re-evaluation.
    fn refresh_presentation(&self) -> RefreshOutcome {
        let visible = self.visible();
        let cards_refresh = self.inner.cards.lock().refresh(visible);
        let count = self.inner.cards.lock().len();
        let sheet_transition = self.inner.sheet.lock().apply_visible_count(count);

        // An emptiness-driven hide releases whatever was still selected.
        if matches!(
            sheet_transition,
            Transition::Changed {
                to: SheetState::Hidden,
                ..
            }
        ) {
            self.deselect_all();
        }

        RefreshOutcome {
            cards: cards_refresh,
            sheet: sheet_transition,
        }
    }
}
