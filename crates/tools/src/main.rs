//! Scripted walkthrough of the POI core against canned providers.
//!
//! Stands in for the real map surface: every interaction a user would
//! perform is issued here in order, and the commands the core emits toward
//! the map are logged instead of rendered.

use std::sync::Arc;

use foundation::{Coordinate, Region, Span};
use providers::{CannedProvider, PlaceProvider, RawPlace, overpass};
use session::{MapSession, ToggleOutcome};
use sheet::SheetConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn downtown() -> Region {
    Region::new(Coordinate::new(48.137, 11.575), Span::new(0.06, 0.06))
}

fn suburbs() -> Region {
    Region::new(Coordinate::new(48.25, 11.65), Span::new(0.06, 0.06))
}

/// A local-search style provider: stable external ids.
fn local_provider(catalog: &[catalog::Category]) -> CannedProvider {
    CannedProvider::new("Local")
        .with_places(
            &catalog[2],
            vec![
                RawPlace::with_id("eat-101", "Cafe Luna", Coordinate::new(48.138, 11.574)),
                RawPlace::with_id("eat-102", "Brasserie Nord", Coordinate::new(48.141, 11.581)),
                RawPlace::with_id("eat-103", "Trattoria Sole", Coordinate::new(48.252, 11.648)),
            ],
        )
        .with_places(
            &catalog[4],
            vec![RawPlace::with_id(
                "mus-201",
                "City Museum",
                Coordinate::new(48.139, 11.571),
            )],
        )
}

/// An Overpass style provider: no stable ids, identifiers get synthesized.
fn osm_provider(catalog: &[catalog::Category]) -> CannedProvider {
    CannedProvider::new("OpenStreetMap").with_places(
        &catalog[2],
        vec![
            RawPlace::anonymous("Backstube Mehl", Coordinate::new(48.136, 11.578)),
            RawPlace::anonymous("Cafe Luna", Coordinate::new(48.138, 11.574)),
        ],
    )
}

fn apply_commands(session: &MapSession, stage: &str) {
    for command in session.drain_commands() {
        info!(stage, ?command, "-> map surface");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog = catalog::standard();
    let providers: Vec<Arc<dyn PlaceProvider>> = vec![
        Arc::new(local_provider(&catalog)),
        Arc::new(osm_provider(&catalog)),
    ];
    let session = MapSession::new(
        catalog.clone(),
        providers,
        downtown(),
        SheetConfig::default(),
    );

    let eat = catalog[2].clone();
    if let Some(query) = overpass::build_query(&eat.osm_tags, downtown()) {
        info!(category = %eat.title, query, "overpass query this toggle would issue");
    }

    // Toggle "Eat" on: both providers answer, results merge by identifier.
    match session.toggle_category(&eat).await {
        ToggleOutcome::Selected { report, refresh } => {
            info!(?report, ?refresh, "category load settled")
        }
        ToggleOutcome::Deselected { .. } => unreachable!("first toggle selects"),
    }
    apply_commands(&session, "toggle on");
    info!(
        sheet = ?session.sheet_state(),
        cards = session.card_count(),
        "after toggle"
    );

    // The user taps the second result card's pin on the map.
    if let Some(annotation) = session.visible().into_iter().nth(1) {
        let transition = session.on_annotation_selected(&annotation.identifier);
        info!(pin = %annotation.title, ?transition, page = session.card_page(), "pin tapped");
    }

    // Swipe back to the first card; the core selects its pin for us.
    session.on_card_scroll_ended(0);
    apply_commands(&session, "card swipe");

    // Fling the sheet down: deselect everything, sheet minimizes.
    session.on_drag_began();
    session.on_drag_changed(30.0);
    let resolution = session.on_drag_ended(700.0);
    info!(?resolution, "sheet flung down");
    apply_commands(&session, "drag");

    // Pan out to the suburbs: the downtown pins leave the viewport, the
    // reload fills in what the new region has.
    session.on_region_will_change();
    let change = session.on_region_did_change(suburbs()).await;
    info!(
        immediate = ?change.immediate,
        settled = ?change.settled,
        "panned to the suburbs"
    );
    apply_commands(&session, "pan");

    // Toggle "Eat" off again: one atomic removal batch.
    match session.toggle_category(&eat).await {
        ToggleOutcome::Deselected { removed, refresh } => {
            info!(removed, ?refresh, "category removed")
        }
        ToggleOutcome::Selected { .. } => unreachable!("second toggle deselects"),
    }
    apply_commands(&session, "toggle off");
    info!(sheet = ?session.sheet_state(), "done");
}
