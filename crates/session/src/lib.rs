//! Session orchestration for the POI map core.
//!
//! Wires the category selection, provider aggregation, viewport filter,
//! result cards and sheet state machine into one stateful object driven by
//! map-surface events. The map surface itself stays external: the session
//! consumes its callbacks as plain method calls and answers with commands
//! the embedder drains and applies.

pub mod aggregator;
pub mod session;
pub mod surface;

pub use aggregator::{Aggregator, LoadReport};
pub use session::{MapSession, RefreshOutcome, RegionChange, ToggleOutcome};
pub use surface::{CommandSink, MapCommand};
