pub mod cards;
pub mod pending;
pub mod state;

pub use cards::{Refresh, ResultCards};
pub use pending::{Pending, PendingAction};
pub use state::{
    AnimationParams, DragEffect, DragResolution, SheetConfig, SheetMachine, SheetState, Transition,
};
