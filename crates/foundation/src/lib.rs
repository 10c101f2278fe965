pub mod coordinate;
pub mod region;

// Foundation crate: small, well-tested primitives only.
pub use coordinate::*;
pub use region::*;
