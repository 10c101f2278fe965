use annotations::AnnotationId;

/// A programmatic action whose echo is about to come back from the map
/// surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// A programmatic annotation selection; the next selection callback for
    /// this id is our own echo.
    Select(AnnotationId),
    /// A programmatic recenter; the next region-will-change is our own echo.
    RegionShift,
}

/// One-shot suppression token for programmatic map actions.
///
/// Armed immediately before issuing a programmatic selection or region
/// change, consumed by the matching callback, suppressing exactly one
/// round-trip. At most one action is pending at a time.
#[derive(Debug, Default)]
pub struct Pending(Option<PendingAction>);

impl Pending {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, action: PendingAction) {
        self.0 = Some(action);
    }

    /// Consumes the token iff it matches `action`. Returns `true` when the
    /// caller should treat the callback as an echo and suppress it.
    pub fn consume(&mut self, action: &PendingAction) -> bool {
        if self.0.as_ref() == Some(action) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}
