/// Bottom sheet anchor states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SheetState {
    Hidden,
    Minimized,
    Maximized,
}

/// Sheet geometry and gesture tuning.
///
/// Heights and velocities are in abstract layout units; the defaults match
/// the tuned values of the reference UI.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SheetConfig {
    pub minimized_height: f64,
    pub maximized_height: f64,
    /// Maximum overshoot past either anchor while dragging.
    pub max_stretch: f64,
    /// Fraction of the overshoot that survives rubber-band resistance.
    pub stretch_resistance: f64,
    /// Drag-end speed (units/sec) beyond which velocity overrides position.
    pub velocity_threshold: f64,
    /// Grace period before emptiness is re-evaluated after a deselect.
    ///
    /// The core owns no timer; this is data for the embedder, which calls
    /// `resolve_deselection` once the grace has elapsed.
    pub deselect_grace_ms: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            minimized_height: 110.0,
            maximized_height: 190.0,
            max_stretch: 35.0,
            stretch_resistance: 0.5,
            velocity_threshold: 500.0,
            deselect_grace_ms: 200,
        }
    }
}

impl SheetConfig {
    pub fn height_of(&self, state: SheetState) -> f64 {
        match state {
            SheetState::Hidden => 0.0,
            SheetState::Minimized => self.minimized_height,
            SheetState::Maximized => self.maximized_height,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.minimized_height + self.maximized_height) / 2.0
    }
}

/// Animation parameters the rendering layer replays for a transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnimationParams {
    pub duration: f64,
    pub damping: f64,
}

/// Result of asking the machine to move to a state.
///
/// Idempotence contract: asking for the current state yields `Unchanged`,
/// which must not restart animations or notify observers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transition {
    Unchanged,
    Changed {
        from: SheetState,
        to: SheetState,
        animation: AnimationParams,
    },
}

impl Transition {
    pub fn changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

/// Map-selection side effect owed after a drag resolves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragEffect {
    /// Entering Maximized: select the current result card's annotation.
    SelectCurrentResult,
    /// Entering Minimized: deselect everything on the map.
    DeselectAll,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragResolution {
    pub transition: Transition,
    pub effect: DragEffect,
}

/// The sheet state machine.
///
/// Owns the anchor state and the continuous drag height; every mutation
/// goes through the transition and drag entry points below.
#[derive(Debug)]
pub struct SheetMachine {
    config: SheetConfig,
    state: SheetState,
    drag_base: Option<f64>,
    drag_height: Option<f64>,
}

impl SheetMachine {
    pub fn new(config: SheetConfig) -> Self {
        SheetMachine {
            config,
            state: SheetState::Hidden,
            drag_base: None,
            drag_height: None,
        }
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Current sheet height: the live drag height while a gesture is in
    /// progress, the anchor height otherwise.
    pub fn height(&self) -> f64 {
        self.drag_height
            .unwrap_or_else(|| self.config.height_of(self.state))
    }

    /// Moves to `to`, reporting the animation the rendering layer should run.
    ///
    /// A request for the current state is a no-op.
    pub fn transition(&mut self, to: SheetState) -> Transition {
        if to == self.state {
            return Transition::Unchanged;
        }

        let from = self.state;
        self.state = to;
        Transition::Changed {
            from,
            to,
            animation: animation_for(from, to),
        }
    }

    /// Applies the visible-annotation count after a card refresh.
    ///
    /// Count 0 hides the sheet; the first visible annotation lifts a hidden
    /// sheet to minimized. A visible sheet is otherwise left where it is, so
    /// the sequence 0 -> n -> 0 never passes through Maximized.
    pub fn apply_visible_count(&mut self, count: usize) -> Transition {
        if count == 0 {
            self.transition(SheetState::Hidden)
        } else if self.state == SheetState::Hidden {
            self.transition(SheetState::Minimized)
        } else {
            Transition::Unchanged
        }
    }

    /// Drag started: snap the logical state to the nearest anchor by
    /// midpoint, which becomes the base the translation applies to.
    pub fn drag_began(&mut self) {
        let height = self.height();
        self.state = if height > self.config.midpoint() {
            SheetState::Maximized
        } else {
            SheetState::Minimized
        };
        self.drag_base = Some(self.config.height_of(self.state));
        self.drag_height = Some(height);
    }

    /// Drag moved by `translation` (positive = downward). Returns the new
    /// height after rubber-band resistance and overshoot clamping.
    pub fn drag_changed(&mut self, translation: f64) -> f64 {
        let base = self.drag_base.unwrap_or(self.config.minimized_height);
        let mut height = base - translation;

        if height > self.config.maximized_height {
            let stretch = (height - self.config.maximized_height) * self.config.stretch_resistance;
            height = self.config.maximized_height + stretch.min(self.config.max_stretch);
        } else if height < self.config.minimized_height {
            let stretch = (self.config.minimized_height - height) * self.config.stretch_resistance;
            height = self.config.minimized_height - stretch.min(self.config.max_stretch);
        }

        self.drag_height = Some(height);
        height
    }

    /// Drag ended with `velocity` (units/sec, negative = upward).
    ///
    /// Velocity beyond the threshold overrides position in either direction;
    /// otherwise the midpoint of travel decides.
    pub fn drag_ended(&mut self, velocity: f64) -> DragResolution {
        let height = self.height();
        self.drag_base = None;
        self.drag_height = None;

        let target = if velocity <= -self.config.velocity_threshold {
            SheetState::Maximized
        } else if velocity >= self.config.velocity_threshold {
            SheetState::Minimized
        } else if height > self.config.midpoint() {
            SheetState::Maximized
        } else {
            SheetState::Minimized
        };

        let effect = match target {
            SheetState::Maximized => DragEffect::SelectCurrentResult,
            _ => DragEffect::DeselectAll,
        };

        DragResolution {
            transition: self.transition(target),
            effect,
        }
    }
}

// Per-pair animation tuning carried over from the reference UI.
fn animation_for(from: SheetState, to: SheetState) -> AnimationParams {
    match (from, to) {
        (SheetState::Minimized, SheetState::Hidden) => AnimationParams {
            duration: 1.0,
            damping: 1.0,
        },
        (SheetState::Maximized, SheetState::Hidden) => AnimationParams {
            duration: 1.2,
            damping: 1.0,
        },
        (SheetState::Hidden, SheetState::Minimized) => AnimationParams {
            duration: 1.0,
            damping: 1.0,
        },
        _ => AnimationParams {
            duration: 0.5,
            damping: 0.6,
        },
    }
}
