//! Held-modifier state machine
//!
//! ```text
//! Idle --enable--> Held --probe false--> PausedForResync --probe true--> Held
//!   ^                |                          |
//!   +----disable-----+--------disable-----------+
//! ```
//!
//! [`ModifierHold::next`] only decides; the worker performs the key events
//! and delays for the returned [`Transition`] and then calls
//! [`ModifierHold::commit`].

/// Where the held modifier currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoldState {
    #[default]
    Idle,
    /// Key is physically down
    Held,
    /// Key released while outside the expected context, waiting to return
    PausedForResync,
}

/// Side effect required to move to the next state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Key down, then a short settle
    Engage,
    /// Quantized delay, then key up
    Suspend,
    /// Short fixed delay, then key down
    Resume,
    /// Key up when `release`, i.e. only if it is physically down
    Disengage { release: bool },
}

impl Transition {
    /// State reached once the transition's effects have run
    pub fn target(self) -> HoldState {
        match self {
            Transition::Engage | Transition::Resume => HoldState::Held,
            Transition::Suspend => HoldState::PausedForResync,
            Transition::Disengage { .. } => HoldState::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierHold {
    state: HoldState,
}

impl ModifierHold {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Whether the feature considers the key held (including while paused)
    pub fn held(&self) -> bool {
        self.state != HoldState::Idle
    }

    pub fn needs_resync(&self) -> bool {
        self.state == HoldState::PausedForResync
    }

    /// Decide the next transition
    ///
    /// `in_context` is only evaluated when the answer matters.
    pub fn next(&self, enabled: bool, in_context: impl FnOnce() -> bool) -> Option<Transition> {
        match (self.state, enabled) {
            (HoldState::Idle, true) => Some(Transition::Engage),
            (HoldState::Idle, false) => None,
            (HoldState::Held, true) => (!in_context()).then_some(Transition::Suspend),
            (HoldState::PausedForResync, true) => in_context().then_some(Transition::Resume),
            (HoldState::Held, false) => Some(Transition::Disengage { release: true }),
            (HoldState::PausedForResync, false) => Some(Transition::Disengage { release: false }),
        }
    }

    pub fn commit(&mut self, transition: Transition) {
        self.state = transition.target();
    }
}
