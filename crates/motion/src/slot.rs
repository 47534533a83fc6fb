/// The per-frame transitions an avatar can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    SittingDown,
    StandingUp,
    GoingToSeat,
}

/// Holds the single registered per-frame transition callback.
#[derive(Debug, Default)]
pub struct CallbackSlot {
    active: Option<TransitionKind>,
}

impl CallbackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kind`, first deregistering whatever else was registered.
    pub fn register(&mut self, kind: TransitionKind) {
        if let Some(previous) = self.active.take() {
            if previous != kind {
                tracing::debug!(?previous, "deregistered transition on switch");
            }
        }
        self.active = Some(kind);
        tracing::debug!(?kind, "registered transition");
    }

    /// Deregister `kind` if it is the registered callback.
    ///
    /// Always succeeds; returns whether anything was removed.
    pub fn deregister(&mut self, kind: TransitionKind) -> bool {
        if self.active == Some(kind) {
            self.active = None;
            tracing::debug!(?kind, "deregistered transition");
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<TransitionKind> {
        self.active
    }

    pub fn is_registered(&self, kind: TransitionKind) -> bool {
        self.active == Some(kind)
    }
}
