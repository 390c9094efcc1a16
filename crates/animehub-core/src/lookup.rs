//! Generation-guarded panels for remote catalog lookups.
//!
//! Every lookup takes a [`LookupToken`] when it starts. Its result is applied
//! only if no newer lookup has started on the same panel since; otherwise it
//! is dropped.

/// Identifies one in-flight lookup on one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken {
    generation: u64,
}

/// What a panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

/// A panel fed by remote lookups.
#[derive(Debug)]
pub struct Panel<T> {
    name: &'static str,
    generation: u64,
    state: PanelState<T>,
}

impl<T> Panel<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            state: PanelState::Idle,
        }
    }

    /// Start a lookup; any earlier in-flight lookup becomes stale.
    pub fn begin(&mut self) -> LookupToken {
        self.generation += 1;
        self.state = PanelState::Loading;
        LookupToken {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, token: LookupToken) -> bool {
        token.generation == self.generation
    }

    /// Apply a finished lookup. Returns `false` if the result was stale and dropped.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        token: LookupToken,
        result: Result<T, E>,
    ) -> bool {
        if !self.is_current(token) {
            tracing::debug!(
                panel = self.name,
                stale = token.generation,
                current = self.generation,
                "Discarding stale lookup result"
            );
            return false;
        }
        self.state = match result {
            Ok(value) => PanelState::Loaded(value),
            Err(e) => {
                tracing::warn!(panel = self.name, error = %e, "Catalog lookup failed");
                PanelState::Failed(e.to_string())
            }
        };
        true
    }

    /// Reset to idle and invalidate anything in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = PanelState::Idle;
    }

    pub fn state(&self) -> &PanelState<T> {
        &self.state
    }

    pub fn loaded(&self) -> Option<&T> {
        match &self.state {
            PanelState::Loaded(v) => Some(v),
            _ => None,
        }
    }
}
