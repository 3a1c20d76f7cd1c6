//! Host-environment exit signals.
//!
//! Three independent host-level signals can each decide that the session is
//! over: an explicit close action, reverse/back navigation, and tab or
//! window unload. The controller treats them uniformly: every trigger maps
//! to the same idempotent teardown, with "first trigger wins" enforced by
//! the session actor's consumed flag.
//!
//! [`LifecycleHost`] decouples the controller from any specific host's
//! event names; embedders adapt their environment (a browser shim, a native
//! window system, a test harness) to this one interface.

use crate::events::{EventSource, Subscription};

/// Which host signal requested the exit. Informational only; every trigger
/// runs the same teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTrigger {
    /// The user explicitly closed the session (e.g. a leave button).
    CloseRequested,
    /// Reverse/back navigation away from the session view.
    BackNavigation,
    /// The hosting tab or window is unloading.
    Unload,
}

impl std::fmt::Display for ExitTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitTrigger::CloseRequested => write!(f, "close-requested"),
            ExitTrigger::BackNavigation => write!(f, "back-navigation"),
            ExitTrigger::Unload => write!(f, "unload"),
        }
    }
}

/// Capability interface for host exit signals.
pub trait LifecycleHost: Send + Sync {
    /// Install a handler invoked on every exit trigger. The handler stays
    /// installed until the returned subscription is dropped.
    fn on_exit_requested(
        &self,
        handler: Box<dyn Fn(ExitTrigger) + Send + Sync>,
    ) -> Subscription;
}

/// [`EventSource`]-backed [`LifecycleHost`].
///
/// Embedders forward their environment's close/navigation/unload events into
/// [`ExitSignals::fire`]; tests drive teardown the same way.
#[derive(Clone, Default)]
pub struct ExitSignals {
    source: EventSource<ExitTrigger>,
}

impl ExitSignals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an exit trigger to all installed handlers.
    pub fn fire(&self, trigger: ExitTrigger) {
        self.source.emit(trigger);
    }

    /// Number of installed exit handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.source.subscriber_count()
    }
}

impl LifecycleHost for ExitSignals {
    fn on_exit_requested(
        &self,
        handler: Box<dyn Fn(ExitTrigger) + Send + Sync>,
    ) -> Subscription {
        self.source.subscribe(move |trigger| handler(trigger))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fire_reaches_handler() {
        let signals = ExitSignals::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _sub = signals.on_exit_requested(Box::new(move |t| {
            seen_clone.lock().unwrap().push(t);
        }));

        signals.fire(ExitTrigger::BackNavigation);
        signals.fire(ExitTrigger::Unload);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![ExitTrigger::BackNavigation, ExitTrigger::Unload]
        );
    }

    #[test]
    fn test_dropped_handler_not_invoked() {
        let signals = ExitSignals::new();
        let sub = signals.on_exit_requested(Box::new(|_| {}));
        assert_eq!(signals.handler_count(), 1);
        drop(sub);
        assert_eq!(signals.handler_count(), 0);
        signals.fire(ExitTrigger::CloseRequested);
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(ExitTrigger::CloseRequested.to_string(), "close-requested");
        assert_eq!(ExitTrigger::BackNavigation.to_string(), "back-navigation");
        assert_eq!(ExitTrigger::Unload.to_string(), "unload");
    }
}
