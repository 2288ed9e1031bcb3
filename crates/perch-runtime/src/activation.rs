#![forbid(unsafe_code)]

//! Which tooltip is shown, and how a switch between two of them is sequenced.
//!
//! At most one tooltip is presented at a time. Tapping a second target while
//! one is showing hides the first immediately and shows the second one event
//! loop turn later, through a continuation in the [`DeferredQueue`]. The host
//! drains that queue with [`ActivationController::run_deferred`].
//!
//! # State machine
//!
//! ```text
//!            tap(T)                      tap(active)
//!   Idle ───────────────▶ Presenting ─────────────────▶ Idle
//!                            │   ▲
//!                 tap(U≠T)   │   │ deferred(U), pending == U
//!                            ▼   │
//!                        Transitioning ── tap(V) ──▶ Transitioning (pending = V)
//! ```
//!
//! `dismiss()` returns to `Idle` from any phase. The active identity outlives
//! a dismissal so the hide animation can still find its anchor; the
//! presentation layer calls [`clear_active`](ActivationController::clear_active)
//! once its hide debounce fires.
//!
//! # Example
//!
//! ```
//! use perch_runtime::{ActivationController, Phase};
//!
//! let mut ctl = ActivationController::new();
//! ctl.tap("save");
//! assert_eq!(ctl.phase(), Phase::Presenting);
//!
//! // Switching hides first, then shows on the next turn.
//! ctl.tap("open");
//! assert!(!ctl.is_presented());
//! ctl.run_deferred();
//! assert_eq!(ctl.active(), Some(&"open"));
//! ```

use std::fmt;

use crate::deferred::DeferredQueue;

/// Snapshot of the activation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationState<K> {
    /// Identity whose tooltip is shown, or was shown last.
    pub active: Option<K>,
    /// Whether the active tooltip is currently visible.
    pub presented: bool,
    /// Target waiting for the deferred step of a switch.
    pub pending: Option<K>,
}

impl<K> Default for ActivationState<K> {
    fn default() -> Self {
        Self {
            active: None,
            presented: false,
            pending: None,
        }
    }
}

/// Phase derived from [`ActivationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing presented and nothing pending.
    Idle,
    Presenting,
    /// A switch is waiting for its deferred continuation.
    Transitioning,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::Transitioning => "transitioning",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deferred half of a switch: show `captured` if it is still the one waiting.
#[derive(Debug, Clone)]
struct Continuation<K> {
    captured: K,
}

/// Single-tooltip activation controller.
#[derive(Debug, Clone)]
pub struct ActivationController<K> {
    state: ActivationState<K>,
    deferred: DeferredQueue<Continuation<K>>,
}

impl<K> Default for ActivationController<K> {
    fn default() -> Self {
        Self {
            state: ActivationState::default(),
            deferred: DeferredQueue::new(),
        }
    }
}

impl<K: Clone + Eq + fmt::Debug> ActivationController<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state snapshot.
    #[inline]
    pub fn state(&self) -> &ActivationState<K> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.pending.is_some() {
            Phase::Transitioning
        } else if self.state.presented {
            Phase::Presenting
        } else {
            Phase::Idle
        }
    }

    #[inline]
    pub fn is_presented(&self) -> bool {
        self.state.presented
    }

    #[inline]
    pub fn active(&self) -> Option<&K> {
        self.state.active.as_ref()
    }

    #[inline]
    pub fn pending(&self) -> Option<&K> {
        self.state.pending.as_ref()
    }

    /// Number of continuations waiting for [`run_deferred`](Self::run_deferred).
    #[inline]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Handle a tap on `id`. Returns the phase after the tap.
    pub fn tap(&mut self, id: K) -> Phase {
        let from = self.phase();
        match from {
            Phase::Idle => {
                self.state.active = Some(id.clone());
                self.state.presented = true;
            }
            Phase::Presenting if self.state.active.as_ref() == Some(&id) => {
                self.state.presented = false;
            }
            Phase::Presenting | Phase::Transitioning => {
                self.state.presented = false;
                self.state.pending = Some(id.clone());
                self.deferred.schedule(Continuation {
                    captured: id.clone(),
                });
            }
        }
        let to = self.phase();
        tracing::debug!(
            target: "perch.activation",
            id = ?id,
            from = from.as_str(),
            to = to.as_str(),
            "tap"
        );
        to
    }

    /// Hide whatever is shown and forget any pending switch.
    pub fn dismiss(&mut self) {
        let from = self.phase();
        self.state.pending = None;
        self.state.presented = false;
        tracing::debug!(
            target: "perch.activation",
            active = ?self.state.active,
            from = from.as_str(),
            to = Phase::Idle.as_str(),
            "dismiss"
        );
    }

    /// Drop the active identity after the hide has finished.
    ///
    /// Only takes effect in [`Phase::Idle`]; returns whether anything was
    /// cleared.
    pub fn clear_active(&mut self) -> bool {
        if self.state.presented || self.state.pending.is_some() {
            return false;
        }
        let cleared = self.state.active.take();
        if cleared.is_some() {
            tracing::debug!(
                target: "perch.activation",
                id = ?cleared,
                "clear_active"
            );
        }
        cleared.is_some()
    }

    /// Run every continuation queued before this call, oldest first.
    ///
    /// Continuations scheduled while the batch runs wait for the next call.
    /// Returns how many continuations ran.
    pub fn run_deferred(&mut self) -> usize {
        let batch = self.deferred.take_batch();
        let ran = batch.len();
        for continuation in batch {
            self.resume(continuation);
        }
        ran
    }

    /// Back to a fresh controller, dropping queued continuations.
    pub fn reset(&mut self) {
        self.state = ActivationState::default();
        self.deferred.clear();
        tracing::debug!(target: "perch.activation", "reset");
    }

    fn resume(&mut self, continuation: Continuation<K>) {
        if self.state.pending.as_ref() != Some(&continuation.captured) {
            tracing::trace!(
                target: "perch.activation",
                captured = ?continuation.captured,
                pending = ?self.state.pending,
                "stale continuation skipped"
            );
            return;
        }
        let from = self.phase();
        self.state.pending = None;
        self.state.active = Some(continuation.captured);
        self.state.presented = true;
        tracing::debug!(
            target: "perch.activation",
            id = ?self.state.active,
            from = from.as_str(),
            to = Phase::Presenting.as_str(),
            "switch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn tap_from_idle_presents() {
        let mut ctl = ActivationController::new();
        assert_eq!(ctl.tap(1), Phase::Presenting);
        assert_eq!(ctl.active(), Some(&1));
        assert!(ctl.is_presented());
        assert_eq!(ctl.deferred_len(), 0);
    }

    #[test]
    fn tap_on_active_toggles_off() {
        let mut ctl = ActivationController::new();
        ctl.tap(1);
        assert_eq!(ctl.tap(1), Phase::Idle);
        assert!(!ctl.is_presented());
        // Identity lingers for the hide animation.
        assert_eq!(ctl.active(), Some(&1));
    }

    #[test]
    fn switch_hides_then_shows_next_turn() {
        let mut ctl = ActivationController::new();
        ctl.tap("a");
        assert_eq!(ctl.tap("b"), Phase::Transitioning);
        assert!(!ctl.is_presented());
        assert_eq!(ctl.active(), Some(&"a"));
        assert_eq!(ctl.pending(), Some(&"b"));

        assert_eq!(ctl.run_deferred(), 1);
        assert_eq!(ctl.phase(), Phase::Presenting);
        assert_eq!(ctl.active(), Some(&"b"));
        assert_eq!(ctl.pending(), None);
    }

    #[test]
    fn later_tap_supersedes_pending_switch() {
        let mut ctl = ActivationController::new();
        ctl.tap('a');
        ctl.tap('b');
        ctl.tap('c');
        assert_eq!(ctl.pending(), Some(&'c'));
        assert_eq!(ctl.deferred_len(), 2);

        assert_eq!(ctl.run_deferred(), 2);
        assert_eq!(ctl.active(), Some(&'c'));
        assert!(ctl.is_presented());
    }

    #[test]
    fn dismiss_cancels_pending_switch() {
        let mut ctl = ActivationController::new();
        ctl.tap(1);
        ctl.tap(2);
        ctl.dismiss();
        assert_eq!(ctl.phase(), Phase::Idle);
        ctl.run_deferred();
        assert!(!ctl.is_presented());
        assert_eq!(ctl.active(), Some(&1));
    }

    #[test]
    fn tap_in_idle_replaces_lingering_active() {
        let mut ctl = ActivationController::new();
        ctl.tap(1);
        ctl.dismiss();
        assert_eq!(ctl.tap(2), Phase::Presenting);
        assert_eq!(ctl.active(), Some(&2));
    }

    #[test]
    fn clear_active_only_when_idle() {
        let mut ctl = ActivationController::new();
        assert!(!ctl.clear_active());

        ctl.tap(1);
        assert!(!ctl.clear_active());
        assert_eq!(ctl.active(), Some(&1));

        ctl.tap(2);
        assert!(!ctl.clear_active());

        ctl.dismiss();
        assert!(ctl.clear_active());
        assert_eq!(ctl.active(), None);
    }

    #[test]
    fn reset_drops_queued_continuations() {
        let mut ctl = ActivationController::new();
        ctl.tap(1);
        ctl.tap(2);
        ctl.reset();
        assert_eq!(ctl.deferred_len(), 0);
        assert_eq!(ctl.state(), &ActivationState::default());
        assert_eq!(ctl.run_deferred(), 0);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::Transitioning.as_str(), "transitioning");
    }

    // ── Tracing capture ──────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: tracing::Level,
        target: String,
        fields: HashMap<String, String>,
    }

    struct EventCapture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    struct FieldVisitor(Vec<(String, String)>);

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor(Vec::new());
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                fields: visitor.0.into_iter().collect(),
            });
        }
    }

    fn with_captured_tracing<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(EventCapture {
            events: events.clone(),
        });
        tracing::subscriber::with_default(subscriber, f);
        let captured = events.lock().unwrap().clone();
        captured
    }

    #[test]
    fn transitions_are_logged_under_activation_target() {
        let events = with_captured_tracing(|| {
            let mut ctl = ActivationController::new();
            ctl.tap(1);
            ctl.tap(2);
            ctl.run_deferred();
            ctl.dismiss();
        });

        let messages: Vec<_> = events
            .iter()
            .filter(|e| e.target == "perch.activation" && e.level == tracing::Level::DEBUG)
            .filter_map(|e| e.fields.get("message").cloned())
            .collect();
        assert_eq!(messages, vec!["tap", "tap", "switch", "dismiss"]);

        let switch_tap = events
            .iter()
            .filter(|e| e.fields.get("message").is_some_and(|m| m == "tap"))
            .nth(1)
            .expect("second tap event");
        assert_eq!(switch_tap.fields["from"], "presenting");
        assert_eq!(switch_tap.fields["to"], "transitioning");
    }

    #[test]
    fn stale_continuation_is_traced_not_applied() {
        let events = with_captured_tracing(|| {
            let mut ctl = ActivationController::new();
            ctl.tap(1);
            ctl.tap(2);
            ctl.dismiss();
            ctl.run_deferred();
        });
        assert!(events.iter().any(|e| {
            e.level == tracing::Level::TRACE
                && e.fields
                    .get("message")
                    .is_some_and(|m| m == "stale continuation skipped")
        }));
    }
}
