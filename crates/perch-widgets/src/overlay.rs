#![forbid(unsafe_code)]

//! The tooltip overlay: one bubble drawn above the host's content.
//!
//! [`TooltipOverlay`] ties the pieces together:
//!
//! - taps go to the [`ActivationController`];
//! - [`layout`](TooltipOverlay::layout) looks up the active target, solves its
//!   placement and returns everything needed to draw the bubble;
//! - hiding starts a debounce, after which the active identity is cleared;
//! - a pointer moving outside the active target dismisses the bubble.
//!
//! The host owns the clock and the event loop. Each turn it calls
//! [`run_deferred`](TooltipOverlay::run_deferred) and
//! [`tick`](TooltipOverlay::tick), then draws whatever `layout` returns.

use std::fmt;
use std::hash::Hash;

use perch_core::animation::Animation;
use perch_core::{Insets, Point, Rect, Size};
use perch_layout::{Placement, PlacementRequest, solve};
use perch_runtime::{ActivationController, Debouncer, OverlayConfig, Phase};
use perch_style::TooltipStyle;
use web_time::Instant;

use crate::bubble::BubbleShape;
use crate::registry::{AnchorLookup, TargetRegistration, TargetRegistry};
use crate::transition::{Transition, TransitionFrame};

/// The container the overlay draws in and what obstructs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub safe_area: Insets,
    pub keyboard_height: f64,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            safe_area: Insets::ZERO,
            keyboard_height: 0.0,
        }
    }

    #[must_use]
    pub fn safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self
    }

    #[must_use]
    pub fn keyboard_height(mut self, height: f64) -> Self {
        self.keyboard_height = height;
        self
    }
}

/// Everything needed to draw the bubble for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLayout<K> {
    pub id: K,
    pub text: String,
    /// Target rectangle the bubble is attached to.
    pub target: Rect,
    pub placement: Placement,
    pub shape: BubbleShape,
    /// Label area inside the bubble.
    pub content: Rect,
    /// `false` while the bubble is hiding.
    pub presented: bool,
}

/// Single-bubble tooltip overlay.
pub struct TooltipOverlay<K> {
    config: OverlayConfig,
    style: TooltipStyle,
    controller: ActivationController<K>,
    registry: TargetRegistry<K>,
    measured: Option<Size>,
    hide: Debouncer<()>,
    transition: Option<Transition>,
    was_presented: bool,
    last_tick: Option<Instant>,
}

impl<K: fmt::Debug> fmt::Debug for TooltipOverlay<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipOverlay")
            .field("controller", &self.controller)
            .field(
                "targets",
                &self.registry.iter().map(|r| &r.id).collect::<Vec<_>>(),
            )
            .field("measured", &self.measured)
            .field("hide_pending", &self.hide.is_pending())
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug> Default for TooltipOverlay<K> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug> TooltipOverlay<K> {
    pub fn new(config: OverlayConfig) -> Self {
        let style = config.style.clone().sanitized();
        let hide = Debouncer::new(config.hide_debounce());
        Self {
            config,
            style,
            controller: ActivationController::new(),
            registry: TargetRegistry::new(),
            measured: None,
            hide,
            transition: None,
            was_presented: false,
            last_tick: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The style in use, with invalid metrics zeroed.
    #[inline]
    pub fn style(&self) -> &TooltipStyle {
        &self.style
    }

    #[inline]
    pub fn controller(&self) -> &ActivationController<K> {
        &self.controller
    }

    #[inline]
    pub fn registry(&self) -> &TargetRegistry<K> {
        &self.registry
    }

    // ── Targets ──────────────────────────────────────────────────────────

    /// Register or refresh a target. Call on every render.
    pub fn register(&mut self, registration: TargetRegistration<K>) {
        if self.registry.upsert(registration) {
            tracing::trace!(
                target: "perch.overlay",
                targets = self.registry.len(),
                "target registered"
            );
        }
    }

    /// Remove a target. Its tooltip is dismissed if it is showing.
    pub fn unregister(&mut self, id: &K, now: Instant) {
        if self.registry.unregister(id).is_none() {
            return;
        }
        if self.controller.active() == Some(id) || self.controller.pending() == Some(id) {
            self.dismiss(now);
        }
    }

    // ── Activation ───────────────────────────────────────────────────────

    /// Tap on a registered target. Unregistered identities are ignored.
    pub fn tap(&mut self, id: K, now: Instant) -> Phase {
        if !self.registry.contains(&id) {
            tracing::debug!(target: "perch.overlay", id = ?id, "tap on unregistered target ignored");
            return self.controller.phase();
        }
        let phase = self.controller.tap(id);
        self.sync(now);
        phase
    }

    pub fn dismiss(&mut self, now: Instant) {
        self.controller.dismiss();
        self.sync(now);
    }

    /// Run the continuations queued by switches on the previous turn.
    pub fn run_deferred(&mut self, now: Instant) -> usize {
        let ran = self.controller.run_deferred();
        if ran > 0 {
            self.sync(now);
        }
        ran
    }

    /// Advance the transition and fire the hide debounce.
    ///
    /// Returns `true` while something is still animating or waiting.
    pub fn tick(&mut self, now: Instant) -> bool {
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        if let Some(transition) = &mut self.transition {
            transition.tick(dt);
        }

        if self.hide.poll(now).is_some() && self.controller.clear_active() {
            tracing::debug!(target: "perch.overlay", "hide debounce fired");
            self.transition = None;
        }

        let animating = self.transition.as_ref().is_some_and(|t| !t.is_complete());
        animating || self.hide.is_pending() || self.controller.deferred_len() > 0
    }

    /// When the pending hide debounce fires, if one is armed.
    ///
    /// Hosts that sleep between events should wake by then and call
    /// [`tick`](Self::tick).
    #[inline]
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.hide.deadline()
    }

    /// React to a change of the controller's state.
    ///
    /// While nothing is presented but an identity is still active, a hide
    /// debounce is armed so the identity is eventually cleared.
    fn sync(&mut self, now: Instant) {
        let presented = self.controller.is_presented();
        if presented != self.was_presented {
            self.was_presented = presented;
            if presented {
                self.hide.cancel();
                self.transition = None;
                tracing::debug!(
                    target: "perch.overlay",
                    id = ?self.controller.active(),
                    "show"
                );
            } else {
                self.hide.call(now, ());
                if let Some(transition) = &mut self.transition {
                    transition.dismiss();
                }
                tracing::debug!(
                    target: "perch.overlay",
                    id = ?self.controller.active(),
                    debounce_ms = self.config.hide_debounce_ms,
                    "hide"
                );
            }
            return;
        }
        if !presented && self.controller.active().is_some() && !self.hide.is_pending() {
            tracing::trace!(target: "perch.overlay", "hide debounce re-armed");
            self.hide.call(now, ());
        }
    }

    // ── Measurement and layout ───────────────────────────────────────────

    /// Report the bubble's measured size. A zero size means "not measured".
    pub fn set_measured_size(&mut self, size: Size) {
        self.measured = (!size.is_empty()).then_some(size);
    }

    /// Size used for placement: measured, or the placeholder.
    pub fn tooltip_size(&self) -> Size {
        self.measured.unwrap_or(self.config.placeholder_size)
    }

    /// Lay out the active bubble, if there is one and its target resolves.
    pub fn layout<L>(&mut self, lookup: &L, viewport: Viewport) -> Option<TooltipLayout<K>>
    where
        L: AnchorLookup<K> + ?Sized,
    {
        let id = self.controller.active()?.clone();
        let _span = tracing::debug_span!(target: "perch.overlay", "layout", id = ?id).entered();

        let Some(registration) = self.registry.get(&id) else {
            tracing::trace!(target: "perch.overlay", "active target not registered");
            return None;
        };
        let Some(target) = lookup.anchor(&id) else {
            tracing::trace!(target: "perch.overlay", "active target has no rect");
            return None;
        };

        let request = PlacementRequest::new(target, viewport.size, self.tooltip_size())
            .preferred(registration.preferred)
            .gap(registration.gap.unwrap_or(self.config.gap))
            .margins(self.config.margins)
            .safe_area(viewport.safe_area)
            .keyboard_height(viewport.keyboard_height)
            .arrow_bounds(self.config.arrow_bounds);
        let placement = solve(&request);

        let shape = BubbleShape::for_placement(&placement, self.config.arrow_size, &self.style);
        let presented = self.controller.is_presented();
        if presented && self.transition.is_none() {
            self.transition = Some(Transition::appear(
                &placement,
                &target,
                shape.arrow_offset(),
                &self.config.motion,
            ));
        }

        Some(TooltipLayout {
            id,
            text: registration.text.clone(),
            target,
            content: placement
                .frame
                .inset(Insets::all(self.config.content_padding)),
            placement,
            shape,
            presented,
        })
    }

    /// Current animation state of the bubble.
    pub fn transition_frame(&self) -> Option<TransitionFrame> {
        self.transition.as_ref().map(Transition::frame)
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Dismiss when the pointer moves outside the active target.
    ///
    /// Returns `true` if the bubble was dismissed.
    pub fn pointer_moved<L>(&mut self, point: Point, lookup: &L, now: Instant) -> bool
    where
        L: AnchorLookup<K> + ?Sized,
    {
        if !self.controller.is_presented() {
            return false;
        }
        let Some(rect) = self.controller.active().and_then(|id| lookup.anchor(id)) else {
            return false;
        };
        if rect.contains(point) {
            return false;
        }
        tracing::debug!(
            target: "perch.overlay",
            x = point.x,
            y = point.y,
            "pointer left target"
        );
        self.dismiss(now);
        true
    }

    /// Whether the overlay should receive hits. Only while presented.
    #[inline]
    pub fn accepts_hits(&self) -> bool {
        self.controller.is_presented()
    }

    /// Forget everything, as on unmount.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.registry.clear();
        self.hide.cancel();
        self.transition = None;
        self.measured = None;
        self.was_presented = false;
        self.last_tick = None;
    }
}
