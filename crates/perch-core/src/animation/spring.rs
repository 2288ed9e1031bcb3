#![forbid(unsafe_code)]

//! Critically tunable spring, parameterized the way UI motion is specified.
//!
//! A spring is described by two perceptual numbers:
//!
//! - `response`: seconds for one undamped oscillation period;
//! - `damping_fraction`: `0` never stops ringing, `1` is critically damped,
//!   above `1` creeps toward the target without overshoot.
//!
//! With `ω = 2π / response` and `ζ = damping_fraction` the motion follows
//!
//!   x'' = -ω² (x - target) - 2ζω x'
//!
//! and is advanced with the closed-form solution of that equation, so the
//! result does not depend on how a span of time is split into ticks.
//!
//! # Invariants
//!
//! 1. `value()` is the position clamped to `[0.0, 1.0]`.
//! 2. Once at rest the spring stays put until `set_target` or `reset`.
//! 3. `response` is at least 1ms and `damping_fraction` is non-negative;
//!    non-finite inputs fall back to the defaults.

use std::f64::consts::TAU;

use web_time::Duration;

use super::Animation;

/// Default period: a quarter second.
pub const DEFAULT_RESPONSE: f64 = 0.25;
/// Default damping: just under critical.
pub const DEFAULT_DAMPING_FRACTION: f64 = 0.9;

const MIN_RESPONSE: f64 = 0.001;
const REST_DISPLACEMENT: f64 = 0.001;
const REST_SPEED: f64 = 0.01;
/// `|ζ - 1|` below which the critically damped form is used.
const CRITICAL_BAND: f64 = 1e-6;

/// A normalized spring that moves a scalar toward a target.
///
/// # Example
///
/// ```
/// use perch_core::animation::{Animation, Spring};
/// use web_time::Duration;
///
/// let mut spring = Spring::from_response(0.25, 0.9);
/// spring.tick(Duration::from_secs(2));
/// assert!(spring.is_complete());
/// assert_eq!(spring.position(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    response: f64,
    damping_fraction: f64,
    initial: f64,
    position: f64,
    velocity: f64,
    target: f64,
    at_rest: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self::from_response(DEFAULT_RESPONSE, DEFAULT_DAMPING_FRACTION)
    }
}

impl Spring {
    /// A spring running from `0.0` to `1.0`.
    #[must_use]
    pub fn from_response(response: f64, damping_fraction: f64) -> Self {
        let response = if response.is_finite() {
            response.max(MIN_RESPONSE)
        } else {
            DEFAULT_RESPONSE
        };
        let damping_fraction = if damping_fraction.is_finite() {
            damping_fraction.max(0.0)
        } else {
            DEFAULT_DAMPING_FRACTION
        };
        Self {
            response,
            damping_fraction,
            initial: 0.0,
            position: 0.0,
            velocity: 0.0,
            target: 1.0,
            at_rest: false,
        }
    }

    /// Start from `position` instead of `0.0`. Also the point `reset` returns to.
    #[must_use]
    pub fn starting_at(mut self, position: f64) -> Self {
        self.initial = position;
        self.position = position;
        self
    }

    #[inline]
    pub fn response(&self) -> f64 {
        self.response
    }

    #[inline]
    pub fn damping_fraction(&self) -> f64 {
        self.damping_fraction
    }

    /// Undamped angular frequency `ω`, in radians per second.
    #[inline]
    pub fn angular_frequency(&self) -> f64 {
        TAU / self.response
    }

    /// Equivalent unit-mass stiffness, `ω²`.
    pub fn stiffness(&self) -> f64 {
        let omega = self.angular_frequency();
        omega * omega
    }

    /// Equivalent unit-mass damping coefficient, `2ζω`.
    pub fn damping(&self) -> f64 {
        2.0 * self.damping_fraction * self.angular_frequency()
    }

    /// Current position, unclamped. Underdamped springs pass the target.
    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Head for `target`, keeping the current position and velocity.
    pub fn set_target(&mut self, target: f64) {
        if target != self.target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump to `position` and rest there.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Advance by `secs` along the exact trajectory.
    fn advance(&mut self, secs: f64) {
        let omega = self.angular_frequency();
        let zeta = self.damping_fraction;
        let x0 = self.position - self.target;
        let v0 = self.velocity;

        let (x, v) = if (zeta - 1.0).abs() < CRITICAL_BAND {
            let decay = (-omega * secs).exp();
            let b = v0 + omega * x0;
            (decay * (x0 + b * secs), decay * (v0 - omega * b * secs))
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * secs).exp();
            let (sin, cos) = (omega_d * secs).sin_cos();
            let b = (v0 + zeta * omega * x0) / omega_d;
            let x = decay * (x0 * cos + b * sin);
            let v = decay * (v0 * cos - (zeta * omega * b + omega_d * x0) * sin);
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * secs).exp(), (r2 * secs).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        };

        if x.abs() < REST_DISPLACEMENT && v.abs() < REST_SPEED {
            self.snap_to(self.target);
        } else {
            self.position = self.target + x;
            self.velocity = v;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        if self.at_rest || secs <= 0.0 {
            return;
        }
        self.advance(secs);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, step: Duration, steps: usize) {
        for _ in 0..steps {
            spring.tick(step);
        }
    }

    #[test]
    fn coefficients_follow_response_and_damping() {
        let spring = Spring::from_response(0.25, 1.0);
        let omega = TAU / 0.25;
        assert!((spring.angular_frequency() - omega).abs() < 1e-12);
        assert!((spring.stiffness() - omega * omega).abs() < 1e-9);
        // Critical damping: c = 2√k.
        assert!((spring.damping() - 2.0 * spring.stiffness().sqrt()).abs() < 1e-9);
    }

    #[test]
    fn critically_damped_matches_closed_form() {
        let mut spring = Spring::from_response(0.25, 1.0);
        spring.tick(Duration::from_millis(250));
        // 1 - e^(-2π)(1 + 2π)
        let expected = 1.0 - (-TAU).exp() * (1.0 + TAU);
        assert!((spring.position() - expected).abs() < 1e-9);
    }

    #[test]
    fn result_does_not_depend_on_tick_size() {
        for zeta in [0.4, 1.0, 1.6] {
            let mut coarse = Spring::from_response(0.3, zeta);
            let mut fine = coarse.clone();
            coarse.tick(Duration::from_millis(120));
            run(&mut fine, Duration::from_millis(4), 30);
            assert!(
                (coarse.position() - fine.position()).abs() < 1e-9,
                "zeta {zeta}: {} vs {}",
                coarse.position(),
                fine.position()
            );
            assert!((coarse.velocity() - fine.velocity()).abs() < 1e-6);
        }
    }

    #[test]
    fn underdamped_overshoot_matches_damping_ratio() {
        let mut spring = Spring::from_response(0.25, 0.5);
        let mut peak = 0.0_f64;
        for _ in 0..400 {
            spring.tick(Duration::from_millis(1));
            peak = peak.max(spring.position());
        }
        // Peak overshoot of a second-order system: e^(-πζ / √(1 - ζ²)).
        let zeta: f64 = 0.5;
        let expected = 1.0 + (-std::f64::consts::PI * zeta / (1.0 - zeta * zeta).sqrt()).exp();
        assert!((peak - expected).abs() < 0.005, "peak {peak}, expected {expected}");
        assert!(spring.value() <= 1.0);
    }

    #[test]
    fn overdamped_never_overshoots() {
        let mut spring = Spring::from_response(0.25, 2.0);
        for _ in 0..600 {
            spring.tick(Duration::from_millis(16));
            assert!(spring.position() <= 1.0);
        }
        assert!(spring.is_complete());
    }

    #[test]
    fn default_motion_settles_within_a_second() {
        let mut spring = Spring::default();
        run(&mut spring, Duration::from_millis(16), 63);
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 1.0);
    }

    #[test]
    fn retarget_mid_flight_keeps_velocity() {
        let mut spring = Spring::default();
        run(&mut spring, Duration::from_millis(16), 5);
        let v = spring.velocity();
        assert!(v > 0.0);
        spring.set_target(0.0);
        assert_eq!(spring.velocity(), v);
        run(&mut spring, Duration::from_millis(16), 120);
        assert!(spring.is_complete());
        assert_eq!(spring.position(), 0.0);
    }

    #[test]
    fn snap_then_set_target_wakes() {
        let mut spring = Spring::default();
        spring.snap_to(1.0);
        assert!(spring.is_at_rest());
        spring.tick(Duration::from_millis(16));
        assert_eq!(spring.position(), 1.0);

        spring.set_target(0.0);
        assert!(!spring.is_at_rest());
    }

    #[test]
    fn reset_returns_to_start() {
        let mut spring = Spring::default().starting_at(0.5);
        run(&mut spring, Duration::from_millis(16), 10);
        spring.reset();
        assert_eq!(spring.position(), 0.5);
        assert_eq!(spring.velocity(), 0.0);
        assert!(!spring.is_at_rest());
    }

    #[test]
    fn degenerate_parameters_are_sanitized() {
        let spring = Spring::from_response(0.0, -1.0);
        assert_eq!(spring.response(), MIN_RESPONSE);
        assert_eq!(spring.damping_fraction(), 0.0);

        let spring = Spring::from_response(f64::NAN, f64::INFINITY);
        assert_eq!(spring.response(), DEFAULT_RESPONSE);
        assert_eq!(spring.damping_fraction(), DEFAULT_DAMPING_FRACTION);
    }
}
