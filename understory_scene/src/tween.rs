// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interruptible tweens: a two-state machine per animated property.
//!
//! A [`Tween`] is either idle at a value or animating from one value to a
//! target. Re-targeting while animating starts a new leg from the value
//! sampled at that moment, so there is nothing to cancel and nothing queued.
//!
//! ```
//! use core::time::Duration;
//! use understory_scene::tween::Tween;
//!
//! let mut t = Tween::new(0.0_f64);
//! t.animate_to(10.0, Duration::ZERO, Duration::from_millis(100));
//! assert!(t.is_animating());
//! assert_eq!(t.target(), 10.0);
//! assert_eq!(t.settle(Duration::from_millis(100)), 10.0);
//! assert!(!t.is_animating());
//! ```

use core::time::Duration;

use kurbo::{CubicBez, Point, Rect};

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Copy {
    /// Interpolate from `self` to `other`; `t` is in `[0, 1]`.
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(Lerp::lerp(self.x, other.x, t), Lerp::lerp(self.y, other.y, t))
    }
}

impl Lerp for Rect {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            Lerp::lerp(self.x0, other.x0, t),
            Lerp::lerp(self.y0, other.y0, t),
            Lerp::lerp(self.x1, other.x1, t),
            Lerp::lerp(self.y1, other.y1, t),
        )
    }
}

impl Lerp for CubicBez {
    fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            Lerp::lerp(self.p0, other.p0, t),
            Lerp::lerp(self.p1, other.p1, t),
            Lerp::lerp(self.p2, other.p2, t),
            Lerp::lerp(self.p3, other.p3, t),
        )
    }
}

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum State<T> {
    Idle(T),
    Animating {
        from: T,
        to: T,
        start: Duration,
        duration: Duration,
    },
}

/// An animated property.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tween<T: Lerp> {
    state: State<T>,
}

impl<T: Lerp> Tween<T> {
    /// An idle tween resting at `value`.
    pub const fn new(value: T) -> Self {
        Self {
            state: State::Idle(value),
        }
    }

    /// Jump to `value`, dropping any animation in flight.
    pub fn set(&mut self, value: T) {
        self.state = State::Idle(value);
    }

    /// Start animating towards `to`, beginning at `now`.
    ///
    /// The new leg starts from the value sampled at `now`. A zero `duration`
    /// behaves like [`Tween::set`].
    pub fn animate_to(&mut self, to: T, now: Duration, duration: Duration) {
        if duration.is_zero() {
            self.set(to);
            return;
        }
        let from = self.sample(now);
        self.state = State::Animating {
            from,
            to,
            start: now,
            duration,
        };
    }

    /// The value at `now`, without changing state.
    pub fn sample(&self, now: Duration) -> T {
        match self.state {
            State::Idle(v) => v,
            State::Animating {
                from,
                to,
                start,
                duration,
            } => {
                let elapsed = now.saturating_sub(start).as_secs_f64();
                let t = (elapsed / duration.as_secs_f64()).min(1.0);
                from.lerp(to, ease_out_cubic(t))
            }
        }
    }

    /// Sample at `now` and return to idle if the animation has finished.
    pub fn settle(&mut self, now: Duration) -> T {
        if let State::Animating {
            to,
            start,
            duration,
            ..
        } = self.state
            && now.saturating_sub(start) >= duration
        {
            self.state = State::Idle(to);
        }
        self.sample(now)
    }

    /// The value this tween is heading to (or resting at).
    pub fn target(&self) -> T {
        match self.state {
            State::Idle(v) => v,
            State::Animating { to, .. } => to,
        }
    }

    /// Whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Animating { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn idle_tween_samples_its_value() {
        let t = Tween::new(3.0_f64);
        assert_eq!(t.sample(ms(1000)), 3.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn animation_reaches_target_and_goes_idle() {
        let mut t = Tween::new(0.0_f64);
        t.animate_to(100.0, ms(0), ms(500));
        let mid = t.sample(ms(250));
        assert!(mid > 50.0 && mid < 100.0, "cubic ease-out runs ahead: {mid}");
        assert_eq!(t.settle(ms(499)), t.sample(ms(499)));
        assert!(t.is_animating());
        assert_eq!(t.settle(ms(500)), 100.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn retarget_starts_from_sampled_value() {
        let mut t = Tween::new(Point::ZERO);
        t.animate_to(Point::new(100.0, 0.0), ms(0), ms(100));
        let at_half = t.sample(ms(50));
        t.animate_to(Point::new(0.0, 100.0), ms(50), ms(100));
        assert_eq!(t.sample(ms(50)), at_half);
        assert_eq!(t.target(), Point::new(0.0, 100.0));
        assert_eq!(t.settle(ms(150)), Point::new(0.0, 100.0));
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut t = Tween::new(Rect::ZERO);
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        t.animate_to(r, ms(10), Duration::ZERO);
        assert!(!t.is_animating());
        assert_eq!(t.sample(ms(10)), r);
    }

    #[test]
    fn curve_lerp_moves_every_control_point() {
        let a = CubicBez::new((0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0));
        let b = CubicBez::new((2.0, 2.0), (4.0, 4.0), (6.0, 6.0), (8.0, 8.0));
        let m = Lerp::lerp(a, b, 0.5);
        assert_eq!(m.p0, Point::new(1.0, 1.0));
        assert_eq!(m.p3, Point::new(4.0, 4.0));
    }
}
