//! Quadratic easing.
//!
//! Spins accelerate with a quadratic ease-in and settle with a quadratic
//! ease-out. Both curves are exact at their endpoints and clamp past the
//! duration instead of overshooting.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in (accelerating).
    QuadIn,
    /// Quadratic ease-out (decelerating).
    #[default]
    QuadOut,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => t * (2.0 - t),
        }
    }

    /// Value at `elapsed` of a tween from `from` by `change` over `duration`.
    ///
    /// `elapsed` beyond `duration` clamps to `from + change`. A non-positive
    /// duration yields the end value straight away.
    #[must_use]
    pub fn tween(self, elapsed: f64, from: f64, change: f64, duration: f64) -> f64 {
        if duration <= 0.0 || elapsed >= duration {
            return from + change;
        }
        from + change * self.apply(elapsed / duration)
    }
}
