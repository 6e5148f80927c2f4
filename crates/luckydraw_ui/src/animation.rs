//! Spin animation.
//!
//! A spin is an explicit three-phase state machine. `advance` is pure: it
//! takes the current state and a timestamp and returns the next state plus
//! what the widget has to do about it (render, schedule another frame,
//! report a landing).
//!
//! Positions live on a [`Track`]: degrees for the wheel, a continuous cell
//! index for the grid. Acceleration eases in over the acceleration window
//! and keeps going until a landing index is armed; deceleration eases out
//! onto the armed index after five extra turns.

use std::fmt;

use luckydraw_core::Easing;

use crate::config::PrizeConfig;

/// Reference frame length in ms. Per-frame speeds are defined against it.
pub const FRAME_MS: f64 = 16.6;

/// Full turns added before landing.
const EXTRA_TURNS: f64 = 5.0;

/// Speed and phase durations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpinTiming {
    /// Peak advance per reference frame, in track units.
    pub speed: f64,
    /// Acceleration window in ms.
    pub acceleration: f64,
    /// Deceleration window in ms.
    pub deceleration: f64,
}

/// What a position means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Track {
    /// Wheel rotation in degrees.
    Wheel {
        /// Sector width in degrees.
        prize_deg: f64,
        /// Whole-wheel offset in degrees.
        offset_deg: f64,
    },
    /// Continuous grid index.
    Grid {
        /// Number of prize cells.
        count: usize,
    },
}

impl Track {
    /// Length of one full turn.
    #[must_use]
    pub fn period(self) -> f64 {
        match self {
            Self::Wheel { .. } => 360.0,
            Self::Grid { count } => count as f64,
        }
    }

    fn base_step(self) -> f64 {
        match self {
            Self::Wheel { .. } => 0.0,
            Self::Grid { .. } => 0.1,
        }
    }

    /// Wraps a position into `[0, period)`.
    #[must_use]
    pub fn wrap(self, position: f64) -> f64 {
        let period = self.period();
        if period > 0.0 {
            position.rem_euclid(period)
        } else {
            position
        }
    }

    /// Distance from `from` that ends on `index` after the extra turns.
    #[must_use]
    pub fn landing_change(self, from: f64, index: usize) -> f64 {
        let index = index as f64;
        match self {
            Self::Wheel {
                prize_deg,
                offset_deg,
            } => 360.0 * EXTRA_TURNS - index * prize_deg - from - offset_deg,
            Self::Grid { count } => count as f64 * EXTRA_TURNS + index - from.floor(),
        }
    }
}

/// Spin phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Not moving.
    Idle,
    /// Free-running.
    Accelerating {
        /// When `play` was called.
        started_at: f64,
        /// Timestamp of the previous tick.
        last_tick: f64,
        /// Ticks so far.
        frames: u32,
    },
    /// Easing onto the landing index.
    Decelerating {
        /// When deceleration began.
        started_at: f64,
        /// Position at that moment.
        from: f64,
        /// Distance still to cover.
        change: f64,
        /// Landing index, fixed until idle.
        index: usize,
    },
}

/// What a tick asks of the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// Redraw.
    pub render: bool,
    /// Request another frame.
    pub schedule: bool,
    /// The spin landed on this index.
    pub finished: Option<usize>,
}

/// Spin state of one widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    phase: Phase,
    position: f64,
    armed: Option<usize>,
}

impl SpinState {
    /// An idle spin at position zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            position: 0.0,
            armed: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current position on the track.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// The armed landing index, if any.
    #[must_use]
    pub const fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Returns true when not moving.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// Moves the position while idle, used by the grid's demo walk.
    pub fn set_idle_position(&mut self, position: f64) {
        if self.is_idle() {
            self.position = position;
        }
    }

    /// Starts accelerating. Returns false, and changes nothing, unless idle.
    pub fn play(&mut self, now: f64) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.armed = None;
        self.phase = Phase::Accelerating {
            started_at: now,
            last_tick: now,
            frames: 0,
        };
        true
    }

    /// Arms the landing index as `index mod count`.
    ///
    /// Ignored when `count` is zero. Returns the normalized index.
    pub fn arm(&mut self, index: i64, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let count = i64::try_from(count).ok()?;
        let normalized = usize::try_from(index.rem_euclid(count)).ok()?;
        self.armed = Some(normalized);
        Some(normalized)
    }

    /// Returns to idle, keeping the position.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.armed = None;
    }

    /// Computes the state at `now`.
    #[must_use]
    pub fn advance(&self, now: f64, track: Track, timing: SpinTiming) -> (Self, Effects) {
        let mut next = *self;
        let effects = match self.phase {
            Phase::Idle => Effects::default(),
            Phase::Accelerating {
                started_at,
                last_tick,
                frames,
            } => {
                let elapsed = now - started_at;
                match self.armed {
                    Some(index) if elapsed >= timing.acceleration => {
                        let frame_ms = if frames > 0 {
                            elapsed / f64::from(frames)
                        } else {
                            elapsed
                        };
                        let change = track.landing_change(self.position, index);
                        tracing::debug!(index, frame_ms, change, "spin decelerating");
                        next.phase = Phase::Decelerating {
                            started_at: now,
                            from: self.position,
                            change,
                            index,
                        };
                    }
                    _ => {
                        let step = Easing::QuadIn.tween(
                            elapsed,
                            track.base_step(),
                            timing.speed,
                            timing.acceleration,
                        );
                        let scale = (now - last_tick).max(0.0) / FRAME_MS;
                        next.position = track.wrap(self.position + step * scale);
                        next.phase = Phase::Accelerating {
                            started_at,
                            last_tick: now,
                            frames: frames.saturating_add(1),
                        };
                    }
                }
                Effects {
                    render: true,
                    schedule: true,
                    finished: None,
                }
            }
            Phase::Decelerating {
                started_at,
                from,
                change,
                index,
            } => {
                let elapsed = now - started_at;
                if elapsed >= timing.deceleration {
                    next.position = track.wrap(from + change);
                    next.phase = Phase::Idle;
                    next.armed = None;
                    tracing::debug!(index, position = next.position, "spin landed");
                    Effects {
                        render: true,
                        schedule: false,
                        finished: Some(index),
                    }
                } else {
                    next.position = track.wrap(Easing::QuadOut.tween(
                        elapsed,
                        from,
                        change,
                        timing.deceleration,
                    ));
                    Effects {
                        render: true,
                        schedule: true,
                        finished: None,
                    }
                }
            }
        };
        (next, effects)
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new()
    }
}

/// Called when a click on the button is accepted.
pub type StartCallback = Box<dyn FnMut()>;

/// Called once per landed spin with the index and a copy of the prize.
pub type EndCallback = Box<dyn FnMut(usize, PrizeConfig)>;

/// User callbacks of one widget.
#[derive(Default)]
pub struct SpinCallbacks {
    start: Option<StartCallback>,
    end: Option<EndCallback>,
}

impl SpinCallbacks {
    pub(crate) fn set_start(&mut self, callback: StartCallback) {
        self.start = Some(callback);
    }

    pub(crate) fn set_end(&mut self, callback: EndCallback) {
        self.end = Some(callback);
    }

    pub(crate) fn fire_start(&mut self) {
        if let Some(start) = self.start.as_mut() {
            start();
        }
    }

    pub(crate) fn fire_end(&mut self, index: usize, prize: PrizeConfig) {
        if let Some(end) = self.end.as_mut() {
            end(index, prize);
        }
    }
}

impl fmt::Debug for SpinCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinCallbacks")
            .field("start", &self.start.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}
