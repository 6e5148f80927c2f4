//! # LUCKYDRAW Core
//!
//! Host-independent math behind the lucky-draw wheel and grid:
//! - Unit conversion (absolute, percentage, font-relative)
//! - Sector and rounded-rectangle path construction
//! - Linear gradient endpoint mapping
//! - Quadratic easing
//! - Greedy text wrapping against a per-line bound
//! - The image-load barrier
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      CORE PIPELINE                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  Length → UnitConverter → px ─┐                           │
//! │                               ├→ geometry::Path → Surface │
//! │  angles / boxes ──────────────┘                           │
//! │  text + measure fn → text::layout_lines → lines           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here draws. Paths are plain lists of [`geometry::PathOp`]
//! that a host surface replays.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod barrier;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod gradient;
pub mod text;
pub mod units;

pub use barrier::ImageLoadBarrier;
pub use easing::Easing;
pub use error::{CoreError, CoreResult};
pub use geometry::{Path, PathOp, Point, Rect};
pub use gradient::{ColorStop, GradientDirection, GradientLine, GradientSpec};
pub use units::{Length, UnitConverter};
