//! # LUCKYDRAW UI
//!
//! Lucky-draw widgets over a host drawing surface:
//! - [`LuckyWheel`]: a ring of prize sectors that spins under a pointer
//! - [`LuckyGrid`]: a board of prize cells with a running highlight
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        WIDGET PIPELINE                         │
//! ├───────────────────────────────────────────────────────────────┤
//! │  TOML → config → model::merge → layout::compute  (configure)   │
//! │                       ↓                                        │
//! │  ImageLoader → ImageCache → barrier released → first full draw │
//! │                       ↓                                        │
//! │  play/stop → SpinState::advance → Surface commands (per frame) │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Host seams
//!
//! The host owns the canvas ([`Surface`]), the display refresh
//! ([`FrameScheduler`]) and the network ([`ImageLoader`]). Everything runs
//! on the thread that calls the widget; image loaders may answer from any
//! thread and their answers are drained on the next frame.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod config;
pub mod error;
pub mod grid;
pub mod images;
pub mod layout;
pub mod model;
pub mod render;
pub mod scheduler;
mod shell;
pub mod style;
pub mod wheel;

pub use animation::{Effects, Phase, SpinState, SpinTiming, Track};
pub use config::{Environment, GridConfig, PrizeConfig, WheelConfig};
pub use error::{DrawError, DrawResult};
pub use grid::LuckyGrid;
pub use images::{Bitmap, ImageCache, ImageLoader, ImageRequest, ImageSender};
pub use layout::{GridLayout, Padding, WheelLayout};
pub use render::{CommandRecorder, RenderCommand, Surface};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use style::{Background, Color, Font, Paint, Shadow};
pub use wheel::LuckyWheel;
