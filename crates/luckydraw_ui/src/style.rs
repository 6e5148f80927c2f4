//! Colors, paints, fonts and shadows.
//!
//! Everything here is parsed once, when a configuration is merged, so that
//! drawing never touches a string.

use std::fmt;

use luckydraw_core::gradient::split_top_level;
use luckydraw_core::{GradientLine, GradientSpec, Rect};

use crate::error::{DrawError, DrawResult};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Parses any CSS color a canvas `fillStyle` takes: hex forms,
    /// `rgb()`/`rgba()`, `hsl()`/`hsla()`, `hwb()` and the named colors.
    pub fn parse(input: &str) -> DrawResult<Self> {
        let parsed = csscolorparser::parse(input.trim())
            .map_err(|_| DrawError::InvalidColor(input.to_owned()))?;
        Ok(Self::rgba(
            parsed.r as f32,
            parsed.g as f32,
            parsed.b as f32,
            parsed.a as f32,
        ))
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// A gradient stop with its color parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStop {
    /// Stop offset, passed through as configured.
    pub offset: f64,
    /// Stop color.
    pub color: Color,
}

/// What a fill resolves to for one box.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A flat color.
    Solid(Color),
    /// A linear gradient with integer endpoints.
    Linear {
        /// Gradient endpoints.
        line: GradientLine,
        /// Color stops.
        stops: Vec<PaintStop>,
    },
}

/// A configured background: a color, or a gradient waiting for its box.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// A flat color.
    Solid(Color),
    /// A linear gradient.
    Gradient {
        /// The parsed descriptor.
        spec: GradientSpec,
        /// Stops with colors parsed, same order as `spec.stops`.
        stops: Vec<PaintStop>,
    },
}

impl Background {
    /// A transparent fill.
    pub const NONE: Self = Self::Solid(Color::TRANSPARENT);

    /// Parses a color or `linear-gradient(...)`.
    pub fn parse(input: &str) -> DrawResult<Self> {
        if !GradientSpec::is_gradient(input) {
            return Color::parse(input).map(Self::Solid);
        }
        let spec = GradientSpec::parse(input)?;
        let stops = spec
            .stops
            .iter()
            .map(|stop| {
                Color::parse(&stop.color).map(|color| PaintStop {
                    offset: stop.offset,
                    color,
                })
            })
            .collect::<DrawResult<Vec<_>>>()?;
        Ok(Self::Gradient { spec, stops })
    }

    /// Parses the first present candidate, transparent if none is.
    pub fn first_of(candidates: &[Option<&str>]) -> DrawResult<Self> {
        candidates
            .iter()
            .flatten()
            .next()
            .map_or(Ok(Self::NONE), |s| Self::parse(s))
    }

    /// Resolves this background for `rect`.
    #[must_use]
    pub fn paint(&self, rect: Rect) -> Paint {
        match self {
            Self::Solid(color) => Paint::Solid(*color),
            Self::Gradient { spec, stops } => Paint::Linear {
                line: spec.line(rect),
                stops: stops.clone(),
            },
        }
    }
}

/// A resolved font. `size` is in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Weight as written (`"400"`, `"bold"`).
    pub weight: String,
    /// Size in device pixels.
    pub size: f64,
    /// Family list.
    pub family: String,
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px {}", self.weight, self.size, self.family)
    }
}

/// A drop shadow in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
    /// Blur radius.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
}

impl Shadow {
    /// Parses `"<x> <y> <blur> <color>"`.
    ///
    /// `px` suffixes are ignored and only the first of several comma
    /// separated shadows is used. Lengths are scaled by `dpr`. An empty string
    /// means no shadow.
    pub fn parse(input: &str, dpr: f64) -> DrawResult<Option<Self>> {
        let invalid = || DrawError::InvalidShadow(input.to_owned());
        let cleaned = input.replace("px", "");
        let Some(first) = split_top_level(&cleaned, ',').into_iter().next() else {
            return Ok(None);
        };
        if first.is_empty() {
            return Ok(None);
        }

        let tokens: Vec<&str> = split_top_level(first, ' ')
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        let [x, y, blur, color] = tokens[..] else {
            return Err(invalid());
        };
        let number = |t: &str| t.parse::<f64>().map(|v| v * dpr).map_err(|_| invalid());
        Ok(Some(Self {
            offset_x: number(x)?,
            offset_y: number(y)?,
            blur: number(blur)?,
            color: Color::parse(color)?,
        }))
    }

    /// Shrinks `rect` so that the box plus its offset shadow stay inside it.
    #[must_use]
    pub fn fit(&self, rect: Rect) -> Rect {
        let mut out = rect;
        if self.offset_x > 0.0 {
            out.width -= self.offset_x;
        } else {
            out.width += self.offset_x;
            out.x -= self.offset_x;
        }
        if self.offset_y > 0.0 {
            out.height -= self.offset_y;
        } else {
            out.height += self.offset_y;
            out.y -= self.offset_y;
        }
        out
    }
}
