//! Linear gradient descriptors.
//!
//! Parses `linear-gradient(<angle-or-keyword>, <stop>, ...)` and maps the
//! direction onto a box. Numeric angles split the turn into eight 45°
//! octants; each octant anchors the line at a box corner and finds the far
//! end with the tangent of the offset inside the octant.

use crate::error::{CoreError, CoreResult};
use crate::geometry::{deg_to_rad, Rect};

const PREFIX: &str = "linear-gradient(";

/// Which way a gradient runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientDirection {
    /// Angle in degrees, normalised to `[0, 360)`.
    Angle(f64),
    /// Bottom edge towards the top edge.
    Top,
    /// Top edge towards the bottom edge.
    Bottom,
    /// Right edge towards the left edge.
    Left,
    /// Left edge towards the right edge.
    Right,
}

/// One color stop. Colors stay textual here; the UI layer parses them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Stop offset.
    pub offset: f64,
    /// Color as written.
    pub color: String,
}

/// Integer gradient endpoints, ready for the host's gradient constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradientLine {
    /// Start x.
    pub x0: i32,
    /// Start y.
    pub y0: i32,
    /// End x.
    pub x1: i32,
    /// End y.
    pub y1: i32,
}

/// A parsed `linear-gradient(...)` descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSpec {
    /// Direction of the gradient line.
    pub direction: GradientDirection,
    /// Color stops in declaration order.
    pub stops: Vec<ColorStop>,
}

impl GradientSpec {
    /// Returns true if `background` names a linear gradient rather than a
    /// plain color.
    #[must_use]
    pub fn is_gradient(background: &str) -> bool {
        background.contains("linear-gradient")
    }

    /// Parses a descriptor.
    ///
    /// A stop with a single token takes its ordinal position as offset. A stop
    /// with two tokens is `<offset> <color>`; the CSS `<color> <n>%` order is
    /// accepted too.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let body = input
            .find(PREFIX)
            .map(|at| &input[at + PREFIX.len()..])
            .and_then(|rest| rest.rfind(')').map(|end| &rest[..end]))
            .ok_or_else(|| CoreError::gradient(input, "expected `linear-gradient(...)`"))?;

        let mut parts = split_top_level(body, ',').into_iter();
        let head = parts
            .next()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CoreError::gradient(input, "missing direction"))?;
        let direction = parse_direction(input, head)?;

        let stops = parts
            .enumerate()
            .map(|(index, stop)| parse_stop(input, index, stop))
            .collect::<CoreResult<Vec<_>>>()?;
        if stops.is_empty() {
            return Err(CoreError::gradient(input, "no color stops"));
        }

        Ok(Self { direction, stops })
    }

    /// Gradient endpoints for `rect`, truncated towards zero.
    #[must_use]
    pub fn line(&self, rect: Rect) -> GradientLine {
        let Rect {
            x,
            y,
            width: w,
            height: h,
        } = rect;
        let tan = |deg: f64| deg_to_rad(deg).tan();

        let [x0, y0, x1, y1] = match self.direction {
            GradientDirection::Angle(deg) => match deg {
                d if d < 45.0 => [x, y + h, x + w, y + h - w * tan(d)],
                d if d < 90.0 => [x, y + h, (x + w) - h * tan(d - 45.0), y],
                d if d < 135.0 => [x + w, y + h, (x + w) - h * tan(d - 90.0), y],
                d if d < 180.0 => [x + w, y + h, x, y + w * tan(d - 135.0)],
                d if d < 225.0 => [x + w, y, x, y + w * tan(d - 180.0)],
                d if d < 270.0 => [x + w, y, x + h * tan(d - 225.0), y + h],
                d if d < 315.0 => [x, y, x + h * tan(d - 270.0), y + h],
                d => [x, y, x + w, y + h - w * tan(d - 315.0)],
            },
            GradientDirection::Top => [x, y + h, x, y],
            GradientDirection::Bottom => [x, y, x, y + h],
            GradientDirection::Left => [x + w, y, x, y],
            GradientDirection::Right => [x, y, x + w, y],
        };

        GradientLine {
            x0: x0 as i32,
            y0: y0 as i32,
            x1: x1 as i32,
            y1: y1 as i32,
        }
    }
}

fn parse_direction(input: &str, head: &str) -> CoreResult<GradientDirection> {
    if let Some(number) = head.strip_suffix("deg") {
        let deg: f64 = number
            .trim()
            .parse()
            .map_err(|_| CoreError::gradient(input, format!("bad angle `{head}`")))?;
        if !deg.is_finite() {
            return Err(CoreError::gradient(input, format!("bad angle `{head}`")));
        }
        return Ok(GradientDirection::Angle(deg.rem_euclid(360.0)));
    }
    // First keyword found wins, vertical before horizontal: `to bottom right`
    // runs like `to bottom`.
    [
        ("top", GradientDirection::Top),
        ("bottom", GradientDirection::Bottom),
        ("left", GradientDirection::Left),
        ("right", GradientDirection::Right),
    ]
    .into_iter()
    .find_map(|(keyword, direction)| head.contains(keyword).then_some(direction))
    .ok_or_else(|| CoreError::gradient(input, format!("unknown direction `{head}`")))
}

fn parse_stop(input: &str, index: usize, stop: &str) -> CoreResult<ColorStop> {
    let tokens: Vec<&str> = split_top_level(stop, ' ')
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();
    match tokens.as_slice() {
        [color] => Ok(ColorStop {
            offset: index as f64,
            color: (*color).to_owned(),
        }),
        [first, second] => {
            if let Ok(offset) = first.parse::<f64>() {
                return Ok(ColorStop {
                    offset,
                    color: (*second).to_owned(),
                });
            }
            second
                .strip_suffix('%')
                .and_then(|pct| pct.parse::<f64>().ok())
                .map(|pct| ColorStop {
                    offset: pct / 100.0,
                    color: (*first).to_owned(),
                })
                .ok_or_else(|| CoreError::gradient(input, format!("bad stop `{stop}`")))
        }
        _ => Err(CoreError::gradient(input, format!("bad stop `{stop}`"))),
    }
}

/// Splits on `sep` outside parentheses, trimming each piece.
///
/// Keeps `rgba(0, 0, 0, 0.5)` in one piece when splitting on commas.
#[must_use]
pub fn split_top_level(body: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == sep && depth == 0 => {
                out.push(body[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(body[start..].trim());
    out
}
