//! Geometry kernel.
//!
//! Angles are radians, `0` on the positive x-axis, increasing clockwise
//! because the surface's y-axis points down.
//!
//! ## Sector construction
//!
//! A sector is two concentric arcs joined by straight edges. Each arc is
//! emitted as `arc_to` segments whose control point is the intersection of
//! the tangents at the segment's ends. That intersection is only well
//! conditioned below a half-turn, so spans of 180° or more are bisected
//! recursively first:
//!
//! ```text
//!          control = tangent(p1) ∩ tangent(p2)
//!                 ×
//!               ╱   ╲
//!         p1 ●─────────● p2      one leaf: line_to(p1), arc_to(control, p2)
//! ```

use std::f64::consts::PI;

/// Tolerance used when comparing angles and coordinates.
pub const EPSILON: f64 = 1e-8;

/// A point in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate (down is positive).
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the origin.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns true if both coordinates are within [`EPSILON`] of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

/// An axis-aligned box in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f64,
    /// Y position (top edge).
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Returns true if the point is inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Insets each side independently.
    #[must_use]
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// Starts a new sub-path.
    MoveTo(Point),
    /// Straight line to a point.
    LineTo(Point),
    /// Canvas-style `arcTo`: a circular arc of `radius` tangent to the lines
    /// current→`control` and `control`→`to`.
    ArcTo {
        /// Tangent intersection.
        control: Point,
        /// Arc end point.
        to: Point,
        /// Arc radius.
        radius: f64,
    },
    /// Full or partial circle around `center`.
    Arc {
        /// Circle center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Start angle.
        start: f64,
        /// End angle.
        end: f64,
    },
    /// Closes the current sub-path.
    Close,
}

/// An ordered list of [`PathOp`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self { ops: Vec::with_capacity(16) }
    }

    /// Appends a move.
    pub fn move_to(&mut self, p: Point) {
        self.ops.push(PathOp::MoveTo(p));
    }

    /// Appends a line.
    pub fn line_to(&mut self, p: Point) {
        self.ops.push(PathOp::LineTo(p));
    }

    /// Appends a tangent arc.
    pub fn arc_to(&mut self, control: Point, to: Point, radius: f64) {
        self.ops.push(PathOp::ArcTo { control, to, radius });
    }

    /// Appends a centered arc.
    pub fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.ops.push(PathOp::Arc {
            center,
            radius,
            start,
            end,
        });
    }

    /// Closes the path.
    pub fn close(&mut self) {
        self.ops.push(PathOp::Close);
    }

    /// Returns the recorded operations.
    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Degrees to radians.
#[inline]
#[must_use]
pub fn deg_to_rad(deg: f64) -> f64 {
    PI / 180.0 * deg
}

/// Point at `angle` on a circle of `radius` around the origin, rounded to
/// eight decimals so that axis-aligned points come out exact.
#[must_use]
pub fn point_on_circle(angle: f64, radius: f64) -> Point {
    Point::new(round8(angle.cos() * radius), round8(angle.sin() * radius))
}

fn round8(v: f64) -> f64 {
    (v * 1e8).round() / 1e8
}

/// Tangent line to a circle centered at the origin, at a point on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tangent {
    /// `y = slope * x + intercept`.
    Sloped {
        /// Line slope.
        slope: f64,
        /// Line intercept.
        intercept: f64,
    },
    /// `x = constant` (the point sits on the x-axis).
    Vertical {
        /// The line's x coordinate.
        x: f64,
    },
}

impl Tangent {
    /// Tangent at `p`: perpendicular to the radius, slope `-x / y`.
    #[must_use]
    pub fn at(p: Point) -> Self {
        if p.y.abs() < EPSILON {
            return Self::Vertical { x: p.x };
        }
        let slope = -p.x / p.y;
        Self::Sloped {
            slope,
            intercept: p.y - slope * p.x,
        }
    }

    /// Intersection with another tangent, `None` when parallel.
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Point> {
        match (self, other) {
            (
                Self::Sloped {
                    slope: k1,
                    intercept: b1,
                },
                Self::Sloped {
                    slope: k2,
                    intercept: b2,
                },
            ) => {
                if (k1 - k2).abs() < EPSILON {
                    return None;
                }
                let x = (b2 - b1) / (k1 - k2);
                let y = (k2 * b1 - k1 * b2) / (k2 - k1);
                Some(Point::new(x, y))
            }
            (Self::Vertical { x }, Self::Sloped { slope, intercept })
            | (Self::Sloped { slope, intercept }, Self::Vertical { x }) => {
                Some(Point::new(x, slope * x + intercept))
            }
            (Self::Vertical { .. }, Self::Vertical { .. }) => None,
        }
    }
}

/// Control point for the arc between two points of a circle of `radius`.
///
/// Parallel tangents (coincident or antipodal points) fall back to the chord
/// midpoint pushed out onto the circle.
#[must_use]
pub fn arc_control_point(p1: Point, p2: Point, radius: f64) -> Point {
    if let Some(control) = Tangent::at(p1).intersect(Tangent::at(p2)) {
        return control;
    }
    let mid = Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
    let len = mid.magnitude();
    if len < EPSILON {
        return p1;
    }
    let r = radius.abs().max(p1.magnitude()).max(p2.magnitude());
    Point::new(mid.x * r / len, mid.y * r / len)
}

/// Appends an arc of `radius` from `start` to `end` to `path`.
///
/// `forward` traces start→end; otherwise end→start. Spans of a half-turn or
/// more are split at their midpoint first, keeping the traversal order, so
/// every emitted leaf is below 180°. Each leaf emits `line_to` its first
/// point followed by `arc_to` its second.
pub fn trace_arc(path: &mut Path, radius: f64, start: f64, end: f64, forward: bool) {
    if (end - start).abs() >= PI - EPSILON {
        let middle = (start + end) / 2.0;
        if forward {
            trace_arc(path, radius, start, middle, forward);
            trace_arc(path, radius, middle, end, forward);
        } else {
            trace_arc(path, radius, middle, end, forward);
            trace_arc(path, radius, start, middle, forward);
        }
        return;
    }

    let (from, to) = if forward { (start, end) } else { (end, start) };
    let p1 = point_on_circle(from, radius);
    let p2 = point_on_circle(to, radius);
    let control = arc_control_point(p1, p2, radius);
    path.line_to(p1);
    path.arc_to(control, p2, radius);
}

/// Angular inset that carves a gutter of `gutter` pixels at `radius`.
#[must_use]
pub fn gutter_angle(radius: f64, gutter: f64) -> f64 {
    deg_to_rad(90.0 / PI / radius * gutter)
}

/// Builds the path of a wheel sector.
///
/// The outer arc runs clockwise from `start` to `end` at `max_radius`, the
/// inner arc back at `min_radius`, both narrowed by `gutter`. When the gutter
/// swallows the inner arc the sector closes on an apex instead, giving a
/// clipped wedge. A zero inner radius is replaced by the gutter width.
#[must_use]
pub fn sector(min_radius: f64, max_radius: f64, start: f64, end: f64, gutter: f64) -> Path {
    let min_radius = if min_radius == 0.0 { gutter } else { min_radius };
    let max_gutter = gutter_angle(max_radius, gutter);
    let max_start = start + max_gutter;
    let max_end = end - max_gutter;

    let mut path = Path::new();
    path.move_to(point_on_circle(max_start, max_radius));
    trace_arc(&mut path, max_radius, max_start, max_end, true);

    let inner = (min_radius > 0.0).then(|| {
        let min_gutter = gutter_angle(min_radius, gutter);
        (start + min_gutter, end - min_gutter)
    });
    match inner {
        Some((min_start, min_end)) if min_end > min_start => {
            trace_arc(&mut path, min_radius, min_start, min_end, false);
        }
        _ => path.line_to(sector_apex(start, end, gutter)),
    }

    path.close();
    path
}

/// Point where the two gutter-offset edges of a sector meet.
#[must_use]
pub fn sector_apex(start: f64, end: f64, gutter: f64) -> Point {
    let half_sin = ((start - end) / 2.0).sin().abs();
    if half_sin < EPSILON {
        return Point::ORIGIN;
    }
    point_on_circle((start + end) / 2.0, gutter / 2.0 / half_sin)
}

/// Corner radius actually used for a `width` × `height` box.
#[must_use]
pub fn clamp_corner_radius(width: f64, height: f64, radius: f64) -> f64 {
    let limit = width.min(height) / 2.0;
    radius.min(limit).max(0.0)
}

/// Builds a rounded rectangle path.
#[must_use]
pub fn round_rect(rect: Rect, radius: f64) -> Path {
    let Rect {
        x,
        y,
        width: w,
        height: h,
    } = rect;
    let r = clamp_corner_radius(w, h, radius);

    let mut path = Path::new();
    path.move_to(Point::new(x + r, y));
    path.line_to(Point::new(x + w - r, y));
    path.arc_to(Point::new(x + w, y), Point::new(x + w, y + r), r);
    path.line_to(Point::new(x + w, y + h - r));
    path.arc_to(Point::new(x + w, y + h), Point::new(x + w - r, y + h), r);
    path.line_to(Point::new(x + r, y + h));
    path.arc_to(Point::new(x, y + h), Point::new(x, y + h - r), r);
    path.line_to(Point::new(x, y + r));
    path.arc_to(Point::new(x, y), Point::new(x + r, y), r);
    path.close();
    path
}

/// Builds a filled circle path around `center`.
#[must_use]
pub fn circle(center: Point, radius: f64) -> Path {
    let mut path = Path::new();
    path.arc(center, radius.max(0.0), 0.0, PI * 2.0);
    path
}

/// Builds a closed polygon through `points`.
#[must_use]
pub fn polygon(points: &[Point]) -> Path {
    let mut path = Path::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close();
    }
    path
}
