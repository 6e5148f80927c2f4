//! Layout engine.
//!
//! Converts a merged model plus a surface size into absolute boxes. Layouts
//! are recomputed wholesale on configure and resize, never patched.

use luckydraw_core::geometry::deg_to_rad;
use luckydraw_core::{CoreError, CoreResult, Length, Point, Rect, UnitConverter};

use crate::model::{GridModel, WheelModel};

/// Four-sided padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
}

impl Padding {
    /// No padding.
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };

    /// Expands a 1-4 value shorthand. `px` suffixes are ignored and values
    /// are truncated to whole pixels.
    ///
    /// | values | top | bottom | left | right |
    /// |--------|-----|--------|------|-------|
    /// | `a`       | a | a | a | a |
    /// | `a b`     | a | a | b | b |
    /// | `a b c`   | a | c | b | b |
    /// | `a b c d` | a | b | c | d |
    ///
    /// Four values are read top, bottom, left, right. Extra values are ignored.
    pub fn from_shorthand(input: &str) -> CoreResult<Self> {
        let values = input
            .replace("px", "")
            .split_whitespace()
            .map(|v| v.parse::<f64>().map(f64::trunc))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| CoreError::MalformedPadding(input.to_owned()))?;

        let (top, bottom, left, right) = match values[..] {
            [] => return Err(CoreError::MalformedPadding(input.to_owned())),
            [all] => (all, all, all, all),
            [vertical, horizontal] => (vertical, vertical, horizontal, horizontal),
            [top, horizontal, bottom] => (top, bottom, horizontal, horizontal),
            [top, bottom, left, right, ..] => (top, bottom, left, right),
        };
        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Replaces individual sides.
    #[must_use]
    pub fn with_overrides(
        self,
        top: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
        right: Option<f64>,
    ) -> Self {
        Self {
            top: top.unwrap_or(self.top),
            bottom: bottom.unwrap_or(self.bottom),
            left: left.unwrap_or(self.left),
            right: right.unwrap_or(self.right),
        }
    }

    /// Multiplies every side.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            top: self.top * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
            right: self.right * factor,
        }
    }
}

/// Wheel geometry for one surface size.
///
/// Coordinates are relative to the wheel center unless stated otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelLayout {
    /// Wheel center on the surface.
    pub center: Point,
    /// Outer radius.
    pub radius: f64,
    /// Outer radius of each ring, outermost first.
    pub block_radii: Vec<f64>,
    /// Radius left for the prize ring.
    pub prize_radius: f64,
    /// Largest button radius; the prize ring ends here.
    pub button_radius: f64,
    /// Sector width in degrees.
    pub prize_deg: f64,
    /// Sector width in radians.
    pub prize_angle: f64,
}

impl WheelLayout {
    /// Computes the layout for a `width` x `height` surface.
    #[must_use]
    pub fn compute(width: f64, height: f64, model: &WheelModel, units: &UnitConverter) -> Self {
        let radius = width.min(height).max(0.0) / 2.0;
        let mut block_radii = Vec::with_capacity(model.blocks.len());
        let prize_radius = model.blocks.iter().fold(radius, |r, block| {
            block_radii.push(r);
            (r - block.padding).max(0.0)
        });

        let button_radius = model
            .buttons
            .iter()
            .map(|btn| units.relative(&btn.radius, prize_radius))
            .fold(0.0, f64::max);

        let prize_deg = if model.prizes.is_empty() {
            0.0
        } else {
            360.0 / model.prizes.len() as f64
        };

        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius,
            block_radii,
            prize_radius,
            button_radius,
            prize_deg,
            prize_angle: deg_to_rad(prize_deg),
        }
    }

    /// Returns true if there is room for sectors inside the rings.
    #[must_use]
    pub fn has_prize_ring(&self) -> bool {
        self.prize_radius > 0.0 && self.prize_deg > 0.0
    }

    /// Angle of the middle of sector `index` at wheel rotation `rotation`
    /// (degrees). Index 0 sits at the top when rotation and offset are zero.
    #[must_use]
    pub fn sector_middle(&self, index: usize, rotation: f64, offset_degree: f64) -> f64 {
        deg_to_rad(-90.0 + rotation + offset_degree) + index as f64 * self.prize_angle
    }

    /// Radial depth of the visible part of a sector.
    #[must_use]
    pub fn prize_height(&self) -> f64 {
        self.prize_radius - self.button_radius
    }

    /// Arc length of a sector at the rim; the denominator for widths.
    #[must_use]
    pub fn prize_arc(&self) -> f64 {
        self.prize_angle * self.prize_radius
    }

    /// Available chord width for a text line whose baseline sits `line_y`
    /// below the rim.
    #[must_use]
    pub fn chord_width(&self, line_y: f64, gutter: f64) -> f64 {
        (self.prize_radius - line_y) * (self.prize_angle / 2.0).tan() * 2.0 - gutter
    }

    /// The whole wheel as a box around its center; gradients resolve here.
    #[must_use]
    pub fn wheel_box(&self) -> Rect {
        Rect::new(-self.radius, -self.radius, self.radius * 2.0, self.radius * 2.0)
    }

    /// Returns true if the surface point is on a button.
    #[must_use]
    pub fn hits_button(&self, x: f64, y: f64) -> bool {
        self.button_radius > 0.0 && self.center.distance(Point::new(x, y)) <= self.button_radius
    }
}

/// Grid geometry for one surface size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    /// The whole surface.
    pub bounds: Rect,
    /// Each frame's box, outermost first.
    pub block_rects: Vec<Rect>,
    /// Area left for cells.
    pub area: Rect,
    /// Width of a single cell.
    pub cell_width: f64,
    /// Height of a single cell.
    pub cell_height: f64,
    /// Gap between cells.
    pub gutter: f64,
}

impl GridLayout {
    /// Computes the layout for a `width` x `height` surface.
    #[must_use]
    pub fn compute(width: f64, height: f64, model: &GridModel) -> Self {
        let bounds = Rect::new(0.0, 0.0, width, height);
        let mut block_rects = Vec::with_capacity(model.blocks.len());
        let area = model.blocks.iter().fold(bounds, |rect, block| {
            block_rects.push(rect);
            let p = block.padding;
            rect.inset(p.top, p.right, p.bottom, p.left)
        });

        let cols = f64::from(model.cols.max(1));
        let rows = f64::from(model.rows.max(1));
        let gutter = model.gutter;

        Self {
            bounds,
            block_rects,
            area,
            cell_width: (area.width - gutter * (cols - 1.0)) / cols,
            cell_height: (area.height - gutter * (rows - 1.0)) / rows,
            gutter,
        }
    }

    /// Width of `col` cells plus the gutters between them.
    #[must_use]
    pub fn span_width(&self, col: u32) -> f64 {
        let col = f64::from(col);
        self.cell_width * col + self.gutter * (col - 1.0)
    }

    /// Height of `row` cells plus the gutters between them.
    #[must_use]
    pub fn span_height(&self, row: u32) -> f64 {
        let row = f64::from(row);
        self.cell_height * row + self.gutter * (row - 1.0)
    }

    /// Box of the cell at column `x`, row `y` spanning `col` x `row`.
    #[must_use]
    pub fn cell_rect(&self, x: u32, y: u32, col: u32, row: u32) -> Rect {
        Rect::new(
            self.area.x + (self.cell_width + self.gutter) * f64::from(x),
            self.area.y + (self.cell_height + self.gutter) * f64::from(y),
            self.span_width(col),
            self.span_height(row),
        )
    }

    /// X offset that centers something `width` wide in a `col` span.
    #[must_use]
    pub fn center_offset(&self, width: f64, col: u32) -> f64 {
        (self.span_width(col) - width) / 2.0
    }

    /// Converts a length against a `col`-wide span.
    #[must_use]
    pub fn width_of(&self, units: &UnitConverter, length: &Length, col: u32) -> f64 {
        units.relative(length, self.span_width(col))
    }

    /// Converts an optional length against a `row`-tall span.
    #[must_use]
    pub fn height_of(&self, units: &UnitConverter, length: Option<&Length>, row: u32) -> f64 {
        units.relative_or_zero(length, self.span_height(row))
    }
}
