//! Configuration tree.
//!
//! Deserialized from TOML (or anything serde speaks) with camelCase keys.
//! Everything here is the configuration as written: lengths are still
//! unconverted and colors are still strings. [`crate::model`] turns it into
//! a fully resolved draw model once per `configure`.
//!
//! ```toml
//! [defaultConfig]
//! speed = 20
//! accelerationTime = 2500
//!
//! [[prizes]]
//! background = "#e9e8fe"
//! fonts = [{ text = "Free coffee", top = "18%" }]
//! imgs = [{ src = "coffee.png", width = "40%", top = "45%" }]
//! sku = "coffee-01"       # unknown keys travel back through `end`
//! ```

use luckydraw_core::{Length, UnitConverter};
use serde::{Deserialize, Deserializer};

use crate::error::{DrawError, DrawResult};

/// Rows/cols used when a grid does not say otherwise.
pub const DEFAULT_GRID_SIZE: u32 = 3;

/// Already-resolved host environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Device pixel ratio of the surface.
    pub device_pixel_ratio: f64,
    /// Root font size in CSS pixels, for `rem`.
    pub root_font_size: f64,
}

impl Environment {
    /// Creates an environment.
    #[must_use]
    pub const fn new(device_pixel_ratio: f64, root_font_size: f64) -> Self {
        Self {
            device_pixel_ratio,
            root_font_size,
        }
    }

    /// Unit converter for this environment.
    #[must_use]
    pub fn units(&self) -> UnitConverter {
        UnitConverter::new(self.device_pixel_ratio, self.root_font_size)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(1.0, 16.0)
    }
}

/// An image slot on a prize, cell or button.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Source handed to the host loader.
    pub src: String,
    /// Variant shown while a grid cell is highlighted.
    #[serde(default)]
    pub active_src: Option<String>,
    /// Offset from the top of the owning box.
    #[serde(default)]
    pub top: Option<Length>,
    /// Drawn width; natural width when absent.
    #[serde(default)]
    pub width: Option<Length>,
    /// Drawn height; natural height when absent.
    #[serde(default)]
    pub height: Option<Length>,
}

/// One text run. Unset fields fall back to the default style.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    /// The text. Numbers are accepted and printed as written.
    #[serde(deserialize_with = "string_or_number")]
    pub text: String,
    /// Offset of the first line from the top of the owning box.
    #[serde(default)]
    pub top: Option<Length>,
    /// Fill color.
    #[serde(default)]
    pub font_color: Option<String>,
    /// Font size.
    #[serde(default)]
    pub font_size: Option<Length>,
    /// Font family list.
    #[serde(default)]
    pub font_style: Option<String>,
    /// Font weight (`"400"`, `700`, `"bold"`).
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub font_weight: Option<String>,
    /// Line advance.
    #[serde(default)]
    pub line_height: Option<Length>,
    /// Wrap against the available width.
    #[serde(default)]
    pub word_wrap: Option<bool>,
    /// Maximum line width, usually a percentage of the available width.
    #[serde(default)]
    pub length_limit: Option<Length>,
}

/// A border/background layer around the prize area.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    /// Padding shorthand, e.g. `"10px 20px"`.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub padding: Option<String>,
    /// Top padding override (grid).
    #[serde(default)]
    pub padding_top: Option<Length>,
    /// Bottom padding override (grid).
    #[serde(default)]
    pub padding_bottom: Option<Length>,
    /// Left padding override (grid).
    #[serde(default)]
    pub padding_left: Option<Length>,
    /// Right padding override (grid).
    #[serde(default)]
    pub padding_right: Option<Length>,
    /// Color or `linear-gradient(...)`.
    #[serde(default)]
    pub background: Option<String>,
    /// Corner radius (grid).
    #[serde(default)]
    pub border_radius: Option<Length>,
}

/// A wheel prize or grid cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeConfig {
    /// Grid column.
    #[serde(default)]
    pub x: u32,
    /// Grid row.
    #[serde(default)]
    pub y: u32,
    /// Columns spanned (grid).
    #[serde(default)]
    pub col: Option<u32>,
    /// Rows spanned (grid).
    #[serde(default)]
    pub row: Option<u32>,
    /// Color or `linear-gradient(...)`.
    #[serde(default)]
    pub background: Option<String>,
    /// Corner radius (grid).
    #[serde(default)]
    pub border_radius: Option<Length>,
    /// Box shadow (grid).
    #[serde(default)]
    pub shadow: Option<String>,
    /// Text runs.
    #[serde(default)]
    pub fonts: Vec<FontConfig>,
    /// Images.
    #[serde(default)]
    pub imgs: Vec<ImageConfig>,
    /// Keys the widget does not know about, returned to the `end` callback.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// A wheel button or grid button cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    /// Grid column.
    #[serde(default)]
    pub x: u32,
    /// Grid row.
    #[serde(default)]
    pub y: u32,
    /// Columns spanned (grid).
    #[serde(default)]
    pub col: Option<u32>,
    /// Rows spanned (grid).
    #[serde(default)]
    pub row: Option<u32>,
    /// Button radius, relative to the prize ring (wheel).
    #[serde(default)]
    pub radius: Option<Length>,
    /// Draw a pointer triangle above the button (wheel).
    #[serde(default)]
    pub pointer: bool,
    /// Color or `linear-gradient(...)`.
    #[serde(default)]
    pub background: Option<String>,
    /// Corner radius (grid).
    #[serde(default)]
    pub border_radius: Option<Length>,
    /// Box shadow (grid).
    #[serde(default)]
    pub shadow: Option<String>,
    /// Text runs.
    #[serde(default)]
    pub fonts: Vec<FontConfig>,
    /// Images.
    #[serde(default)]
    pub imgs: Vec<ImageConfig>,
}

/// Style fallbacks shared by every prize.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultStyle {
    /// Font size.
    pub font_size: Length,
    /// Text color.
    pub font_color: String,
    /// Font family list.
    pub font_style: String,
    /// Font weight.
    #[serde(deserialize_with = "string_or_number")]
    pub font_weight: String,
    /// Line advance; the font size when absent.
    pub line_height: Option<Length>,
    /// Prize background.
    pub background: String,
    /// Wrap text runs.
    pub word_wrap: bool,
    /// Maximum line width.
    pub length_limit: Length,
    /// Cell corner radius (grid, 20 when absent).
    pub border_radius: Option<Length>,
    /// Cell shadow (grid).
    pub shadow: String,
}

impl Default for DefaultStyle {
    fn default() -> Self {
        Self {
            font_size: Length::Px(18.0),
            font_color: "#000".to_owned(),
            font_style: "microsoft yahei ui,microsoft yahei,simsun,sans-serif".to_owned(),
            font_weight: "400".to_owned(),
            line_height: None,
            background: "#fff".to_owned(),
            word_wrap: true,
            length_limit: Length::Percent(90.0),
            border_radius: None,
            shadow: String::new(),
        }
    }
}

/// Overrides applied to the highlighted grid cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveStyle {
    /// Highlight background.
    pub background: String,
    /// Highlight shadow.
    pub shadow: String,
    /// Text color override.
    pub font_color: Option<String>,
    /// Font size override.
    pub font_size: Option<Length>,
    /// Font family override.
    pub font_style: Option<String>,
    /// Font weight override.
    #[serde(deserialize_with = "opt_string_or_number")]
    pub font_weight: Option<String>,
    /// Line advance override.
    pub line_height: Option<Length>,
}

impl Default for ActiveStyle {
    fn default() -> Self {
        Self {
            background: "#ffce98".to_owned(),
            shadow: String::new(),
            font_color: None,
            font_size: None,
            font_style: None,
            font_weight: None,
            line_height: None,
        }
    }
}

/// Wheel timing and geometry knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelDefaults {
    /// Gap between sectors.
    pub gutter: Length,
    /// Rotation applied to the whole wheel, in degrees.
    pub offset_degree: f64,
    /// Peak rotation per frame, in degrees.
    pub speed: f64,
    /// Acceleration window in ms.
    pub acceleration_time: f64,
    /// Deceleration window in ms.
    pub deceleration_time: f64,
    /// Time allowed for images before the barrier is forced, in ms.
    pub image_timeout: u64,
}

impl Default for WheelDefaults {
    fn default() -> Self {
        Self {
            gutter: Length::ZERO,
            offset_degree: 0.0,
            speed: 20.0,
            acceleration_time: 2500.0,
            deceleration_time: 2500.0,
            image_timeout: 10_000,
        }
    }
}

/// Grid timing and geometry knobs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridDefaults {
    /// Gap between cells.
    pub gutter: Length,
    /// Peak speed; divided by 40 to get cells per frame.
    pub speed: f64,
    /// Acceleration window in ms.
    pub acceleration_time: f64,
    /// Deceleration window in ms.
    pub deceleration_time: f64,
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Time allowed for images before the barrier is forced, in ms.
    pub image_timeout: u64,
}

impl Default for GridDefaults {
    fn default() -> Self {
        Self {
            gutter: Length::Px(5.0),
            speed: 20.0,
            acceleration_time: 2500.0,
            deceleration_time: 2500.0,
            rows: DEFAULT_GRID_SIZE,
            cols: DEFAULT_GRID_SIZE,
            image_timeout: 10_000,
        }
    }
}

/// Configuration of a [`crate::LuckyWheel`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WheelConfig {
    /// Concentric rings, outermost first.
    pub blocks: Vec<BlockConfig>,
    /// Prizes, clockwise from the top.
    #[serde(alias = "cells")]
    pub prizes: Vec<PrizeConfig>,
    /// Center buttons.
    #[serde(alias = "button", deserialize_with = "one_or_many")]
    pub buttons: Vec<ButtonConfig>,
    /// Timing and geometry.
    pub default_config: WheelDefaults,
    /// Style fallbacks.
    pub default_style: DefaultStyle,
}

impl WheelConfig {
    /// Parses a TOML document.
    pub fn from_toml(source: &str) -> DrawResult<Self> {
        toml::from_str(source).map_err(|e| DrawError::ConfigParse(e.to_string()))
    }
}

/// Configuration of a [`crate::LuckyGrid`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Rows; overrides `defaultConfig.rows`.
    pub rows: Option<u32>,
    /// Columns; overrides `defaultConfig.cols`.
    pub cols: Option<u32>,
    /// Nested frames, outermost first.
    pub blocks: Vec<BlockConfig>,
    /// Prize cells. Their order is the landing index.
    #[serde(alias = "cells")]
    pub prizes: Vec<PrizeConfig>,
    /// Button cells.
    #[serde(alias = "button", deserialize_with = "one_or_many")]
    pub buttons: Vec<ButtonConfig>,
    /// Walk the highlight around while idle.
    pub demo: bool,
    /// Timing and geometry.
    pub default_config: GridDefaults,
    /// Style fallbacks.
    pub default_style: DefaultStyle,
    /// Highlighted cell overrides.
    pub active_style: ActiveStyle,
}

impl GridConfig {
    /// Parses a TOML document.
    pub fn from_toml(source: &str) -> DrawResult<Self> {
        toml::from_str(source).map_err(|e| DrawError::ConfigParse(e.to_string()))
    }

    /// `(cols, rows)`, zero counts replaced by the default.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let pick = |top: Option<u32>, fallback: u32| {
            top.or(Some(fallback))
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_GRID_SIZE)
        };
        (
            pick(self.cols, self.default_config.cols),
            pick(self.rows, self.default_config.rows),
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer).map(|v| v.map(Scalar::into_string))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_defaults() {
        let config = WheelConfig::from_toml("").unwrap();
        assert!(config.prizes.is_empty());
        assert_eq!(config.default_config.speed, 20.0);
        assert_eq!(config.default_config.acceleration_time, 2500.0);
        assert_eq!(config.default_config.image_timeout, 10_000);
        assert_eq!(config.default_style.font_size, Length::Px(18.0));
        assert_eq!(config.default_style.length_limit, Length::Percent(90.0));
        assert!(config.default_style.word_wrap);
    }

    #[test]
    fn test_partial_style_keeps_other_defaults() {
        let config = WheelConfig::from_toml(
            r##"
            [defaultStyle]
            fontColor = "#f00"
            fontWeight = 700
            "##,
        )
        .unwrap();
        assert_eq!(config.default_style.font_color, "#f00");
        assert_eq!(config.default_style.font_weight, "700");
        assert_eq!(config.default_style.background, "#fff");
    }

    #[test]
    fn test_prizes_and_extra_keys() {
        let config = WheelConfig::from_toml(
            r##"
            [[cells]]
            background = "#e9e8fe"
            sku = "coffee-01"
            fonts = [{ text = 100, top = "18%" }]
            imgs = [{ src = "coffee.png", width = 40 }]
            "##,
        )
        .unwrap();
        let prize = &config.prizes[0];
        assert_eq!(prize.fonts[0].text, "100");
        assert_eq!(prize.fonts[0].top, Some(Length::Percent(18.0)));
        assert_eq!(prize.imgs[0].width, Some(Length::Px(40.0)));
        assert_eq!(
            prize.extra.get("sku").and_then(toml::Value::as_str),
            Some("coffee-01")
        );
        assert!(!prize.extra.contains_key("background"));
    }

    #[test]
    fn test_single_button_table() {
        let config = GridConfig::from_toml(
            r##"
            [button]
            x = 1
            y = 1
            background = "#ffe"
            "##,
        )
        .unwrap();
        assert_eq!(config.buttons.len(), 1);
        assert_eq!(config.buttons[0].x, 1);

        let config = WheelConfig::from_toml(
            r##"
            [[buttons]]
            radius = "35%"
            pointer = true
            "##,
        )
        .unwrap();
        assert_eq!(config.buttons[0].radius, Some(Length::Percent(35.0)));
        assert!(config.buttons[0].pointer);
    }

    #[test]
    fn test_grid_dimensions() {
        let config = GridConfig::from_toml("cols = 4\n[defaultConfig]\nrows = 0").unwrap();
        assert_eq!(config.dimensions(), (4, 3));
        assert_eq!(config.default_config.gutter, Length::Px(5.0));
        assert_eq!(config.active_style.background, "#ffce98");
    }

    #[test]
    fn test_malformed_length_fails_parse() {
        let err = WheelConfig::from_toml("[defaultConfig]\ngutter = \"ten\"").unwrap_err();
        assert!(matches!(err, DrawError::ConfigParse(_)));
    }
}
