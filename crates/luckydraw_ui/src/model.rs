//! Explicit style merge.
//!
//! Turns a configuration tree into a draw model once per `configure`:
//! every fallback chain (`item -> defaultStyle -> built-in`) is resolved,
//! every color, gradient and shadow is parsed and every fixed length is in
//! device pixels. Percentages stay as [`Length`]s because their denominator
//! depends on the layout.

use luckydraw_core::{Length, UnitConverter};

use crate::animation::SpinTiming;
use crate::config::{
    ActiveStyle, BlockConfig, ButtonConfig, DefaultStyle, FontConfig, GridConfig, ImageConfig,
    PrizeConfig, WheelConfig,
};
use crate::error::DrawResult;
use crate::images::EntityKey;
use crate::layout::Padding;
use crate::style::{Background, Color, Font, Shadow};

/// Grid corner radius used when neither the cell nor the default style sets one.
pub const DEFAULT_CELL_RADIUS: Length = Length::Px(20.0);

/// A text run with every fallback applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text.
    pub text: String,
    /// Offset of the first line from the top of the owning box.
    pub top: Option<Length>,
    /// Fill color.
    pub color: Color,
    /// Resolved font.
    pub font: Font,
    /// Line advance in device pixels.
    pub line_height: f64,
    /// Wrap against the available width.
    pub word_wrap: bool,
    /// Maximum line width.
    pub length_limit: Length,
}

impl TextRun {
    fn merge(
        font: &FontConfig,
        style: &DefaultStyle,
        active: Option<&ActiveStyle>,
        units: &UnitConverter,
    ) -> DrawResult<Self> {
        let dpr = units.dpr();

        let color = active
            .and_then(|a| a.font_color.as_deref())
            .or(font.font_color.as_deref())
            .unwrap_or(&style.font_color);
        let weight = active
            .and_then(|a| a.font_weight.as_deref())
            .or(font.font_weight.as_deref())
            .unwrap_or(&style.font_weight);
        let family = active
            .and_then(|a| a.font_style.as_deref())
            .or(font.font_style.as_deref())
            .unwrap_or(&style.font_style);
        let size = active
            .and_then(|a| a.font_size)
            .or(font.font_size)
            .unwrap_or(style.font_size);
        let line_height = active
            .and_then(|a| a.line_height)
            .or(font.line_height)
            .or(style.line_height)
            .or(font.font_size)
            .unwrap_or(style.font_size);

        Ok(Self {
            text: font.text.clone(),
            top: font.top,
            color: Color::parse(color)?,
            font: Font {
                weight: weight.to_owned(),
                size: units.length(&size) * dpr,
                family: family.to_owned(),
            },
            line_height: units.length(&line_height) * dpr,
            word_wrap: font.word_wrap.unwrap_or(style.word_wrap),
            length_limit: font.length_limit.unwrap_or(style.length_limit),
        })
    }

    fn merge_all(
        fonts: &[FontConfig],
        style: &DefaultStyle,
        active: Option<&ActiveStyle>,
        units: &UnitConverter,
    ) -> DrawResult<Vec<Self>> {
        fonts
            .iter()
            .map(|f| Self::merge(f, style, active, units))
            .collect()
    }
}

/// How one grid cell looks in one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Look {
    /// Cell fill.
    pub background: Background,
    /// Cell shadow.
    pub shadow: Option<Shadow>,
    /// Text runs.
    pub fonts: Vec<TextRun>,
}

/// A wheel ring.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelBlock {
    /// Ring fill.
    pub background: Background,
    /// How much the ring shrinks the radius, in device pixels.
    pub padding: f64,
}

/// A wheel prize.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelPrize {
    /// Sector fill.
    pub background: Background,
    /// Text runs.
    pub fonts: Vec<TextRun>,
    /// Images.
    pub imgs: Vec<ImageConfig>,
}

/// A wheel button.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelButton {
    /// Radius, relative to the prize ring.
    pub radius: Length,
    /// Draw the pointer triangle.
    pub pointer: bool,
    /// Fill.
    pub background: Background,
    /// Text runs.
    pub fonts: Vec<TextRun>,
    /// Images.
    pub imgs: Vec<ImageConfig>,
}

/// Fully merged wheel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WheelModel {
    /// Rings, outermost first.
    pub blocks: Vec<WheelBlock>,
    /// Prizes in landing order.
    pub prizes: Vec<WheelPrize>,
    /// Buttons.
    pub buttons: Vec<WheelButton>,
    /// Sector gutter in device pixels.
    pub gutter: f64,
    /// Whole-wheel rotation in degrees.
    pub offset_degree: f64,
    /// Spin timing.
    pub timing: SpinTiming,
    /// Image barrier timeout.
    pub image_timeout_ms: u64,
}

impl WheelModel {
    /// Merges a wheel configuration.
    pub fn merge(config: &WheelConfig, units: &UnitConverter) -> DrawResult<Self> {
        let style = &config.default_style;
        let defaults = &config.default_config;
        let dpr = units.dpr();

        let blocks = config
            .blocks
            .iter()
            .map(|block| {
                // Rings are circles, so only the first padding value counts.
                let padding = match block.padding.as_deref().and_then(|p| p.split_whitespace().next()) {
                    Some(token) => units.length(&Length::parse(token)?) * dpr,
                    None => 0.0,
                };
                Ok(WheelBlock {
                    background: Background::first_of(&[block.background.as_deref()])?,
                    padding,
                })
            })
            .collect::<DrawResult<Vec<_>>>()?;

        let prizes = config
            .prizes
            .iter()
            .map(|prize| {
                Ok(WheelPrize {
                    background: Background::first_of(&[
                        prize.background.as_deref(),
                        Some(style.background.as_str()),
                    ])?,
                    fonts: TextRun::merge_all(&prize.fonts, style, None, units)?,
                    imgs: prize.imgs.clone(),
                })
            })
            .collect::<DrawResult<Vec<_>>>()?;

        let buttons = config
            .buttons
            .iter()
            .map(|btn| {
                Ok(WheelButton {
                    radius: btn.radius.unwrap_or(Length::ZERO),
                    pointer: btn.pointer,
                    background: Background::first_of(&[btn.background.as_deref()])?,
                    fonts: TextRun::merge_all(&btn.fonts, style, None, units)?,
                    imgs: btn.imgs.clone(),
                })
            })
            .collect::<DrawResult<Vec<_>>>()?;

        Ok(Self {
            blocks,
            prizes,
            buttons,
            gutter: units.length(&defaults.gutter) * dpr,
            offset_degree: defaults.offset_degree,
            timing: SpinTiming {
                speed: defaults.speed,
                acceleration: defaults.acceleration_time,
                deceleration: defaults.deceleration_time,
            },
            image_timeout_ms: defaults.image_timeout,
        })
    }

    /// Image slots to load, in a stable order.
    #[must_use]
    pub fn image_slots(&self) -> Vec<(EntityKey, &[ImageConfig])> {
        let prizes = self
            .prizes
            .iter()
            .enumerate()
            .map(|(i, p)| (EntityKey::Prize(i), p.imgs.as_slice()));
        let buttons = self
            .buttons
            .iter()
            .enumerate()
            .map(|(i, b)| (EntityKey::Button(i), b.imgs.as_slice()));
        prizes.chain(buttons).collect()
    }
}

/// A grid frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBlock {
    /// Frame fill.
    pub background: Background,
    /// Corner radius in device pixels.
    pub radius: f64,
    /// Inset applied to everything inside, in device pixels.
    pub padding: Padding,
}

/// A grid cell: a prize or a button.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Which configured entity this cell draws.
    pub entity: EntityKey,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Columns spanned.
    pub col: u32,
    /// Rows spanned.
    pub row: u32,
    /// Corner radius in device pixels.
    pub radius: f64,
    /// Resting look.
    pub normal: Look,
    /// Highlighted look; buttons have none.
    pub active: Option<Look>,
    /// Images.
    pub imgs: Vec<ImageConfig>,
}

/// Fully merged grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridModel {
    /// Frames, outermost first.
    pub blocks: Vec<GridBlock>,
    /// Prize cells first, in landing order, then button cells.
    pub cells: Vec<GridCell>,
    /// Number of prize cells.
    pub prize_count: usize,
    /// Columns.
    pub cols: u32,
    /// Rows.
    pub rows: u32,
    /// Cell gutter in device pixels.
    pub gutter: f64,
    /// Spin timing, speed already in cells per frame.
    pub timing: SpinTiming,
    /// Walk the highlight while idle.
    pub demo: bool,
    /// Image barrier timeout.
    pub image_timeout_ms: u64,
}

/// Grid speeds are configured on the wheel's scale.
const GRID_SPEED_DIVISOR: f64 = 40.0;

impl GridModel {
    /// Merges a grid configuration.
    pub fn merge(config: &GridConfig, units: &UnitConverter) -> DrawResult<Self> {
        let style = &config.default_style;
        let defaults = &config.default_config;
        let dpr = units.dpr();
        let device = |l: &Length| units.length(l) * dpr;
        let default_radius = device(&style.border_radius.unwrap_or(DEFAULT_CELL_RADIUS));
        let (cols, rows) = config.dimensions();

        let blocks = config
            .blocks
            .iter()
            .map(|block| {
                Ok(GridBlock {
                    background: Background::first_of(&[
                        block.background.as_deref(),
                        Some(style.background.as_str()),
                    ])?,
                    radius: block.border_radius.as_ref().map_or(0.0, device),
                    padding: block_padding(block, units)?.scaled(dpr),
                })
            })
            .collect::<DrawResult<Vec<_>>>()?;

        let mut cells = config
            .prizes
            .iter()
            .enumerate()
            .map(|(i, prize)| prize_cell(i, prize, config, default_radius, units))
            .collect::<DrawResult<Vec<_>>>()?;
        for (i, btn) in config.buttons.iter().enumerate() {
            cells.push(button_cell(i, btn, style, default_radius, units)?);
        }

        Ok(Self {
            blocks,
            cells,
            prize_count: config.prizes.len(),
            cols,
            rows,
            gutter: device(&defaults.gutter),
            timing: SpinTiming {
                speed: defaults.speed / GRID_SPEED_DIVISOR,
                acceleration: defaults.acceleration_time,
                deceleration: defaults.deceleration_time,
            },
            demo: config.demo,
            image_timeout_ms: defaults.image_timeout,
        })
    }

    /// Image slots to load, in a stable order.
    #[must_use]
    pub fn image_slots(&self) -> Vec<(EntityKey, &[ImageConfig])> {
        self.cells
            .iter()
            .map(|cell| (cell.entity, cell.imgs.as_slice()))
            .collect()
    }

    /// Button cells.
    pub fn buttons(&self) -> impl Iterator<Item = &GridCell> {
        self.cells
            .iter()
            .filter(|c| matches!(c.entity, EntityKey::Button(_)))
    }
}

fn block_padding(block: &BlockConfig, units: &UnitConverter) -> DrawResult<Padding> {
    let base = match block.padding.as_deref() {
        Some(shorthand) => Padding::from_shorthand(shorthand)?,
        None => Padding::ZERO,
    };
    let side = |l: &Option<Length>| l.as_ref().map(|l| units.length(l).trunc());
    Ok(base.with_overrides(
        side(&block.padding_top),
        side(&block.padding_bottom),
        side(&block.padding_left),
        side(&block.padding_right),
    ))
}

fn prize_cell(
    index: usize,
    prize: &PrizeConfig,
    config: &GridConfig,
    default_radius: f64,
    units: &UnitConverter,
) -> DrawResult<GridCell> {
    let style = &config.default_style;
    let active = &config.active_style;
    let dpr = units.dpr();

    let normal = Look {
        background: Background::first_of(&[
            prize.background.as_deref(),
            Some(style.background.as_str()),
        ])?,
        shadow: Shadow::parse(prize.shadow.as_deref().unwrap_or(&style.shadow), dpr)?,
        fonts: TextRun::merge_all(&prize.fonts, style, None, units)?,
    };
    let highlighted = Look {
        background: Background::parse(&active.background)?,
        shadow: Shadow::parse(&active.shadow, dpr)?,
        fonts: TextRun::merge_all(&prize.fonts, style, Some(active), units)?,
    };

    Ok(GridCell {
        entity: EntityKey::Prize(index),
        x: prize.x,
        y: prize.y,
        col: span(prize.col),
        row: span(prize.row),
        radius: prize
            .border_radius
            .as_ref()
            .map_or(default_radius, |r| units.length(r) * dpr),
        normal,
        active: Some(highlighted),
        imgs: prize.imgs.clone(),
    })
}

fn button_cell(
    index: usize,
    btn: &ButtonConfig,
    style: &DefaultStyle,
    default_radius: f64,
    units: &UnitConverter,
) -> DrawResult<GridCell> {
    let dpr = units.dpr();
    Ok(GridCell {
        entity: EntityKey::Button(index),
        x: btn.x,
        y: btn.y,
        col: span(btn.col),
        row: span(btn.row),
        radius: btn
            .border_radius
            .as_ref()
            .map_or(default_radius, |r| units.length(r) * dpr),
        normal: Look {
            background: Background::first_of(&[
                btn.background.as_deref(),
                Some(style.background.as_str()),
            ])?,
            shadow: Shadow::parse(btn.shadow.as_deref().unwrap_or(&style.shadow), dpr)?,
            fonts: TextRun::merge_all(&btn.fonts, style, None, units)?,
        },
        active: None,
        imgs: btn.imgs.clone(),
    })
}

fn span(value: Option<u32>) -> u32 {
    value.filter(|&n| n > 0).unwrap_or(1)
}
