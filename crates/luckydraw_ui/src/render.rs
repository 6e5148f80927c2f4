//! Drawing capabilities.
//!
//! The widgets never rasterize anything. They describe a frame through the
//! [`Surface`] trait, which a host backs with its own 2D context.
//! [`CommandRecorder`] is a surface that just records what it was asked to
//! do, for tests and for hosts that replay command lists.

use luckydraw_core::{Path, Rect};

use crate::images::Bitmap;
use crate::style::{Color, Font, Paint, Shadow};

/// A host 2D drawing context.
///
/// Transform and shadow state follow canvas semantics: `save` pushes them,
/// `restore` pops them.
pub trait Surface {
    /// Clears `rect` to transparent.
    fn clear(&mut self, rect: Rect);

    /// Fills `path` with `paint` under the current transform and shadow.
    fn fill_path(&mut self, path: &Path, paint: &Paint);

    /// Sets the shadow applied to following fills. `None` turns it off.
    fn set_shadow(&mut self, shadow: Option<&Shadow>);

    /// Pushes transform and shadow state.
    fn save(&mut self);

    /// Pops transform and shadow state.
    fn restore(&mut self);

    /// Moves the origin.
    fn translate(&mut self, x: f64, y: f64);

    /// Rotates around the origin, clockwise, in radians.
    fn rotate(&mut self, angle: f64);

    /// Width of `text` in `font`.
    fn measure_text(&mut self, text: &str, font: &Font) -> f64;

    /// Draws `text` with its baseline-left at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color);

    /// Draws `bitmap` scaled into `rect`.
    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Surface cleared.
    Clear {
        /// Cleared area.
        rect: Rect,
    },
    /// Path filled.
    Fill {
        /// The path.
        path: Path,
        /// Its paint.
        paint: Paint,
    },
    /// Shadow changed.
    Shadow(Option<Shadow>),
    /// State pushed.
    Save,
    /// State popped.
    Restore,
    /// Origin moved.
    Translate {
        /// X offset.
        x: f64,
        /// Y offset.
        y: f64,
    },
    /// Rotated.
    Rotate {
        /// Angle in radians.
        angle: f64,
    },
    /// Text drawn.
    Text {
        /// Text content.
        text: String,
        /// X position.
        x: f64,
        /// Baseline position.
        y: f64,
        /// Font.
        font: Font,
        /// Text color.
        color: Color,
    },
    /// Bitmap drawn.
    Image {
        /// Host bitmap id.
        bitmap: u64,
        /// Destination.
        rect: Rect,
    },
}

/// A [`Surface`] that records commands.
///
/// Text is measured as `glyph_advance` per character, which makes wrapping
/// predictable in tests.
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
    glyph_advance: f64,
    frames: u64,
}

impl CommandRecorder {
    /// Default width of one character.
    pub const DEFAULT_GLYPH_ADVANCE: f64 = 10.0;

    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_glyph_advance(Self::DEFAULT_GLYPH_ADVANCE)
    }

    /// Creates a recorder measuring `advance` per character.
    #[must_use]
    pub fn with_glyph_advance(advance: f64) -> Self {
        Self {
            commands: Vec::with_capacity(256),
            glyph_advance: advance,
            frames: 0,
        }
    }

    /// Forgets everything recorded so far.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    /// Commands since the last clear or `begin_frame`.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the total command count.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Number of `clear` calls seen, i.e. frames drawn.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of every `Text` command, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Ids of every drawn bitmap, in order.
    #[must_use]
    pub fn images(&self) -> Vec<u64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Image { bitmap, .. } => Some(*bitmap),
                _ => None,
            })
            .collect()
    }

    /// Every fill paint, in order.
    #[must_use]
    pub fn paints(&self) -> Vec<&Paint> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Fill { paint, .. } => Some(paint),
                _ => None,
            })
            .collect()
    }
}

impl Default for CommandRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for CommandRecorder {
    fn clear(&mut self, rect: Rect) {
        // A clear starts a frame; earlier commands are no longer visible.
        self.commands.clear();
        self.frames += 1;
        self.commands.push(RenderCommand::Clear { rect });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(RenderCommand::Fill {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn set_shadow(&mut self, shadow: Option<&Shadow>) {
        self.commands.push(RenderCommand::Shadow(shadow.copied()));
    }

    fn save(&mut self) {
        self.commands.push(RenderCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(RenderCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(RenderCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(RenderCommand::Rotate { angle });
    }

    fn measure_text(&mut self, text: &str, _font: &Font) -> f64 {
        text.chars().count() as f64 * self.glyph_advance
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: Color) {
        self.commands.push(RenderCommand::Text {
            text: text.to_owned(),
            x,
            y,
            font: font.clone(),
            color,
        });
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) {
        self.commands.push(RenderCommand::Image {
            bitmap: bitmap.id,
            rect,
        });
    }
}
