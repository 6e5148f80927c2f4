//! The grid widget.
//!
//! Prize cells laid out on a `cols` x `rows` board inside nested frames,
//! plus button cells. A highlight runs over the prize cells in configured
//! order and stops on the armed one.

use luckydraw_core::geometry::round_rect;
use luckydraw_core::text::{baseline, layout_lines};
use luckydraw_core::{Rect, UnitConverter};

use crate::animation::{SpinState, Track};
use crate::config::{Environment, GridConfig, PrizeConfig};
use crate::error::{DrawError, DrawResult};
use crate::images::{image_size, EntityKey, ImageCache, ImageLoader, SlotKey, Variant};
use crate::layout::GridLayout;
use crate::model::{GridCell, GridModel, Look};
use crate::render::Surface;
use crate::scheduler::FrameScheduler;
use crate::shell::Shell;

/// Interval of the idle demo walk, in ms.
pub const DEMO_STEP_MS: f64 = 1300.0;

/// A lucky-draw grid drawn on a host surface.
///
/// Sizes and click coordinates are in device pixels. See
/// [`LuckyWheel`](crate::LuckyWheel) for the host loop; the grid is driven
/// the same way.
pub struct LuckyGrid<S, F> {
    shell: Shell<S, F>,
    config: GridConfig,
    model: GridModel,
    layout: GridLayout,
    spin: SpinState,
    /// Next demo step, while the demo walk is running.
    demo_next: Option<f64>,
    /// Set by the first `play`; the demo walk never restarts after it.
    played: bool,
}

impl<S: Surface, F: FrameScheduler> LuckyGrid<S, F> {
    /// Creates an unconfigured grid with no surface.
    pub fn new(env: Environment, scheduler: F, loader: impl ImageLoader + 'static) -> Self {
        Self {
            shell: Shell::new(env, scheduler, Box::new(loader)),
            config: GridConfig::default(),
            model: GridModel::default(),
            layout: GridLayout::default(),
            spin: SpinState::new(),
            demo_next: None,
            played: false,
        }
    }

    /// Attaches a surface of `width` x `height` and draws.
    pub fn attach(&mut self, surface: S, width: f64, height: f64) {
        self.shell.attach(surface, width, height);
        self.relayout();
        self.draw();
    }

    /// Detaches the surface.
    pub fn detach(&mut self) -> Option<S> {
        self.shell.detach()
    }

    /// Changes the surface size and redraws.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.shell.resize(width, height);
        self.relayout();
        self.draw();
        if self.needs_frames() {
            self.shell.request_frame();
        }
    }

    /// Applies a configuration.
    ///
    /// On error nothing changes. On success the highlight returns to the
    /// first cell, images start loading and the grid is drawn once without
    /// them.
    pub fn configure(&mut self, config: GridConfig, now: f64) -> DrawResult<()> {
        let model = GridModel::merge(&config, &self.shell.units)?;

        self.shell.cancel_frame("configure");
        self.spin = SpinState::new();
        self.demo_next = None;
        self.played = false;
        self.config = config;
        self.model = model;
        self.relayout();

        let slots = self.model.image_slots();
        let ready = self
            .shell
            .load_images(&slots, now, self.model.image_timeout_ms);
        tracing::info!(
            cells = self.model.prize_count,
            buttons = self.model.buttons().count(),
            cols = self.model.cols,
            rows = self.model.rows,
            images = self.shell.images.pending(),
            "grid configured"
        );

        self.draw();
        if ready {
            self.start_demo(now);
        }
        if self.needs_frames() {
            self.shell.request_frame();
        }
        Ok(())
    }

    /// Sets the callback fired by an accepted [`click`](Self::click).
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) {
        self.shell.callbacks.set_start(Box::new(callback));
    }

    /// Sets the callback fired once per landed spin.
    pub fn on_end(&mut self, callback: impl FnMut(usize, PrizeConfig) + 'static) {
        self.shell.callbacks.set_end(Box::new(callback));
    }

    /// Starts the highlight running. Ends the demo walk for good.
    pub fn play(&mut self, now: f64) -> bool {
        if self.model.prize_count == 0 {
            tracing::debug!("play ignored, grid has no prizes");
            return false;
        }
        if !self.spin.play(now) {
            tracing::debug!("play ignored, grid is already running");
            return false;
        }
        self.demo_next = None;
        self.played = true;
        self.shell.request_frame();
        true
    }

    /// Arms the landing cell as `index mod prizes`.
    pub fn stop(&mut self, index: i64) {
        if self.spin.arm(index, self.model.prize_count).is_none() {
            tracing::debug!(index, "stop ignored, grid has no prizes");
        }
    }

    /// Handles a click at a surface point.
    ///
    /// Fires the start callback and returns true if the point is inside a
    /// button cell (edges included), images are ready and the grid is idle.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        if !self.shell.images.is_ready() {
            return false;
        }
        let hit = self
            .model
            .buttons()
            .any(|btn| self.layout.cell_rect(btn.x, btn.y, btn.col, btn.row).contains(x, y));
        if !hit {
            return false;
        }
        if !self.spin.is_idle() {
            tracing::debug!("click ignored, grid is running");
            return false;
        }
        self.shell.callbacks.fire_start();
        true
    }

    /// Runs one frame. Call when a frame requested through the scheduler fires.
    pub fn on_frame(&mut self, now: f64) {
        self.shell.frame_delivered();

        let mut render = false;
        if self.shell.images.pump(now) {
            tracing::info!("grid images ready");
            self.start_demo(now);
            render = true;
        }

        let track = Track::Grid {
            count: self.model.prize_count,
        };
        let (next, effects) = self.spin.advance(now, track, self.model.timing);
        self.spin = next;
        render |= effects.render;

        if let Some(due) = self.demo_next.filter(|&due| now >= due) {
            let position = track.wrap(self.spin.position().floor() + 1.0);
            self.spin.set_idle_position(position);
            self.demo_next = Some(due + DEMO_STEP_MS);
            render = true;
        }

        if render {
            self.draw();
        }
        if let Some(index) = effects.finished {
            let prize = self.config.prizes.get(index).cloned().unwrap_or_default();
            self.shell.callbacks.fire_end(index, prize);
        }
        if effects.schedule || self.needs_frames() {
            self.shell.request_frame();
        }
    }

    fn start_demo(&mut self, now: f64) {
        if self.model.demo && !self.played && self.model.prize_count > 0 {
            self.demo_next = Some(now + DEMO_STEP_MS);
        }
    }

    fn needs_frames(&self) -> bool {
        !self.spin.is_idle() || !self.shell.images.is_ready() || self.demo_next.is_some()
    }

    /// Draws the current state. Without a surface this does nothing.
    pub fn draw(&mut self) {
        let active = self.active_index();
        let Some(surface) = self.shell.surface.as_mut() else {
            tracing::debug!("grid draw skipped, no surface attached");
            return;
        };
        let scene = Scene {
            model: &self.model,
            layout: &self.layout,
            images: &self.shell.images,
            units: &self.shell.units,
            active,
        };
        scene.paint(surface);
    }

    fn relayout(&mut self) {
        self.layout = GridLayout::compute(self.shell.width, self.shell.height, &self.model);
    }

    /// Index of the highlighted prize cell.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        let count = self.model.prize_count;
        (count > 0).then(|| self.spin.position().floor() as usize % count)
    }

    /// Returns true while the highlight is running.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        !self.spin.is_idle()
    }

    /// Returns true while the idle demo walk is active.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        self.demo_next.is_some()
    }

    /// Returns true once the image barrier has released.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.shell.images.is_ready()
    }

    /// Image failures and timeouts since the last configure.
    #[must_use]
    pub fn image_errors(&self) -> &[DrawError] {
        self.shell.images.errors()
    }

    /// Returns true if a frame callback is outstanding.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.shell.frame_pending()
    }

    /// Current geometry.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Current merged model.
    #[must_use]
    pub fn model(&self) -> &GridModel {
        &self.model
    }

    /// The attached surface.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.shell.surface.as_ref()
    }

    /// The attached surface, mutably.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.shell.surface.as_mut()
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.shell.scheduler
    }

    /// The frame scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.shell.scheduler
    }
}

struct Scene<'a> {
    model: &'a GridModel,
    layout: &'a GridLayout,
    images: &'a ImageCache,
    units: &'a UnitConverter,
    active: Option<usize>,
}

impl Scene<'_> {
    fn paint<S: Surface>(&self, surface: &mut S) {
        surface.clear(self.layout.bounds);

        for (block, &rect) in self.model.blocks.iter().zip(&self.layout.block_rects) {
            surface.fill_path(&round_rect(rect, block.radius), &block.background.paint(rect));
        }

        for cell in &self.model.cells {
            let highlighted = matches!(cell.entity, EntityKey::Prize(i) if Some(i) == self.active);
            let look = match (&cell.active, highlighted) {
                (Some(active), true) => active,
                _ => &cell.normal,
            };
            let variant = if highlighted {
                Variant::Active
            } else {
                Variant::Default
            };
            self.paint_cell(surface, cell, look, variant);
        }
    }

    fn paint_cell<S: Surface>(&self, surface: &mut S, cell: &GridCell, look: &Look, variant: Variant) {
        let layout = self.layout;
        let mut rect = layout.cell_rect(cell.x, cell.y, cell.col, cell.row);

        if let Some(shadow) = &look.shadow {
            surface.set_shadow(Some(shadow));
            rect = shadow.fit(rect);
        }
        surface.fill_path(&round_rect(rect, cell.radius), &look.background.paint(rect));
        if look.shadow.is_some() {
            surface.set_shadow(None);
        }

        let span_height = layout.span_height(cell.row);
        for (image, img) in cell.imgs.iter().enumerate() {
            let slot = SlotKey {
                entity: cell.entity,
                image,
            };
            let Some(bitmap) = self.images.get(slot, variant) else {
                continue;
            };
            let (w, h) = image_size(img, bitmap, self.units, layout.span_width(cell.col), span_height);
            let x = rect.x + layout.center_offset(w, cell.col);
            let y = rect.y + layout.height_of(self.units, img.top.as_ref(), cell.row);
            surface.draw_image(bitmap, Rect::new(x, y, w, h));
        }

        for run in &look.fonts {
            let limit = layout.width_of(self.units, &run.length_limit, cell.col);
            let lines = layout_lines(
                &run.text,
                run.word_wrap,
                |s| surface.measure_text(s, &run.font),
                |_| limit,
            );
            let top = rect.y + layout.height_of(self.units, run.top.as_ref(), cell.row);
            // Empty lines keep their slot in a cell.
            for (i, line) in lines.iter().enumerate() {
                let width = surface.measure_text(line, &run.font);
                let x = rect.x + layout.center_offset(width, cell.col);
                surface.fill_text(line, x, baseline(top, run.line_height, i), &run.font, run.color);
            }
        }
    }
}
