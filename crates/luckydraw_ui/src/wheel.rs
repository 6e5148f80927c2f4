//! The wheel widget.
//!
//! A disc of concentric rings around a ring of sectors, one per prize, with
//! buttons in the middle. Sector 0 sits under the top pointer at rest; the
//! spin rotates the whole disc and lands the armed prize back under it.

use std::f64::consts::FRAC_PI_2;

use luckydraw_core::geometry::{circle, polygon, sector};
use luckydraw_core::text::{baseline, centered_x, layout_lines};
use luckydraw_core::{Point, Rect, UnitConverter};

use crate::animation::{SpinState, Track};
use crate::config::{Environment, PrizeConfig, WheelConfig};
use crate::error::{DrawError, DrawResult};
use crate::images::{image_size, EntityKey, ImageCache, ImageLoader, SlotKey, Variant};
use crate::layout::WheelLayout;
use crate::model::{TextRun, WheelModel};
use crate::render::Surface;
use crate::scheduler::FrameScheduler;
use crate::shell::Shell;

/// A lucky-draw wheel drawn on a host surface.
///
/// Sizes and click coordinates are in device pixels.
///
/// ```rust,ignore
/// let mut wheel = LuckyWheel::new(Environment::default(), FrameQueue::new(), loader);
/// wheel.attach(CommandRecorder::new(), 300.0, 300.0);
/// wheel.configure(WheelConfig::from_toml(doc)?, now)?;
/// wheel.on_end(|index, prize| println!("landed on {index}: {:?}", prize.extra));
///
/// if wheel.click(150.0, 150.0) {
///     wheel.play(now);
///     wheel.stop(draw_result);
/// }
/// // host loop
/// if wheel.scheduler_mut().take_pending().is_some() {
///     wheel.on_frame(now);
/// }
/// ```
pub struct LuckyWheel<S, F> {
    shell: Shell<S, F>,
    config: WheelConfig,
    model: WheelModel,
    layout: WheelLayout,
    spin: SpinState,
}

impl<S: Surface, F: FrameScheduler> LuckyWheel<S, F> {
    /// Creates an unconfigured wheel with no surface.
    pub fn new(env: Environment, scheduler: F, loader: impl ImageLoader + 'static) -> Self {
        Self {
            shell: Shell::new(env, scheduler, Box::new(loader)),
            config: WheelConfig::default(),
            model: WheelModel::default(),
            layout: WheelLayout::default(),
            spin: SpinState::new(),
        }
    }

    /// Attaches a surface of `width` x `height` and draws.
    pub fn attach(&mut self, surface: S, width: f64, height: f64) {
        self.shell.attach(surface, width, height);
        self.relayout();
        self.draw();
    }

    /// Detaches the surface. A spin in progress stops advancing.
    pub fn detach(&mut self) -> Option<S> {
        self.shell.detach()
    }

    /// Changes the surface size. The pending frame is discarded and, if the
    /// wheel is spinning, requested again against the new geometry.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.shell.resize(width, height);
        self.relayout();
        self.draw();
        if !self.spin.is_idle() || !self.shell.images.is_ready() {
            self.shell.request_frame();
        }
    }

    /// Applies a configuration.
    ///
    /// The configuration is merged first; on error nothing changes. On
    /// success any spin is abandoned, images start loading and the wheel is
    /// drawn once without them.
    pub fn configure(&mut self, config: WheelConfig, now: f64) -> DrawResult<()> {
        let model = WheelModel::merge(&config, &self.shell.units)?;

        self.shell.cancel_frame("configure");
        self.spin.reset();
        self.config = config;
        self.model = model;
        self.relayout();

        let slots = self.model.image_slots();
        let ready = self
            .shell
            .load_images(&slots, now, self.model.image_timeout_ms);
        tracing::info!(
            prizes = self.model.prizes.len(),
            buttons = self.model.buttons.len(),
            images = self.shell.images.pending(),
            "wheel configured"
        );

        self.draw();
        if !ready {
            self.shell.request_frame();
        }
        Ok(())
    }

    /// Sets the callback fired by an accepted [`click`](Self::click).
    ///
    /// The callback cannot reach the wheel; hosts call [`play`](Self::play)
    /// once `click` returns true.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) {
        self.shell.callbacks.set_start(Box::new(callback));
    }

    /// Sets the callback fired once per landed spin.
    pub fn on_end(&mut self, callback: impl FnMut(usize, PrizeConfig) + 'static) {
        self.shell.callbacks.set_end(Box::new(callback));
    }

    /// Starts spinning. Returns false if already spinning or there are no prizes.
    pub fn play(&mut self, now: f64) -> bool {
        if self.model.prizes.is_empty() {
            tracing::debug!("play ignored, wheel has no prizes");
            return false;
        }
        if !self.spin.play(now) {
            tracing::debug!("play ignored, wheel is already spinning");
            return false;
        }
        self.shell.request_frame();
        true
    }

    /// Arms the landing prize as `index mod prizes`.
    pub fn stop(&mut self, index: i64) {
        if self.spin.arm(index, self.model.prizes.len()).is_none() {
            tracing::debug!(index, "stop ignored, wheel has no prizes");
        }
    }

    /// Handles a click at a surface point.
    ///
    /// Fires the start callback and returns true if the point is on a
    /// button, images are ready and the wheel is idle.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        if !self.shell.images.is_ready() || !self.layout.hits_button(x, y) {
            return false;
        }
        if !self.spin.is_idle() {
            tracing::debug!("click ignored, wheel is spinning");
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
            tracing::info!("wheel images ready");
            render = true;
        }

        let track = Track::Wheel {
            prize_deg: self.layout.prize_deg,
            offset_deg: self.model.offset_degree,
        };
        let (next, effects) = self.spin.advance(now, track, self.model.timing);
        self.spin = next;
        render |= effects.render;

        if render {
            self.draw();
        }
        if let Some(index) = effects.finished {
            let prize = self.config.prizes.get(index).cloned().unwrap_or_default();
            self.shell.callbacks.fire_end(index, prize);
        }
        if effects.schedule || !self.shell.images.is_ready() {
            self.shell.request_frame();
        }
    }

    /// Draws the current state. Without a surface this does nothing.
    pub fn draw(&mut self) {
        let Some(surface) = self.shell.surface.as_mut() else {
            tracing::debug!("wheel draw skipped, no surface attached");
            return;
        };
        let scene = Scene {
            model: &self.model,
            layout: &self.layout,
            images: &self.shell.images,
            units: &self.shell.units,
            rotation: self.spin.position(),
        };
        surface.clear(Rect::new(0.0, 0.0, self.shell.width, self.shell.height));
        scene.paint(surface);
    }

    fn relayout(&mut self) {
        self.layout = WheelLayout::compute(
            self.shell.width,
            self.shell.height,
            &self.model,
            &self.shell.units,
        );
    }

    /// Current rotation in degrees.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.spin.position()
    }

    /// Returns true while accelerating or decelerating.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        !self.spin.is_idle()
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
    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    /// Current merged model.
    #[must_use]
    pub fn model(&self) -> &WheelModel {
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
    model: &'a WheelModel,
    layout: &'a WheelLayout,
    images: &'a ImageCache,
    units: &'a UnitConverter,
    rotation: f64,
}

impl Scene<'_> {
    fn paint<S: Surface>(&self, surface: &mut S) {
        let layout = self.layout;
        let wheel_box = layout.wheel_box();

        surface.save();
        surface.translate(layout.center.x, layout.center.y);

        for (block, &radius) in self.model.blocks.iter().zip(&layout.block_radii) {
            surface.fill_path(&circle(Point::ORIGIN, radius), &block.background.paint(wheel_box));
        }

        if layout.has_prize_ring() {
            self.paint_prizes(surface);
        } else {
            tracing::debug!(prize_radius = layout.prize_radius, "no room for the prize ring");
        }

        for (index, btn) in self.model.buttons.iter().enumerate() {
            let radius = self.units.relative(&btn.radius, layout.prize_radius);
            let paint = btn.background.paint(wheel_box);
            surface.fill_path(&circle(Point::ORIGIN, radius), &paint);
            if btn.pointer {
                let tip = polygon(&[
                    Point::new(-radius, 0.0),
                    Point::new(radius, 0.0),
                    Point::new(0.0, -radius * 2.0),
                ]);
                surface.fill_path(&tip, &paint);
            }

            for (image, img) in btn.imgs.iter().enumerate() {
                let slot = SlotKey {
                    entity: EntityKey::Button(index),
                    image,
                };
                let Some(bitmap) = self.images.get(slot, Variant::Default) else {
                    continue;
                };
                let (w, h) = image_size(img, bitmap, self.units, radius * 2.0, radius * 2.0);
                let top = self.units.relative_or_zero(img.top.as_ref(), radius);
                surface.draw_image(bitmap, Rect::new(centered_x(w), top, w, h));
            }

            for run in &btn.fonts {
                let top = self.units.relative_or_zero(run.top.as_ref(), radius);
                for (i, line) in run.text.split('\n').enumerate() {
                    let width = surface.measure_text(line, &run.font);
                    let y = baseline(top, run.line_height, i);
                    surface.fill_text(line, centered_x(width), y, &run.font, run.color);
                }
            }
        }

        surface.restore();
    }

    fn paint_prizes<S: Surface>(&self, surface: &mut S) {
        let layout = self.layout;
        let wheel_box = layout.wheel_box();
        let half = layout.prize_angle / 2.0;
        for (index, prize) in self.model.prizes.iter().enumerate() {
            let middle = layout.sector_middle(index, self.rotation, self.model.offset_degree);
            let path = sector(
                layout.button_radius,
                layout.prize_radius,
                middle - half,
                middle + half,
                self.model.gutter,
            );
            surface.fill_path(&path, &prize.background.paint(wheel_box));

            surface.save();
            surface.translate(
                middle.cos() * layout.prize_radius,
                middle.sin() * layout.prize_radius,
            );
            surface.rotate(middle + FRAC_PI_2);
            self.paint_prize_images(surface, index);
            for run in &prize.fonts {
                self.paint_prize_text(surface, run);
            }
            surface.restore();
        }
    }

    fn paint_prize_images<S: Surface>(&self, surface: &mut S, index: usize) {
        let layout = self.layout;
        let prize_height = layout.prize_height();
        for (image, img) in self.model.prizes[index].imgs.iter().enumerate() {
            let slot = SlotKey {
                entity: EntityKey::Prize(index),
                image,
            };
            let Some(bitmap) = self.images.get(slot, Variant::Default) else {
                continue;
            };
            let (w, h) = image_size(img, bitmap, self.units, layout.prize_arc(), prize_height);
            let top = self.units.relative_or_zero(img.top.as_ref(), prize_height);
            surface.draw_image(bitmap, Rect::new(centered_x(w), top, w, h));
        }
    }

    fn paint_prize_text<S: Surface>(&self, surface: &mut S, run: &TextRun) {
        let layout = self.layout;
        let top = self
            .units
            .relative_or_zero(run.top.as_ref(), layout.prize_height());
        let line_y = |i: usize| baseline(top, run.line_height, i);

        let lines = layout_lines(
            &run.text,
            run.word_wrap,
            |s| surface.measure_text(s, &run.font),
            |i| {
                let chord = layout.chord_width(line_y(i), self.model.gutter);
                self.units.relative(&run.length_limit, chord)
            },
        );

        for (i, line) in lines.iter().filter(|l| !l.is_empty()).enumerate() {
            let width = surface.measure_text(line, &run.font);
            surface.fill_text(line, centered_x(width), line_y(i), &run.font, run.color);
        }
    }
}
