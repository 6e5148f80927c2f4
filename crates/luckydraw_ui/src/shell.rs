//! Host plumbing shared by both widgets.
//!
//! The surface, its size, the frame scheduler, the image cache and the user
//! callbacks. The widgets compose a [`Shell`]; nothing here knows whether
//! it is driving a wheel or a grid.

use luckydraw_core::UnitConverter;

use crate::animation::SpinCallbacks;
use crate::config::{Environment, ImageConfig};
use crate::images::{EntityKey, ImageCache, ImageLoader};
use crate::render::Surface;
use crate::scheduler::{FrameScheduler, FrameSlot};

pub(crate) struct Shell<S, F> {
    pub(crate) units: UnitConverter,
    pub(crate) surface: Option<S>,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) scheduler: F,
    frame: FrameSlot,
    loader: Box<dyn ImageLoader>,
    pub(crate) images: ImageCache,
    pub(crate) callbacks: SpinCallbacks,
}

impl<S: Surface, F: FrameScheduler> Shell<S, F> {
    pub(crate) fn new(env: Environment, scheduler: F, loader: Box<dyn ImageLoader>) -> Self {
        Self {
            units: env.units(),
            surface: None,
            width: 0.0,
            height: 0.0,
            scheduler,
            frame: FrameSlot::default(),
            loader,
            images: ImageCache::new(),
            callbacks: SpinCallbacks::default(),
        }
    }

    pub(crate) fn attach(&mut self, surface: S, width: f64, height: f64) {
        self.surface = Some(surface);
        self.width = width;
        self.height = height;
    }

    pub(crate) fn detach(&mut self) -> Option<S> {
        self.cancel_frame("detach");
        self.surface.take()
    }

    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        self.cancel_frame("resize");
        self.width = width;
        self.height = height;
    }

    pub(crate) fn cancel_frame(&mut self, reason: &'static str) {
        if self.frame.cancel(&mut self.scheduler) {
            tracing::debug!(reason, "pending frame cancelled");
        }
    }

    pub(crate) fn request_frame(&mut self) {
        self.frame.ensure(&mut self.scheduler);
    }

    pub(crate) fn frame_delivered(&mut self) {
        self.frame.delivered();
    }

    pub(crate) fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    pub(crate) fn load_images(
        &mut self,
        slots: &[(EntityKey, &[ImageConfig])],
        now: f64,
        timeout_ms: u64,
    ) -> bool {
        self.images
            .begin(slots, self.loader.as_mut(), now, timeout_ms)
    }
}
