//! Image cache and loader seam.
//!
//! The host fetches and decodes. The widget hands each image variant to an
//! [`ImageLoader`] together with an [`ImageSender`]; the host answers through
//! the sender from whatever thread it likes and the cache drains the channel
//! on the frame thread.
//!
//! Every `begin` starts a new generation. Answers for an older generation are
//! dropped, so a slow fetch from a previous configuration never lands in the
//! current one.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use luckydraw_core::{ImageLoadBarrier, UnitConverter};

use crate::config::ImageConfig;
use crate::error::DrawError;

/// A decoded image, owned by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bitmap {
    /// Host-side identifier.
    pub id: u64,
    /// Natural width.
    pub width: f64,
    /// Natural height.
    pub height: f64,
}

impl Bitmap {
    /// Creates a bitmap handle.
    #[must_use]
    pub const fn new(id: u64, width: f64, height: f64) -> Self {
        Self { id, width, height }
    }
}

/// A configured entity that can carry images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// Prize or grid cell, by index.
    Prize(usize),
    /// Button, by index.
    Button(usize),
}

/// One image slot of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Owning entity.
    pub entity: EntityKey,
    /// Index into the entity's `imgs`.
    pub image: usize,
}

/// Which bitmap of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The resting image.
    Default,
    /// The image shown while the entity is highlighted.
    Active,
}

/// A fetch the host is asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Configuration generation that issued the request.
    pub generation: u64,
    /// Target slot.
    pub slot: SlotKey,
    /// Target variant.
    pub variant: Variant,
    /// Image source as configured.
    pub src: String,
}

#[derive(Debug)]
struct Completion {
    request: ImageRequest,
    outcome: Result<Bitmap, String>,
}

/// Answers one [`ImageRequest`]. Can be moved to another thread.
#[derive(Debug)]
pub struct ImageSender {
    request: ImageRequest,
    tx: Sender<Completion>,
}

impl ImageSender {
    /// The request being answered.
    #[must_use]
    pub fn request(&self) -> &ImageRequest {
        &self.request
    }

    /// Reports a decoded bitmap.
    pub fn resolve(self, bitmap: Bitmap) {
        self.send(Ok(bitmap));
    }

    /// Reports a failed fetch or decode.
    pub fn fail(self, reason: impl Into<String>) {
        self.send(Err(reason.into()));
    }

    fn send(self, outcome: Result<Bitmap, String>) {
        let completion = Completion {
            request: self.request,
            outcome,
        };
        if self.tx.send(completion).is_err() {
            tracing::debug!("image completion dropped, widget is gone");
        }
    }
}

/// Fetches images for a widget.
pub trait ImageLoader {
    /// Starts fetching `request.src`. May answer before returning.
    fn load(&mut self, request: &ImageRequest, sender: ImageSender);
}

#[derive(Debug, Default)]
struct SlotEntry {
    default: Option<Bitmap>,
    active: Option<Bitmap>,
    outstanding: u8,
}

/// Bitmaps of the current configuration, gated by a load barrier.
#[derive(Debug)]
pub struct ImageCache {
    generation: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    entries: HashMap<SlotKey, SlotEntry>,
    barrier: ImageLoadBarrier,
    started_at: f64,
    timeout_ms: u64,
    errors: Vec<DrawError>,
}

impl ImageCache {
    /// Creates an empty cache. It is ready until the first `begin`.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            generation: 0,
            tx,
            rx,
            entries: HashMap::new(),
            barrier: ImageLoadBarrier::new(0),
            started_at: 0.0,
            timeout_ms: 0,
            errors: Vec::new(),
        }
    }

    /// Drops the current bitmaps and requests every variant of `slots`.
    ///
    /// A `timeout_ms` of zero waits forever. Returns true if there is
    /// nothing to wait for.
    pub fn begin(
        &mut self,
        slots: &[(EntityKey, &[ImageConfig])],
        loader: &mut dyn ImageLoader,
        now: f64,
        timeout_ms: u64,
    ) -> bool {
        self.generation += 1;
        self.entries.clear();
        self.errors.clear();
        self.started_at = now;
        self.timeout_ms = timeout_ms;
        // Anything still queued belongs to the previous generation.
        while self.rx.try_recv().is_ok() {}

        let mut requests = Vec::new();
        for &(entity, imgs) in slots {
            for (image, img) in imgs.iter().enumerate() {
                let slot = SlotKey { entity, image };
                let mut entry = SlotEntry::default();
                let variants = std::iter::once((Variant::Default, &img.src))
                    .chain(img.active_src.iter().map(|src| (Variant::Active, src)));
                for (variant, src) in variants {
                    entry.outstanding += 1;
                    requests.push(ImageRequest {
                        generation: self.generation,
                        slot,
                        variant,
                        src: src.clone(),
                    });
                }
                self.entries.insert(slot, entry);
            }
        }

        self.barrier = ImageLoadBarrier::new(self.entries.len());
        tracing::debug!(
            generation = self.generation,
            slots = self.entries.len(),
            requests = requests.len(),
            "image loads dispatched"
        );
        for request in requests {
            let sender = ImageSender {
                request: request.clone(),
                tx: self.tx.clone(),
            };
            loader.load(&request, sender);
        }
        self.barrier.is_released()
    }

    /// Drains completions and checks the timeout.
    ///
    /// Returns true only on the call that releases the barrier.
    pub fn pump(&mut self, now: f64) -> bool {
        let mut released = false;
        while let Ok(completion) = self.rx.try_recv() {
            released |= self.apply(completion);
        }

        if !self.barrier.is_released()
            && self.timeout_ms > 0
            && now - self.started_at >= self.timeout_ms as f64
        {
            let pending = self.barrier.pending();
            tracing::warn!(
                pending,
                timeout_ms = self.timeout_ms,
                "image barrier released by timeout"
            );
            self.errors.push(DrawError::ImageTimeout {
                pending,
                timeout_ms: self.timeout_ms,
            });
            released |= self.barrier.release_now();
        }
        released
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let Completion { request, outcome } = completion;
        if request.generation != self.generation {
            return false;
        }
        let Some(entry) = self.entries.get_mut(&request.slot) else {
            return false;
        };
        if entry.outstanding == 0 {
            return false;
        }

        match outcome {
            Ok(bitmap) => match request.variant {
                Variant::Default => entry.default = Some(bitmap),
                Variant::Active => entry.active = Some(bitmap),
            },
            Err(reason) => {
                tracing::warn!(src = %request.src, %reason, "image failed to load");
                self.errors.push(DrawError::ImageLoad {
                    src: request.src,
                    reason,
                });
            }
        }

        entry.outstanding -= 1;
        entry.outstanding == 0 && self.barrier.complete()
    }

    /// Whether first paint may include bitmaps.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.barrier.is_released()
    }

    /// Slots still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.barrier.pending()
    }

    /// Bitmap for a slot. An active request falls back to the default bitmap.
    #[must_use]
    pub fn get(&self, slot: SlotKey, variant: Variant) -> Option<&Bitmap> {
        let entry = self.entries.get(&slot)?;
        match variant {
            Variant::Active => entry.active.as_ref().or(entry.default.as_ref()),
            Variant::Default => entry.default.as_ref(),
        }
    }

    /// Load failures and timeouts of the current generation.
    #[must_use]
    pub fn errors(&self) -> &[DrawError] {
        &self.errors
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw size of `bitmap` for `img`.
///
/// With neither dimension configured the natural size is used. With one,
/// the other follows the bitmap's aspect ratio.
#[must_use]
pub fn image_size(
    img: &ImageConfig,
    bitmap: &Bitmap,
    units: &UnitConverter,
    width_of: f64,
    height_of: f64,
) -> (f64, f64) {
    match (&img.width, &img.height) {
        (None, None) => (bitmap.width, bitmap.height),
        (Some(w), None) => {
            let width = units.relative(w, width_of);
            (width, bitmap.height * (width / bitmap.width))
        }
        (None, Some(h)) => {
            let height = units.relative(h, height_of);
            (bitmap.width * (height / bitmap.height), height)
        }
        (Some(w), Some(h)) => (units.relative(w, width_of), units.relative(h, height_of)),
    }
}

#[cfg(test)]
mod tests {
    use luckydraw_core::Length;

    use super::*;

    /// Keeps every request so tests can answer them in any order.
    #[derive(Default)]
    struct Deferred {
        senders: Vec<ImageSender>,
    }

    impl ImageLoader for Deferred {
        fn load(&mut self, _request: &ImageRequest, sender: ImageSender) {
            self.senders.push(sender);
        }
    }

    fn img(src: &str, active: Option<&str>) -> ImageConfig {
        ImageConfig {
            src: src.to_owned(),
            active_src: active.map(str::to_owned),
            ..ImageConfig::default()
        }
    }

    #[test]
    fn test_slot_waits_for_both_variants() {
        let imgs = [img("a.png", Some("a-on.png"))];
        let mut loader = Deferred::default();
        let mut cache = ImageCache::new();

        assert!(!cache.begin(&[(EntityKey::Prize(0), &imgs)], &mut loader, 0.0, 0));
        assert_eq!(loader.senders.len(), 2);

        let mut senders = loader.senders.drain(..);
        let default = senders.next().unwrap();
        let active = senders.next().unwrap();
        active.resolve(Bitmap::new(2, 10.0, 10.0));
        assert!(!cache.pump(1.0));
        default.resolve(Bitmap::new(1, 10.0, 10.0));
        assert!(cache.pump(2.0));
        assert!(cache.is_ready());

        let slot = SlotKey {
            entity: EntityKey::Prize(0),
            image: 0,
        };
        assert_eq!(cache.get(slot, Variant::Active).unwrap().id, 2);
        assert_eq!(cache.get(slot, Variant::Default).unwrap().id, 1);
    }

    #[test]
    fn test_out_of_order_completions_release_once() {
        let two = [img("a.png", Some("a-on.png")), img("b.png", None)];
        let one = [img("c.png", None)];
        let button = [img("go.png", Some("go-on.png"))];
        let slots: [(EntityKey, &[ImageConfig]); 3] = [
            (EntityKey::Prize(0), &two),
            (EntityKey::Prize(1), &one),
            (EntityKey::Button(0), &button),
        ];

        for order in [
            [5, 4, 3, 2, 1, 0],
            [2, 0, 5, 1, 4, 3],
            [3, 5, 0, 4, 2, 1],
            [1, 3, 2, 0, 5, 4],
        ] {
            let mut loader = Deferred::default();
            let mut cache = ImageCache::new();
            assert!(!cache.begin(&slots, &mut loader, 0.0, 0));
            assert_eq!(loader.senders.len(), 6);
            assert_eq!(cache.pending(), 4);

            let mut senders: Vec<Option<ImageSender>> =
                loader.senders.drain(..).map(Some).collect();
            let mut releases = 0;
            for (step, &i) in order.iter().enumerate() {
                let sender = senders[i].take().unwrap();
                if i == 3 {
                    sender.fail("gone");
                } else {
                    sender.resolve(Bitmap::new(i as u64, 1.0, 1.0));
                }
                if cache.pump(step as f64) {
                    releases += 1;
                    assert_eq!(step, order.len() - 1, "released early for {order:?}");
                }
            }
            assert_eq!(releases, 1, "{order:?}");
            assert!(cache.is_ready());
            assert!(!cache.pump(99.0));
            assert_eq!(cache.errors().len(), 1);
        }
    }

    #[test]
    fn test_failure_counts_as_done() {
        let imgs = [img("missing.png", None)];
        let mut loader = Deferred::default();
        let mut cache = ImageCache::new();
        cache.begin(&[(EntityKey::Button(0), &imgs)], &mut loader, 0.0, 0);

        loader.senders.pop().unwrap().fail("404");
        assert!(cache.pump(5.0));
        assert!(matches!(
            cache.errors(),
            [DrawError::ImageLoad { src, .. }] if src == "missing.png"
        ));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let imgs = [img("a.png", None)];
        let mut loader = Deferred::default();
        let mut cache = ImageCache::new();
        cache.begin(&[(EntityKey::Prize(0), &imgs)], &mut loader, 0.0, 0);
        let stale = loader.senders.pop().unwrap();

        cache.begin(&[(EntityKey::Prize(0), &imgs)], &mut loader, 0.0, 0);
        stale.resolve(Bitmap::new(9, 1.0, 1.0));
        assert!(!cache.pump(1.0));
        assert_eq!(cache.pending(), 1);
    }

    #[test]
    fn test_timeout_releases() {
        let imgs = [img("slow.png", None)];
        let mut loader = Deferred::default();
        let mut cache = ImageCache::new();
        cache.begin(&[(EntityKey::Prize(0), &imgs)], &mut loader, 100.0, 500);

        assert!(!cache.pump(599.0));
        assert!(cache.pump(600.0));
        assert!(!cache.pump(700.0));
        assert_eq!(
            cache.errors(),
            &[DrawError::ImageTimeout {
                pending: 1,
                timeout_ms: 500
            }]
        );
    }

    #[test]
    fn test_no_images_is_ready() {
        let mut loader = Deferred::default();
        let mut cache = ImageCache::new();
        assert!(cache.begin(&[(EntityKey::Prize(0), &[])], &mut loader, 0.0, 0));
        assert!(cache.is_ready());
    }

    #[test]
    fn test_image_size() {
        let units = UnitConverter::new(2.0, 16.0);
        let bitmap = Bitmap::new(0, 200.0, 100.0);
        let mut cfg = img("x", None);

        assert_eq!(image_size(&cfg, &bitmap, &units, 50.0, 50.0), (200.0, 100.0));

        cfg.width = Some(Length::Percent(50.0));
        assert_eq!(image_size(&cfg, &bitmap, &units, 80.0, 0.0), (40.0, 20.0));

        cfg.width = None;
        cfg.height = Some(Length::Px(30.0));
        assert_eq!(image_size(&cfg, &bitmap, &units, 0.0, 0.0), (120.0, 60.0));

        cfg.width = Some(Length::Px(10.0));
        assert_eq!(image_size(&cfg, &bitmap, &units, 0.0, 0.0), (20.0, 60.0));
    }
}
