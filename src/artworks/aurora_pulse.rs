use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::artwork::{Artwork, ArtworkMeta, Detach};
use crate::foundation::core::Color;
use crate::foundation::error::NocturneResult;
use crate::foundation::math::mount_seed;
use crate::palette::pick_palette;
use crate::runtime::loader::LibraryLoader;
use crate::runtime::sketch::{Sketch, SketchFrame, SketchInstance, SketchRuntime};
use crate::window::{Container, Window};

const PALETTE_INDEX: i64 = 2;
pub const ORB_COUNT: usize = 140;
/// Oldest trail points are dropped past this many.
pub const MAX_TRAILS: usize = 120;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trail {
    pub x: f64,
    pub y: f64,
    pub hue: f64,
    pub size: f64,
}

/// Orbiting hue-cycling orbs, plus a fading trail wherever the pointer is held down.
pub struct AuroraSketch {
    background: Color,
    trails: VecDeque<Trail>,
}

impl AuroraSketch {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            trails: VecDeque::with_capacity(MAX_TRAILS + 1),
        }
    }

    pub fn trails(&self) -> impl ExactSizeIterator<Item = &Trail> {
        self.trails.iter()
    }

    /// Append a trail point, evicting from the front down to [`MAX_TRAILS`].
    pub fn record_trail(&mut self, trail: Trail) {
        self.trails.push_back(trail);
        while self.trails.len() > MAX_TRAILS {
            self.trails.pop_front();
        }
    }
}

impl Sketch for AuroraSketch {
    fn draw(&mut self, p: &mut SketchFrame<'_, '_>) {
        p.background(self.background);
        let time = p.millis() * 0.0005;
        let (cx, cy) = (p.width() / 2.0, p.height() / 2.0);

        for i in 0..ORB_COUNT {
            let i = i as f64;
            let angle = time + i * 0.12;
            let radius = 120.0 + 80.0 * (time + i * 0.3).sin();
            let x = cx + angle.cos() * radius;
            let y = cy + (angle * 1.3).sin() * radius;
            let hue = (i * 4.0 + time * 120.0).rem_euclid(360.0);
            p.fill_hsb(hue, 80.0, 100.0, 65.0);
            p.ellipse(x, y, 24.0 + (time + i).sin() * 10.0);
        }

        if p.mouse_is_pressed() {
            let mouse = p.mouse();
            let hue = (p.frame_count() as f64 * 6.0).rem_euclid(360.0);
            let size = 28.0 + p.random(8.0);
            self.record_trail(Trail {
                x: mouse.x,
                y: mouse.y,
                hue,
                size,
            });
        }

        for (index, t) in self.trails.iter().enumerate() {
            p.fill_hsb(t.hue, 70.0, 100.0, 80.0 - index as f64 * 0.4);
            p.ellipse(t.x, t.y, t.size * 0.8);
        }
    }
}

/// Library-backed artwork: the sketch runtime is loaded on first mount and drives the loop.
pub struct AuroraPulse {
    meta: ArtworkMeta,
    loader: Rc<LibraryLoader>,
    background: Color,
}

impl AuroraPulse {
    pub fn new(loader: Rc<LibraryLoader>) -> Self {
        Self {
            meta: ArtworkMeta::new(
                "Aurora Pulse",
                "aurora-pulse",
                "A multicolored interactive piece drawn with the sketch runtime.",
            ),
            loader,
            background: pick_palette(PALETTE_INDEX).background,
        }
    }
}

impl Artwork for AuroraPulse {
    fn meta(&self) -> &ArtworkMeta {
        &self.meta
    }

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach> {
        let seed = mount_seed(&self.meta.slug, window.frame_time().unix_ms);

        // Loaded already: start synchronously so surface errors reach the caller.
        if let Some(rt) = self.loader.cached() {
            let sketch = Box::new(AuroraSketch::new(self.background));
            let instance = rt.instantiate(sketch, window, container, seed)?;
            tracing::debug!(slug = %self.meta.slug, "artwork mounted");
            return Ok(Detach::new(move || {
                instance.remove();
                tracing::debug!("aurora-pulse detached");
            }));
        }

        let mounted = Rc::new(Cell::new(true));
        let slot: Rc<RefCell<Option<SketchInstance>>> = Rc::new(RefCell::new(None));

        let on_loaded = {
            let mounted = Rc::clone(&mounted);
            let slot = Rc::clone(&slot);
            let window = window.clone();
            let container = container.clone();
            let background = self.background;
            move |loaded: NocturneResult<Rc<SketchRuntime>>| {
                if !mounted.get() {
                    tracing::debug!("aurora-pulse detached before the runtime loaded");
                    return;
                }
                let started = loaded.and_then(|rt| {
                    rt.instantiate(
                        Box::new(AuroraSketch::new(background)),
                        &window,
                        &container,
                        seed,
                    )
                });
                match started {
                    Ok(instance) => *slot.borrow_mut() = Some(instance),
                    Err(e) => tracing::warn!(error = %e, "aurora-pulse animation did not start"),
                }
            }
        };
        let waiter = self.loader.load(on_loaded);

        tracing::debug!(slug = %self.meta.slug, "artwork mounted, waiting for the runtime");
        let loader = Rc::clone(&self.loader);
        Ok(Detach::new(move || {
            mounted.set(false);
            if let Some(id) = waiter {
                loader.forget(id);
            }
            let instance = slot.borrow_mut().take();
            if let Some(instance) = instance {
                instance.remove();
            }
            tracing::debug!("aurora-pulse detached");
        }))
    }
}
