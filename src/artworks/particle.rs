use crate::artwork::{Artwork, ArtworkMeta, Detach};
use crate::artworks::{Scene, mount_scene};
use crate::foundation::core::{Color, Point, Rect, Vec2, Viewport};
use crate::foundation::error::NocturneResult;
use crate::foundation::math::{Rng64, mount_seed};
use crate::palette::{Palette, pick_palette};
use crate::surface::Painter;
use crate::window::{Container, FrameTime, Window};

pub const PARTICLE_COUNT: usize = 160;
const PALETTE_INDEX: i64 = 0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: Color,
}

impl Particle {
    fn scatter(rng: &mut Rng64, viewport: Viewport, palette: &Palette) -> Self {
        let accents = palette.accents();
        Self {
            position: Point::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
            velocity: Vec2::new(rng.range(-0.6, 0.6), rng.range(-0.6, 0.6)),
            radius: rng.range(1.2, 4.0),
            color: accents[rng.index(accents.len())],
        }
    }

    /// Advance one fixed step, then flip the velocity component on any axis that left `bounds`.
    ///
    /// The position is not clamped, so a particle may sit slightly outside for a frame.
    pub fn step(&mut self, bounds: Rect) {
        self.position += self.velocity;
        if self.position.x < bounds.x0 || self.position.x > bounds.x1 {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < bounds.y0 || self.position.y > bounds.y1 {
            self.velocity.y = -self.velocity.y;
        }
    }
}

struct ParticleScene {
    background: Color,
    particles: Vec<Particle>,
}

impl Scene for ParticleScene {
    fn frame(&mut self, painter: &mut Painter<'_>, _t: FrameTime) {
        let bounds = painter.viewport().bounds();
        painter.clear(self.background);
        for p in &mut self.particles {
            p.step(bounds);
            painter.fill_circle(p.position, p.radius, p.color);
        }
    }
}

/// Slowly drifting dots bouncing inside the viewport. Motion advances one step per frame.
pub struct ParticleField {
    meta: ArtworkMeta,
    palette: &'static Palette,
}

impl ParticleField {
    pub fn new() -> Self {
        Self {
            meta: ArtworkMeta::new(
                "Particle",
                "particle",
                "A night sky of gently swaying particles.",
            ),
            palette: pick_palette(PALETTE_INDEX),
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

impl Artwork for ParticleField {
    fn meta(&self) -> &ArtworkMeta {
        &self.meta
    }

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach> {
        let viewport = window.viewport();
        let mut rng = Rng64::new(mount_seed(&self.meta.slug, window.frame_time().unix_ms));
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle::scatter(&mut rng, viewport, self.palette))
            .collect();
        let scene = ParticleScene {
            background: self.palette.background,
            particles,
        };
        mount_scene(&self.meta.slug, window, container, scene)
    }
}
