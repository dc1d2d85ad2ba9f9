use std::f64::consts::TAU;

use crate::artwork::{Artwork, ArtworkMeta, Detach};
use crate::artworks::{Scene, mount_scene};
use crate::foundation::core::{Color, Point, Vec2, Viewport};
use crate::foundation::error::NocturneResult;
use crate::foundation::math::{Rng64, mount_seed};
use crate::surface::Painter;
use crate::window::{Container, FrameTime, Window};

/// 2000-01-01T12:00:00Z in Unix milliseconds.
pub const J2000_UNIX_MS: f64 = 946_728_000_000.0;
pub const DAY_MS: f64 = 86_400_000.0;
const STAR_COUNT: usize = 220;
const ORBIT_SQUASH: f64 = 0.85;
const SPIN_RATE: f64 = 0.0004;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Planet {
    pub name: &'static str,
    pub radius: f64,
    pub orbit_radius: f64,
    pub orbit_period_days: f64,
    pub rotation_speed: f64,
    pub base_angle: f64,
    pub color: Color,
    pub glow: Color,
    pub has_ring: bool,
}

pub static PLANETS: [Planet; 6] = [
    Planet {
        name: "Mercury",
        radius: 4.0,
        orbit_radius: 45.0,
        orbit_period_days: 87.969,
        rotation_speed: 2.4,
        base_angle: 4.4,
        color: Color::rgb(0xc0, 0xb5, 0xa9),
        glow: Color::rgba(255, 236, 214, 64),
        has_ring: false,
    },
    Planet {
        name: "Venus",
        radius: 7.0,
        orbit_radius: 70.0,
        orbit_period_days: 224.701,
        rotation_speed: 1.6,
        base_angle: 1.8,
        color: Color::rgb(0xd9, 0xb4, 0x7a),
        glow: Color::rgba(255, 214, 160, 64),
        has_ring: false,
    },
    Planet {
        name: "Earth",
        radius: 8.0,
        orbit_radius: 95.0,
        orbit_period_days: 365.256,
        rotation_speed: 2.2,
        base_angle: 1.2,
        color: Color::rgb(0x4c, 0x8b, 0xd7),
        glow: Color::rgba(144, 196, 255, 71),
        has_ring: false,
    },
    Planet {
        name: "Mars",
        radius: 6.0,
        orbit_radius: 125.0,
        orbit_period_days: 686.98,
        rotation_speed: 2.4,
        base_angle: 0.6,
        color: Color::rgb(0xc8, 0x70, 0x4a),
        glow: Color::rgba(255, 172, 140, 66),
        has_ring: false,
    },
    Planet {
        name: "Jupiter",
        radius: 14.0,
        orbit_radius: 160.0,
        orbit_period_days: 4332.589,
        rotation_speed: 3.2,
        base_angle: 1.9,
        color: Color::rgb(0xd1, 0xa6, 0x7f),
        glow: Color::rgba(255, 214, 170, 61),
        has_ring: false,
    },
    Planet {
        name: "Saturn",
        radius: 12.0,
        orbit_radius: 200.0,
        orbit_period_days: 10759.22,
        rotation_speed: 3.0,
        base_angle: 2.5,
        color: Color::rgb(0xd9, 0xc2, 0x8f),
        glow: Color::rgba(255, 230, 190, 61),
        has_ring: true,
    },
];

const EARTH: usize = 2;

/// Orbital angle in radians at wall-clock time `unix_ms`.
///
/// Depends only on the timestamp, never on how many frames have been drawn.
pub fn orbit_angle(planet: &Planet, unix_ms: f64) -> f64 {
    let days = (unix_ms - J2000_UNIX_MS) / DAY_MS;
    planet.base_angle + days / planet.orbit_period_days * TAU
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BackgroundStar {
    position: Point,
    radius: f64,
    alpha: f64,
}

fn build_stars(rng: &mut Rng64, viewport: Viewport) -> Vec<BackgroundStar> {
    (0..STAR_COUNT)
        .map(|_| BackgroundStar {
            position: Point::new(
                rng.range(0.0, viewport.width),
                rng.range(0.0, viewport.height),
            ),
            radius: rng.range(0.6, 2.2),
            alpha: rng.range(0.4, 1.0),
        })
        .collect()
}

struct PlacedBody {
    center: Point,
    size: f64,
}

struct SolarScene {
    rng: Rng64,
    stars: Vec<BackgroundStar>,
}

impl SolarScene {
    fn draw_background(&self, painter: &mut Painter<'_>) {
        let (w, h) = (painter.width(), painter.height());
        painter.clear(Color::rgb(0x04, 0x05, 0x0f));
        painter.fill_glow(
            Point::new(w * 0.4, h * 0.3),
            w.max(h),
            Color::rgb(0x0f, 0x18, 0x34),
            Color::rgba(0x07, 0x0b, 0x1f, 0),
        );
        for star in &self.stars {
            painter.fill_circle(
                star.position,
                star.radius,
                Color::rgb(255, 255, 255).with_alpha(star.alpha),
            );
        }
    }

    fn draw_planet(
        painter: &mut Painter<'_>,
        planet: &Planet,
        center: Point,
        orbit_scale: f64,
        orbit: f64,
        spin: f64,
    ) -> PlacedBody {
        let r = planet.orbit_radius * orbit_scale;
        let at = Point::new(
            center.x + orbit.cos() * r,
            center.y + orbit.sin() * r * ORBIT_SQUASH,
        );
        let size = planet.radius * orbit_scale * 0.9;

        painter.save();
        painter.translate(at.to_vec2());
        painter.rotate(spin);
        painter.fill_circle(Point::ZERO, size * 1.6, planet.glow);
        painter.fill_circle(Point::ZERO, size, planet.color);
        painter.stroke_arc(
            Point::ZERO,
            size * 0.5,
            -0.6,
            1.2,
            (size * 0.18).max(1.0),
            Color::rgba(255, 255, 255, 153),
        );
        if planet.has_ring {
            painter.stroke_ellipse(
                Point::ZERO,
                Vec2::new(size * 1.6, size * 0.55),
                0.3,
                (size * 0.25).max(1.0),
                Color::rgba(234, 216, 170, 191),
            );
        }
        painter.restore();

        PlacedBody { center: at, size }
    }
}

impl Scene for SolarScene {
    fn resized(&mut self, viewport: Viewport) {
        self.stars = build_stars(&mut self.rng, viewport);
    }

    fn frame(&mut self, painter: &mut Painter<'_>, t: FrameTime) {
        let spin = t.now_ms * SPIN_RATE;
        self.draw_background(painter);

        let center = painter.viewport().center();
        let max_orbit = PLANETS
            .iter()
            .map(|p| p.orbit_radius)
            .fold(f64::MIN, f64::max);
        let orbit_scale = painter.width().min(painter.height()) * 0.38 / max_orbit;

        for planet in &PLANETS {
            let r = planet.orbit_radius * orbit_scale;
            painter.stroke_ellipse(
                center,
                Vec2::new(r, r * ORBIT_SQUASH),
                0.0,
                1.0,
                Color::rgba(255, 255, 255, 31),
            );
        }

        let sun = 22.0 * orbit_scale * 1.6;
        painter.fill_glow(
            center,
            sun * 2.2,
            Color::rgba(255, 231, 169, 230),
            Color::rgba(255, 159, 64, 0),
        );
        painter.fill_circle(center, sun, Color::rgb(0xf6, 0xc7, 0x60));

        let mut earth = None;
        for (i, planet) in PLANETS.iter().enumerate() {
            let body = Self::draw_planet(
                painter,
                planet,
                center,
                orbit_scale,
                orbit_angle(planet, t.unix_ms),
                spin * planet.rotation_speed,
            );
            if i == EARTH {
                earth = Some(body);
            }
        }

        if let Some(earth) = earth {
            let moon_orbit = 18.0 * orbit_scale;
            let a = spin * 2.8;
            let at = Point::new(
                earth.center.x + a.cos() * moon_orbit,
                earth.center.y + a.sin() * moon_orbit * 0.7,
            );
            painter.fill_circle(at, earth.size * 0.35, Color::rgb(0xd9, 0xdc, 0xe6));
        }
    }
}

/// A toy solar system. Orbits follow the wall clock; spin follows the frame clock.
pub struct SolarSystem {
    meta: ArtworkMeta,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self {
            meta: ArtworkMeta::new(
                "Solar System",
                "solar-system",
                "The planets spinning and circling the sun.",
            ),
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Artwork for SolarSystem {
    fn meta(&self) -> &ArtworkMeta {
        &self.meta
    }

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach> {
        let mut rng = Rng64::new(mount_seed(&self.meta.slug, window.frame_time().unix_ms));
        let stars = build_stars(&mut rng, window.viewport());
        mount_scene(&self.meta.slug, window, container, SolarScene { rng, stars })
    }
}
