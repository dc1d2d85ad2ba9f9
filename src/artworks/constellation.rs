use crate::artwork::{Artwork, ArtworkMeta, Detach};
use crate::artworks::{Scene, mount_scene};
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::NocturneResult;
use crate::foundation::math::{cell_phase, mount_seed};
use crate::palette::{Palette, pick_palette};
use crate::stars::grid::{Star, StarGrid, pg_constellation};
use crate::surface::Painter;
use crate::window::{Container, FrameTime, Window};

const PALETTE_INDEX: i64 = 1;
const TWINKLE_RATE: f64 = 0.002;

/// Pixel placement of a [`StarGrid`] inside a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub origin: Point,
    pub cell: f64,
}

impl GridLayout {
    /// Largest square cells that fit the grid (plus a one-cell margin) into `viewport`, centered.
    pub fn fit(grid: &StarGrid, viewport: Viewport) -> Self {
        let cols = grid.width as f64;
        let rows = grid.height as f64;
        let cell = (viewport.width / (cols + 1.0)).min(viewport.height / (rows + 1.0));
        let origin = Point::new(
            (viewport.width - cell * cols) / 2.0 + cell / 2.0,
            (viewport.height - cell * rows) / 2.0 + cell / 2.0,
        );
        Self { origin, cell }
    }

    /// Center of `(column, line)`.
    pub fn center(&self, col: usize, line: usize) -> Point {
        Point::new(
            self.origin.x + col as f64 * self.cell,
            self.origin.y + line as f64 * self.cell,
        )
    }
}

struct ConstellationScene {
    grid: StarGrid,
    stars: Vec<Star>,
    palette: &'static Palette,
    seed: u64,
}

impl Scene for ConstellationScene {
    fn frame(&mut self, painter: &mut Painter<'_>, t: FrameTime) {
        painter.clear(self.palette.background);
        let layout = GridLayout::fit(&self.grid, painter.viewport());

        let dust = self.palette.secondary.with_alpha(0.2);
        for line in 0..self.grid.height {
            for col in 0..self.grid.width {
                painter.fill_circle(layout.center(col, line), layout.cell * 0.06, dust);
            }
        }

        for star in &self.stars {
            let Some((col, line)) = self.grid.cell_of(star) else {
                continue;
            };
            let at = layout.center(col, line);
            let phase = cell_phase(self.seed, star.x, star.y);
            let twinkle = 0.55 + 0.45 * (t.now_ms * TWINKLE_RATE + phase).sin();
            painter.fill_glow(
                at,
                layout.cell * 0.6,
                self.palette.accent.with_alpha(0.5 * twinkle),
                self.palette.accent.with_alpha(0.0),
            );
            painter.fill_circle(
                at,
                layout.cell * (0.14 + 0.06 * twinkle),
                self.palette.primary,
            );
        }
    }
}

/// The star map drawn as twinkling dots.
pub struct Constellation {
    meta: ArtworkMeta,
    grid: StarGrid,
    stars: Vec<Star>,
}

impl Constellation {
    pub fn new() -> Self {
        Self::with_stars(StarGrid::default(), pg_constellation())
    }

    pub fn with_stars(grid: StarGrid, stars: Vec<Star>) -> Self {
        Self {
            meta: ArtworkMeta::new(
                "PG.js Constellation",
                "constellation",
                "A constellation art piece inspired by pg.js.",
            ),
            grid,
            stars,
        }
    }
}

impl Default for Constellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Artwork for Constellation {
    fn meta(&self) -> &ArtworkMeta {
        &self.meta
    }

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach> {
        let scene = ConstellationScene {
            grid: self.grid.clone(),
            stars: self.stars.clone(),
            palette: pick_palette(PALETTE_INDEX),
            seed: mount_seed(&self.meta.slug, window.frame_time().unix_ms),
        };
        mount_scene(&self.meta.slug, window, container, scene)
    }
}
