/// One star on the grid. `x` grows to the right; how `y` maps to lines depends on the grid's
/// [`GridOrigin`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Star {
    pub x: i64,
    pub y: i64,
    pub symbol: String,
}

impl Star {
    pub fn new(x: i64, y: i64, symbol: impl Into<String>) -> Self {
        Self {
            x,
            y,
            symbol: symbol.into(),
        }
    }
}

/// Where row `y = 0` sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridOrigin {
    /// `y = 0` is the last printed line; `y` grows upward like a star chart.
    #[default]
    BottomLeft,
    /// `y = 0` is the first printed line.
    TopLeft,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarGrid {
    pub width: usize,
    pub height: usize,
    pub fill: String,
    pub origin: GridOrigin,
}

impl Default for StarGrid {
    fn default() -> Self {
        Self {
            width: 36,
            height: 12,
            fill: "·".to_owned(),
            origin: GridOrigin::default(),
        }
    }
}

impl StarGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// `(column, line)` of `star`, with line 0 printed first. `None` when out of bounds.
    pub fn cell_of(&self, star: &Star) -> Option<(usize, usize)> {
        let col = usize::try_from(star.x).ok().filter(|&c| c < self.width)?;
        let row = usize::try_from(star.y).ok().filter(|&r| r < self.height)?;
        let line = match self.origin {
            GridOrigin::TopLeft => row,
            GridOrigin::BottomLeft => self.height - 1 - row,
        };
        Some((col, line))
    }

    /// Overlay `stars` on the fill, one string per line, cells joined by a single space.
    ///
    /// Later stars overwrite earlier ones on the same cell; out-of-bounds stars are dropped.
    pub fn render(&self, stars: &[Star]) -> Vec<String> {
        let mut canvas: Vec<Vec<&str>> = vec![vec![self.fill.as_str(); self.width]; self.height];
        for star in stars {
            if let Some((col, line)) = self.cell_of(star) {
                canvas[line][col] = star.symbol.as_str();
            }
        }
        canvas.into_iter().map(|row| row.join(" ")).collect()
    }
}

const STAR: &str = "✦";

/// "PG.js" spelled in stars, y growing upward. On the default grid it fills lines 1 to 4.
pub fn pg_constellation() -> Vec<Star> {
    const CELLS: [(i64, i64); 33] = [
        // P
        (1, 10),
        (1, 9),
        (1, 8),
        (1, 7),
        (2, 10),
        (3, 10),
        (4, 9),
        (3, 8),
        (2, 8),
        // G
        (8, 10),
        (9, 10),
        (10, 10),
        (8, 9),
        (8, 8),
        (8, 7),
        (9, 7),
        (10, 7),
        (10, 8),
        // .js
        (15, 7),
        (18, 9),
        (18, 8),
        (18, 7),
        (19, 7),
        (20, 7),
        (20, 8),
        (20, 9),
        (22, 10),
        (23, 10),
        (24, 10),
        (24, 9),
        (24, 8),
        (23, 7),
        (22, 7),
    ];
    CELLS.iter().map(|&(x, y)| Star::new(x, y, STAR)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/stars/grid.rs"]
mod tests;
