use crate::foundation::core::Color;

/// Background plus three accents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Palette {
    pub background: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
}

impl Palette {
    /// `[primary, secondary, accent]`.
    pub fn accents(&self) -> [Color; 3] {
        [self.primary, self.secondary, self.accent]
    }
}

static PALETTES: [Palette; 3] = [
    Palette {
        background: Color::rgb(0x0f, 0x17, 0x2a),
        primary: Color::rgb(0x38, 0xbd, 0xf8),
        secondary: Color::rgb(0xf4, 0x72, 0xb6),
        accent: Color::rgb(0xfa, 0xcc, 0x15),
    },
    Palette {
        background: Color::rgb(0x11, 0x18, 0x27),
        primary: Color::rgb(0x34, 0xd3, 0x99),
        secondary: Color::rgb(0x60, 0xa5, 0xfa),
        accent: Color::rgb(0xf5, 0x9e, 0x0b),
    },
    Palette {
        background: Color::rgb(0x0b, 0x11, 0x20),
        primary: Color::rgb(0xf4, 0x3f, 0x5e),
        secondary: Color::rgb(0x22, 0xd3, 0xee),
        accent: Color::rgb(0xa3, 0xe6, 0x35),
    },
];

pub fn palette_count() -> usize {
    PALETTES.len()
}

/// Palette at `index`, wrapping in both directions.
pub fn pick_palette(index: i64) -> &'static Palette {
    let i = index.rem_euclid(PALETTES.len() as i64) as usize;
    &PALETTES[i]
}
