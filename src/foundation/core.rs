use crate::foundation::error::{NocturneError, NocturneResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (not premultiplied into r/g/b).
    pub a: u8,
}

impl Color {
    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from 8-bit channels with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced by `alpha` in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: unit_to_u8(alpha),
            ..self
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, leading `#` optional).
    pub fn parse_hex(s: &str) -> NocturneResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> NocturneResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| NocturneError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(NocturneError::validation("hex color must be ASCII"));
        }
        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
                hex_byte(&s[6..8])?,
            )),
            _ => Err(NocturneError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    /// Convert HSB(A) on the sketch runtime's scale: hue in degrees (wrapped),
    /// saturation, brightness and alpha in `0..=100`.
    pub fn from_hsb(h: f64, s: f64, b: f64, a: f64) -> Self {
        let h = (h % 360.0 + 360.0) % 360.0;
        let s = (s / 100.0).clamp(0.0, 1.0);
        let v = (b / 100.0).clamp(0.0, 1.0);
        let alpha = a / 100.0;

        if s == 0.0 {
            let c = unit_to_u8(v);
            return Self::rgba(c, c, c, unit_to_u8(alpha));
        }

        let c = v * s;
        let hp = h / 60.0;
        let x = c * (1.0 - ((hp % 2.0) - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        Self::rgba(
            unit_to_u8(r1 + m),
            unit_to_u8(g1 + m),
            unit_to_u8(b1 + m),
            unit_to_u8(alpha),
        )
    }
}

fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Logical viewport size plus the device pixel density it is displayed at.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
    /// Physical pixels per logical unit.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Create a validated viewport. All components must be finite; sizes `>= 0`, ratio `> 0`.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> NocturneResult<Self> {
        if !(width.is_finite() && height.is_finite() && device_pixel_ratio.is_finite()) {
            return Err(NocturneError::validation("viewport components must be finite"));
        }
        if width < 0.0 || height < 0.0 {
            return Err(NocturneError::validation("viewport size must be >= 0"));
        }
        if device_pixel_ratio <= 0.0 {
            return Err(NocturneError::validation(
                "viewport device_pixel_ratio must be > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Logical bounds as a rect anchored at the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Logical center.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Backing-store size in physical pixels. Fractional pixels are truncated.
    pub fn physical_size(self) -> (u32, u32) {
        (
            (self.width * self.device_pixel_ratio).floor() as u32,
            (self.height * self.device_pixel_ratio).floor() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// A rendered frame as RGBA8 pixels.
///
/// Surfaces are rasterized with premultiplied alpha; `premultiplied` makes that explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as `[r, g, b, a]`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixel data with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}
