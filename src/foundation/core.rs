use crate::foundation::error::{SketchError, SketchResult};
use serde::{Deserialize, Serialize};

pub use kurbo::{Point, Vec2};

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest accepted side length.
    pub const MAX_SIDE: u32 = 16_384;

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> SketchResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Check both sides are non-zero and within [`Canvas::MAX_SIDE`].
    pub fn validate(self) -> SketchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::validation("canvas sides must be > 0"));
        }
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE {
            return Err(SketchError::validation(format!(
                "canvas sides must be <= {}",
                Self::MAX_SIDE
            )));
        }
        Ok(())
    }

    /// Where every drawing session starts: horizontally centered, a third of the way down.
    pub fn origin(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 3.0)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Straight-alpha RGBA8 color.
///
/// Serializes as `"#RRGGBBAA"`; deserializes from `"#RRGGBB"`, `"#RRGGBBAA"` or `[r, g, b(, a)]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Default stroke color.
    pub const STROKE_BLUE: Self = Self::opaque(0x21, 0x96, 0xF3);
    /// Outer ring of the origin marker.
    pub const MARKER_RED: Self = Self::opaque(0xFF, 0x44, 0x44);

    /// Fully opaque color from RGB components.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> SketchResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> SketchResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| SketchError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(SketchError::validation("hex color must be ASCII"));
        }
        match s.len() {
            6 => Ok(Self::opaque(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(SketchError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA",
            )),
        }
    }

    /// Format as `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Components as an `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgba8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self::opaque(r, g, b)),
                &[r, g, b, a] => Ok(Self { r, g, b, a }),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Colors picked from when per-segment random coloring is enabled.
pub const PALETTE: [Rgba8; 12] = [
    Rgba8::opaque(0xFF, 0x6B, 0x6B),
    Rgba8::opaque(0x4E, 0xCD, 0xC4),
    Rgba8::opaque(0x45, 0xB7, 0xD1),
    Rgba8::opaque(0xFF, 0xA0, 0x7A),
    Rgba8::opaque(0x98, 0xD8, 0xC8),
    Rgba8::opaque(0xB1, 0x9C, 0xD9),
    Rgba8::opaque(0xFF, 0xD9, 0x3D),
    Rgba8::opaque(0x6B, 0xCF, 0x7F),
    Rgba8::opaque(0xFF, 0x8A, 0x65),
    Rgba8::opaque(0xA8, 0xE6, 0xCF),
    Rgba8::opaque(0xFF, 0x7E, 0x79),
    Rgba8::opaque(0x87, 0xCE, 0xEB),
];

/// Small deterministic generator (SplitMix64).
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Seeded generator; equal seeds yield equal sequences.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::new(nanos)
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = (self.next_u64() % items.len() as u64) as usize;
        items.get(i)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
