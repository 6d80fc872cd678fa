//! Linear RGBA colors used by entities and the canvas.

/// Straight-alpha RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Gold used by horn blasts, sacred geometry and the guardian (#ffd700)
    pub const GOLD: Self = Self::rgb8(0xff, 0xd7, 0x00);

    /// Burnished gold (#d4af37)
    pub const OLD_GOLD: Self = Self::rgb8(0xd4, 0xaf, 0x37);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with alpha replaced (clamped to 0..=1)
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Same color with alpha multiplied
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Component-wise linear interpolation
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Sample a color ramp given as `(offset, color)` stops sorted by offset
    pub fn sample_stops(stops: &[(f32, Rgba)], t: f32) -> Self {
        let Some(&(first_offset, first)) = stops.first() else {
            return Self::TRANSPARENT;
        };
        if t <= first_offset {
            return first;
        }
        for pair in stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = (o1 - o0).max(f32::EPSILON);
                return c0.lerp(c1, (t - o0) / span);
            }
        }
        stops[stops.len() - 1].1
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
