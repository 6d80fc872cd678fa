//! Elder Futhark glyphs as stroke outlines.
//!
//! Each glyph lives in a unit box centered on the origin (y grows downward,
//! height 1.0), so the renderer can rotate and scale it like any other shape.

/// Number of glyphs in the futhark
pub const RUNE_COUNT: usize = 24;

type Strokes = &'static [&'static [[f32; 2]]];

const FUTHARK: [(char, Strokes); RUNE_COUNT] = [
    // Fehu
    ('ᚠ', &[&[[-0.2, -0.5], [-0.2, 0.5]], &[[-0.2, -0.1], [0.25, -0.45]], &[[-0.2, 0.15], [0.25, -0.2]]]),
    // Uruz
    ('ᚢ', &[&[[-0.2, 0.5], [-0.2, -0.5], [0.2, -0.15], [0.2, 0.5]]]),
    // Thurisaz
    ('ᚦ', &[&[[-0.15, -0.5], [-0.15, 0.5]], &[[-0.15, -0.25], [0.2, 0.0], [-0.15, 0.25]]]),
    // Ansuz
    ('ᚨ', &[&[[-0.2, -0.5], [-0.2, 0.5]], &[[-0.2, -0.5], [0.2, -0.2]], &[[-0.2, -0.2], [0.2, 0.1]]]),
    // Raido
    ('ᚱ', &[&[[-0.2, 0.5], [-0.2, -0.5], [0.2, -0.25], [-0.2, 0.0], [0.2, 0.5]]]),
    // Kaunan
    ('ᚲ', &[&[[0.2, -0.3], [-0.2, 0.0], [0.2, 0.3]]]),
    // Gebo
    ('ᚷ', &[&[[-0.3, -0.5], [0.3, 0.5]], &[[0.3, -0.5], [-0.3, 0.5]]]),
    // Wunjo
    ('ᚹ', &[&[[-0.2, 0.5], [-0.2, -0.5], [0.2, -0.25], [-0.2, 0.0]]]),
    // Hagalaz
    ('ᚺ', &[&[[-0.25, -0.5], [-0.25, 0.5]], &[[0.25, -0.5], [0.25, 0.5]], &[[-0.25, -0.2], [0.25, 0.2]]]),
    // Naudiz
    ('ᚾ', &[&[[0.0, -0.5], [0.0, 0.5]], &[[-0.2, -0.15], [0.2, 0.15]]]),
    // Isaz
    ('ᛁ', &[&[[0.0, -0.5], [0.0, 0.5]]]),
    // Jera
    ('ᛃ', &[&[[-0.1, -0.4], [-0.35, -0.15], [-0.1, 0.1]], &[[0.1, -0.1], [0.35, 0.15], [0.1, 0.4]]]),
    // Eihwaz
    ('ᛇ', &[&[[0.0, -0.5], [0.0, 0.5]], &[[0.0, -0.5], [0.2, -0.3]], &[[0.0, 0.5], [-0.2, 0.3]]]),
    // Perthro
    ('ᛈ', &[&[[-0.2, -0.5], [-0.2, 0.5]], &[[-0.2, -0.5], [0.2, -0.2], [0.2, -0.45]], &[[-0.2, 0.5], [0.2, 0.2], [0.2, 0.45]]]),
    // Algiz
    ('ᛉ', &[&[[0.0, -0.5], [0.0, 0.5]], &[[-0.25, -0.5], [0.0, -0.1], [0.25, -0.5]]]),
    // Sowilo
    ('ᛋ', &[&[[0.15, -0.5], [-0.15, -0.15], [0.15, 0.15], [-0.15, 0.5]]]),
    // Tiwaz
    ('ᛏ', &[&[[0.0, -0.5], [0.0, 0.5]], &[[-0.25, -0.2], [0.0, -0.5], [0.25, -0.2]]]),
    // Berkanan
    ('ᛒ', &[&[[-0.2, -0.5], [-0.2, 0.5]], &[[-0.2, -0.5], [0.2, -0.25], [-0.2, 0.0], [0.2, 0.25], [-0.2, 0.5]]]),
    // Ehwaz
    ('ᛖ', &[&[[-0.25, 0.5], [-0.25, -0.5], [0.0, -0.2], [0.25, -0.5], [0.25, 0.5]]]),
    // Mannaz
    ('ᛗ', &[&[[-0.25, -0.5], [-0.25, 0.5]], &[[0.25, -0.5], [0.25, 0.5]], &[[-0.25, -0.5], [0.25, 0.0]], &[[0.25, -0.5], [-0.25, 0.0]]]),
    // Laguz
    ('ᛚ', &[&[[-0.1, 0.5], [-0.1, -0.5], [0.2, -0.2]]]),
    // Ingwaz
    ('ᛜ', &[&[[0.0, -0.3], [0.25, 0.0], [0.0, 0.3], [-0.25, 0.0], [0.0, -0.3]]]),
    // Dagaz
    ('ᛞ', &[&[[-0.25, -0.5], [-0.25, 0.5], [0.25, -0.5], [0.25, 0.5], [-0.25, -0.5]]]),
    // Othala
    ('ᛟ', &[&[[-0.25, 0.5], [0.25, -0.2], [0.0, -0.5], [-0.25, -0.2], [0.25, 0.5]]]),
];

/// Index of a rune in the futhark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph(u8);

impl Glyph {
    /// Glyph at `index`, wrapping past the end of the futhark
    pub fn new(index: usize) -> Self {
        Self((index % RUNE_COUNT) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Unicode runic character
    pub fn symbol(self) -> char {
        FUTHARK[self.index()].0
    }

    /// Polylines of the glyph in unit-box coordinates
    pub fn strokes(self) -> Strokes {
        FUTHARK[self.index()].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_glyph_fits_unit_box() {
        for i in 0..RUNE_COUNT {
            let glyph = Glyph::new(i);
            assert!(!glyph.strokes().is_empty(), "{} has no strokes", glyph.symbol());
            for stroke in glyph.strokes() {
                assert!(stroke.len() >= 2);
                for [x, y] in stroke.iter() {
                    assert!(x.abs() <= 0.5 && y.abs() <= 0.5);
                }
            }
        }
    }

    #[test]
    fn test_symbols_are_runic_block() {
        for i in 0..RUNE_COUNT {
            let c = Glyph::new(i).symbol() as u32;
            assert!((0x16A0..=0x16FF).contains(&c));
        }
        assert_eq!(Glyph::new(0).symbol(), 'ᚠ');
        assert_eq!(Glyph::new(RUNE_COUNT + 1), Glyph::new(1));
    }
}
