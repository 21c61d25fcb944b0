use serde::{Deserialize, Serialize};

/// Visible area particles live in. Origin is the top-left corner, `y` grows
/// downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a point is still inside the viewport grown by `margin` on the
    /// left, right and bottom. Nothing is culled above the top edge because
    /// particles spawn there.
    pub fn contains(&self, x: f64, y: f64, margin: f64) -> bool {
        y <= self.height + margin && x >= -margin && x <= self.width + margin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

/// One falling piece of confetti.
///
/// Velocities are in units per reference tick. `glyph`, `rotation` and `spin`
/// are carried for the renderer only; the simulation never reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Index into the configured [`GlyphPalette`](super::GlyphPalette).
    pub glyph: usize,
    /// Degrees.
    pub rotation: f64,
    /// Degrees per reference tick.
    pub spin: f64,
    /// Time since spawn.
    pub age_ms: u64,
}

/// Glyph sets a renderer can draw particles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphPalette {
    /// Trees and leaves
    #[default]
    Emoji,
    /// Plain symbols for fonts without emoji coverage
    Symbols,
}

const EMOJI: [&str; 6] = ["🌲", "🌳", "🌴", "🌿", "🍃", "🌱"];
const SYMBOLS: [&str; 8] = ["♣", "♠", "✿", "❀", "✦", "✧", "❦", "❧"];

impl GlyphPalette {
    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            GlyphPalette::Emoji => &EMOJI,
            GlyphPalette::Symbols => &SYMBOLS,
        }
    }

    pub fn len(self) -> usize {
        self.glyphs().len()
    }

    pub fn is_empty(self) -> bool {
        self.glyphs().is_empty()
    }

    /// Glyph for a particle's payload index, wrapping out-of-range indices.
    pub fn glyph(self, index: usize) -> &'static str {
        let glyphs = self.glyphs();
        glyphs[index % glyphs.len()]
    }
}
