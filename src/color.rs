use palette::{Mix, Srgb};
use serde::Serialize;

use crate::data::filter::MAX_SCORE;

/// Number of steps in the score palette.
pub const PALETTE_STEPS: usize = 100;

/// Palette indices below this get light text, the rest dark text.
pub const LIGHT_TEXT_BELOW: usize = 40;

/// Entries in the lookup table the ramp is sampled through.
const LUT_SIZE: usize = 256;

/// Red → yellow → green diverging ramp (ColorBrewer RdYlGn, 11 classes).
const RDYLGN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

// ---------------------------------------------------------------------------
// Palette generation
// ---------------------------------------------------------------------------

fn anchor(i: usize) -> Srgb<f32> {
    let [r, g, b] = RDYLGN[i];
    Srgb::new(r, g, b).into_format()
}

/// Colour of the continuous ramp at `position` in `[0, 1]`.
fn ramp(position: f32) -> Srgb<f32> {
    let last = RDYLGN.len() - 1;
    let scaled = position.clamp(0.0, 1.0) * last as f32;
    let lo = (scaled.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    anchor(lo).mix(anchor(hi), scaled - lo as f32)
}

/// Sample `n` colours from the interior of the ramp, low to high.
///
/// Sample `i` sits at `(i + 1) / (n + 1)` and is quantised to a
/// [`LUT_SIZE`]-entry lookup table, so the extremes of the ramp are never used
/// directly.
pub fn diverging_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let x = (i + 1) as f32 / (n + 1) as f32;
            let lut_index = ((x * LUT_SIZE as f32) as usize).min(LUT_SIZE - 1);
            let position = lut_index as f32 / (LUT_SIZE - 1) as f32;
            ramp(position).into_format::<u8>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Score → colour
// ---------------------------------------------------------------------------

/// Text colour paired with a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Foreground {
    Light,
    Dark,
}

impl Foreground {
    pub fn rgb(self) -> Srgb<u8> {
        match self {
            Foreground::Light => Srgb::new(255, 255, 255),
            Foreground::Dark => Srgb::new(0, 0, 0),
        }
    }
}

/// Background/foreground pair for one score cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreColor {
    /// Position in the palette, `0..PALETTE_STEPS`.
    pub index: usize,
    pub background: Srgb<u8>,
    pub foreground: Foreground,
}

impl ScoreColor {
    /// Background as `#rrggbb`.
    pub fn hex(&self) -> String {
        let c = self.background;
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }
}

/// Palette index for a score: `floor(score / 5 * 99)`.
///
/// Scores are clamped into `[0, 5]` first; NaN counts as `0`.
pub fn score_index(score: f64) -> usize {
    let max = f64::from(MAX_SCORE);
    let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, max) };
    let last = (PALETTE_STEPS - 1) as f64;
    ((score / max * last).floor() as usize).min(PALETTE_STEPS - 1)
}

/// Maps scores to the red-yellow-green palette.
#[derive(Debug, Clone)]
pub struct ScoreColorizer {
    palette: Vec<Srgb<u8>>,
}

impl Default for ScoreColorizer {
    fn default() -> Self {
        ScoreColorizer {
            palette: diverging_palette(PALETTE_STEPS),
        }
    }
}

impl ScoreColorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&self, score: f64) -> ScoreColor {
        let index = score_index(score);
        let foreground = if index < LIGHT_TEXT_BELOW {
            Foreground::Light
        } else {
            Foreground::Dark
        };
        ScoreColor {
            index,
            background: self.palette[index],
            foreground,
        }
    }

    pub fn palette(&self) -> &[Srgb<u8>] {
        &self.palette
    }
}
