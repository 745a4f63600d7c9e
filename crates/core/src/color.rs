//! Color model for the color-similarity filter
//!
//! This module provides:
//! - Rgb: the color representation carried by catalog items
//! - Hsl: the hue/saturation/lightness space similarity is computed in
//! - Rgb::to_hsl() conversion
//!
//! All HSL components are normalized to [0, 1]; hue wraps around at 1.0.

use serde::{Deserialize, Serialize};

// ============================================================================
// Rgb
// ============================================================================

/// An sRGB color as carried by catalog item metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a new Rgb color
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Convert to hue/saturation/lightness
    ///
    /// Standard hexcone conversion. Hue is normalized to [0, 1) rather than
    /// degrees so that circular hue distance can be computed directly in the
    /// same unit as saturation and lightness deltas. Achromatic colors
    /// (r == g == b) have hue 0 and saturation 0.
    pub fn to_hsl(self) -> Hsl {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let mut h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h /= 6.0;

        Hsl { h, s, l }
    }
}

// ============================================================================
// Hsl
// ============================================================================

/// A color in hue/saturation/lightness space, all components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue, wrapping at 1.0
    pub h: f32,
    /// Saturation; 0 means greyscale
    pub s: f32,
    /// Lightness
    pub l: f32,
}

impl Hsl {
    /// Circular distance between two hues, in [0, 0.5]
    ///
    /// Hue wraps around at 1.0, so the raw distance saturates at 0.5
    /// (complementary colors). Callers that want the full [0, 1] range
    /// double this value.
    pub fn hue_distance(self, other: Hsl) -> f32 {
        let d = (self.h - other.h).abs();
        if d > 0.5 {
            1.0 - d
        } else {
            d
        }
    }
}
