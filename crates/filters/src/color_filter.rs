//! Perceptual color-similarity filter
//!
//! Unlike the attribute filters, this one is graded: it scores how close an
//! item's dominant colors come to a target color instead of answering yes/no.
//!
//! # Scoring
//!
//! Both colors are compared in HSL space. For each dominant color:
//!
//! - Chromatic target: `1 − (4·Δh² + Δs² + Δl²) / 6`, where Δh is the
//!   circular hue distance doubled to span the full [0, 1] range (raw
//!   circular distance saturates at 0.5). Hue is weighted 4× so it
//!   dominates perceptually.
//! - Greyscale target (saturation 0): hue is meaningless, so only
//!   `1 − (Δs² + Δl²) / 6` — the same normalization with the hue term
//!   zeroed, keeping the two branches continuous as saturation → 0.
//!
//! The filter's pertinence is the maximum score across the item's dominant
//! colors: an item matches if any of its colors is close. Every present
//! color scores at least [`COLOR_SCORE_FLOOR`], so a poor-but-present match
//! is never confused with the hard exclusion a binary filter produces.

use crate::pertinence::PertinenceFilter;
use curator_core::color::{Hsl, Rgb};
use curator_core::item::CatalogItem;

/// Strictly positive lower bound for the score of any present color
pub const COLOR_SCORE_FLOOR: f32 = 0.001;

/// Scores items by how close any dominant color is to a target color
///
/// No target color means the filter is neutral and every item scores 1.
/// A target with no dominant colors on the item scores 0 — absent data
/// cannot prove similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorFilter {
    target: Option<Hsl>,
}

impl ColorFilter {
    /// Create a filter targeting a color
    pub fn new(target: Rgb) -> Self {
        ColorFilter {
            target: Some(target.to_hsl()),
        }
    }

    /// Create a neutral filter with no target
    pub fn none() -> Self {
        ColorFilter::default()
    }

    /// Similarity of one color to the target, in [COLOR_SCORE_FLOOR, 1]
    fn score(target: Hsl, candidate: Hsl) -> f32 {
        let ds = target.s - candidate.s;
        let dl = target.l - candidate.l;

        let raw = if target.s == 0.0 {
            1.0 - (ds * ds + dl * dl) / 6.0
        } else {
            let dh = target.hue_distance(candidate) * 2.0;
            1.0 - (4.0 * dh * dh + ds * ds + dl * dl) / 6.0
        };

        raw.max(COLOR_SCORE_FLOOR)
    }
}

impl PertinenceFilter for ColorFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        let Some(target) = self.target else {
            return 1.0;
        };

        item.dominant_colors
            .iter()
            .map(|&color| Self::score(target, color.to_hsl()))
            .fold(0.0, f32::max)
    }

    fn has_criteria(&self) -> bool {
        self.target.is_some()
    }

    fn name(&self) -> &'static str {
        "color"
    }
}
