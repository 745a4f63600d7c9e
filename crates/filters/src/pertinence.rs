//! Pertinence filter abstraction and the attribute filters
//!
//! This module provides:
//! - PertinenceFilter trait, the capability contract every filter implements
//! - TagFilter, ObjectTypeFilter, LicenseFilter, AnimationFilter,
//!   DimensionFilter
//!
//! The graded color filter lives in `color_filter` — everything here is
//! binary (pertinence 0 or 1).
//!
//! # Contract
//!
//! `pertinence` returns a value in [0, 1]. 0 means "exclude"; 1 means
//! "fully matches / neutral". Negative values are forbidden. Filters are
//! immutable value objects, side-effect free, and safe to evaluate
//! concurrently over many items. A missing item attribute is treated as
//! non-matching (pertinence 0), never an error — catalogs are heterogeneous.

use curator_core::item::CatalogItem;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

// ============================================================================
// PertinenceFilter Trait
// ============================================================================

/// Capability contract implemented by every concrete filter
///
/// # Thread Safety
///
/// Filters must be Send + Sync: the ranking pass may evaluate them from
/// background tasks, and one filter instance is shared by reference across
/// every item of a candidate list.
pub trait PertinenceFilter: Send + Sync {
    /// Relevance of one item under this filter, in [0, 1]
    ///
    /// 0 excludes the item; 1 is a full match. Only the color filter
    /// returns intermediate values.
    fn pertinence(&self, item: &CatalogItem) -> f32;

    /// Whether this instance differs from its neutral construction
    ///
    /// A filter with no criteria set returns false and scores every item 1.
    fn has_criteria(&self) -> bool;

    /// Name for debugging and logging
    fn name(&self) -> &'static str;
}

// ============================================================================
// TagFilter
// ============================================================================

/// Accepts items carrying at least one of the accepted tags
///
/// Plain membership, not weighted. An empty accepted set is neutral:
/// every item scores 1.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    tags: FxHashSet<String>,
}

impl TagFilter {
    /// Create a filter from accepted tags
    ///
    /// The tags are copied into an owned set — the filter never aliases a
    /// caller-owned collection.
    pub fn new(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TagFilter {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl PertinenceFilter for TagFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        if self.tags.is_empty() || item.tags.iter().any(|t| self.tags.contains(t)) {
            1.0
        } else {
            0.0
        }
    }

    fn has_criteria(&self) -> bool {
        !self.tags.is_empty()
    }

    fn name(&self) -> &'static str {
        "tag"
    }
}

// ============================================================================
// ObjectTypeFilter
// ============================================================================

/// Accepts items whose object type is one of the accepted discriminants
#[derive(Debug, Clone, Default)]
pub struct ObjectTypeFilter {
    types: FxHashSet<String>,
}

impl ObjectTypeFilter {
    /// Create a filter from accepted object types
    pub fn new(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ObjectTypeFilter {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl PertinenceFilter for ObjectTypeFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        if self.types.is_empty() {
            return 1.0;
        }
        match &item.object_type {
            Some(object_type) if self.types.contains(object_type) => 1.0,
            // Absent discriminant cannot prove a match
            _ => 0.0,
        }
    }

    fn has_criteria(&self) -> bool {
        !self.types.is_empty()
    }

    fn name(&self) -> &'static str {
        "object-type"
    }
}

// ============================================================================
// LicenseFilter
// ============================================================================

/// License strings that require no attribution from the buyer
static ATTRIBUTION_FREE_LICENSES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "CC0 (public domain)",
        "CC0 1.0",
        "Public domain",
    ]
    .into_iter()
    .collect()
});

/// Excludes items whose license requires attribution
///
/// Neutral unless `attribution_free_only` is requested; then the item's
/// license string must be in the fixed allow-list. An absent license is
/// conservatively treated as requiring attribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseFilter {
    attribution_free_only: bool,
}

impl LicenseFilter {
    /// Create a license filter
    pub fn new(attribution_free_only: bool) -> Self {
        LicenseFilter {
            attribution_free_only,
        }
    }
}

impl PertinenceFilter for LicenseFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        if !self.attribution_free_only {
            return 1.0;
        }
        match item.license.as_deref() {
            Some(license) if ATTRIBUTION_FREE_LICENSES.contains(license) => 1.0,
            _ => 0.0,
        }
    }

    fn has_criteria(&self) -> bool {
        self.attribution_free_only
    }

    fn name(&self) -> &'static str {
        "license"
    }
}

// ============================================================================
// AnimationFilter
// ============================================================================

/// Filters on animation richness
///
/// Two independent criteria; every requested one must hold:
/// - `must_be_animated`: more than one frame
/// - `must_have_several_states`: more than one animation state/variant
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFilter {
    must_be_animated: bool,
    must_have_several_states: bool,
}

impl AnimationFilter {
    /// Create an animation filter
    pub fn new(must_be_animated: bool, must_have_several_states: bool) -> Self {
        AnimationFilter {
            must_be_animated,
            must_have_several_states,
        }
    }
}

impl PertinenceFilter for AnimationFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        if self.must_be_animated && !item.animation_frames.is_some_and(|frames| frames > 1) {
            return 0.0;
        }
        if self.must_have_several_states
            && !item.animation_states.is_some_and(|states| states > 1)
        {
            return 0.0;
        }
        1.0
    }

    fn has_criteria(&self) -> bool {
        self.must_be_animated || self.must_have_several_states
    }

    fn name(&self) -> &'static str {
        "animation"
    }
}

// ============================================================================
// DimensionFilter
// ============================================================================

/// Sentinel meaning "no lower bound"
pub const DIMENSION_UNBOUNDED_MIN: u32 = 0;

/// Sentinel meaning "no upper bound"
pub const DIMENSION_UNBOUNDED_MAX: u32 = u32::MAX;

/// Accepts items whose width OR height falls inside a pixel range
///
/// Width and height are OR-combined: an item passes when either dimension
/// is in range. An AND would be the natural reading of "object size within
/// range", but the permissive OR is the established store behavior —
/// flagged for product clarification, do not change silently.
#[derive(Debug, Clone, Copy)]
pub struct DimensionFilter {
    min: u32,
    max: u32,
}

impl Default for DimensionFilter {
    fn default() -> Self {
        DimensionFilter {
            min: DIMENSION_UNBOUNDED_MIN,
            max: DIMENSION_UNBOUNDED_MAX,
        }
    }
}

impl DimensionFilter {
    /// Create a dimension filter over `[min, max]` pixels
    ///
    /// Pass [`DIMENSION_UNBOUNDED_MIN`] / [`DIMENSION_UNBOUNDED_MAX`] to
    /// leave a side open.
    pub fn new(min: u32, max: u32) -> Self {
        DimensionFilter { min, max }
    }

    fn in_range(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl PertinenceFilter for DimensionFilter {
    fn pertinence(&self, item: &CatalogItem) -> f32 {
        if !self.has_criteria() {
            return 1.0;
        }
        let width_ok = item.width.is_some_and(|w| self.in_range(w));
        let height_ok = item.height.is_some_and(|h| self.in_range(h));
        if width_ok || height_ok {
            1.0
        } else {
            0.0
        }
    }

    fn has_criteria(&self) -> bool {
        self.min != DIMENSION_UNBOUNDED_MIN || self.max != DIMENSION_UNBOUNDED_MAX
    }

    fn name(&self) -> &'static str {
        "dimension"
    }
}

// ============================================================================
// Tests
// ============================================================================
