//! Pertinence filters, category membership and relevance ranking
//!
//! This crate provides:
//! - PertinenceFilter trait for pluggable relevance criteria
//! - The concrete attribute filters (tag, object type, license, animation,
//!   dimension) and the graded color-similarity filter
//! - Hierarchical category membership and the flat chosen-tags pass
//! - The approximate partial sort used for relevance ordering
//! - filter_search_items, the composition pipeline tying them together
//!
//! Everything here runs synchronously over an already-narrowed candidate
//! list; asynchronous indexing and querying live in `curator-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod color_filter;
pub mod compose;
pub mod pertinence;
pub mod rank;

pub use category::{matches_chosen_category, matches_filter_tags};
pub use color_filter::{ColorFilter, COLOR_SCORE_FLOOR};
pub use compose::filter_search_items;
pub use pertinence::{
    AnimationFilter, DimensionFilter, LicenseFilter, ObjectTypeFilter, PertinenceFilter,
    TagFilter, DIMENSION_UNBOUNDED_MAX, DIMENSION_UNBOUNDED_MIN,
};
pub use rank::partial_sort_by_value;
