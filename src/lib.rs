//! Curator - embeddable search, filter & ranking engine for content stores
//!
//! Curator takes a changing catalog of browsable items (assets, audio/font
//! resources, packs), a free-text query, a hierarchical category selection
//! and a set of independent relevance criteria, and produces an ordered,
//! responsive result list without blocking the interactive UI.
//!
//! # Quick Start
//!
//! ```
//! use curator::{Catalog, CatalogItem, SearchSession};
//!
//! let session = SearchSession::new();
//! session.set_catalog(Catalog::from_items([
//!     CatalogItem::new("hero", "Hero Knight").with_tags(["fantasy", "knight"]),
//!     CatalogItem::new("ship", "Space Ship").with_tags(["scifi"]),
//! ]));
//! session.wait_idle();
//!
//! session.set_query("knight");
//! session.wait_idle();
//!
//! let results = session.results().unwrap();
//! assert_eq!(results[0].id.as_str(), "hero");
//! ```
//!
//! # Architecture
//!
//! The engine is layered: `curator-core` holds the data model,
//! `curator-filters` the pertinence filters and ranking, `curator-index`
//! the text-index contract and default backend, and `curator-engine` the
//! asynchronous session coordinator. This facade re-exports the public API.

pub use curator_core::{
    Catalog, CatalogItem, ChosenCategory, Error, FilterMetadata, Hsl, ItemId, ItemKind, Result,
    Rgb, TagsTree, TagsTreeNode,
};
pub use curator_filters::{
    filter_search_items, matches_chosen_category, matches_filter_tags, partial_sort_by_value,
    AnimationFilter, ColorFilter, DimensionFilter, LicenseFilter, ObjectTypeFilter,
    PertinenceFilter, TagFilter, COLOR_SCORE_FLOOR, DIMENSION_UNBOUNDED_MAX,
    DIMENSION_UNBOUNDED_MIN,
};
pub use curator_index::{tokenize, tokenize_unique, MemoryTextIndex, TextIndex};
pub use curator_engine::{
    default_describe, IndexState, SearchSession, SessionBuilder, SessionConfig, SessionStats,
};
