//! Catalog item data model
//!
//! This module provides:
//! - ItemId: unique string key for a catalog item
//! - ItemKind: type discriminator (asset, pack, audio, font)
//! - CatalogItem: one browsable item with its filterable attributes
//! - Catalog: the full item collection currently loaded
//!
//! Items are owned by the external data-fetching collaborator; the engine
//! holds `Arc` references for the lifetime of a search session and never
//! mutates them. Attributes specific filters consume (object type, license,
//! animation counts, dimensions, dominant colors) are optional — a missing
//! attribute is handled by the filter, never an error here.

use crate::color::Rgb;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// ItemId
// ============================================================================

/// Unique identifier of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new ItemId
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        ItemId(String::new())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

// ============================================================================
// ItemKind
// ============================================================================

/// Type discriminator for catalog items
///
/// Packs bundle other items and are typically not individually tagged —
/// the category membership filter excludes tagless items when a category
/// is chosen, which is how packs drop out of category-scoped listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A single placeable asset (sprite, object, ...)
    #[default]
    Asset,
    /// A bundle of assets sold/browsed as one unit
    Pack,
    /// An audio resource
    Audio,
    /// A font resource
    Font,
}

// ============================================================================
// CatalogItem
// ============================================================================

/// One browsable item of the store catalog
///
/// An ephemeral record supplied by the data-fetching collaborator. The
/// engine reads it, never writes it. Construct with [`CatalogItem::new`]
/// and the `with_*` builders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique id, also the catalog key
    pub id: ItemId,

    /// Display name; part of the indexed description
    pub name: String,

    /// Type discriminator
    #[serde(default)]
    pub kind: ItemKind,

    /// Tags; insertion order irrelevant
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories; may be empty
    #[serde(default)]
    pub categories: Vec<String>,

    /// Object type discriminant (e.g. "sprite", "tiled", "9patch")
    #[serde(default)]
    pub object_type: Option<String>,

    /// License string as published by the author
    #[serde(default)]
    pub license: Option<String>,

    /// Maximum frame count across the item's animations
    #[serde(default)]
    pub animation_frames: Option<u32>,

    /// Number of animation states/variants
    #[serde(default)]
    pub animation_states: Option<u32>,

    /// Width in pixels
    #[serde(default)]
    pub width: Option<u32>,

    /// Height in pixels
    #[serde(default)]
    pub height: Option<u32>,

    /// Dominant colors extracted from the item's preview
    #[serde(default)]
    pub dominant_colors: Vec<Rgb>,

    /// Duration in seconds, for audio resources
    #[serde(default)]
    pub duration_seconds: Option<f32>,
}

impl CatalogItem {
    /// Create a new item with an id and name
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        CatalogItem {
            id: id.into(),
            name: name.into(),
            ..CatalogItem::default()
        }
    }

    /// Builder: set kind
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set categories
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set object type
    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }

    /// Builder: set license
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Builder: set animation frame and state counts
    pub fn with_animation(mut self, frames: u32, states: u32) -> Self {
        self.animation_frames = Some(frames);
        self.animation_states = Some(states);
        self
    }

    /// Builder: set dimensions in pixels
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder: set dominant colors
    pub fn with_dominant_colors(mut self, colors: impl IntoIterator<Item = Rgb>) -> Self {
        self.dominant_colors = colors.into_iter().collect();
        self
    }

    /// Builder: set audio duration
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// The full mapping of browsable items currently loaded
///
/// Insertion order is preserved — it is the "stable" discovery ordering used
/// when a category is chosen and no query is active. Lookup by id is O(1).
///
/// A catalog is replaced wholesale when the data-fetching collaborator
/// finishes loading; replacing it invalidates the session's text index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Arc<CatalogItem>>,
    by_id: FxHashMap<ItemId, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Build a catalog from items, preserving iteration order
    ///
    /// A duplicate id replaces the earlier item, keeping the earlier
    /// position — keys stay unique.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Catalog::new();
        for item in items {
            catalog.insert(item);
        }
        catalog
    }

    /// Insert one item; a duplicate id replaces in place
    pub fn insert(&mut self, item: CatalogItem) {
        let item = Arc::new(item);
        match self.by_id.get(&item.id) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.by_id.insert(item.id.clone(), self.items.len());
                self.items.push(item);
            }
        }
    }

    /// Look up one item by id
    pub fn get(&self, id: &ItemId) -> Option<&Arc<CatalogItem>> {
        self.by_id.get(id).map(|&pos| &self.items[pos])
    }

    /// All items in insertion order
    pub fn items(&self) -> &[Arc<CatalogItem>] {
        &self.items
    }

    /// Iterate (id, item) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Arc<CatalogItem>)> {
        self.items.iter().map(|item| (&item.id, item))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
