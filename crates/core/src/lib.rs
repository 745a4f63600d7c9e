//! Core types for the curator engine
//!
//! This crate defines the foundational types used throughout the system:
//! - Catalog data model (items, ids, kinds)
//! - Tag tree and category selection
//! - Color model for perceptual similarity
//! - Error types
//!
//! It owns no behavior beyond construction and validation — filtering,
//! ranking and indexing live in the crates built on top of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod color;
pub mod error;
pub mod item;
pub mod tags;

pub use color::{Hsl, Rgb};
pub use error::{Error, Result};
pub use item::{Catalog, CatalogItem, ItemId, ItemKind};
pub use tags::{ChosenCategory, FilterMetadata, TagsTree, TagsTreeNode};
