//! Tag tree and category selection types
//!
//! This module provides:
//! - TagsTreeNode / TagsTree: the hierarchical category forest
//! - FilterMetadata: the filter-metadata payload delivered alongside a catalog
//! - ChosenCategory: a validated selection of one tree node plus its ancestry
//!
//! The forest is built and owned by the external filter-metadata collaborator
//! and is read-only to the engine. `all_children_tags` is precomputed at
//! construction so membership tests never walk the tree.

use crate::error::{Error, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// TagsTreeNode
// ============================================================================

/// One node of the category forest
///
/// A node usually carries a matching tag of the same name. A node flagged as
/// `tag_container` is a pure grouping level: it has no matching tag of its
/// own and is skipped by the category membership test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsTreeNode {
    /// Node name; doubles as the tag items must carry, unless `tag_container`
    pub name: String,

    /// Ordered children
    #[serde(default)]
    pub children: Vec<TagsTreeNode>,

    /// Grouping node with no independent matching semantics
    #[serde(default)]
    pub tag_container: bool,

    /// All tag names transitively reachable from this node
    #[serde(default)]
    pub all_children_tags: FxHashSet<String>,
}

impl TagsTreeNode {
    /// Create a leaf node
    pub fn leaf(name: impl Into<String>) -> Self {
        TagsTreeNode {
            name: name.into(),
            children: vec![],
            tag_container: false,
            all_children_tags: FxHashSet::default(),
        }
    }

    /// Create a node with children, computing `all_children_tags` bottom-up
    pub fn with_children(name: impl Into<String>, children: Vec<TagsTreeNode>) -> Self {
        let mut node = TagsTreeNode {
            name: name.into(),
            children,
            tag_container: false,
            all_children_tags: FxHashSet::default(),
        };
        node.recompute_children_tags();
        node
    }

    /// Mark this node as a pure grouping level
    pub fn as_container(mut self) -> Self {
        self.tag_container = true;
        self
    }

    fn recompute_children_tags(&mut self) {
        let mut tags = FxHashSet::default();
        for child in &mut self.children {
            child.recompute_children_tags();
            if !child.tag_container {
                tags.insert(child.name.clone());
            }
            tags.extend(child.all_children_tags.iter().cloned());
        }
        self.all_children_tags = tags;
    }
}

// ============================================================================
// TagsTree
// ============================================================================

/// The category forest, in display order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsTree {
    /// Root nodes
    pub roots: Vec<TagsTreeNode>,
}

impl TagsTree {
    /// Build a forest from root nodes
    pub fn new(roots: Vec<TagsTreeNode>) -> Self {
        TagsTree { roots }
    }

    /// Recompute every node's `all_children_tags` bottom-up
    ///
    /// Needed after deserializing a forest that arrived without the
    /// precomputed sets.
    pub fn recompute_children_tags(&mut self) {
        for root in &mut self.roots {
            root.recompute_children_tags();
        }
    }
}

// ============================================================================
// FilterMetadata
// ============================================================================

/// Filter metadata delivered by the external collaborator next to a catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Every tag present in the catalog
    #[serde(default)]
    pub all_tags: Vec<String>,

    /// Tags highlighted by default in the browsing UI
    #[serde(default)]
    pub default_tags: Vec<String>,

    /// The category forest
    #[serde(default)]
    pub tags_tree: TagsTree,
}

// ============================================================================
// ChosenCategory
// ============================================================================

/// A selected category node plus its ancestor chain
///
/// The ancestor chain is ordered root → parent and must exactly match the
/// ancestry the tree produces — [`ChosenCategory::resolve`] enforces this at
/// construction, so a `ChosenCategory` in hand is always consistent with its
/// forest.
#[derive(Debug, Clone)]
pub struct ChosenCategory {
    /// The selected node
    pub node: TagsTreeNode,

    /// Ancestors, root first, nearest parent last
    pub parents: Vec<TagsTreeNode>,
}

impl ChosenCategory {
    /// Resolve a path of node names against the forest
    ///
    /// `path` names each level from a root down to the selected node.
    /// Returns [`Error::UnknownCategory`] when any segment is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_core::tags::{ChosenCategory, TagsTree, TagsTreeNode};
    ///
    /// let tree = TagsTree::new(vec![TagsTreeNode::with_children(
    ///     "fantasy",
    ///     vec![TagsTreeNode::leaf("knight")],
    /// )]);
    /// let chosen = ChosenCategory::resolve(&tree, &["fantasy", "knight"]).unwrap();
    /// assert_eq!(chosen.node.name, "knight");
    /// assert_eq!(chosen.parents.len(), 1);
    /// ```
    pub fn resolve(tree: &TagsTree, path: &[&str]) -> Result<Self> {
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| Error::UnknownCategory("(empty path)".to_string()))?;

        let mut node = tree
            .roots
            .iter()
            .find(|n| n.name == *first)
            .ok_or_else(|| Error::UnknownCategory(path.join("/")))?;

        let mut parents = Vec::with_capacity(path.len() - 1);
        for segment in rest {
            parents.push(node.clone());
            node = node
                .children
                .iter()
                .find(|n| n.name == *segment)
                .ok_or_else(|| Error::UnknownCategory(path.join("/")))?;
        }

        Ok(ChosenCategory {
            node: node.clone(),
            parents,
        })
    }
}
