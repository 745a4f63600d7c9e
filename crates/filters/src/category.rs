//! Category membership and the flat chosen-tags pass
//!
//! Two independent boolean excludes applied before any pertinence scoring:
//!
//! - [`matches_chosen_category`]: hierarchical containment against a chosen
//!   tree node and its ancestors. "This item must be tagged with the whole
//!   selected path, except where an intermediate path segment is a non-tag
//!   folder."
//! - [`matches_filter_tags`]: membership in a manually chosen flat tag set.
//!
//! Both are pure functions over core types; they never mutate the item or
//! the selection.

use curator_core::item::CatalogItem;
use curator_core::tags::ChosenCategory;
use rustc_hash::FxHashSet;

/// Hierarchical category membership test
///
/// - No category chosen: every item passes.
/// - Category chosen but the item exposes no tags at all: excluded.
///   Membership cannot be proven without tag data — this is how untagged
///   pack-like items drop out of category-scoped listings.
/// - Otherwise the item must carry the chosen node's own tag name (skipped
///   when the node is a pure tag-container), then the same test repeats for
///   every ancestor from the nearest parent outward, short-circuiting on
///   the first non-container ancestor whose tag is absent.
pub fn matches_chosen_category(item: &CatalogItem, chosen: Option<&ChosenCategory>) -> bool {
    let Some(chosen) = chosen else {
        return true;
    };

    if item.tags.is_empty() {
        return false;
    }

    let has_tag = |name: &str| item.tags.iter().any(|t| t == name);

    if !chosen.node.tag_container && !has_tag(&chosen.node.name) {
        return false;
    }

    for ancestor in chosen.parents.iter().rev() {
        if !ancestor.tag_container && !has_tag(&ancestor.name) {
            return false;
        }
    }

    true
}

/// Flat chosen-tags test
///
/// An empty filter set passes everything. Otherwise the item survives with
/// at least one matching tag OR at least one matching category.
pub fn matches_filter_tags(item: &CatalogItem, filter_tags: &FxHashSet<String>) -> bool {
    if filter_tags.is_empty() {
        return true;
    }

    item.tags.iter().any(|t| filter_tags.contains(t))
        || item.categories.iter().any(|c| filter_tags.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::tags::{ChosenCategory, TagsTree, TagsTreeNode};

    /// A -> B -> C chain, where B can optionally be a container
    fn chain(b_is_container: bool) -> TagsTree {
        let mut b = TagsTreeNode::with_children("B", vec![TagsTreeNode::leaf("C")]);
        if b_is_container {
            b = b.as_container();
        }
        TagsTree::new(vec![TagsTreeNode::with_children("A", vec![b])])
    }

    fn tagged(tags: &[&str]) -> CatalogItem {
        CatalogItem::new("x", "X").with_tags(tags.iter().copied())
    }

    #[test]
    fn test_no_category_passes_everything() {
        assert!(matches_chosen_category(&tagged(&[]), None));
        assert!(matches_chosen_category(&tagged(&["A"]), None));
    }

    #[test]
    fn test_tagless_item_excluded_when_category_chosen() {
        let tree = chain(false);
        let chosen = ChosenCategory::resolve(&tree, &["A"]).unwrap();
        assert!(!matches_chosen_category(&tagged(&[]), Some(&chosen)));
    }

    #[test]
    fn test_full_path_required() {
        let tree = chain(false);
        let leaf = ChosenCategory::resolve(&tree, &["A", "B", "C"]).unwrap();

        // Tagged only with the root: excluded at the node level
        assert!(!matches_chosen_category(&tagged(&["A"]), Some(&leaf)));
        // Missing an intermediate ancestor: excluded
        assert!(!matches_chosen_category(&tagged(&["A", "C"]), Some(&leaf)));
        // Whole path present: included
        assert!(matches_chosen_category(&tagged(&["A", "B", "C"]), Some(&leaf)));
    }

    #[test]
    fn test_root_selection_only_needs_root_tag() {
        let tree = chain(false);
        let root = ChosenCategory::resolve(&tree, &["A"]).unwrap();
        assert!(matches_chosen_category(&tagged(&["A"]), Some(&root)));
        assert!(!matches_chosen_category(&tagged(&["C"]), Some(&root)));
    }

    #[test]
    fn test_container_segment_is_skipped() {
        let tree = chain(true);
        let leaf = ChosenCategory::resolve(&tree, &["A", "B", "C"]).unwrap();

        // "B" is a pure container — the item does not need its tag
        assert!(matches_chosen_category(&tagged(&["A", "C"]), Some(&leaf)));
        // The non-container levels are still required
        assert!(!matches_chosen_category(&tagged(&["C"]), Some(&leaf)));
    }

    #[test]
    fn test_container_node_selection_checks_ancestors_only() {
        let tree = chain(true);
        let container = ChosenCategory::resolve(&tree, &["A", "B"]).unwrap();

        // The container node itself carries no matching semantics;
        // only the ancestor "A" is required.
        assert!(matches_chosen_category(&tagged(&["A"]), Some(&container)));
        assert!(!matches_chosen_category(&tagged(&["B"]), Some(&container)));
    }

    #[test]
    fn test_filter_tags_empty_passes() {
        let none = FxHashSet::default();
        assert!(matches_filter_tags(&tagged(&[]), &none));
    }

    #[test]
    fn test_filter_tags_matches_tag_or_category() {
        let mut wanted = FxHashSet::default();
        wanted.insert("red".to_string());

        let by_tag = tagged(&["red", "sprite"]);
        let by_category = CatalogItem::new("y", "Y").with_categories(["red"]);
        let neither = tagged(&["blue"]);

        assert!(matches_filter_tags(&by_tag, &wanted));
        assert!(matches_filter_tags(&by_category, &wanted));
        assert!(!matches_filter_tags(&neither, &wanted));
    }
}
