//! Filter composition & ranking
//!
//! Combines category membership, the flat chosen-tags pass, and the active
//! pertinence filters into one filtered, ranked sequence. This is the
//! pipeline every candidate list flows through — on every keystroke and
//! filter toggle — so it never mutates the catalog or a filter instance and
//! always produces a fresh ordering.

use crate::category::{matches_chosen_category, matches_filter_tags};
use crate::pertinence::PertinenceFilter;
use crate::rank::partial_sort_by_value;
use curator_core::item::CatalogItem;
use curator_core::tags::ChosenCategory;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Filter and rank a candidate sequence
///
/// # Flow
///
/// 1. Category membership and the flat tag pass — hard boolean excludes,
///    independent of pertinence filters.
/// 2. With active pertinence filters: multiply every filter's pertinence per
///    item (multiplicative AND). A single 0 excludes the item immediately and
///    short-circuits its remaining filters. The running min/max of combined
///    pertinence is tracked along the way.
/// 3. Approximately order the survivors by combined pertinence, highest
///    first, using the tracked bounds.
/// 4. Without pertinence filters, the boolean-filtered sequence is returned
///    in its existing order.
///
/// Pertinence is computed once per item and carried next to it through the
/// sort — filters are never re-evaluated during partitioning.
pub fn filter_search_items(
    candidates: impl IntoIterator<Item = Arc<CatalogItem>>,
    chosen_category: Option<&ChosenCategory>,
    chosen_filter_tags: &FxHashSet<String>,
    pertinence_filters: &[Arc<dyn PertinenceFilter>],
) -> Vec<Arc<CatalogItem>> {
    let surviving = candidates.into_iter().filter(|item| {
        matches_chosen_category(item, chosen_category) && matches_filter_tags(item, chosen_filter_tags)
    });

    if pertinence_filters.is_empty() {
        return surviving.collect();
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut scored: Vec<(f32, Arc<CatalogItem>)> = Vec::new();

    for item in surviving {
        let mut combined = 1.0_f32;
        for filter in pertinence_filters {
            combined *= filter.pertinence(&item);
            if combined == 0.0 {
                break;
            }
        }
        if combined == 0.0 {
            continue;
        }
        min = min.min(combined);
        max = max.max(combined);
        scored.push((combined, item));
    }

    partial_sort_by_value(&mut scored, |&(pertinence, _)| pertinence, min, max);

    scored.into_iter().map(|(_, item)| item).collect()
}
