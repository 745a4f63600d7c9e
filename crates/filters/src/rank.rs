//! Approximate partial sort for relevance ordering
//!
//! Orders a slice by a numeric value from highest to lowest, approximately,
//! in expected linear time. The trade is deliberate: for UI-facing relevance
//! ordering over thousands of candidates, "best items clearly first, filler
//! roughly ranked" is indistinguishable from an exact sort and much cheaper.
//!
//! # Algorithm
//!
//! Quickselect-style, single array, in place. Each pass partitions the
//! active front region `[0, index_max]` around a pivot value interpolated
//! between the known min and max, Hoare-style, so that values ≥ pivot end up
//! first. The region then shrinks to the ≥-pivot side and the pivot fraction
//! halves (0.5, 0.25, 0.125, … down to 1/128), raising the bar toward the
//! maximum. The result is banded: the further back, the coarser the band.
//!
//! # Complexity
//!
//! O(n) expected. O(n²) worst case when all (or a large contiguous run of)
//! values are identical — a documented, accepted property of this primitive.
//! Do not replace it with a stable sort: that regresses the common case of
//! thousands of near-unique relevance scores.

/// Smallest pivot fraction; passes stop once the fraction halves below this
const MIN_PIVOT_FRACTION: f32 = 1.0 / 128.0;

/// Approximately order `items` by `value`, highest first, in place
///
/// `min` and `max` are the known value bounds across the whole slice.
/// When `min >= max` every value is equal and the slice is left untouched
/// (order-preserving identity on degenerate input).
///
/// Ties and near-ties among low-value items are not further ordered.
pub fn partial_sort_by_value<T>(
    items: &mut [T],
    value: impl Fn(&T) -> f32,
    min: f32,
    max: f32,
) {
    if items.len() < 2 || min >= max {
        return;
    }

    let mut index_max = items.len() - 1;
    let mut fraction = 0.5_f32;

    while fraction >= MIN_PIVOT_FRACTION {
        let pivot = min + (max - min) * (1.0 - fraction);

        // Hoare-style two-pointer partition of [0, index_max]:
        // values >= pivot to the front.
        let mut i = 0;
        let mut j = index_max;
        loop {
            while i <= index_max && value(&items[i]) >= pivot {
                i += 1;
            }
            while j > i && value(&items[j]) < pivot {
                j -= 1;
            }
            if i >= j {
                break;
            }
            items.swap(i, j);
            i += 1;
            j -= 1;
        }

        // [0, i) now holds every value >= pivot.
        if i == 0 {
            // Nothing clears the pivot: the front region is settled.
            break;
        }
        index_max = i - 1;
        if index_max == 0 {
            break;
        }
        fraction /= 2.0;
    }
}
