use crate::element::SortElement;

/// Slices shorter than this use their first element as pivot.
pub(crate) const PIVOT_SAMPLE_THRESHOLD: usize = 64;

/// Chooses a pivot value for `v`, which must not be empty.
///
/// Short slices take the first element. Longer ones take the median of the first, middle and last
/// element. This is deterministic and O(1), it does not defend against adversarial inputs, the
/// iteration limit in the quicksort loop does.
#[inline]
pub(crate) fn choose_pivot<T: SortElement>(v: &[T]) -> T {
    let len = v.len();

    if len < PIVOT_SAMPLE_THRESHOLD {
        return v[0];
    }

    let first = v[0];
    let mid = v[len / 2];
    let last = v[len - 1];

    if mid > first {
        if first > last {
            first
        } else if mid > last {
            last
        } else {
            mid
        }
    } else if mid > last {
        mid
    } else if first > last {
        last
    } else {
        // Three equal keys return the first one, which keeps the pivot from moving around
        // needlessly on runs of equal values.
        first
    }
}
