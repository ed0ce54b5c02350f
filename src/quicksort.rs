use crate::element::SortElement;
use crate::heapsort::heapsort;
use crate::lanes::LaneVector;
use crate::oddeven::odd_even_sort;
use crate::partition::{partition_pass, partition_range};
use crate::pivot::choose_pivot;
use crate::smallsort::insertion_sort_shift_left;

/// Ranges of at most this many elements are left to the odd-even finisher.
pub(crate) const OET_SORT_THRESHOLD: usize = 8;

/// Whole inputs of at most this many elements are insertion sorted.
pub(crate) const INS_SORT_THRESHOLD: usize = 64;

// Every entry on the stack except the top one is a right side waiting for its left sibling, and
// each level of descent spends one unit of limit. The limit never exceeds `2 * usize::BITS`.
const WORK_STACK_CAPACITY: usize = 2 * usize::BITS as usize + 2;

/// Sorts `v` in ascending order.
#[inline(always)]
pub(crate) fn fast_sort<V: LaneVector>(v: &mut [V::Elem]) {
    let len = v.len();

    if len <= INS_SORT_THRESHOLD {
        if len >= 2 {
            insertion_sort_shift_left(v, 1);
        }
        return;
    }

    // Limit the number of imbalanced partitions to `2 * floor(log2(len))`.
    let limit = 2 * len.ilog2();

    quicksort::<V>(v, limit);
    odd_even_sort::<V>(v);
}

/// Partitions `v` until every remaining unsorted run has at most `OET_SORT_THRESHOLD` elements.
///
/// `limit` is the number of partition levels allowed before a range is handed to `heapsort`, which
/// guarantees `O(n * log(n))` worst-case.
#[inline(always)]
pub(crate) fn quicksort<V: LaneVector>(v: &mut [V::Elem], limit: u32) {
    let mut stack = [(0usize, 0usize, 0u32); WORK_STACK_CAPACITY];
    let mut stack_len = 0;

    push_entry(&mut stack, &mut stack_len, (0, v.len(), limit));

    while stack_len > 0 {
        stack_len -= 1;
        let (left, right, limit) = stack[stack_len];

        if right - left <= OET_SORT_THRESHOLD {
            continue;
        }

        let range = &mut v[left..right];

        if limit == 0 {
            heapsort(range);
            continue;
        }

        let pivot = choose_pivot(range);
        let mut smallest = V::Elem::MAX_VALUE;
        let mut biggest = V::Elem::MIN_VALUE;
        let boundary = left + partition_range::<V>(range, pivot, &mut smallest, &mut biggest, false);

        // `[left, boundary)` is `< pivot`, `[boundary, right)` is `>= pivot`.
        if pivot != biggest {
            let mut right_start = boundary;

            if pivot == smallest {
                // Everything on the right equals the pivot or is larger. Split off the equal run,
                // otherwise the same pivot can be picked again and nothing shrinks.
                right_start += partition_pass::<V>(&mut v[boundary..right], pivot, true);
            }

            push_entry(&mut stack, &mut stack_len, (right_start, right, limit - 1));
        }

        // Only NaN can be left of a pivot equal to the smallest value.
        if pivot != smallest {
            push_entry(&mut stack, &mut stack_len, (left, boundary, limit - 1));
        }
    }
}

#[inline(always)]
fn push_entry(
    stack: &mut [(usize, usize, u32); WORK_STACK_CAPACITY],
    stack_len: &mut usize,
    entry: (usize, usize, u32),
) {
    debug_assert!(*stack_len < WORK_STACK_CAPACITY);
    stack[*stack_len] = entry;
    *stack_len += 1;
}
