use crate::lanes::LaneVector;
use crate::quicksort::OET_SORT_THRESHOLD;

/// Runs `OET_SORT_THRESHOLD + 1` rounds of odd-even transposition over `v`.
///
/// This fully sorts any run of at most `OET_SORT_THRESHOLD` elements whose values are bounded by
/// its neighbors, which is exactly what the quicksort loop leaves behind. It does not sort
/// arbitrary input.
#[inline(always)]
pub(crate) fn odd_even_sort<V: LaneVector>(v: &mut [V::Elem]) {
    let len = v.len();
    let chunk_len = 2 * V::LANES;
    let arr = v.as_mut_ptr();

    for round in 0..=OET_SORT_THRESHOLD {
        let mut j = round % 2;
        let mut remaining = len.saturating_sub(j);

        while remaining >= 2 {
            let vals = remaining.min(chunk_len);

            // SAFETY: `j + vals <= len`, and `vals / 2 <= LANES` pairs touch `2 * (vals / 2)`
            // elements starting at `j`.
            unsafe { V::odd_even_sort_pairs(arr.add(j), vals / 2) };

            j += vals;
            remaining -= vals;
        }
    }
}
