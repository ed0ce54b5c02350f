//! In-place vectorized partition.
//!
//! One pass moves every element that fails the comparison against the pivot to the front of the
//! slice and every element that passes it to the back, using [`LaneVector::double_compress_store`]
//! to split a whole register per step. No scratch buffer is used: two registers loaded from the
//! ends of the slice are held back until the very end, which always leaves at least one register
//! worth of free slots on the side that is written next.

use crate::element::SortElement;
use crate::lanes::LaneVector;

pub(crate) mod pivots;

/// Partitions `v` around `pivot` and returns the number of elements that failed the comparison.
///
/// With `use_gt == false` an element passes if `elem >= pivot`, with `use_gt == true` if
/// `elem > pivot`. Failing elements end up in `v[..ret]`, passing ones in `v[ret..]`. NaN fails
/// both comparisons.
///
/// `smallest` and `biggest` are running accumulators. On return they hold the minimum and maximum
/// of their input value and every non-NaN element of `v`.
#[inline(always)]
pub(crate) fn partition_range<V: LaneVector>(
    v: &mut [V::Elem],
    pivot: V::Elem,
    smallest: &mut V::Elem,
    biggest: &mut V::Elem,
    use_gt: bool,
) -> usize {
    let lanes = V::LANES;
    let is_pass = |elem: V::Elem| {
        if use_gt {
            elem > pivot
        } else {
            elem >= pivot
        }
    };

    let mut left = 0;
    let mut right = v.len();

    // Shorten the slice until its length is a multiple of the lane width, partitioning the
    // skipped elements with a plain swap loop.
    for _ in 0..(right - left) % lanes {
        let elem = v[left];
        *smallest = V::Elem::lane_min(elem, *smallest);
        *biggest = V::Elem::lane_max(elem, *biggest);

        if is_pass(elem) {
            right -= 1;
            v.swap(left, right);
        } else {
            left += 1;
        }
    }

    if left == right {
        // Fewer than `lanes` elements in the slice.
        return left;
    }

    let arr = v.as_mut_ptr();
    let pivot_vec = V::set1(pivot);
    let mut min_vec = V::set1(*smallest);
    let mut max_vec = V::set1(*biggest);

    // SAFETY: All loads and stores below stay inside `v[left..right]`, see the inline comments.
    // From here on `v` is only accessed through `arr`.
    unsafe {
        if right - left == lanes {
            // The register is loaded before the store, both sides write into the slots it was
            // loaded from.
            let vec = V::loadu(arr.add(left));
            let amount_pass = partition_vec::<V>(
                arr.add(left),
                arr.add(left),
                vec,
                pivot_vec,
                &mut min_vec,
                &mut max_vec,
                use_gt,
            );

            *smallest = V::reduce_min(min_vec);
            *biggest = V::reduce_max(max_vec);

            return left + (lanes - amount_pass);
        }

        // The first and last register are partitioned at the end.
        let vec_left = V::loadu(arr.add(left));
        let vec_right = V::loadu(arr.add(right - lanes));

        // Everything in `[l_store_start, l_store)` failed, everything in
        // `[l_store + unpartitioned + lanes, right_start)` passed. The free slots are
        // `[l_store, left)` and `[right, l_store + unpartitioned + lanes)`, together always two
        // registers wide before a load.
        let mut unpartitioned = right - left - lanes;
        let mut l_store = left;

        left += lanes;
        right -= lanes;

        while right != left {
            // Load from the side with fewer free slots, so both sides have at least `lanes`
            // free slots for the store that follows.
            let free_right = (l_store + unpartitioned + lanes) - right;
            let free_left = left - l_store;

            let curr_vec = if free_right < free_left {
                right -= lanes;
                V::loadu(arr.add(right))
            } else {
                let vec = V::loadu(arr.add(left));
                left += lanes;
                vec
            };

            let amount_pass = partition_vec::<V>(
                arr.add(l_store),
                arr.add(l_store + unpartitioned),
                curr_vec,
                pivot_vec,
                &mut min_vec,
                &mut max_vec,
                use_gt,
            );
            l_store += lanes - amount_pass;
            unpartitioned -= lanes;
        }

        debug_assert_eq!(unpartitioned, lanes);

        let amount_pass = partition_vec::<V>(
            arr.add(l_store),
            arr.add(l_store + unpartitioned),
            vec_left,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
            use_gt,
        );
        l_store += lanes - amount_pass;
        unpartitioned -= lanes;

        let amount_pass = partition_vec::<V>(
            arr.add(l_store),
            arr.add(l_store + unpartitioned),
            vec_right,
            pivot_vec,
            &mut min_vec,
            &mut max_vec,
            use_gt,
        );
        l_store += lanes - amount_pass;

        *smallest = V::reduce_min(min_vec);
        *biggest = V::reduce_max(max_vec);

        l_store
    }
}

/// Single partition pass with fresh min/max accumulators, returns the boundary.
#[inline(always)]
pub(crate) fn partition_pass<V: LaneVector>(
    v: &mut [V::Elem],
    pivot: V::Elem,
    use_gt: bool,
) -> usize {
    let mut smallest = V::Elem::MAX_VALUE;
    let mut biggest = V::Elem::MIN_VALUE;

    partition_range::<V>(v, pivot, &mut smallest, &mut biggest, use_gt)
}

/// Compares one register against the pivot and splits it to `l_store` and `r_store`.
///
/// Returns the number of lanes that passed the comparison.
#[inline(always)]
unsafe fn partition_vec<V: LaneVector>(
    l_store: *mut V::Elem,
    r_store: *mut V::Elem,
    curr_vec: V::Reg,
    pivot_vec: V::Reg,
    min_vec: &mut V::Reg,
    max_vec: &mut V::Reg,
    use_gt: bool,
) -> usize {
    let mask = if use_gt {
        V::gt(curr_vec, pivot_vec)
    } else {
        V::ge(curr_vec, pivot_vec)
    };

    // SAFETY: The caller guarantees `l_store` has room for the failing lanes and
    // `r_store[LANES - amount_pass..LANES]` for the passing ones.
    let amount_pass = unsafe { V::double_compress_store(l_store, r_store, mask, curr_vec) };

    *min_vec = V::min(curr_vec, *min_vec);
    *max_vec = V::max(curr_vec, *max_vec);

    amount_pass
}
