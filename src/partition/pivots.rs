//! Partition-only entry points.
//!
//! These serve a caller that runs its own three-way or dual-pivot quicksort and only wants the
//! band boundaries. Nothing is sorted beyond the partitioning itself.

use crate::lanes::LaneVector;
use crate::partition::partition_pass;

/// Partitions `v` into `< pivot`, `== pivot` and `> pivot` with `pivot = v[pivot_pos]`.
///
/// Returns `(lower, upper)` so that `v[lower..upper]` is the band equal to the pivot.
#[inline(always)]
pub(crate) fn single_pivot_partition<V: LaneVector>(
    v: &mut [V::Elem],
    pivot_pos: usize,
) -> (usize, usize) {
    let pivot = v[pivot_pos];

    let lower = partition_pass::<V>(v, pivot, false);
    let upper = lower + partition_pass::<V>(&mut v[lower..], pivot, true);

    (lower, upper)
}

/// Partitions `v` into three bands around `pivot1 = v[pivot1_pos]` and `pivot2 = v[pivot2_pos]`,
/// which must satisfy `pivot1 <= pivot2`.
///
/// Returns `(lower, upper)` with `v[..lower] < pivot1`, `pivot1 <= v[lower..upper] < pivot2` and
/// `v[upper..] >= pivot2`. The pivots themselves end up at `v[lower]` and `v[upper]`, unless the
/// two pivot values are equal, in which case the middle band is empty.
#[inline(always)]
pub(crate) fn dual_pivot_partition<V: LaneVector>(
    v: &mut [V::Elem],
    pivot1_pos: usize,
    pivot2_pos: usize,
) -> (usize, usize) {
    let pivot1 = v[pivot1_pos];
    let pivot2 = v[pivot2_pos];

    if pivot1 == pivot2 {
        // The middle band `[pivot1, pivot2)` can't hold anything.
        let boundary = partition_pass::<V>(v, pivot1, false);
        return (boundary, boundary);
    }

    debug_assert!(pivot1_pos != pivot2_pos);

    let low = 0;
    let end = v.len() - 1;
    let start = low + 1;

    // Park pivot1 in the first slot and pivot2 in the last one. If pivot2 was sitting in the first
    // slot the first swap moved it to `pivot1_pos`.
    v.swap(pivot1_pos, low);
    let pivot2_pos = if pivot2_pos == low {
        pivot1_pos
    } else {
        pivot2_pos
    };
    v.swap(pivot2_pos, end);

    let upper = start + partition_pass::<V>(&mut v[start..end], pivot2, false);
    v.swap(end, upper);

    if upper == start {
        // Everything in the interior was >= pivot2. pivot1 alone forms the middle band.
        return (low, upper);
    }

    let lower = start + partition_pass::<V>(&mut v[start..upper], pivot1, false) - 1;
    v.swap(low, lower);

    (lower, upper)
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;
    use crate::lanes::Portable;

    type P4 = Portable<i32, 4>;

    fn check_single(input: &[i32], pivot_pos: usize) {
        let pivot = input[pivot_pos];
        let mut v = input.to_vec();
        let (lower, upper) = single_pivot_partition::<P4>(&mut v, pivot_pos);

        assert!(lower < upper);
        assert!(v[..lower].iter().all(|&x| x < pivot));
        assert!(v[lower..upper].iter().all(|&x| x == pivot));
        assert!(v[upper..].iter().all(|&x| x > pivot));
    }

    fn check_dual(input: &[i32], pivot1_pos: usize, pivot2_pos: usize) {
        let pivot1 = input[pivot1_pos];
        let pivot2 = input[pivot2_pos];
        let mut v = input.to_vec();
        let (lower, upper) = dual_pivot_partition::<P4>(&mut v, pivot1_pos, pivot2_pos);

        assert!(lower <= upper && upper <= v.len(), "{lower} {upper} {input:?}");
        assert!(v[..lower].iter().all(|&x| x < pivot1), "{input:?} -> {v:?}");
        assert!(
            v[lower..upper].iter().all(|&x| pivot1 <= x && x < pivot2),
            "{input:?} -> {v:?}"
        );
        assert!(v[upper..].iter().all(|&x| x >= pivot2), "{input:?} -> {v:?}");

        if pivot1 < pivot2 {
            assert_eq!(v[lower], pivot1);
            assert_eq!(v[upper], pivot2);
        }

        let mut sorted_input = input.to_vec();
        sorted_input.sort_unstable();
        v.sort_unstable();
        assert_eq!(sorted_input, v);
    }

    #[test]
    fn single_pivot_example() {
        let input = [3, 1, 4, 1, 5, 9, 2, 6];
        let mut v = input;
        let (lower, upper) = single_pivot_partition::<P4>(&mut v, 2);
        assert_eq!((lower, upper), (4, 5));
        assert_eq!(v[4], 4);

        check_single(&input, 2);
        check_single(&input, 1);
        check_single(&input, 5);
    }

    #[test]
    fn single_pivot_all_equal() {
        let mut v = [7; 37];
        assert_eq!(single_pivot_partition::<P4>(&mut v, 11), (0, 37));
    }

    #[test]
    fn dual_pivot_random() {
        let mut rng = StdRng::seed_from_u64(99);

        for len in 2..90 {
            for _ in 0..10 {
                let input: Vec<i32> = (0..len).map(|_| rng.gen_range(0..12)).collect();
                let mut pos1 = rng.gen_range(0..len);
                let mut pos2 = rng.gen_range(0..len);
                if pos1 == pos2 {
                    continue;
                }
                if input[pos1] > input[pos2] {
                    std::mem::swap(&mut pos1, &mut pos2);
                }

                check_dual(&input, pos1, pos2);
                check_single(&input, pos1);
            }
        }
    }

    #[test]
    fn dual_pivot_edges() {
        // pivot2 in the first slot, pivot1 in the last one.
        check_dual(&[9, 5, 1, 7, 3, 8, 2], 6, 0);
        // Nothing below pivot2 in the interior.
        check_dual(&[1, 9, 9, 12, 10, 5], 0, 5);
        // Equal pivot values.
        check_dual(&[4, 2, 4, 6, 4, 1], 0, 2);
        // Two elements.
        check_dual(&[1, 2], 0, 1);
        check_dual(&[2, 1], 1, 0);
    }
}
