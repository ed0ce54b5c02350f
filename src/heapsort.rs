use crate::element::SortElement;

/// Sorts `v` using heapsort, which is *O*(*n* \* log(*n*)) worst-case.
///
/// Only used when the quicksort loop ran out of its iteration limit.
#[inline(never)]
pub(crate) fn heapsort<T: SortElement>(v: &mut [T]) {
    let len = v.len();

    // Build the heap in the first `len / 2` iterations, then pop the maximum to the back.
    for i in (0..len + len / 2).rev() {
        let sift_idx = if i >= len {
            i - len
        } else {
            v.swap(0, i);
            0
        };

        sift_down(&mut v[..len.min(i)], sift_idx);
    }
}

// This binary heap respects the invariant `parent >= child`.
fn sift_down<T: SortElement>(v: &mut [T], mut node: usize) {
    let len = v.len();

    loop {
        // Children of `node`.
        let mut child = 2 * node + 1;
        if child >= len {
            break;
        }

        // Choose the greater child.
        if child + 1 < len && v[child] < v[child + 1] {
            child += 1;
        }

        // Stop if the invariant holds at `node`.
        if !(v[node] < v[child]) {
            break;
        }

        v.swap(node, child);
        node = child;
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn sorts_random() {
        let mut rng = StdRng::seed_from_u64(3);

        for len in [0, 1, 2, 3, 10, 64, 65, 1_000] {
            let mut v: Vec<i32> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
            let mut expected = v.clone();
            expected.sort_unstable();

            heapsort(&mut v);
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn keeps_nan() {
        let mut v = [3.0, f32::NAN, -1.0, 2.0, f32::NAN];
        heapsort(&mut v);
        assert_eq!(v.iter().filter(|x| x.is_nan()).count(), 2);
    }
}
