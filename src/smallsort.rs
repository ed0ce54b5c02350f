use crate::element::SortElement;

/// Sorts `v` using insertion sort, assuming `v[..offset]` is already sorted.
///
/// Used for whole inputs that are too short to be worth vectorizing.
pub(crate) fn insertion_sort_shift_left<T: SortElement>(v: &mut [T], offset: usize) {
    let len = v.len();

    // Using assert here improves performance.
    assert!(offset != 0 && offset <= len);

    for i in offset..len {
        // SAFETY: `j` is in `1..=i` whenever it is read, and `i < len`.
        unsafe {
            let tmp = *v.get_unchecked(i);
            let mut j = i;

            while j > 0 && tmp < *v.get_unchecked(j - 1) {
                *v.get_unchecked_mut(j) = *v.get_unchecked(j - 1);
                j -= 1;
            }

            *v.get_unchecked_mut(j) = tmp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_small() {
        let mut v = [5, 3, 3, 1, 4];
        insertion_sort_shift_left(&mut v, 1);
        assert_eq!(v, [1, 3, 3, 4, 5]);

        let mut v = [1.0, 2.0, 7.5, -1.0, 0.0];
        insertion_sort_shift_left(&mut v, 3);
        assert_eq!(v, [-1.0, 0.0, 1.0, 2.0, 7.5]);
    }
}
