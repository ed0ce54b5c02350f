//! Vectorized in-place sort and partition kernel for `i32` and `f32` slices.
//!
//! The sort is an iteration-limited quicksort built on a SIMD partition that splits whole vector
//! registers per step, finished off by an odd-even transposition network. If the quicksort runs
//! out of its limit it falls back to heapsort, so the worst case is *O*(*n* \* log(*n*)).
//!
//! The sort is unstable and does not allocate. Floats are compared with the IEEE operators and
//! `-0.0 == 0.0`. NaN compares false against everything, so a single NaN can keep the other
//! elements from being sorted as well: `[2.0, NaN, 1.0]` comes back unchanged. With any NaN in
//! the input the order of the whole output is unspecified. No element is lost or duplicated.
//!
//! The lane backend is picked once per process. AVX2 is used when the CPU has it, unless the
//! `LANESORT_BACKEND` environment variable asks for `portable`.

use core::slice;

mod heapsort;
mod oddeven;
mod partition;
mod pivot;
mod quicksort;
mod smallsort;

pub mod dispatch;
pub mod element;
pub mod error;
pub mod ffi;
pub mod lanes;

pub use dispatch::{selected_backend, Backend};
pub use element::{ElementKind, SortElement};
pub use error::{KindError, UnknownBackend};
pub use lanes::{LaneVector, Portable};

#[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
pub use lanes::avx2::{Avx2F32, Avx2I32};

/// Sorts the slice in ascending order, but might not preserve the order of equal elements.
///
/// # Examples
///
/// ```
/// let mut v = [5, 3, 3, 1, 4];
/// lanesort::sort(&mut v);
/// assert_eq!(v, [1, 3, 3, 4, 5]);
/// ```
#[inline]
pub fn sort<T: SortElement>(v: &mut [T]) {
    T::sort_on(selected_backend(), v);
}

/// Partitions the slice around the values at `pivot1` and `pivot2` and returns the band
/// boundaries `(lower, upper)`.
///
/// With `pivot1 == pivot2` the slice is split into `< pivot`, `== pivot` and `> pivot`, and
/// `v[lower..upper]` is the band equal to the pivot.
///
/// Otherwise `v[pivot1] <= v[pivot2]` is required and the bands are `v[..lower] < pivot1`,
/// `pivot1 <= v[lower..upper] < pivot2` and `v[upper..] >= pivot2`, with the pivots placed at
/// `v[lower]` and `v[upper]`. If the two pivot values are equal the middle band is empty.
///
/// # Panics
///
/// Panics if either index is out of bounds.
#[inline]
pub fn partition<T: SortElement>(v: &mut [T], pivot1: usize, pivot2: usize) -> (usize, usize) {
    check_pivots(v, pivot1, pivot2);
    T::partition_on(selected_backend(), v, pivot1, pivot2)
}

/// [`sort`] on an explicit lane backend.
///
/// # Panics
///
/// Panics if the running CPU can't execute `V`.
pub fn sort_with<V: LaneVector>(v: &mut [V::Elem]) {
    assert!(V::is_supported(), "lane backend {} is not supported", V::name());
    quicksort::fast_sort::<V>(v);
}

/// [`partition`] on an explicit lane backend.
///
/// # Panics
///
/// Panics if the running CPU can't execute `V` or if either index is out of bounds.
pub fn partition_with<V: LaneVector>(
    v: &mut [V::Elem],
    pivot1: usize,
    pivot2: usize,
) -> (usize, usize) {
    assert!(V::is_supported(), "lane backend {} is not supported", V::name());
    check_pivots(v, pivot1, pivot2);
    dispatch::partition_kernel::<V>(v, pivot1, pivot2)
}

/// Sorts `[from, to)` of an untyped array whose element kind is only known at runtime.
///
/// # Errors
///
/// Returns an error for element kinds without a kernel. Nothing is touched in that case.
///
/// # Safety
///
/// `buffer` must point to an array of `kind` elements, suitably aligned, valid for reads and
/// writes on `[from, to)` and not aliased for the duration of the call. `from <= to`.
pub unsafe fn sort_raw(
    buffer: *mut u8,
    kind: ElementKind,
    from: usize,
    to: usize,
) -> Result<(), KindError> {
    if !kind.is_supported() {
        return Err(KindError::Unsupported(kind));
    }

    debug_assert!(from <= to);
    if from == to {
        return Ok(());
    }

    // SAFETY: Forwarded caller contract.
    unsafe {
        match kind {
            ElementKind::Int32 => sort(raw_range::<i32>(buffer, from, to)),
            ElementKind::Float32 => sort(raw_range::<f32>(buffer, from, to)),
            ElementKind::Int64 | ElementKind::Float64 => return Err(KindError::Unsupported(kind)),
        }
    }

    Ok(())
}

/// [`partition`] over `[from, to)` of an untyped array. `pivot1`, `pivot2` and the returned
/// boundaries are absolute indices.
///
/// # Errors
///
/// Returns an error for element kinds without a kernel. Nothing is touched in that case.
///
/// # Safety
///
/// Same as [`sort_raw`], and both pivot indices must lie in `[from, to)`.
pub unsafe fn partition_raw(
    buffer: *mut u8,
    kind: ElementKind,
    from: usize,
    to: usize,
    pivot1: usize,
    pivot2: usize,
) -> Result<(usize, usize), KindError> {
    if !kind.is_supported() {
        return Err(KindError::Unsupported(kind));
    }

    debug_assert!(from <= pivot1 && pivot1 < to);
    debug_assert!(from <= pivot2 && pivot2 < to);

    let (p1, p2) = (pivot1 - from, pivot2 - from);

    // SAFETY: Forwarded caller contract.
    let (lower, upper) = unsafe {
        match kind {
            ElementKind::Int32 => partition(raw_range::<i32>(buffer, from, to), p1, p2),
            ElementKind::Float32 => partition(raw_range::<f32>(buffer, from, to), p1, p2),
            ElementKind::Int64 | ElementKind::Float64 => return Err(KindError::Unsupported(kind)),
        }
    };

    Ok((from + lower, from + upper))
}

unsafe fn raw_range<'a, T>(buffer: *mut u8, from: usize, to: usize) -> &'a mut [T] {
    // SAFETY: The caller guarantees `buffer` is an array of `T` valid on `[from, to)`.
    unsafe { slice::from_raw_parts_mut(buffer.cast::<T>().add(from), to - from) }
}

fn check_pivots<T>(v: &[T], pivot1: usize, pivot2: usize) {
    let len = v.len();
    assert!(
        pivot1 < len && pivot2 < len,
        "pivot indices ({pivot1}, {pivot2}) out of bounds for length {len}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_rejects_wide_kinds() {
        let mut v = [3i64, 1, 2];
        let buffer = v.as_mut_ptr().cast::<u8>();

        for kind in [ElementKind::Int64, ElementKind::Float64] {
            assert_eq!(
                unsafe { sort_raw(buffer, kind, 0, 3) },
                Err(KindError::Unsupported(kind))
            );
            assert_eq!(
                unsafe { partition_raw(buffer, kind, 0, 3, 0, 0) },
                Err(KindError::Unsupported(kind))
            );
        }

        assert_eq!(v, [3, 1, 2]);
    }

    #[test]
    fn raw_subrange() {
        let mut v = [50, 4, 2, 8, 6, -50];
        unsafe { sort_raw(v.as_mut_ptr().cast(), ElementKind::Int32, 1, 5) }.unwrap();
        assert_eq!(v, [50, 2, 4, 6, 8, -50]);

        unsafe { sort_raw(core::ptr::null_mut(), ElementKind::Float32, 0, 0) }.unwrap();
    }

    #[test]
    fn raw_dual_pivot_offsets() {
        let mut v = [-1.0f32, 7.0, 1.0, 9.0, 3.0, 5.0, -2.0];
        let (lower, upper) =
            unsafe { partition_raw(v.as_mut_ptr().cast(), ElementKind::Float32, 1, 6, 2, 5) }
                .unwrap();

        // Interior [7, 1, 9, 3, 5] around 1.0 and 5.0.
        assert_eq!((lower, upper), (1, 3));
        assert_eq!(v[lower], 1.0);
        assert_eq!(v[upper], 5.0);
        assert_eq!(v[2], 3.0);
        assert!(v[4..6].iter().all(|&x| x >= 5.0));
        assert_eq!((v[0], v[6]), (-1.0, -2.0));
    }

    #[test]
    fn nan_blocks_ordering() {
        let mut v = [2.0f32, f32::NAN, 1.0];
        sort(&mut v);
        assert_eq!(v[0], 2.0);
        assert!(v[1].is_nan());
        assert_eq!(v[2], 1.0);

        let mut v: Vec<f32> = (0..500).map(|i| ((i * 37) % 101) as f32).collect();
        v[123] = f32::NAN;
        v[321] = f32::NAN;
        let mut expected: Vec<u32> = v.iter().map(|x| x.to_bits()).collect();
        sort(&mut v);
        let mut got: Vec<u32> = v.iter().map(|x| x.to_bits()).collect();
        expected.sort_unstable();
        got.sort_unstable();
        assert_eq!(got, expected);
    }
}
