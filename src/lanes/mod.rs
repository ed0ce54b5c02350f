//! Fixed-width vector registers with predicate masks.
//!
//! The partition and finisher code is written only against [`LaneVector`]. A backend describes
//! one register width over one element kind, e.g. eight `i32` lanes in an AVX2 register, or `W`
//! lanes of a plain array for the portable fallback.

use crate::element::SortElement;

#[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
pub mod avx2;
pub mod portable;

pub use portable::Portable;

/// Lane width used by the portable backend when no hardware backend is selected.
pub const PORTABLE_LANES: usize = 4;

/// One vector register of `LANES` elements of `Elem`, and the operations the kernel needs on it.
///
/// Every operation is a pure function of its register and mask inputs, except the stores. The
/// stores write exactly the elements implied by their mask or count and nothing else.
///
/// # Safety
///
/// Implementors must uphold the store discipline above. The sort and partition code relies on it
/// to keep the array a permutation of its input while it overwrites slots in place.
pub unsafe trait LaneVector {
    type Elem: SortElement;
    type Reg: Copy;
    type Mask: Copy;

    const LANES: usize;

    /// Short name used in logs and test output.
    fn name() -> &'static str;

    /// Whether the running CPU can execute this backend.
    fn is_supported() -> bool;

    fn set1(value: Self::Elem) -> Self::Reg;

    /// # Safety
    /// `src` must be valid for reading `LANES` elements.
    unsafe fn loadu(src: *const Self::Elem) -> Self::Reg;

    /// # Safety
    /// `dst` must be valid for writing `LANES` elements.
    unsafe fn storeu(dst: *mut Self::Elem, reg: Self::Reg);

    /// Selected lanes are loaded from `src`, the others keep the value of `existing`.
    ///
    /// # Safety
    /// `src + i` must be valid for reading for every selected lane `i`.
    unsafe fn mask_loadu(existing: Self::Reg, mask: Self::Mask, src: *const Self::Elem)
        -> Self::Reg;

    /// # Safety
    /// `dst + i` must be valid for writing for every selected lane `i`.
    unsafe fn mask_storeu(dst: *mut Self::Elem, mask: Self::Mask, reg: Self::Reg);

    /// Writes the selected lanes, compacted and in lane order, to the front of `dst`. Returns the
    /// number of lanes written.
    ///
    /// # Safety
    /// `dst` must be valid for writing `popcount(mask)` elements.
    unsafe fn mask_compress_storeu(dst: *mut Self::Elem, mask: Self::Mask, reg: Self::Reg)
        -> usize;

    /// Splits one register to both sides of a partition boundary.
    ///
    /// Lanes not selected by `mask` are compacted to `left_dst[0..LANES - n]`, selected lanes are
    /// compacted to `right_dst[LANES - n..LANES]`, where `n` is the number of selected lanes. Returns
    /// `n`.
    ///
    /// # Safety
    /// `left_dst` must be valid for writing `LANES - n` elements and `right_dst` for writing the
    /// range `LANES - n..LANES`. The two written ranges may be adjacent but must not overlap.
    unsafe fn double_compress_store(
        left_dst: *mut Self::Elem,
        right_dst: *mut Self::Elem,
        mask: Self::Mask,
        reg: Self::Reg,
    ) -> usize;

    /// Lane-wise `a >= b`.
    fn ge(a: Self::Reg, b: Self::Reg) -> Self::Mask;

    /// Lane-wise `a > b`.
    fn gt(a: Self::Reg, b: Self::Reg) -> Self::Mask;

    fn knot(mask: Self::Mask) -> Self::Mask;

    /// Mask with the first `n` lanes set, `n` is clamped to `LANES`.
    fn first_n(n: usize) -> Self::Mask;

    fn count_ones(mask: Self::Mask) -> usize;

    /// Lane-wise [`SortElement::lane_min`].
    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise [`SortElement::lane_max`].
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    fn reduce_min(reg: Self::Reg) -> Self::Elem;

    fn reduce_max(reg: Self::Reg) -> Self::Elem;

    /// One compare-exchange step over `count` interleaved pairs.
    ///
    /// For each `k < count` the pair `(ptr[2k], ptr[2k + 1])` is rewritten as `(small, large)`,
    /// where `a < b` decides which is which. A pair that does not compare less is swapped, so the
    /// pair stays a permutation of its inputs even for NaN.
    ///
    /// # Safety
    /// `count <= LANES` and `ptr` must be valid for reading and writing `2 * count` elements.
    unsafe fn odd_even_sort_pairs(ptr: *mut Self::Elem, count: usize);
}
