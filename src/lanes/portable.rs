use core::marker::PhantomData;
use core::ptr;

use crate::element::SortElement;
use crate::lanes::LaneVector;

/// Array-backed lanes, `W` elements of `T` per register.
///
/// Works on every target and for every `W >= 1`. `Portable<T, 1>` degenerates to a scalar
/// partition, which makes it useful as a reference when testing the vector paths.
pub struct Portable<T, const W: usize> {
    _marker: PhantomData<T>,
}

impl<T: SortElement, const W: usize> Portable<T, W> {
    const NON_ZERO_LANES: usize = {
        assert!(W > 0, "lane width must be at least 1");
        W
    };
}

// SAFETY: Every store below writes exactly the lanes implied by its mask or count.
unsafe impl<T: SortElement, const W: usize> LaneVector for Portable<T, W> {
    type Elem = T;
    type Reg = [T; W];
    type Mask = [bool; W];

    const LANES: usize = Self::NON_ZERO_LANES;

    fn name() -> &'static str {
        "portable"
    }

    fn is_supported() -> bool {
        true
    }

    #[inline(always)]
    fn set1(value: T) -> [T; W] {
        [value; W]
    }

    #[inline(always)]
    unsafe fn loadu(src: *const T) -> [T; W] {
        // SAFETY: The caller guarantees `src` is valid for `W` reads. `[T; W]` has the alignment
        // of `T`, so reading through an unaligned pointer is avoided by `read_unaligned`.
        unsafe { ptr::read_unaligned(src as *const [T; W]) }
    }

    #[inline(always)]
    unsafe fn storeu(dst: *mut T, reg: [T; W]) {
        // SAFETY: See `loadu`.
        unsafe { ptr::write_unaligned(dst as *mut [T; W], reg) }
    }

    #[inline(always)]
    unsafe fn mask_loadu(existing: [T; W], mask: [bool; W], src: *const T) -> [T; W] {
        let mut out = existing;
        for i in 0..W {
            if mask[i] {
                // SAFETY: The caller guarantees selected lanes are readable.
                out[i] = unsafe { *src.add(i) };
            }
        }

        out
    }

    #[inline(always)]
    unsafe fn mask_storeu(dst: *mut T, mask: [bool; W], reg: [T; W]) {
        for i in 0..W {
            if mask[i] {
                // SAFETY: The caller guarantees selected lanes are writable.
                unsafe { dst.add(i).write(reg[i]) };
            }
        }
    }

    #[inline(always)]
    unsafe fn mask_compress_storeu(dst: *mut T, mask: [bool; W], reg: [T; W]) -> usize {
        let mut written = 0;
        for i in 0..W {
            if mask[i] {
                // SAFETY: `written < popcount(mask)`, which the caller guarantees is writable.
                unsafe { dst.add(written).write(reg[i]) };
                written += 1;
            }
        }

        written
    }

    #[inline(always)]
    unsafe fn double_compress_store(
        left_dst: *mut T,
        right_dst: *mut T,
        mask: [bool; W],
        reg: [T; W],
    ) -> usize {
        let amount_pass = Self::count_ones(mask);
        let amount_fail = W - amount_pass;

        // Read everything before writing, the destinations may overlap the source memory the
        // register was loaded from.
        let mut l = 0;
        let mut r = amount_fail;
        for i in 0..W {
            // SAFETY: `l < amount_fail` and `amount_fail <= r < W`, both ranges are writable per
            // the caller contract.
            unsafe {
                if mask[i] {
                    right_dst.add(r).write(reg[i]);
                    r += 1;
                } else {
                    left_dst.add(l).write(reg[i]);
                    l += 1;
                }
            }
        }

        amount_pass
    }

    #[inline(always)]
    fn ge(a: [T; W], b: [T; W]) -> [bool; W] {
        core::array::from_fn(|i| a[i] >= b[i])
    }

    #[inline(always)]
    fn gt(a: [T; W], b: [T; W]) -> [bool; W] {
        core::array::from_fn(|i| a[i] > b[i])
    }

    #[inline(always)]
    fn knot(mask: [bool; W]) -> [bool; W] {
        mask.map(|m| !m)
    }

    #[inline(always)]
    fn first_n(n: usize) -> [bool; W] {
        core::array::from_fn(|i| i < n)
    }

    #[inline(always)]
    fn count_ones(mask: [bool; W]) -> usize {
        mask.iter().filter(|&&m| m).count()
    }

    #[inline(always)]
    fn min(a: [T; W], b: [T; W]) -> [T; W] {
        core::array::from_fn(|i| T::lane_min(a[i], b[i]))
    }

    #[inline(always)]
    fn max(a: [T; W], b: [T; W]) -> [T; W] {
        core::array::from_fn(|i| T::lane_max(a[i], b[i]))
    }

    #[inline(always)]
    fn reduce_min(reg: [T; W]) -> T {
        reg[1..].iter().fold(reg[0], |acc, &x| T::lane_min(x, acc))
    }

    #[inline(always)]
    fn reduce_max(reg: [T; W]) -> T {
        reg[1..].iter().fold(reg[0], |acc, &x| T::lane_max(x, acc))
    }

    #[inline(always)]
    unsafe fn odd_even_sort_pairs(ptr: *mut T, count: usize) {
        debug_assert!(count <= W);

        for k in 0..count {
            // SAFETY: The caller guarantees `2 * count` elements are readable and writable.
            unsafe {
                let a_ptr = ptr.add(2 * k);
                let b_ptr = ptr.add(2 * k + 1);
                let a = *a_ptr;
                let b = *b_ptr;
                let is_lt = a < b;
                a_ptr.write(if is_lt { a } else { b });
                b_ptr.write(if is_lt { b } else { a });
            }
        }
    }
}
