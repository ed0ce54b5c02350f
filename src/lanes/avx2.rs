//! AVX2 lanes, eight 32-bit elements per register.
//!
//! AVX2 has no compress instruction. Compaction is done by permuting the register with an index
//! vector looked up by the 8-bit movemask, and stores are made exact with `maskstore`, so no lane
//! outside the requested count is ever written.
//!
//! The methods are `#[inline(always)]` without `#[target_feature]`. They are meant to be inlined
//! into the `#[target_feature(enable = "avx2")]` entry points in `dispatch`, which is where the
//! intrinsics get their code-gen.

use core::arch::x86_64::*;

use crate::lanes::LaneVector;

const LANES: usize = 8;

/// `PERM_TABLE[mask]` lists the lanes with a clear bit in `mask` first, then the lanes with a
/// set bit, each group in ascending lane order.
static PERM_TABLE: [[i32; LANES]; 256] = build_perm_table();

const fn build_perm_table() -> [[i32; LANES]; 256] {
    let mut table = [[0i32; LANES]; 256];

    let mut mask = 0;
    while mask < 256 {
        let mut out = 0;

        let mut lane = 0;
        while lane < LANES {
            if mask & (1 << lane) == 0 {
                table[mask][out] = lane as i32;
                out += 1;
            }
            lane += 1;
        }

        lane = 0;
        while lane < LANES {
            if mask & (1 << lane) != 0 {
                table[mask][out] = lane as i32;
                out += 1;
            }
            lane += 1;
        }

        mask += 1;
    }

    table
}

#[inline(always)]
unsafe fn perm_indices(bits: usize) -> __m256i {
    // SAFETY: `bits < 256` and each table row is exactly one 256-bit vector.
    unsafe { _mm256_loadu_si256(PERM_TABLE.get_unchecked(bits).as_ptr() as *const __m256i) }
}

#[inline(always)]
fn mask_bits(mask: __m256i) -> usize {
    // SAFETY: Only reached from code that runs with AVX2 enabled, see module docs.
    unsafe { _mm256_movemask_ps(_mm256_castsi256_ps(mask)) as u8 as usize }
}

#[inline(always)]
fn first_n_mask(n: usize) -> __m256i {
    let n = n.min(LANES) as i32;
    // SAFETY: See `mask_bits`.
    unsafe {
        let iota = _mm256_setr_epi32(0, 1, 2, 3, 4, 5, 6, 7);
        _mm256_cmpgt_epi32(_mm256_set1_epi32(n), iota)
    }
}

#[inline(always)]
fn not_mask(mask: __m256i) -> __m256i {
    // SAFETY: See `mask_bits`.
    unsafe { _mm256_xor_si256(mask, _mm256_set1_epi32(-1)) }
}

/// Splits `[x0, y0, x1, y1, .., x7, y7]` held in `lo`/`hi` into `(x, y)`.
#[inline(always)]
unsafe fn deinterleave(lo: __m256i, hi: __m256i) -> (__m256i, __m256i) {
    unsafe {
        let idx = _mm256_setr_epi32(0, 2, 4, 6, 1, 3, 5, 7);
        let lo = _mm256_permutevar8x32_epi32(lo, idx);
        let hi = _mm256_permutevar8x32_epi32(hi, idx);
        (
            _mm256_permute2x128_si256(lo, hi, 0x20),
            _mm256_permute2x128_si256(lo, hi, 0x31),
        )
    }
}

/// Inverse of [`deinterleave`].
#[inline(always)]
unsafe fn interleave(x: __m256i, y: __m256i) -> (__m256i, __m256i) {
    unsafe {
        let idx = _mm256_setr_epi32(0, 4, 1, 5, 2, 6, 3, 7);
        let lo = _mm256_permute2x128_si256(x, y, 0x20);
        let hi = _mm256_permute2x128_si256(x, y, 0x31);
        (
            _mm256_permutevar8x32_epi32(lo, idx),
            _mm256_permutevar8x32_epi32(hi, idx),
        )
    }
}

/// Masks for the `2 * count` elements touched by an odd-even step, split over two registers.
#[inline(always)]
fn pair_masks(count: usize) -> (__m256i, __m256i) {
    let total = 2 * count;
    (
        first_n_mask(total),
        first_n_mask(total.saturating_sub(LANES)),
    )
}

pub struct Avx2I32;

// SAFETY: Stores go through `maskstore` with masks derived from the exact counts.
unsafe impl LaneVector for Avx2I32 {
    type Elem = i32;
    type Reg = __m256i;
    type Mask = __m256i;

    const LANES: usize = LANES;

    fn name() -> &'static str {
        "avx2"
    }

    fn is_supported() -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline(always)]
    fn set1(value: i32) -> __m256i {
        unsafe { _mm256_set1_epi32(value) }
    }

    #[inline(always)]
    unsafe fn loadu(src: *const i32) -> __m256i {
        unsafe { _mm256_loadu_si256(src as *const __m256i) }
    }

    #[inline(always)]
    unsafe fn storeu(dst: *mut i32, reg: __m256i) {
        unsafe { _mm256_storeu_si256(dst as *mut __m256i, reg) }
    }

    #[inline(always)]
    unsafe fn mask_loadu(existing: __m256i, mask: __m256i, src: *const i32) -> __m256i {
        unsafe {
            let loaded = _mm256_maskload_epi32(src, mask);
            _mm256_blendv_epi8(existing, loaded, mask)
        }
    }

    #[inline(always)]
    unsafe fn mask_storeu(dst: *mut i32, mask: __m256i, reg: __m256i) {
        unsafe { _mm256_maskstore_epi32(dst, mask, reg) }
    }

    #[inline(always)]
    unsafe fn mask_compress_storeu(dst: *mut i32, mask: __m256i, reg: __m256i) -> usize {
        let bits = mask_bits(mask);
        let amount = bits.count_ones() as usize;
        unsafe {
            // Selected lanes first, which is the table row of the inverted mask.
            let compressed = _mm256_permutevar8x32_epi32(reg, perm_indices(!bits & 0xFF));
            _mm256_maskstore_epi32(dst, first_n_mask(amount), compressed);
        }

        amount
    }

    #[inline(always)]
    unsafe fn double_compress_store(
        left_dst: *mut i32,
        right_dst: *mut i32,
        mask: __m256i,
        reg: __m256i,
    ) -> usize {
        let bits = mask_bits(mask);
        let amount_pass = bits.count_ones() as usize;
        let amount_fail = LANES - amount_pass;

        unsafe {
            let partitioned = _mm256_permutevar8x32_epi32(reg, perm_indices(bits));
            let left_mask = first_n_mask(amount_fail);
            _mm256_maskstore_epi32(left_dst, left_mask, partitioned);
            _mm256_maskstore_epi32(right_dst, not_mask(left_mask), partitioned);
        }

        amount_pass
    }

    #[inline(always)]
    fn ge(a: __m256i, b: __m256i) -> __m256i {
        // a >= b <=> !(b > a)
        not_mask(unsafe { _mm256_cmpgt_epi32(b, a) })
    }

    #[inline(always)]
    fn gt(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_cmpgt_epi32(a, b) }
    }

    #[inline(always)]
    fn knot(mask: __m256i) -> __m256i {
        not_mask(mask)
    }

    #[inline(always)]
    fn first_n(n: usize) -> __m256i {
        first_n_mask(n)
    }

    #[inline(always)]
    fn count_ones(mask: __m256i) -> usize {
        mask_bits(mask).count_ones() as usize
    }

    #[inline(always)]
    fn min(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_min_epi32(a, b) }
    }

    #[inline(always)]
    fn max(a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_max_epi32(a, b) }
    }

    #[inline(always)]
    fn reduce_min(reg: __m256i) -> i32 {
        unsafe {
            let m = _mm_min_epi32(
                _mm256_castsi256_si128(reg),
                _mm256_extracti128_si256(reg, 1),
            );
            let m = _mm_min_epi32(m, _mm_shuffle_epi32(m, 0b01_00_11_10));
            let m = _mm_min_epi32(m, _mm_shuffle_epi32(m, 0b10_11_00_01));
            _mm_cvtsi128_si32(m)
        }
    }

    #[inline(always)]
    fn reduce_max(reg: __m256i) -> i32 {
        unsafe {
            let m = _mm_max_epi32(
                _mm256_castsi256_si128(reg),
                _mm256_extracti128_si256(reg, 1),
            );
            let m = _mm_max_epi32(m, _mm_shuffle_epi32(m, 0b01_00_11_10));
            let m = _mm_max_epi32(m, _mm_shuffle_epi32(m, 0b10_11_00_01));
            _mm_cvtsi128_si32(m)
        }
    }

    #[inline(always)]
    unsafe fn odd_even_sort_pairs(ptr: *mut i32, count: usize) {
        debug_assert!(count <= LANES);

        let (lo_mask, hi_mask) = pair_masks(count);
        // `wrapping_add` because the upper half may lie past the end of the allocation when
        // `count <= 4`, in which case `hi_mask` is empty and nothing is read or written there.
        let hi_ptr = ptr.wrapping_add(LANES);

        unsafe {
            let lo = _mm256_maskload_epi32(ptr, lo_mask);
            let hi = _mm256_maskload_epi32(hi_ptr, hi_mask);

            let (a, b) = deinterleave(lo, hi);
            let is_lt = _mm256_cmpgt_epi32(b, a);
            let small = _mm256_blendv_epi8(b, a, is_lt);
            let large = _mm256_blendv_epi8(a, b, is_lt);
            let (lo, hi) = interleave(small, large);

            _mm256_maskstore_epi32(ptr, lo_mask, lo);
            _mm256_maskstore_epi32(hi_ptr, hi_mask, hi);
        }
    }
}

pub struct Avx2F32;

// SAFETY: Same store discipline as `Avx2I32`.
unsafe impl LaneVector for Avx2F32 {
    type Elem = f32;
    type Reg = __m256;
    type Mask = __m256i;

    const LANES: usize = LANES;

    fn name() -> &'static str {
        "avx2"
    }

    fn is_supported() -> bool {
        is_x86_feature_detected!("avx2")
    }

    #[inline(always)]
    fn set1(value: f32) -> __m256 {
        unsafe { _mm256_set1_ps(value) }
    }

    #[inline(always)]
    unsafe fn loadu(src: *const f32) -> __m256 {
        unsafe { _mm256_loadu_ps(src) }
    }

    #[inline(always)]
    unsafe fn storeu(dst: *mut f32, reg: __m256) {
        unsafe { _mm256_storeu_ps(dst, reg) }
    }

    #[inline(always)]
    unsafe fn mask_loadu(existing: __m256, mask: __m256i, src: *const f32) -> __m256 {
        unsafe {
            let loaded = _mm256_maskload_ps(src, mask);
            _mm256_blendv_ps(existing, loaded, _mm256_castsi256_ps(mask))
        }
    }

    #[inline(always)]
    unsafe fn mask_storeu(dst: *mut f32, mask: __m256i, reg: __m256) {
        unsafe { _mm256_maskstore_ps(dst, mask, reg) }
    }

    #[inline(always)]
    unsafe fn mask_compress_storeu(dst: *mut f32, mask: __m256i, reg: __m256) -> usize {
        let bits = mask_bits(mask);
        let amount = bits.count_ones() as usize;
        unsafe {
            let compressed = _mm256_permutevar8x32_ps(reg, perm_indices(!bits & 0xFF));
            _mm256_maskstore_ps(dst, first_n_mask(amount), compressed);
        }

        amount
    }

    #[inline(always)]
    unsafe fn double_compress_store(
        left_dst: *mut f32,
        right_dst: *mut f32,
        mask: __m256i,
        reg: __m256,
    ) -> usize {
        let bits = mask_bits(mask);
        let amount_pass = bits.count_ones() as usize;
        let amount_fail = LANES - amount_pass;

        unsafe {
            let partitioned = _mm256_permutevar8x32_ps(reg, perm_indices(bits));
            let left_mask = first_n_mask(amount_fail);
            _mm256_maskstore_ps(left_dst, left_mask, partitioned);
            _mm256_maskstore_ps(right_dst, not_mask(left_mask), partitioned);
        }

        amount_pass
    }

    #[inline(always)]
    fn ge(a: __m256, b: __m256) -> __m256i {
        unsafe { _mm256_castps_si256(_mm256_cmp_ps(a, b, _CMP_GE_OQ)) }
    }

    #[inline(always)]
    fn gt(a: __m256, b: __m256) -> __m256i {
        unsafe { _mm256_castps_si256(_mm256_cmp_ps(a, b, _CMP_GT_OQ)) }
    }

    #[inline(always)]
    fn knot(mask: __m256i) -> __m256i {
        not_mask(mask)
    }

    #[inline(always)]
    fn first_n(n: usize) -> __m256i {
        first_n_mask(n)
    }

    #[inline(always)]
    fn count_ones(mask: __m256i) -> usize {
        mask_bits(mask).count_ones() as usize
    }

    // `_mm256_min_ps(a, b)` is `a < b ? a : b`, which is exactly `lane_min`.
    #[inline(always)]
    fn min(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m256, b: __m256) -> __m256 {
        unsafe { _mm256_max_ps(a, b) }
    }

    #[inline(always)]
    fn reduce_min(reg: __m256) -> f32 {
        unsafe {
            let m = _mm_min_ps(_mm256_castps256_ps128(reg), _mm256_extractf128_ps(reg, 1));
            let m = _mm_min_ps(m, _mm_movehl_ps(m, m));
            let m = _mm_min_ss(m, _mm_shuffle_ps(m, m, 0b01));
            _mm_cvtss_f32(m)
        }
    }

    #[inline(always)]
    fn reduce_max(reg: __m256) -> f32 {
        unsafe {
            let m = _mm_max_ps(_mm256_castps256_ps128(reg), _mm256_extractf128_ps(reg, 1));
            let m = _mm_max_ps(m, _mm_movehl_ps(m, m));
            let m = _mm_max_ss(m, _mm_shuffle_ps(m, m, 0b01));
            _mm_cvtss_f32(m)
        }
    }

    #[inline(always)]
    unsafe fn odd_even_sort_pairs(ptr: *mut f32, count: usize) {
        debug_assert!(count <= LANES);

        let (lo_mask, hi_mask) = pair_masks(count);
        let hi_ptr = ptr.wrapping_add(LANES);

        unsafe {
            let lo = _mm256_castps_si256(_mm256_maskload_ps(ptr, lo_mask));
            let hi = _mm256_castps_si256(_mm256_maskload_ps(hi_ptr, hi_mask));

            let (a, b) = deinterleave(lo, hi);
            let (a, b) = (_mm256_castsi256_ps(a), _mm256_castsi256_ps(b));
            // Select instead of min/max, so a NaN pair member is moved, never duplicated.
            let is_lt = _mm256_cmp_ps(a, b, _CMP_LT_OQ);
            let small = _mm256_blendv_ps(b, a, is_lt);
            let large = _mm256_blendv_ps(a, b, is_lt);
            let (lo, hi) = interleave(_mm256_castps_si256(small), _mm256_castps_si256(large));

            _mm256_maskstore_ps(ptr, lo_mask, _mm256_castsi256_ps(lo));
            _mm256_maskstore_ps(hi_ptr, hi_mask, _mm256_castsi256_ps(hi));
        }
    }
}
