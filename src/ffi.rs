//! C entry points for the type-dispatch layer on the other side of the FFI boundary.
//!
//! The caller passes an untyped array, an element-kind tag and an index range. Contract violations
//! can't be reported back through this interface, they are logged and the process is aborted.

use std::ffi::c_void;
use std::process;

use log::error;

use crate::element::ElementKind;
use crate::error::KindError;

fn abort_on(err: KindError) -> ! {
    error!("lanesort: {err}, aborting");
    process::abort();
}

fn checked_range(from: i32, to: i32) -> (usize, usize) {
    match (usize::try_from(from), usize::try_from(to)) {
        (Ok(from), Ok(to)) if from <= to => (from, to),
        _ => {
            error!("lanesort: invalid range {from}..{to}, aborting");
            process::abort();
        }
    }
}

fn checked_pivot(pivot: i32, from: usize, to: usize) -> usize {
    match usize::try_from(pivot) {
        Ok(pivot) if from <= pivot && pivot < to => pivot,
        _ => {
            error!("lanesort: pivot index {pivot} outside of {from}..{to}, aborting");
            process::abort();
        }
    }
}

/// Sorts `array[from..to]` in ascending order.
///
/// # Safety
///
/// `array` must point to an array of the element kind named by `elem_type`, valid for reads and
/// writes on `[from, to)`, and not accessed by anything else for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn lanesort_sort(array: *mut c_void, elem_type: i32, from: i32, to: i32) {
    let kind = ElementKind::try_from(elem_type).unwrap_or_else(|err| abort_on(err));
    let (from, to) = checked_range(from, to);

    // SAFETY: Forwarded caller contract.
    if let Err(err) = unsafe { crate::sort_raw(array.cast(), kind, from, to) } {
        abort_on(err);
    }
}

/// Partitions `array[from..to]` around one or two pivots and writes the band boundaries to
/// `pivot_indices[0]` and `pivot_indices[1]`.
///
/// With `pivot1 == pivot2` the bands are `< pivot`, `== pivot` and `> pivot`. Otherwise the values
/// at the two indices must satisfy `array[pivot1] <= array[pivot2]` and the bands are `< pivot1`,
/// `[pivot1, pivot2)` and `>= pivot2`. All indices are absolute.
///
/// # Safety
///
/// Same as [`lanesort_sort`], and `pivot_indices` must be valid for writing two `i32`. Pivot
/// indices outside of `[from, to)` abort.
#[no_mangle]
pub unsafe extern "C" fn lanesort_partition(
    array: *mut c_void,
    elem_type: i32,
    from: i32,
    to: i32,
    pivot_indices: *mut i32,
    pivot1: i32,
    pivot2: i32,
) {
    let kind = ElementKind::try_from(elem_type).unwrap_or_else(|err| abort_on(err));
    let (from, to) = checked_range(from, to);

    let pivot1 = checked_pivot(pivot1, from, to);
    let pivot2 = checked_pivot(pivot2, from, to);
    debug_assert!(!pivot_indices.is_null());

    // SAFETY: Forwarded caller contract.
    let result = unsafe { crate::partition_raw(array.cast(), kind, from, to, pivot1, pivot2) };

    match result {
        Ok((lower, upper)) => {
            // SAFETY: The caller guarantees room for two indices. Both fit in `i32` because they
            // are bounded by `to`.
            unsafe {
                pivot_indices.write(lower as i32);
                pivot_indices.add(1).write(upper as i32);
            }
        }
        Err(err) => abort_on(err),
    }
}
