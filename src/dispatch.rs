//! Picks the lane backend and routes each element type to its monomorphized kernel.
//!
//! Detection runs once per process. Every public entry point reads the cached choice, so the hot
//! loops never branch on the backend.

use core::fmt;
use core::str::FromStr;
use std::env;

use log::{debug, trace, warn};
use once_cell::sync::Lazy;

use crate::element::SortElement;
use crate::error::UnknownBackend;
use crate::lanes::{LaneVector, Portable, PORTABLE_LANES};
use crate::partition::pivots::{dual_pivot_partition, single_pivot_partition};
use crate::quicksort::fast_sort;

#[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
use crate::lanes::avx2::{Avx2F32, Avx2I32};

/// Environment variable that overrides backend detection.
pub const BACKEND_ENV_VAR: &str = "LANESORT_BACKEND";

/// Lane backends the dispatch layer can route to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// `Portable<T, PORTABLE_LANES>`, available everywhere.
    Portable,
    /// Eight 32-bit lanes in a 256-bit AVX2 register.
    Avx2,
}

impl Backend {
    /// Whether this backend is compiled in and the running CPU can execute it.
    pub fn is_supported(self) -> bool {
        match self {
            Backend::Portable => true,
            Backend::Avx2 => avx2_supported(),
        }
    }

    /// The fastest supported backend.
    pub fn detect() -> Self {
        if avx2_supported() {
            Backend::Avx2
        } else {
            Backend::Portable
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Portable => "portable",
            Backend::Avx2 => "avx2",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portable" => Ok(Backend::Portable),
            "avx2" => Ok(Backend::Avx2),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

#[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
fn avx2_supported() -> bool {
    Avx2I32::is_supported()
}

#[cfg(not(all(target_arch = "x86_64", not(feature = "portable_only"))))]
fn avx2_supported() -> bool {
    false
}

/// Resolves an optional override against what the CPU supports.
fn resolve_backend(requested: Option<&str>) -> Backend {
    let detected = Backend::detect();

    let Some(requested) = requested else {
        return detected;
    };

    match requested.parse::<Backend>() {
        Ok(backend) if backend.is_supported() => backend,
        Ok(backend) => {
            warn!("{BACKEND_ENV_VAR}={backend} is not supported on this CPU, using {detected}");
            detected
        }
        Err(err) => {
            warn!("ignoring {BACKEND_ENV_VAR}: {err}");
            detected
        }
    }
}

static SELECTED_BACKEND: Lazy<Backend> = Lazy::new(|| {
    let requested = env::var(BACKEND_ENV_VAR).ok();
    let backend = resolve_backend(requested.as_deref());
    debug!("lanesort backend: {backend}");
    backend
});

/// The backend every call without an explicit backend uses.
pub fn selected_backend() -> Backend {
    *SELECTED_BACKEND
}

mod private {
    pub trait Sealed {}
}

/// Routes a call for one element type to the kernel for a backend.
///
/// Sealed, implemented for `i32` and `f32`. A backend the CPU can't run falls back to the
/// portable kernel.
pub trait Dispatch: private::Sealed + Sized {
    #[doc(hidden)]
    fn sort_on(backend: Backend, v: &mut [Self]);

    #[doc(hidden)]
    fn partition_on(backend: Backend, v: &mut [Self], pivot1: usize, pivot2: usize)
        -> (usize, usize);
}

/// Single-pivot partition when both indices are the same, dual-pivot otherwise.
#[inline(always)]
pub(crate) fn partition_kernel<V: LaneVector>(
    v: &mut [V::Elem],
    pivot1: usize,
    pivot2: usize,
) -> (usize, usize) {
    if pivot1 == pivot2 {
        single_pivot_partition::<V>(v, pivot1)
    } else {
        dual_pivot_partition::<V>(v, pivot1, pivot2)
    }
}

macro_rules! impl_dispatch {
    ($elem:ident, $avx2:ident) => {
        paste::paste! {
            #[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
            #[target_feature(enable = "avx2")]
            unsafe fn [<sort_avx2_ $elem>](v: &mut [$elem]) {
                fast_sort::<$avx2>(v);
            }

            #[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
            #[target_feature(enable = "avx2")]
            unsafe fn [<partition_avx2_ $elem>](
                v: &mut [$elem],
                pivot1: usize,
                pivot2: usize,
            ) -> (usize, usize) {
                partition_kernel::<$avx2>(v, pivot1, pivot2)
            }

            impl private::Sealed for $elem {}

            impl Dispatch for $elem {
                fn sort_on(backend: Backend, v: &mut [Self]) {
                    trace!(
                        "sort {} x {:?} on {backend}",
                        v.len(),
                        <$elem as SortElement>::KIND
                    );

                    match backend {
                        #[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
                        // SAFETY: The guard checked that the CPU supports AVX2.
                        Backend::Avx2 if $avx2::is_supported() => unsafe { [<sort_avx2_ $elem>](v) },
                        _ => fast_sort::<Portable<$elem, PORTABLE_LANES>>(v),
                    }
                }

                fn partition_on(
                    backend: Backend,
                    v: &mut [Self],
                    pivot1: usize,
                    pivot2: usize,
                ) -> (usize, usize) {
                    trace!(
                        "partition {} x {:?} around [{pivot1}] and [{pivot2}] on {backend}",
                        v.len(),
                        <$elem as SortElement>::KIND
                    );

                    match backend {
                        #[cfg(all(target_arch = "x86_64", not(feature = "portable_only")))]
                        // SAFETY: The guard checked that the CPU supports AVX2.
                        Backend::Avx2 if $avx2::is_supported() => unsafe {
                            [<partition_avx2_ $elem>](v, pivot1, pivot2)
                        },
                        _ => partition_kernel::<Portable<$elem, PORTABLE_LANES>>(v, pivot1, pivot2),
                    }
                }
            }
        }
    };
}

impl_dispatch!(i32, Avx2I32);
impl_dispatch!(f32, Avx2F32);
