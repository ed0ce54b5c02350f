use core::fmt::Debug;

use crate::dispatch::Dispatch;
use crate::error::KindError;

/// Basic type tags as handed in by the type-dispatch layer.
///
/// The numbering follows the JVM basic-type constants, which is what the C callers of this
/// kernel pass through unchanged.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Float32 = 6,
    Float64 = 7,
    Int32 = 10,
    Int64 = 11,
}

impl TryFrom<i32> for ElementKind {
    type Error = KindError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            6 => Ok(Self::Float32),
            7 => Ok(Self::Float64),
            10 => Ok(Self::Int32),
            11 => Ok(Self::Int64),
            _ => Err(KindError::UnknownTag(tag)),
        }
    }
}

impl ElementKind {
    /// Only the 32-bit kinds have a kernel. The 64-bit kinds are declared so that the dispatch
    /// layer can name them, but every entry point rejects them.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Int32 | Self::Float32)
    }
}

/// Element types the kernel can sort.
///
/// All comparisons are the plain IEEE ones for `f32`. There is no total order for NaN, the kernel
/// only promises that NaN values are not lost or duplicated.
pub trait SortElement: Copy + PartialOrd + Debug + Default + Dispatch + 'static {
    const KIND: ElementKind;

    /// Smallest representable value, seeds the running maximum.
    const MIN_VALUE: Self;

    /// Largest representable value, seeds the running minimum.
    const MAX_VALUE: Self;

    /// `if a < b { a } else { b }`. A NaN in `a` yields `b`.
    #[inline(always)]
    fn lane_min(a: Self, b: Self) -> Self {
        if a < b {
            a
        } else {
            b
        }
    }

    /// `if a > b { a } else { b }`. A NaN in `a` yields `b`.
    #[inline(always)]
    fn lane_max(a: Self, b: Self) -> Self {
        if a > b {
            a
        } else {
            b
        }
    }
}

impl SortElement for i32 {
    const KIND: ElementKind = ElementKind::Int32;
    const MIN_VALUE: Self = i32::MIN;
    const MAX_VALUE: Self = i32::MAX;
}

impl SortElement for f32 {
    const KIND: ElementKind = ElementKind::Float32;
    const MIN_VALUE: Self = f32::NEG_INFINITY;
    const MAX_VALUE: Self = f32::INFINITY;
}
