use thiserror::Error;

use crate::element::ElementKind;

/// Contract violations detected at the dispatch boundary.
///
/// None of these are recoverable from the kernel's point of view. The erased Rust API hands them
/// back so the caller can decide, the C entry points log them and abort the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KindError {
    #[error("element kind {0:?} is declared but has no sorting kernel")]
    Unsupported(ElementKind),
    #[error("unknown element type tag {0}")]
    UnknownTag(i32),
}

/// The backend override named something that isn't a backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown backend `{0}`, expected `portable` or `avx2`")]
pub struct UnknownBackend(pub String);
