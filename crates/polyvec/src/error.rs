//! Allocation error types.

use std::alloc::{self, Layout};
use std::error::Error;
use std::fmt;

/// Errors that can occur when growing the container's buffer.
///
/// On any `Err` the container is untouched: the old buffer, its contents,
/// and the reported `capacity()` all remain valid, so the caller may retry
/// with reduced demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested capacity's byte size exceeds `isize::MAX`.
    CapacityOverflow {
        /// Number of slots requested.
        requested: usize,
    },
    /// The global allocator refused the request.
    OutOfMemory {
        /// Size of the refused allocation in bytes.
        bytes: usize,
    },
}

impl AllocError {
    /// Escalate the error on the infallible paths (`push`, `insert`,
    /// `reserve`): capacity overflow panics, allocator refusal goes to
    /// [`alloc::handle_alloc_error`], which aborts by default.
    pub(crate) fn fail(self) -> ! {
        match self {
            Self::CapacityOverflow { .. } => panic!("{self}"),
            Self::OutOfMemory { bytes } => {
                let layout = Layout::from_size_align(bytes, 1)
                    .expect("refused allocation was within isize::MAX");
                alloc::handle_alloc_error(layout)
            }
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots exceed isize::MAX bytes")
            }
            Self::OutOfMemory { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
        }
    }
}

impl Error for AllocError {}
