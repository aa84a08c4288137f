//! The Bunch-Kaufman decomposition of a symmetric matrix $A$ is such that:
//! $$A = P L D L^\top P^\top,$$
//! where $D$ is a block diagonal matrix, with $1\times 1$ or $2 \times 2$ diagonal blocks, $L$ is
//! a unit lower triangular matrix (or unit upper triangular, when the upper triangle of $A$ is
//! used), and $P$ is a product of row interchanges.
//!
//! The factorization is computed one panel at a time by [`factor_panel`], which follows the
//! storage conventions of the classic blocked LAPACK kernel: the factor overwrites the referenced
//! triangle of $A$, the diagonal blocks are stored in place, and the interchanges are recorded in
//! a [`Pivot`] array. [`compute::factorize_in_place`] chains panels over the whole matrix, and the
//! resulting factors can be consumed by [`solve`], [`reconstruct`] and [`inertia`].

use core::fmt;

mod direction;

pub mod compute;
pub mod inertia;
pub mod pivot;
pub mod reconstruct;
pub mod solve;

pub use compute::factor_panel;
pub use direction::Side;
pub use pivot::{Pivot, PivotError};

/// Error returned by the factorization and by the routines that consume its output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FactorError {
    /// An argument does not satisfy the documented preconditions. Nothing was modified.
    InvalidArgument { what: &'static str },
    /// The factor has an exactly singular diagonal block at the given (0-based) column.
    Singular { column: usize },
    /// The pivot array does not describe a valid factorization.
    InvalidPivots(PivotError),
}

impl fmt::Display for FactorError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for FactorError {}

impl From<PivotError> for FactorError {
    #[inline]
    fn from(value: PivotError) -> Self {
        Self::InvalidPivots(value)
    }
}

/// Outcome of a single [`factor_panel`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PanelInfo {
    /// Number of columns that were factored.
    pub kb: usize,
    /// `0` if every pivot was nonsingular, otherwise the 1-based index of the first column whose
    /// diagonal block turned out exactly zero.
    pub info: usize,
    /// Number of pivots that caused an interchange.
    pub transposition_count: usize,
    /// Number of $2\times 2$ blocks among the factored columns.
    pub two_by_two_count: usize,
}

impl PanelInfo {
    /// Returns the 0-based index of the first exactly singular column, if any.
    #[inline]
    pub fn singular_column(&self) -> Option<usize> {
        self.info.checked_sub(1)
    }
}
