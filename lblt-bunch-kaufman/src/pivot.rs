//! Pivot encoding of the factorization.
//!
//! Entry `k` of a pivot array describes the elimination step that produced column `k` of the
//! factor. Indices are 0-based storage indices of the factored matrix.

use crate::{direction::Oriented, Side};
use core::fmt;

/// Interchange recorded for one column of the factorization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pivot {
    /// $1\times 1$ diagonal block, without interchange.
    #[default]
    NoInterchange,
    /// $1\times 1$ diagonal block. Row and column `k` were interchanged with the given index.
    Interchange(usize),
    /// Member of a $2\times 2$ diagonal block. Both members carry the same value: the index that
    /// was interchanged with the member eliminated second (the larger index for
    /// [`Side::Lower`], the smaller one for [`Side::Upper`]). The value may equal that member,
    /// in which case no interchange took place.
    PartOfPair(usize),
}

impl Pivot {
    /// Returns `true` if the column is part of a $2\times 2$ block.
    #[inline]
    pub fn is_pair(self) -> bool {
        matches!(self, Pivot::PartOfPair(_))
    }

    #[inline(always)]
    pub(crate) fn map_index(self, f: impl FnOnce(usize) -> usize) -> Self {
        match self {
            Pivot::NoInterchange => Pivot::NoInterchange,
            Pivot::Interchange(p) => Pivot::Interchange(f(p)),
            Pivot::PartOfPair(p) => Pivot::PartOfPair(f(p)),
        }
    }
}

/// Error returned when a pivot array cannot be decoded into diagonal blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PivotError {
    /// The entry at `index` refers to a row that lies inside a block that was already eliminated.
    Overlapping { index: usize },
    /// The entry at `index` refers to a row outside the matrix.
    OutOfBounds { index: usize },
    /// The entry at `index` is part of a pair, but its neighbor does not complete the pair.
    UnpairedBlock { index: usize },
}

impl fmt::Display for PivotError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for PivotError {}

/// Diagonal block of the factorization, decoded from a pivot array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PivotBlock {
    /// Smallest index covered by the block.
    pub start: usize,
    /// `1` or `2`.
    pub size: usize,
    /// Index of the member that was eliminated last, which the interchange applies to.
    pub pivot_index: usize,
    /// Index interchanged with `pivot_index`. Equal to `pivot_index` when there was no
    /// interchange.
    pub target: usize,
}

/// Decodes `pivots` into its diagonal blocks, in elimination order.
///
/// # Errors
///
/// Fails if the array does not partition the indices into $1\times 1$ and $2\times 2$ blocks, or
/// if an interchange points outside the matrix or into a block that was already eliminated.
pub fn blocks(side: Side, pivots: &[Pivot]) -> Result<Vec<PivotBlock>, PivotError> {
    let n = pivots.len();
    for (index, pivot) in pivots.iter().enumerate() {
        match *pivot {
            Pivot::Interchange(p) | Pivot::PartOfPair(p) if p >= n => {
                return Err(PivotError::OutOfBounds { index })
            }
            _ => {}
        }
    }

    let view = Oriented::new(pivots, side, 0);
    let mut out = Vec::new();
    let mut k = 0;
    while k < n {
        let index = view.to_storage(k);
        let (size, target) = match view.get(k) {
            Pivot::NoInterchange => (1, k),
            Pivot::Interchange(p) => (1, p),
            Pivot::PartOfPair(p) => {
                if k + 1 >= n || view.get(k + 1) != Pivot::PartOfPair(p) {
                    return Err(PivotError::UnpairedBlock { index });
                }
                (2, p)
            }
        };
        let last = k + size - 1;
        if target < last {
            return Err(PivotError::Overlapping { index });
        }

        let pivot_index = view.to_storage(last);
        out.push(PivotBlock {
            start: Ord::min(index, pivot_index),
            size,
            pivot_index,
            target: view.to_storage(target),
        });
        k += size;
    }
    Ok(out)
}

/// Converts `pivots` to the 1-based LAPACK encoding, where a $2\times 2$ block is marked by
/// negative values.
pub fn to_lapack(pivots: &[Pivot]) -> Vec<isize> {
    pivots
        .iter()
        .enumerate()
        .map(|(k, pivot)| match *pivot {
            Pivot::NoInterchange => k as isize + 1,
            Pivot::Interchange(p) => p as isize + 1,
            Pivot::PartOfPair(p) => -(p as isize + 1),
        })
        .collect()
}

/// Converts a 1-based LAPACK pivot array to [`Pivot`] values.
///
/// Only the bounds of the indices are checked here. Use [`blocks`] to validate the structure.
///
/// # Errors
///
/// Fails if an entry is zero, or refers to a row outside the matrix.
pub fn from_lapack(ipiv: &[isize]) -> Result<Vec<Pivot>, PivotError> {
    let n = ipiv.len();
    ipiv.iter()
        .enumerate()
        .map(|(index, &value)| {
            let p = value.unsigned_abs().wrapping_sub(1);
            if value == 0 || p >= n {
                return Err(PivotError::OutOfBounds { index });
            }
            Ok(if value < 0 {
                Pivot::PartOfPair(p)
            } else if p == index {
                Pivot::NoInterchange
            } else {
                Pivot::Interchange(p)
            })
        })
        .collect()
}
