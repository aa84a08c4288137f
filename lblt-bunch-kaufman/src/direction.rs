use crate::pivot::Pivot;
use lblt_core::{MatMut, MatRef, RealField};

/// Triangle of a symmetric matrix that holds its meaningful entries.
///
/// The algorithms are written once, for the lower triangle, and run on a view of the matrix
/// that is oriented so that the referenced triangle is always the lower one. For [`Side::Upper`]
/// that view reverses both the rows and the columns, so the elimination starts from the last
/// column and moves backwards, and the factor is unit upper triangular.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// $A = P U D U^\top P^\top$, computed from the upper triangle.
    Upper,
    /// $A = P L D L^\top P^\top$, computed from the lower triangle.
    Lower,
}

impl Side {
    /// Maps index `i` of the oriented problem of dimension `dim` to its storage index.
    ///
    /// The map is its own inverse.
    #[inline(always)]
    pub(crate) fn map(self, dim: usize, i: usize) -> usize {
        match self {
            Side::Lower => i,
            Side::Upper => dim - 1 - i,
        }
    }

    #[inline(always)]
    pub(crate) fn orient<E: RealField>(self, mat: MatMut<'_, E>) -> MatMut<'_, E> {
        match self {
            Side::Lower => mat,
            Side::Upper => mat.reverse_rows_and_cols(),
        }
    }

    #[inline(always)]
    pub(crate) fn orient_ref<E: RealField>(self, mat: MatRef<'_, E>) -> MatRef<'_, E> {
        match self {
            Side::Lower => mat,
            Side::Upper => mat.reverse_rows_and_cols(),
        }
    }

    /// Orients a right-hand side, whose rows follow the indexing of the matrix.
    #[inline(always)]
    pub(crate) fn orient_rows<E: RealField>(self, mat: MatMut<'_, E>) -> MatMut<'_, E> {
        match self {
            Side::Lower => mat,
            Side::Upper => mat.reverse_rows(),
        }
    }
}

/// Pivot array accessed through oriented indices.
///
/// `offset` is the oriented index of the first row of the current subproblem, so that local
/// indices start at zero, while the stored values remain absolute storage indices.
pub(crate) struct Oriented<S> {
    pivots: S,
    side: Side,
    offset: usize,
}

impl<S: AsRef<[Pivot]>> Oriented<S> {
    #[inline]
    pub(crate) fn new(pivots: S, side: Side, offset: usize) -> Self {
        Self {
            pivots,
            side,
            offset,
        }
    }

    #[inline(always)]
    fn dim(&self) -> usize {
        self.pivots.as_ref().len()
    }

    #[inline(always)]
    pub(crate) fn to_storage(&self, local: usize) -> usize {
        self.side.map(self.dim(), self.offset + local)
    }

    #[inline(always)]
    pub(crate) fn to_local(&self, storage: usize) -> usize {
        self.side.map(self.dim(), storage) - self.offset
    }

    #[inline]
    pub(crate) fn get(&self, local: usize) -> Pivot {
        self.pivots.as_ref()[self.to_storage(local)].map_index(|p| self.to_local(p))
    }
}

impl<S: AsRef<[Pivot]> + AsMut<[Pivot]>> Oriented<S> {
    #[inline]
    pub(crate) fn set(&mut self, local: usize, pivot: Pivot) {
        let idx = self.to_storage(local);
        let pivot = pivot.map_index(|p| self.to_storage(p));
        self.pivots.as_mut()[idx] = pivot;
    }
}
