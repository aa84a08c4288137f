//! Bringing candidate columns up to date in the work matrix.
//!
//! Column `j < k` of the work matrix holds the updated column `j` of the matrix, that is, the
//! product of the factor columns with their diagonal blocks. The pending correction of column `k`
//! is therefore `A[k.., ..k] * W[k, ..k]^T`.

use lblt_core::{mul::matvec, MatMut, MatRef, Parallelism, RealField};
use reborrow::*;

/// Writes the updated column `k` of `a` into column `k` of `w`, rows `k..`.
pub(crate) fn update_column<E: RealField>(
    a: MatRef<'_, E>,
    w: MatMut<'_, E>,
    k: usize,
    parallelism: Parallelism,
) {
    let n = a.nrows();
    let (w_left, w_right) = w.split_at_col(k);
    let mut w_k = w_right.col(0).subrows(k, n - k);

    w_k.copy_from(a.col(k).subrows(k, n - k));
    matvec(
        w_k,
        a.submatrix(k, 0, n - k, k),
        w_left.rb().row(k).transpose(),
        -E::lblt_one(),
        parallelism,
    );
}

/// Writes the updated column `imax` of `a` into column `k + 1` of `w`, rows `k..`.
///
/// Only the lower triangle of `a` is referenced, so the entries above the diagonal are read from
/// row `imax`.
pub(crate) fn update_partner_column<E: RealField>(
    a: MatRef<'_, E>,
    w: MatMut<'_, E>,
    k: usize,
    imax: usize,
    parallelism: Parallelism,
) {
    let n = a.nrows();
    let (w_left, w_right) = w.split_at_col(k + 1);
    let mut w_p = w_right.col(0).subrows(k, n - k);

    w_p.rb_mut()
        .subrows(0, imax - k)
        .copy_from(a.row(imax).subcols(k, imax - k).transpose());
    w_p.rb_mut()
        .subrows(imax - k, n - imax)
        .copy_from(a.col(imax).subrows(imax, n - imax));
    matvec(
        w_p,
        a.submatrix(k, 0, n - k, k),
        w_left.rb().row(imax).subcols(0, k).transpose(),
        -E::lblt_one(),
        parallelism,
    );
}
