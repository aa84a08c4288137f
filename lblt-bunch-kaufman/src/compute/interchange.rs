use lblt_core::{permutation::swap_rows, MatMut, RealField};
use reborrow::*;

/// Replaces the updated column `k` of `w` by the updated candidate column held in column
/// `k + 1`.
pub(crate) fn adopt_partner_column<E: RealField>(w: MatMut<'_, E>, k: usize) {
    let n = w.nrows();
    let (left, right) = w.split_at_col(k + 1);
    left.col(k)
        .subrows(k, n - k)
        .copy_from(right.rb().col(0).subrows(k, n - k));
}

/// Interchanges rows and columns `kk` and `kp` (`kk < kp`) of the not yet factored part of `a`,
/// and rows `kk` and `kp` of the first `kk + 1` columns of `a` and `w`.
///
/// Columns `k..=kk` of `a` are about to be overwritten, so only the stored triangle of the
/// trailing matrix has to be kept consistent. The diagonal entry of `kk` transits through
/// `a[kp, kk]` on its way to `a[kp, kp]`.
pub(crate) fn interchange<E: RealField>(
    a: MatMut<'_, E>,
    w: MatMut<'_, E>,
    k: usize,
    kk: usize,
    kp: usize,
) {
    debug_assert!(k <= kk && kk < kp);
    let n = a.nrows();
    let mut a = a;

    let a_kkk = a.read(kk, k);
    a.write(kp, k, a_kkk);
    for j in k + 1..kp {
        let value = a.read(j, kk);
        a.write(kp, j, value);
    }
    for i in kp..n {
        let value = a.read(i, kk);
        a.write(i, kp, value);
    }

    swap_rows(a.subcols(0, kk + 1), kk, kp);
    swap_rows(w.subcols(0, kk + 1), kk, kp);
}
