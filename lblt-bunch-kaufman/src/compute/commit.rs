use lblt_core::{level1::scale, MatMut, MatRef, RealField};

/// Stores the $1\times 1$ block held in column `k` of `w` and its multipliers in column `k` of
/// `a`.
pub(crate) fn commit_1x1<E: RealField>(a: MatMut<'_, E>, w: MatRef<'_, E>, k: usize) {
    let n = a.nrows();
    let mut a_k = a.col(k).subrows(k, n - k);
    a_k.copy_from(w.col(k).subrows(k, n - k));
    if k + 1 < n {
        let r1 = a_k.read(0, 0).lblt_inv();
        scale(a_k.subrows(1, n - k - 1), r1);
    }
}

/// Stores a zero column: the diagonal block is an exact zero and so are its multipliers.
pub(crate) fn commit_zero<E: RealField>(a: MatMut<'_, E>, w: MatRef<'_, E>, k: usize) {
    let n = a.nrows();
    a.col(k)
        .subrows(k, n - k)
        .copy_from(w.col(k).subrows(k, n - k));
}

/// Stores the $2\times 2$ block held in rows `k..k + 2` of columns `k` and `k + 1` of `w`, and
/// the two columns of multipliers, in columns `k` and `k + 1` of `a`.
///
/// The multipliers solve `L * D = W` for the rows below the block, with the inverse of the block
/// written in terms of the off-diagonal coupling to avoid overflow.
pub(crate) fn commit_2x2<E: RealField>(a: MatMut<'_, E>, w: MatRef<'_, E>, k: usize) {
    let n = a.nrows();
    let mut a = a;

    if k + 2 < n {
        let d21 = w.read(k + 1, k);
        let d11 = w.read(k + 1, k + 1) / d21;
        let d22 = w.read(k, k) / d21;
        let t = (d11 * d22 - E::lblt_one()).lblt_inv();
        let d21 = t / d21;

        for j in k + 2..n {
            let wk = w.read(j, k);
            let wkp1 = w.read(j, k + 1);
            a.write(j, k, d21 * (d11 * wk - wkp1));
            a.write(j, k + 1, d21 * (d22 * wkp1 - wk));
        }
    }

    a.write(k, k, w.read(k, k));
    a.write(k + 1, k, w.read(k + 1, k));
    a.write(k + 1, k + 1, w.read(k + 1, k + 1));
}
