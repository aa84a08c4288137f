//! Multiply-accumulate kernels.
//!
//! Every inner product over the shared dimension is summed with a fixed reduction tree: the
//! range is split at its midpoint until the pieces hold at most [`REDUCTION_BLOCK`] terms, each
//! piece is summed left to right, and sibling results are added left plus right. The shape of
//! the tree depends only on the dimensions, so the result is the same bit for bit whatever
//! [`Parallelism`] is requested.

use crate::{assert, join_raw, parallelism_degree, MatMut, MatRef, Parallelism, RealField};
use reborrow::*;

/// Maximum number of terms summed sequentially in a leaf of the reduction tree.
pub const REDUCTION_BLOCK: usize = 32;

/// Minimum amount of multiply-adds handled by a single task.
const PAR_GRAIN: usize = 4096;

/// Number of rows reduced together, so that partial sums fit in a fixed-size buffer.
const ROW_CHUNK: usize = 64;

/// `out[i] = sum_j lhs[i, j] * rhs[j]`, summed with the reduction tree.
///
/// `lhs` has at most [`ROW_CHUNK`] rows.
fn tree<E: RealField>(out: &mut [E; ROW_CHUNK], lhs: MatRef<'_, E>, rhs: MatRef<'_, E>) {
    let m = lhs.nrows();
    let k = lhs.ncols();

    if k <= REDUCTION_BLOCK {
        out[..m].fill(E::lblt_zero());
        for j in 0..k {
            let r = rhs.read(j, 0);
            for (i, out) in out[..m].iter_mut().enumerate() {
                *out = *out + lhs.read(i, j) * r;
            }
        }
        return;
    }

    let mid = k / 2;
    let (lhs_left, lhs_right) = lhs.split_at_col(mid);
    let (rhs_top, rhs_bot) = rhs.split_at_row(mid);
    let mut right = [E::lblt_zero(); ROW_CHUNK];
    tree(out, lhs_left, rhs_top);
    tree(&mut right, lhs_right, rhs_bot);
    for (out, &r) in out[..m].iter_mut().zip(&right[..m]) {
        *out = *out + r;
    }
}

/// Computes `acc += beta * lhs * rhs`, where `acc` and `rhs` are column vectors.
///
/// Each entry is an independent reduction over the shared dimension, so the rows are distributed
/// over the available threads without affecting the result.
///
/// # Panics
///
/// Panics if the dimensions do not match.
#[track_caller]
pub fn matvec<E: RealField>(
    acc: MatMut<'_, E>,
    lhs: MatRef<'_, E>,
    rhs: MatRef<'_, E>,
    beta: E,
    parallelism: Parallelism,
) {
    assert!(all(
        acc.ncols() == 1,
        rhs.ncols() == 1,
        acc.nrows() == lhs.nrows(),
        lhs.ncols() == rhs.nrows(),
    ));

    let m = lhs.nrows();
    let k = lhs.ncols();
    if m == 0 || k == 0 {
        return;
    }

    if m > ROW_CHUNK && parallelism_degree(parallelism) > 1 && m * k >= 2 * PAR_GRAIN {
        let mid = m / 2;
        let (acc_top, acc_bot) = acc.split_at_row(mid);
        let (lhs_top, lhs_bot) = lhs.split_at_row(mid);
        join_raw(
            |parallelism| matvec(acc_top, lhs_top, rhs, beta, parallelism),
            |parallelism| matvec(acc_bot, lhs_bot, rhs, beta, parallelism),
            parallelism,
        );
        return;
    }

    let mut acc = acc;
    let mut prod = [E::lblt_zero(); ROW_CHUNK];
    let mut start = 0;
    while start < m {
        let len = Ord::min(ROW_CHUNK, m - start);
        tree(&mut prod, lhs.subrows(start, len), rhs);
        for (i, &p) in prod[..len].iter().enumerate() {
            let a = acc.read(start + i, 0);
            acc.write(start + i, 0, a + beta * p);
        }
        start += len;
    }
}

/// Computes `acc += beta * lhs * rhs`.
///
/// Each column of `acc` is computed independently with [`matvec`], so the output columns are
/// distributed over the available threads without affecting the result.
///
/// # Panics
///
/// Panics if the dimensions do not match.
#[track_caller]
pub fn matmul<E: RealField>(
    acc: MatMut<'_, E>,
    lhs: MatRef<'_, E>,
    rhs: MatRef<'_, E>,
    beta: E,
    parallelism: Parallelism,
) {
    assert!(all(
        acc.nrows() == lhs.nrows(),
        acc.ncols() == rhs.ncols(),
        lhs.ncols() == rhs.nrows(),
    ));

    let mut acc = acc;
    let n = acc.ncols();
    let work = lhs.nrows() * lhs.ncols() * n;
    if n <= 1 || parallelism_degree(parallelism) == 1 || work < 2 * PAR_GRAIN {
        for j in 0..n {
            matvec(
                acc.rb_mut().col(j),
                lhs,
                rhs.col(j),
                beta,
                Parallelism::None,
            );
        }
        return;
    }

    let mid = n / 2;
    let (acc_left, acc_right) = acc.split_at_col(mid);
    let (rhs_left, rhs_right) = rhs.split_at_col(mid);
    join_raw(
        |parallelism| matmul(acc_left, lhs, rhs_left, beta, parallelism),
        |parallelism| matmul(acc_right, lhs, rhs_right, beta, parallelism),
        parallelism,
    );
}
