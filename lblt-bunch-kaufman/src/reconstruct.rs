//! Reconstruction of the factored matrix.

use crate::{direction::Oriented, pivot, FactorError, Pivot, Side};
use lblt_core::{
    mul::matmul, permutation::swap_symmetric, MatMut, MatRef, Parallelism, RealField,
};
use reborrow::*;

/// Writes into `out` the full symmetric matrix whose factorization, computed from its `side`
/// triangle, is held in `factors` and `pivots`.
///
/// Both triangles of `out` are written.
///
/// # Errors
///
/// Returns [`FactorError::InvalidArgument`] if the dimensions do not match, and
/// [`FactorError::InvalidPivots`] if `pivots` is malformed.
pub fn reconstruct<E: RealField>(
    side: Side,
    out: MatMut<'_, E>,
    factors: MatRef<'_, E>,
    pivots: &[Pivot],
) -> Result<(), FactorError> {
    let n = factors.nrows();
    if factors.ncols() != n || pivots.len() != n || out.nrows() != n || out.ncols() != n {
        return Err(FactorError::InvalidArgument {
            what: "the output, the factors and the pivots must have matching dimensions",
        });
    }
    pivot::blocks(side, pivots)?;

    let a = side.orient_ref(factors);
    let mut m = side.orient(out);
    let piv = Oriented::new(pivots, side, 0);
    let zero = E::lblt_zero();
    let one = E::lblt_one();

    // (start, size, target), in elimination order
    let mut blocks = Vec::new();
    let mut k = 0;
    while k < n {
        let block = match piv.get(k) {
            Pivot::NoInterchange => (k, 1, k),
            Pivot::Interchange(p) => (k, 1, p),
            Pivot::PartOfPair(p) => (k, 2, p),
        };
        blocks.push(block);
        k += block.1;
    }

    m.fill(zero);
    for &(k, size, _) in &blocks {
        m.write(k, k, a.read(k, k));
        if size == 2 {
            let d21 = a.read(k + 1, k);
            m.write(k + 1, k, d21);
            m.write(k, k + 1, d21);
            m.write(k + 1, k + 1, a.read(k + 1, k + 1));
        }
    }

    for &(k, size, target) in blocks.iter().rev() {
        let rest = k + size;
        if rest < n {
            let l = a.submatrix(rest, k, n - rest, size);

            let (top, bot) = m.rb_mut().split_at_row(rest);
            matmul(bot, l, top.rb().subrows(k, size), one, Parallelism::None);

            let (left, right) = m.rb_mut().split_at_col(rest);
            matmul(
                right,
                left.rb().subcols(k, size),
                l.transpose(),
                one,
                Parallelism::None,
            );
        }

        let kk = rest - 1;
        if target != kk {
            swap_symmetric(m.rb_mut(), kk, target);
        }
    }

    Ok(())
}
