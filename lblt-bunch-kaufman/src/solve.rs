//! Solving linear systems $AX = B$ with the factorization of $A$.

use crate::{direction::Oriented, pivot, FactorError, Pivot, Side};
use lblt_core::{mul::matmul, permutation::swap_rows, MatMut, MatRef, Parallelism, RealField};
use reborrow::*;

/// Overwrites `rhs` with the solution $X$ of $AX = B$, where `factors` and `pivots` hold the
/// factorization of $A$ computed from its `side` triangle, and `rhs` initially holds $B$.
///
/// # Errors
///
/// Returns [`FactorError::InvalidArgument`] if the dimensions do not match,
/// [`FactorError::InvalidPivots`] if `pivots` is malformed, and [`FactorError::Singular`] when an
/// exactly singular diagonal block is met. In the last case `rhs` holds unspecified values.
pub fn solve_in_place<E: RealField>(
    side: Side,
    factors: MatRef<'_, E>,
    pivots: &[Pivot],
    rhs: MatMut<'_, E>,
    parallelism: Parallelism,
) -> Result<(), FactorError> {
    let n = factors.nrows();
    if factors.ncols() != n || pivots.len() != n || rhs.nrows() != n {
        return Err(FactorError::InvalidArgument {
            what: "the factors, the pivots and the right-hand side must have matching dimensions",
        });
    }
    pivot::blocks(side, pivots)?;

    let a = side.orient_ref(factors);
    let mut x = side.orient_rows(rhs);
    let piv = Oriented::new(pivots, side, 0);
    let nrhs = x.ncols();
    let one = E::lblt_one();

    // L D y = P^T b
    let mut k = 0;
    while k < n {
        match piv.get(k) {
            Pivot::PartOfPair(p) => {
                if p != k + 1 {
                    swap_rows(x.rb_mut(), k + 1, p);
                }
                let (top, bot) = x.rb_mut().split_at_row(k + 2);
                matmul(
                    bot,
                    a.submatrix(k + 2, k, n - k - 2, 2),
                    top.rb().subrows(k, 2),
                    -one,
                    parallelism,
                );

                let akm1k = a.read(k + 1, k);
                if akm1k == E::lblt_zero() {
                    return Err(FactorError::Singular {
                        column: side.map(n, k),
                    });
                }
                let akm1 = a.read(k, k) / akm1k;
                let ak = a.read(k + 1, k + 1) / akm1k;
                let denom = akm1 * ak - one;
                if denom == E::lblt_zero() {
                    return Err(FactorError::Singular {
                        column: side.map(n, k),
                    });
                }
                for j in 0..nrhs {
                    let bkm1 = x.read(k, j) / akm1k;
                    let bk = x.read(k + 1, j) / akm1k;
                    x.write(k, j, (ak * bkm1 - bk) / denom);
                    x.write(k + 1, j, (akm1 * bk - bkm1) / denom);
                }
                k += 2;
            }
            pivot => {
                if let Pivot::Interchange(p) = pivot {
                    swap_rows(x.rb_mut(), k, p);
                }
                let (top, bot) = x.rb_mut().split_at_row(k + 1);
                matmul(
                    bot,
                    a.submatrix(k + 1, k, n - k - 1, 1),
                    top.rb().subrows(k, 1),
                    -one,
                    parallelism,
                );

                let d = a.read(k, k);
                if d == E::lblt_zero() {
                    return Err(FactorError::Singular {
                        column: side.map(n, k),
                    });
                }
                for j in 0..nrhs {
                    let value = x.read(k, j);
                    x.write(k, j, value / d);
                }
                k += 1;
            }
        }
    }

    // L^T P^T x = y
    let mut end = n;
    while end > 0 {
        let jj = end - 1;
        let (start, target) = match piv.get(jj) {
            Pivot::NoInterchange => (jj, jj),
            Pivot::Interchange(p) => (jj, p),
            Pivot::PartOfPair(p) => (jj - 1, p),
        };
        if jj + 1 < n {
            let (top, bot) = x.rb_mut().split_at_row(jj + 1);
            let mut top = top;
            for c in start..=jj {
                matmul(
                    top.rb_mut().subrows(c, 1),
                    a.submatrix(jj + 1, c, n - jj - 1, 1).transpose(),
                    bot.rb(),
                    -one,
                    parallelism,
                );
            }
        }
        if target != jj {
            swap_rows(x.rb_mut(), jj, target);
        }
        end = start;
    }

    Ok(())
}
