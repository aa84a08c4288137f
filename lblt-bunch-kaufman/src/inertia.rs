//! Inertia of the factored matrix, read off the block diagonal factor.
//!
//! By Sylvester's law of inertia, $A$ and $D$ have the same number of positive, negative and zero
//! eigenvalues.

use crate::{pivot, FactorError, Pivot, Side};
use lblt_core::{MatRef, RealField};

/// Number of positive, negative and zero eigenvalues of a symmetric matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Inertia {
    pub positive: usize,
    pub negative: usize,
    pub zero: usize,
}

impl Inertia {
    fn count<E: RealField>(&mut self, value: E) {
        let zero = E::lblt_zero();
        if value > zero {
            self.positive += 1;
        } else if value < zero {
            self.negative += 1;
        } else {
            self.zero += 1;
        }
    }
}

/// Computes the inertia of the matrix whose factorization, computed from its `side` triangle, is
/// held in `factors` and `pivots`.
///
/// # Errors
///
/// Returns [`FactorError::InvalidArgument`] if the dimensions do not match, and
/// [`FactorError::InvalidPivots`] if `pivots` is malformed.
pub fn inertia<E: RealField>(
    side: Side,
    factors: MatRef<'_, E>,
    pivots: &[Pivot],
) -> Result<Inertia, FactorError> {
    let n = factors.nrows();
    if factors.ncols() != n || pivots.len() != n {
        return Err(FactorError::InvalidArgument {
            what: "the factors and the pivots must have matching dimensions",
        });
    }

    let mut out = Inertia::default();
    for block in pivot::blocks(side, pivots)? {
        let s = block.start;
        if block.size == 1 {
            out.count(factors.read(s, s));
            continue;
        }

        let d11 = factors.read(s, s);
        let d22 = factors.read(s + 1, s + 1);
        let d21 = match side {
            Side::Lower => factors.read(s + 1, s),
            Side::Upper => factors.read(s, s + 1),
        };

        if d21 == E::lblt_zero() {
            out.count(d11);
            out.count(d22);
            continue;
        }

        // sign of the determinant, scaled by 1 / d21^2
        let det = (d11 / d21) * (d22 / d21) - E::lblt_one();
        let zero = E::lblt_zero();
        if det < zero {
            out.positive += 1;
            out.negative += 1;
        } else if det > zero {
            out.count(d11);
            out.count(d11);
        } else {
            out.zero += 1;
            out.count(d11 + d22);
        }
    }
    Ok(out)
}
