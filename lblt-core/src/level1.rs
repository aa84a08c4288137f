//! Vector kernels: index of maximum magnitude and scaling.

use crate::{assert, MatMut, MatRef, RealField};

/// Returns the index and the magnitude of the element of the column vector `x` with the largest
/// absolute value, or `None` if `x` is empty.
///
/// Ties are resolved in favor of the element that comes first. NaN values are never selected
/// unless they occupy the first position.
#[track_caller]
pub fn iamax<E: RealField>(x: MatRef<'_, E>) -> Option<(usize, E)> {
    assert!(x.ncols() == 1);
    if x.nrows() == 0 {
        return None;
    }

    let mut best_idx = 0;
    let mut best = x.read(0, 0).lblt_abs();
    for i in 1..x.nrows() {
        let value = x.read(i, 0).lblt_abs();
        if value > best {
            best_idx = i;
            best = value;
        }
    }
    Some((best_idx, best))
}

/// Returns the largest absolute value in the column vector `x`, or zero if `x` is empty.
#[track_caller]
pub fn max_abs<E: RealField>(x: MatRef<'_, E>) -> E {
    match iamax(x) {
        Some((_, value)) => value,
        None => E::lblt_zero(),
    }
}

/// Multiplies every element of `x` by `alpha`.
pub fn scale<E: RealField>(x: MatMut<'_, E>, alpha: E) {
    let mut x = x;
    for j in 0..x.ncols() {
        for i in 0..x.nrows() {
            let value = x.read(i, j);
            x.write(i, j, value * alpha);
        }
    }
}
