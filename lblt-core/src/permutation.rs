//! Row and column interchanges.

use crate::{assert, MatMut, RealField};
use reborrow::*;

/// Swaps the two columns at indices `a` and `b` in the given matrix.
///
/// # Panics
///
/// Panics if either `a` or `b` is out of bounds.
#[track_caller]
#[inline]
pub fn swap_cols<E: RealField>(mat: MatMut<'_, E>, a: usize, b: usize) {
    assert!(all(a < mat.ncols(), b < mat.ncols()));
    if a == b {
        return;
    }

    let mut mat = mat;
    for i in 0..mat.nrows() {
        let tmp = mat.read(i, a);
        let other = mat.read(i, b);
        mat.write(i, a, other);
        mat.write(i, b, tmp);
    }
}

/// Swaps the two rows at indices `a` and `b` in the given matrix.
///
/// # Panics
///
/// Panics if either `a` or `b` is out of bounds.
#[track_caller]
#[inline]
pub fn swap_rows<E: RealField>(mat: MatMut<'_, E>, a: usize, b: usize) {
    swap_cols(mat.transpose(), a, b)
}

/// Applies the interchange `a <-> b` to both the rows and the columns of `mat`.
#[track_caller]
#[inline]
pub fn swap_symmetric<E: RealField>(mat: MatMut<'_, E>, a: usize, b: usize) {
    let mut mat = mat;
    swap_rows(mat.rb_mut(), a, b);
    swap_cols(mat, a, b);
}
