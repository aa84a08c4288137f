//! Computation of the factorization, one panel at a time or for the whole matrix.

use crate::{direction::Oriented, FactorError, PanelInfo, Pivot, Side};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use lblt_core::{temp_mat_req, temp_mat_uninit, MatMut, Parallelism, RealField};
use reborrow::*;

mod column;
mod commit;
mod interchange;
mod panel;
mod select;
mod unscramble;
mod update;

/// Tuning parameters of [`factorize_in_place`].
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct BunchKaufmanParams {
    /// Width of the panels. Values below `2` select a single panel spanning the whole matrix.
    pub blocksize: usize,
    /// Trailing matrices with fewer rows than this are processed sequentially.
    pub par_threshold: usize,
}

impl Default for BunchKaufmanParams {
    fn default() -> Self {
        Self {
            blocksize: 64,
            par_threshold: 128,
        }
    }
}

/// Summary of a full factorization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FactorInfo {
    /// `0` if every pivot was nonsingular, otherwise the 1-based index of the first column whose
    /// diagonal block turned out exactly zero.
    pub info: usize,
    /// Number of pivots that caused an interchange.
    pub transposition_count: usize,
    /// Number of $2\times 2$ blocks in $D$.
    pub two_by_two_count: usize,
}

impl FactorInfo {
    /// Returns the 0-based index of the first exactly singular column, if any.
    #[inline]
    pub fn singular_column(&self) -> Option<usize> {
        self.info.checked_sub(1)
    }
}

#[inline]
fn work_width(dim: usize, blocksize: usize) -> usize {
    if blocksize < 2 || dim <= blocksize {
        dim
    } else {
        blocksize
    }
}

/// Factors one panel of the symmetric matrix `a`, whose `side` triangle is referenced.
///
/// At most `nb` columns are factored: the first ones for [`Side::Lower`], the last ones for
/// [`Side::Upper`]. Their multipliers and diagonal blocks overwrite the referenced triangle, the
/// corresponding entries of `pivots` are written, and the rest of the referenced triangle is
/// replaced by the Schur complement. When `nb >= n`, the whole matrix is factored.
///
/// `w` is used as workspace and must not overlap `a`. Only its first `min(nb, n)` columns and
/// `n` rows are accessed.
///
/// A column that is exactly zero does not stop the factorization: its index is reported in
/// [`PanelInfo::info`] and the processing continues.
///
/// # Errors
///
/// Returns [`FactorError::InvalidArgument`], without modifying anything, if `a` is not square, if
/// `pivots` does not have `n` entries, if `w` is too small, or if `nb` is `0`, or `1` while
/// smaller than `n`.
pub fn factor_panel<E: RealField>(
    side: Side,
    nb: usize,
    a: MatMut<'_, E>,
    pivots: &mut [Pivot],
    w: MatMut<'_, E>,
    parallelism: Parallelism,
) -> Result<PanelInfo, FactorError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(FactorError::InvalidArgument {
            what: "the matrix must be square",
        });
    }
    if nb == 0 {
        return Err(FactorError::InvalidArgument {
            what: "the panel width must be positive",
        });
    }
    if nb < 2 && nb < n {
        return Err(FactorError::InvalidArgument {
            what: "a panel narrower than the matrix must be at least two columns wide",
        });
    }
    if pivots.len() != n {
        return Err(FactorError::InvalidArgument {
            what: "the pivot array must have one entry per row",
        });
    }
    let width = Ord::min(nb, n);
    if w.nrows() < n || w.ncols() < width {
        return Err(FactorError::InvalidArgument {
            what: "the workspace must have at least n rows and min(nb, n) columns",
        });
    }

    if n == 0 {
        return Ok(PanelInfo {
            kb: 0,
            info: 0,
            transposition_count: 0,
            two_by_two_count: 0,
        });
    }

    let mut view = Oriented::new(pivots, side, 0);
    let out = panel::factor_panel_oriented(
        side.orient(a),
        w.submatrix(0, 0, n, width),
        &mut view,
        nb,
        parallelism,
    );

    Ok(PanelInfo {
        kb: out.kb,
        info: out.first_singular.map_or(0, |j| side.map(n, j) + 1),
        transposition_count: out.transposition_count,
        two_by_two_count: out.two_by_two_count,
    })
}

/// Computes the size and alignment of required workspace for performing a Bunch-Kaufman
/// decomposition.
pub fn factorize_in_place_req<E: RealField>(
    dim: usize,
    parallelism: Parallelism,
    params: BunchKaufmanParams,
) -> Result<StackReq, SizeOverflow> {
    let _ = parallelism;
    temp_mat_req::<E>(dim, work_width(dim, params.blocksize))
}

/// Computes the Bunch-Kaufman factorization of the symmetric matrix `matrix`, whose `side`
/// triangle is referenced, by chaining calls to the panel kernel.
///
/// The factor overwrites the referenced triangle of `matrix`, and `pivots` receives the
/// interchanges. The other triangle is not accessed.
///
/// # Errors
///
/// Returns [`FactorError::InvalidArgument`] if `matrix` is not square or if `pivots` does not have
/// one entry per row. Exactly singular pivots are not errors, they are reported in
/// [`FactorInfo::info`].
///
/// # Panics
///
/// Panics if the provided memory in `stack` is insufficient.
#[track_caller]
pub fn factorize_in_place<E: RealField>(
    side: Side,
    matrix: MatMut<'_, E>,
    pivots: &mut [Pivot],
    parallelism: Parallelism,
    stack: PodStack<'_>,
    params: BunchKaufmanParams,
) -> Result<FactorInfo, FactorError> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(FactorError::InvalidArgument {
            what: "the matrix must be square",
        });
    }
    if pivots.len() != n {
        return Err(FactorError::InvalidArgument {
            what: "the pivot array must have one entry per row",
        });
    }

    #[cfg(feature = "perf-warn")]
    if matrix.row_stride().unsigned_abs() != 1 && lblt_core::__perf_warn!(BUNCH_KAUFMAN_WARN) {
        if matrix.col_stride().unsigned_abs() == 1 {
            log::warn!(target: "lblt_perf", "Bunch-Kaufman factorization prefers column-major matrix. Found row-major matrix.");
        } else {
            log::warn!(target: "lblt_perf", "Bunch-Kaufman factorization prefers column-major matrix. Found matrix with generic strides.");
        }
    }

    let bs = work_width(n, params.blocksize);
    let (mut work, _) = temp_mat_uninit::<E>(n, bs, stack);
    let mut a = side.orient(matrix);

    let mut info = FactorInfo {
        info: 0,
        transposition_count: 0,
        two_by_two_count: 0,
    };

    let mut k = 0;
    while k < n {
        let rem = n - k;
        let nb = Ord::min(bs, rem);
        let parallelism = if rem < params.par_threshold {
            Parallelism::None
        } else {
            parallelism
        };

        let mut view = Oriented::new(&mut *pivots, side, k);
        let out = panel::factor_panel_oriented(
            a.rb_mut().submatrix(k, k, rem, rem),
            work.rb_mut().submatrix(0, 0, rem, nb),
            &mut view,
            nb,
            parallelism,
        );

        if let Some(j) = out.first_singular {
            if info.info == 0 {
                let column = side.map(n, k + j);
                log::warn!(target: "lblt::bunch_kaufman", "exactly singular pivot at column {column}");
                info.info = column + 1;
            }
        }
        info.transposition_count += out.transposition_count;
        info.two_by_two_count += out.two_by_two_count;

        log::debug!(
            target: "lblt::bunch_kaufman",
            "panel at offset {k}: {} columns factored, {} interchanges",
            out.kb,
            out.transposition_count,
        );
        k += out.kb;
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct::reconstruct;
    use assert2::assert;
    use dyn_stack::GlobalPodBuffer;
    use lblt_core::{Mat, MatRef};
    use rand::prelude::*;

    fn random_symmetric(rng: &mut StdRng, n: usize) -> Mat<f64> {
        let a = Mat::<f64>::from_fn(n, n, |_, _| rng.gen::<f64>() * 2.0 - 1.0);
        Mat::from_fn(n, n, |i, j| a[(i, j)] + a[(j, i)])
    }

    fn max_abs_diff(lhs: MatRef<'_, f64>, rhs: MatRef<'_, f64>) -> f64 {
        let mut max = 0.0f64;
        for j in 0..lhs.ncols() {
            for i in 0..lhs.nrows() {
                max = max.max((lhs.read(i, j) - rhs.read(i, j)).abs());
            }
        }
        max
    }

    fn factorize(side: Side, a: &Mat<f64>, blocksize: usize) -> (Mat<f64>, Vec<Pivot>, FactorInfo) {
        let n = a.nrows();
        let mut params = BunchKaufmanParams::default();
        params.blocksize = blocksize;
        let mut factors = a.clone();
        let mut pivots = vec![Pivot::NoInterchange; n];
        let mut mem = GlobalPodBuffer::new(
            factorize_in_place_req::<f64>(n, Parallelism::None, params).unwrap(),
        );
        let info = factorize_in_place(
            side,
            factors.as_mut(),
            &mut pivots,
            Parallelism::None,
            PodStack::new(&mut mem),
            params,
        )
        .unwrap();
        (factors, pivots, info)
    }

    #[test]
    fn worked_example_forces_2x2() {
        // |a11| < alpha * |a21| and |a22| < alpha * |a21|
        let a = Mat::<f64>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 3.0 });
        let mut factors = a.clone();
        let mut pivots = vec![Pivot::NoInterchange; 2];
        let mut w = Mat::<f64>::zeros(2, 2);
        let info = factor_panel(
            Side::Lower,
            2,
            factors.as_mut(),
            &mut pivots,
            w.as_mut(),
            Parallelism::None,
        )
        .unwrap();

        assert!(info.kb == 2);
        assert!(info.info == 0);
        assert!(info.two_by_two_count == 1);
        assert!(pivots == [Pivot::PartOfPair(1), Pivot::PartOfPair(1)]);
        assert!(factors[(0, 0)] == 1.0);
        assert!(factors[(1, 0)] == 3.0);
        assert!(factors[(1, 1)] == 1.0);
    }

    #[test]
    fn worked_example_diagonal_dominant_enough() {
        // |a11| = 2 >= alpha * 3, a 1x1 pivot is chosen and d2 = 2 - 9 / 2
        let a = Mat::<f64>::from_fn(2, 2, |i, j| if i == j { 2.0 } else { 3.0 });
        let mut factors = a.clone();
        let mut pivots = vec![Pivot::NoInterchange; 2];
        let mut w = Mat::<f64>::zeros(2, 2);
        factor_panel(
            Side::Lower,
            2,
            factors.as_mut(),
            &mut pivots,
            w.as_mut(),
            Parallelism::None,
        )
        .unwrap();
        assert!(pivots == [Pivot::NoInterchange, Pivot::NoInterchange]);
        assert!(factors[(0, 0)] == 2.0);
        assert!(factors[(1, 0)] == 1.5);
        assert!(factors[(1, 1)] == -2.5);
    }

    #[test]
    fn invalid_arguments_leave_matrix_untouched() {
        let a = Mat::<f64>::from_fn(4, 4, |i, j| (i + j) as f64);
        let mut factors = a.clone();
        let mut pivots = vec![Pivot::NoInterchange; 4];
        let mut w = Mat::<f64>::zeros(4, 4);

        let err = factor_panel(
            Side::Lower,
            1,
            factors.as_mut(),
            &mut pivots,
            w.as_mut(),
            Parallelism::None,
        );
        assert!(let Err(FactorError::InvalidArgument { .. }) = err);
        let err = factor_panel(
            Side::Upper,
            0,
            factors.as_mut(),
            &mut pivots,
            w.as_mut(),
            Parallelism::None,
        );
        assert!(let Err(FactorError::InvalidArgument { .. }) = err);
        let err = factor_panel(
            Side::Lower,
            2,
            factors.as_mut(),
            &mut pivots[..3],
            w.as_mut(),
            Parallelism::None,
        );
        assert!(let Err(FactorError::InvalidArgument { .. }) = err);
        let err = factor_panel(
            Side::Lower,
            3,
            factors.as_mut(),
            &mut pivots,
            w.as_mut().subcols(0, 2),
            Parallelism::None,
        );
        assert!(let Err(FactorError::InvalidArgument { .. }) = err);
        let err = factor_panel(
            Side::Lower,
            3,
            factors.as_mut().subcols(0, 3),
            &mut pivots,
            w.as_mut(),
            Parallelism::None,
        );
        assert!(let Err(FactorError::InvalidArgument { .. }) = err);

        assert!(factors == a);
        assert!(pivots == [Pivot::NoInterchange; 4]);

        // a single column panel is fine when it covers the matrix
        let mut one = Mat::<f64>::from_fn(1, 1, |_, _| -3.0);
        let mut piv = [Pivot::NoInterchange];
        let mut w = Mat::<f64>::zeros(1, 1);
        let info = factor_panel(
            Side::Upper,
            1,
            one.as_mut(),
            &mut piv,
            w.as_mut(),
            Parallelism::None,
        )
        .unwrap();
        assert!(info.kb == 1);
        assert!(one[(0, 0)] == -3.0);

        let mut empty = Mat::<f64>::zeros(0, 0);
        let mut w = Mat::<f64>::zeros(0, 0);
        let info = factor_panel(
            Side::Lower,
            4,
            empty.as_mut(),
            &mut [],
            w.as_mut(),
            Parallelism::None,
        )
        .unwrap();
        assert!(info.kb == 0);
        assert!(info.singular_column().is_none());
    }

    #[test]
    fn panel_stops_before_the_last_column_of_the_block() {
        let mut rng = StdRng::seed_from_u64(0);
        let n = 20;
        let nb = 6;
        for _ in 0..20 {
            let a = random_symmetric(&mut rng, n);
            let mut factors = a.clone();
            let mut pivots = vec![Pivot::NoInterchange; n];
            let mut w = Mat::<f64>::zeros(n, nb);
            let info = factor_panel(
                Side::Lower,
                nb,
                factors.as_mut(),
                &mut pivots,
                w.as_mut(),
                Parallelism::None,
            )
            .unwrap();
            assert!(info.kb == nb - 1 || info.kb == nb);
            // the untouched pivots stay as they were
            assert!(pivots[info.kb..].iter().all(|p| *p == Pivot::NoInterchange));
        }
    }

    #[test]
    fn panel_width_beyond_dimension_is_bit_identical() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [1, 2, 5, 17, 40] {
            let a = random_symmetric(&mut rng, n);
            for side in [Side::Lower, Side::Upper] {
                let mut f0 = a.clone();
                let mut p0 = vec![Pivot::NoInterchange; n];
                let mut w0 = Mat::<f64>::zeros(n, n);
                factor_panel(side, n, f0.as_mut(), &mut p0, w0.as_mut(), Parallelism::None)
                    .unwrap();

                let mut f1 = a.clone();
                let mut p1 = vec![Pivot::NoInterchange; n];
                let mut w1 = Mat::<f64>::zeros(n, n + 5);
                factor_panel(side, n + 5, f1.as_mut(), &mut p1, w1.as_mut(), Parallelism::None)
                    .unwrap();

                assert!(f0 == f1);
                assert!(p0 == p1);

                let (f2, p2, _) = factorize(side, &a, n + 1);
                assert!(f0 == f2);
                assert!(p0 == p2);
            }
        }
    }

    #[test]
    fn blocked_factorization_reconstructs() {
        let mut rng = StdRng::seed_from_u64(2);
        for n in [1, 2, 3, 8, 31, 64, 97] {
            let a = random_symmetric(&mut rng, n);
            for side in [Side::Lower, Side::Upper] {
                for blocksize in [2, 3, 8, 64] {
                    let (factors, pivots, info) = factorize(side, &a, blocksize);
                    assert!(info.info == 0);
                    let mut out = Mat::<f64>::zeros(n, n);
                    reconstruct(side, out.as_mut(), factors.as_ref(), &pivots).unwrap();
                    assert!(max_abs_diff(out.as_ref(), a.as_ref()) < 1e-10 * n as f64);
                }
            }
        }
    }

    #[test]
    fn zero_column_is_reported() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 12;
        for zero in [0, 5, 11] {
            // diagonally dominant, so that no interchange moves the zero column
            let mut a = random_symmetric(&mut rng, n);
            for i in 0..n {
                a[(i, i)] += 4.0 * n as f64;
            }
            for i in 0..n {
                a[(i, zero)] = 0.0;
                a[(zero, i)] = 0.0;
            }
            for side in [Side::Lower, Side::Upper] {
                for blocksize in [3, 64] {
                    let (factors, pivots, info) = factorize(side, &a, blocksize);
                    assert!(info.info == zero + 1);
                    assert!(info.singular_column() == Some(zero));
                    let mut out = Mat::<f64>::zeros(n, n);
                    reconstruct(side, out.as_mut(), factors.as_ref(), &pivots).unwrap();
                    assert!(max_abs_diff(out.as_ref(), a.as_ref()) < 1e-10);
                }
            }
        }
    }
}
