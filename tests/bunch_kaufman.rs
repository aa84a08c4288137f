use assert2::assert;
use dyn_stack::{GlobalPodBuffer, PodStack};
use lblt::{
    bunch_kaufman::{
        compute::{factorize_in_place, factorize_in_place_req, BunchKaufmanParams, FactorInfo},
        inertia::inertia,
        pivot::{blocks, from_lapack, to_lapack},
        reconstruct::reconstruct,
        solve::solve_in_place,
    },
    factor_panel, DoubleF64, Inertia, Mat, MatRef, Parallelism, Pivot, RealField, Side,
};
use rand::prelude::*;

fn random_symmetric(rng: &mut StdRng, n: usize) -> Mat<f64> {
    let a = Mat::<f64>::from_fn(n, n, |_, _| rng.gen::<f64>() - 0.5);
    Mat::from_fn(n, n, |i, j| a[(i, j)] + a[(j, i)])
}

fn max_abs<E: RealField>(mat: MatRef<'_, E>) -> E {
    let mut max = E::lblt_zero();
    for j in 0..mat.ncols() {
        for i in 0..mat.nrows() {
            max = max.lblt_max(mat.read(i, j).lblt_abs());
        }
    }
    max
}

fn max_abs_diff<E: RealField>(lhs: MatRef<'_, E>, rhs: MatRef<'_, E>) -> E {
    let mut max = E::lblt_zero();
    for j in 0..lhs.ncols() {
        for i in 0..lhs.nrows() {
            max = max.lblt_max((lhs.read(i, j) - rhs.read(i, j)).lblt_abs());
        }
    }
    max
}

/// Checks `max|reconstruct(factors) - a| <= c * n * eps * max|a|`.
fn is_backward_stable<E: RealField>(
    side: Side,
    a: &Mat<E>,
    factors: &Mat<E>,
    pivots: &[Pivot],
) -> bool {
    let n = a.nrows();
    let mut out = Mat::<E>::zeros(n, n);
    reconstruct(side, out.as_mut(), factors.as_ref(), pivots).unwrap();

    let c = E::lblt_from_f64(16.0);
    let bound = c * E::lblt_from_f64(n as f64) * E::lblt_epsilon() * max_abs(a.as_ref());
    max_abs_diff(out.as_ref(), a.as_ref()) <= bound
}

fn factorize<E: RealField>(
    side: Side,
    a: &Mat<E>,
    blocksize: usize,
    parallelism: Parallelism,
) -> (Mat<E>, Vec<Pivot>, FactorInfo) {
    let n = a.nrows();
    let mut params = BunchKaufmanParams::default();
    params.blocksize = blocksize;
    let mut factors = a.clone();
    let mut pivots = vec![Pivot::NoInterchange; n];
    let mut mem =
        GlobalPodBuffer::new(factorize_in_place_req::<E>(n, parallelism, params).unwrap());
    let info = factorize_in_place(
        side,
        factors.as_mut(),
        &mut pivots,
        parallelism,
        PodStack::new(&mut mem),
        params,
    )
    .unwrap();
    (factors, pivots, info)
}

/// Factors the whole matrix with repeated calls to the panel kernel, each one on the trailing
/// matrix left by the previous call.
fn factorize_by_panels(side: Side, a: &Mat<f64>, nb: usize) -> (Mat<f64>, Vec<Pivot>) {
    let n = a.nrows();
    let mut factors = a.clone();
    let mut pivots = vec![Pivot::NoInterchange; n];
    let mut w = Mat::<f64>::zeros(n, nb);

    let mut done = 0;
    while done < n {
        let rem = n - done;
        let width = Ord::min(nb, rem);
        let work = w.as_mut().submatrix(0, 0, rem, width);
        match side {
            Side::Lower => {
                let info = factor_panel(
                    side,
                    nb,
                    factors.as_mut().submatrix(done, done, rem, rem),
                    &mut pivots[done..],
                    work,
                    Parallelism::None,
                )
                .unwrap();
                for pivot in &mut pivots[done..done + info.kb] {
                    *pivot = match *pivot {
                        Pivot::NoInterchange => Pivot::NoInterchange,
                        Pivot::Interchange(p) => Pivot::Interchange(p + done),
                        Pivot::PartOfPair(p) => Pivot::PartOfPair(p + done),
                    };
                }
                done += info.kb;
            }
            Side::Upper => {
                let info = factor_panel(
                    side,
                    nb,
                    factors.as_mut().submatrix(0, 0, rem, rem),
                    &mut pivots[..rem],
                    work,
                    Parallelism::None,
                )
                .unwrap();
                done += info.kb;
            }
        }
    }
    (factors, pivots)
}

#[test]
fn chained_panels_match_the_driver() {
    let rng = &mut StdRng::seed_from_u64(0);
    for side in [Side::Lower, Side::Upper] {
        for n in [1, 2, 3, 7, 16, 31, 64] {
            for nb in [2, 3, 5, 8] {
                let a = random_symmetric(rng, n);
                let (factors, pivots) = factorize_by_panels(side, &a, nb);
                assert!(is_backward_stable(side, &a, &factors, &pivots));
                assert!(blocks(side, &pivots).is_ok());

                let (driver_factors, driver_pivots, _) =
                    factorize(side, &a, nb, Parallelism::None);
                assert!(driver_factors == factors);
                assert!(driver_pivots == pivots);
            }
        }
    }
}

#[test]
fn upper_mirrors_lower() {
    let rng = &mut StdRng::seed_from_u64(1);
    let n = 40;
    let a = random_symmetric(rng, n);
    let reversed = a.as_ref().reverse_rows_and_cols().to_owned();

    let (lower, lower_pivots, lower_info) = factorize(Side::Lower, &a, 8, Parallelism::None);
    let (upper, upper_pivots, upper_info) =
        factorize(Side::Upper, &reversed, 8, Parallelism::None);

    assert!(upper.as_ref().reverse_rows_and_cols() == lower.as_ref());
    assert!(upper_info.two_by_two_count == lower_info.two_by_two_count);
    assert!(upper_info.transposition_count == lower_info.transposition_count);
    for i in 0..n {
        let mirrored = match lower_pivots[i] {
            Pivot::NoInterchange => Pivot::NoInterchange,
            Pivot::Interchange(p) => Pivot::Interchange(n - 1 - p),
            Pivot::PartOfPair(p) => Pivot::PartOfPair(n - 1 - p),
        };
        assert!(upper_pivots[n - 1 - i] == mirrored);
    }
}

#[test]
fn relabeled_matrix_gives_an_equivalent_factorization() {
    let rng = &mut StdRng::seed_from_u64(7);
    let n = 45;
    let a = random_symmetric(rng, n);
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    let relabeled = Mat::<f64>::from_fn(n, n, |i, j| a[(perm[i], perm[j])]);

    let x = Mat::<f64>::from_fn(n, 1, |_, _| rng.gen::<f64>() - 0.5);
    let b = Mat::<f64>::from_fn(n, 1, |i, _| (0..n).map(|p| a[(i, p)] * x[(p, 0)]).sum());

    for side in [Side::Lower, Side::Upper] {
        let (factors, pivots, _) = factorize(side, &a, 8, Parallelism::None);
        let (relabeled_factors, relabeled_pivots, _) =
            factorize(side, &relabeled, 8, Parallelism::None);
        assert!(is_backward_stable(side, &a, &factors, &pivots));
        assert!(is_backward_stable(side, &relabeled, &relabeled_factors, &relabeled_pivots));
        assert!(
            inertia(side, factors.as_ref(), &pivots).unwrap()
                == inertia(side, relabeled_factors.as_ref(), &relabeled_pivots).unwrap()
        );

        let mut sol = Mat::<f64>::from_fn(n, 1, |i, _| b[(perm[i], 0)]);
        solve_in_place(
            side,
            relabeled_factors.as_ref(),
            &relabeled_pivots,
            sol.as_mut(),
            Parallelism::None,
        )
        .unwrap();
        for i in 0..n {
            assert!((sol[(i, 0)] - x[(perm[i], 0)]).abs() < 1e-8);
        }
    }
}

#[test]
fn zero_column_does_not_stop_the_factorization() {
    let n = 6;
    let zero = 3;
    let a = Mat::<f64>::from_fn(n, n, |i, j| {
        if i == zero || j == zero {
            0.0
        } else if i == j {
            4.0 * n as f64
        } else {
            1.0 / (1 + i + j) as f64
        }
    });

    for side in [Side::Lower, Side::Upper] {
        let (factors, pivots, info) = factorize(side, &a, 2, Parallelism::None);
        assert!(info.singular_column() == Some(zero));
        assert!(info.info == zero + 1);
        assert!(pivots.iter().all(|&p| p == Pivot::NoInterchange));
        assert!(is_backward_stable(side, &a, &factors, &pivots));
        assert!(
            inertia(side, factors.as_ref(), &pivots).unwrap()
                == Inertia {
                    positive: n - 1,
                    negative: 0,
                    zero: 1,
                }
        );
    }
}

#[test]
fn inertia_follows_sylvester() {
    let rng = &mut StdRng::seed_from_u64(2);
    let n = 50;
    let signs: Vec<f64> = (0..n)
        .map(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 })
        .collect();
    let positive = signs.iter().filter(|&&s| s > 0.0).count();

    // a = l * diag(signs) * l^T, with l unit lower triangular
    let l = Mat::<f64>::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else if i > j {
            (rng.gen::<f64>() - 0.5) * 0.2
        } else {
            0.0
        }
    });
    let a = Mat::<f64>::from_fn(n, n, |i, j| {
        (0..n).map(|p| l[(i, p)] * signs[p] * l[(j, p)]).sum()
    });

    for side in [Side::Lower, Side::Upper] {
        let (factors, pivots, info) = factorize(side, &a, 16, Parallelism::None);
        assert!(info.singular_column().is_none());
        assert!(
            inertia(side, factors.as_ref(), &pivots).unwrap()
                == Inertia {
                    positive,
                    negative: n - positive,
                    zero: 0,
                }
        );
    }
}

#[test]
fn solve_with_many_right_hand_sides() {
    let rng = &mut StdRng::seed_from_u64(3);
    let n = 70;
    let k = 5;
    let a = random_symmetric(rng, n);
    let x = Mat::<f64>::from_fn(n, k, |_, _| rng.gen::<f64>() - 0.5);
    let b = Mat::<f64>::from_fn(n, k, |i, j| (0..n).map(|p| a[(i, p)] * x[(p, j)]).sum());

    for side in [Side::Lower, Side::Upper] {
        let (factors, pivots, _) = factorize(side, &a, 12, Parallelism::None);
        let mut sol = b.clone();
        solve_in_place(side, factors.as_ref(), &pivots, sol.as_mut(), Parallelism::None).unwrap();

        let mut residual = 0.0f64;
        for j in 0..k {
            for i in 0..n {
                let ax: f64 = (0..n).map(|p| a[(i, p)] * sol[(p, j)]).sum();
                residual = residual.max((ax - b[(i, j)]).abs());
            }
        }
        assert!(residual < 1e-9);
    }
}

#[test]
fn extended_precision() {
    let rng = &mut StdRng::seed_from_u64(4);
    let n = 24;
    let a = random_symmetric(rng, n);
    let a = Mat::<DoubleF64>::from_fn(n, n, |i, j| DoubleF64::from(a[(i, j)]));

    for side in [Side::Lower, Side::Upper] {
        let (factors, pivots, _) = factorize(side, &a, 4, Parallelism::None);
        assert!(is_backward_stable(side, &a, &factors, &pivots));
    }
}

#[cfg(feature = "rayon")]
#[test]
fn parallelism_does_not_change_the_result() {
    let rng = &mut StdRng::seed_from_u64(5);
    let n = 300;
    let a = random_symmetric(rng, n);

    for side in [Side::Lower, Side::Upper] {
        let (seq, seq_pivots, seq_info) = factorize(side, &a, 32, Parallelism::None);
        let (par, par_pivots, par_info) = factorize(side, &a, 32, Parallelism::Rayon(4));
        assert!(seq == par);
        assert!(seq_pivots == par_pivots);
        assert!(seq_info == par_info);
    }
}

#[test]
fn lapack_encoding_round_trips() {
    let rng = &mut StdRng::seed_from_u64(6);
    let n = 33;
    let a = random_symmetric(rng, n);

    for side in [Side::Lower, Side::Upper] {
        let (_, pivots, info) = factorize(side, &a, 8, Parallelism::None);
        let ipiv = to_lapack(&pivots);
        assert!(ipiv.iter().all(|&p| p != 0 && p.unsigned_abs() <= n));
        assert!(ipiv.iter().filter(|&&p| p < 0).count() == 2 * info.two_by_two_count);
        assert!(from_lapack(&ipiv).unwrap() == pivots);
    }
}
