use lblt_core::{
    mul::{matmul, matvec},
    MatMut, MatRef, Parallelism, RealField,
};
use reborrow::*;

/// Applies the rank-`k` update `A[k.., k..] -= A[k.., ..k] * W[k.., ..k]^T` to the lower
/// triangle of the trailing matrix, in column blocks of width `nb`.
///
/// The diagonal block of each column block is updated one column at a time so that the entries
/// above the diagonal are never touched. The rectangular part below it is updated at once.
pub(crate) fn update_trailing<E: RealField>(
    a: MatMut<'_, E>,
    w: MatRef<'_, E>,
    k: usize,
    nb: usize,
    parallelism: Parallelism,
) {
    let n = a.nrows();
    if k == 0 || k == n {
        return;
    }

    let (l, mut trailing) = a.split_at_col(k);
    let l = l.into_const();
    let w = w.subcols(0, k);

    let mut j = k;
    while j < n {
        let jb = Ord::min(nb, n - j);

        for jj in j..j + jb {
            matvec(
                trailing.rb_mut().col(jj - k).subrows(jj, j + jb - jj),
                l.subrows(jj, j + jb - jj),
                w.row(jj).transpose(),
                -E::lblt_one(),
                parallelism,
            );
        }

        if j + jb < n {
            matmul(
                trailing.rb_mut().submatrix(j + jb, j - k, n - j - jb, jb),
                l.subrows(j + jb, n - j - jb),
                w.subrows(j, jb).transpose(),
                -E::lblt_one(),
                parallelism,
            );
        }

        j += jb;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use assert_approx_eq::assert_approx_eq;
    use lblt_core::Mat;
    use rand::prelude::*;

    #[test]
    fn only_lower_triangle_is_updated() {
        let mut rng = StdRng::seed_from_u64(0);
        let n = 11;
        let k = 3;
        let orig = Mat::<f64>::from_fn(n, n, |_, _| rng.gen());
        let w = Mat::<f64>::from_fn(n, 4, |_, _| rng.gen());

        for nb in [2, 3, 8, 20] {
            let mut a = orig.clone();
            update_trailing(a.as_mut(), w.as_ref(), k, nb, Parallelism::None);
            for j in 0..n {
                for i in 0..n {
                    if j >= k && i >= j {
                        let mut target = orig[(i, j)];
                        for p in 0..k {
                            target -= orig[(i, p)] * w[(j, p)];
                        }
                        assert_approx_eq!(a[(i, j)], target);
                    } else {
                        assert!(a[(i, j)] == orig[(i, j)]);
                    }
                }
            }
        }
    }
}
