use super::{
    column, commit, interchange,
    select::{ColumnTest, PivotKind, PivotSelector},
    unscramble::unscramble,
    update::update_trailing,
};
use crate::{direction::Oriented, Pivot};
use lblt_core::{
    level1::{iamax, max_abs},
    MatMut, MatRef, Parallelism, RealField,
};
use reborrow::*;

pub(crate) struct PanelOutcome {
    pub kb: usize,
    /// Oriented index of the first column that was exactly zero.
    pub first_singular: Option<usize>,
    pub transposition_count: usize,
    pub two_by_two_count: usize,
}

/// Largest off-diagonal magnitude of the candidate row, held in column `k + 1` of `w`.
fn row_max<E: RealField>(w: MatRef<'_, E>, k: usize, imax: usize) -> E {
    let n = w.nrows();
    let col = w.col(k + 1);
    let rowmax = max_abs(col.subrows(k, imax - k));
    if imax + 1 < n {
        rowmax.lblt_max(max_abs(col.subrows(imax + 1, n - imax - 1)))
    } else {
        rowmax
    }
}

/// Factors the leading columns of the oriented matrix `a`, then updates the trailing matrix.
///
/// When `nb < n`, the factorization stops as soon as `nb - 1` columns are committed, which
/// leaves room in `w` for the partner column of a final $2\times 2$ pivot. Otherwise every
/// column is factored.
pub(crate) fn factor_panel_oriented<E: RealField, S: AsRef<[Pivot]> + AsMut<[Pivot]>>(
    a: MatMut<'_, E>,
    w: MatMut<'_, E>,
    pivots: &mut Oriented<S>,
    nb: usize,
    parallelism: Parallelism,
) -> PanelOutcome {
    let n = a.nrows();
    let mut a = a;
    let mut w = w;

    let selector = PivotSelector::<E>::new();
    let mut out = PanelOutcome {
        kb: 0,
        first_singular: None,
        transposition_count: 0,
        two_by_two_count: 0,
    };

    let mut k = 0;
    while k < n && !(nb < n && k + 1 >= nb) {
        column::update_column(a.rb(), w.rb_mut(), k, parallelism);

        let abs_akk = w.read(k, k).lblt_abs();
        let (imax, colmax) = match iamax(w.rb().col(k).subrows(k + 1, n - k - 1)) {
            Some((i, colmax)) => (k + 1 + i, colmax),
            None => (k, E::lblt_zero()),
        };

        let mut k_step = 1;
        let kp;
        match selector.test_column(abs_akk, colmax) {
            ColumnTest::Zero => {
                if out.first_singular.is_none() {
                    out.first_singular = Some(k);
                }
                kp = k;
                commit::commit_zero(a.rb_mut(), w.rb(), k);
            }
            test => {
                kp = if test == ColumnTest::Accept {
                    k
                } else {
                    column::update_partner_column(a.rb(), w.rb_mut(), k, imax, parallelism);
                    let rowmax = row_max(w.rb(), k, imax);
                    let abs_amax = w.read(imax, k + 1).lblt_abs();
                    match selector.test_row(abs_akk, colmax, rowmax, abs_amax) {
                        PivotKind::OneByOne => k,
                        PivotKind::OneByOneSwap => {
                            interchange::adopt_partner_column(w.rb_mut(), k);
                            imax
                        }
                        PivotKind::TwoByTwo => {
                            k_step = 2;
                            imax
                        }
                    }
                };

                let kk = k + k_step - 1;
                if kp != kk {
                    interchange::interchange(a.rb_mut(), w.rb_mut(), k, kk, kp);
                    out.transposition_count += 1;
                }

                if k_step == 1 {
                    commit::commit_1x1(a.rb_mut(), w.rb(), k);
                } else {
                    commit::commit_2x2(a.rb_mut(), w.rb(), k);
                    out.two_by_two_count += 1;
                }
            }
        }

        if k_step == 1 {
            let pivot = if kp == k {
                Pivot::NoInterchange
            } else {
                Pivot::Interchange(kp)
            };
            pivots.set(k, pivot);
        } else {
            pivots.set(k, Pivot::PartOfPair(kp));
            pivots.set(k + 1, Pivot::PartOfPair(kp));
        }
        log::trace!(
            target: "lblt::bunch_kaufman",
            "pivot at {k}: size {k_step}, interchanged with {kp}",
        );

        k += k_step;
    }

    update_trailing(a.rb_mut(), w.rb(), k, nb, parallelism);
    unscramble(a.rb_mut(), pivots, k);

    out.kb = k;
    out
}
