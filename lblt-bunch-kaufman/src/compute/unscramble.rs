use crate::{direction::Oriented, Pivot};
use lblt_core::{permutation::swap_rows, MatMut, RealField};
use reborrow::*;

/// Undoes, in the first `k` columns of `a`, the row interchanges of later elimination steps.
///
/// While the panel is factored, every interchange is applied to all the columns of the panel that
/// are already committed. Afterwards, each committed column must only carry the interchanges of
/// the steps up to its own, so the interchange of every block is undone on the columns that
/// precede the block.
pub(crate) fn unscramble<E: RealField, S: AsRef<[Pivot]>>(
    a: MatMut<'_, E>,
    pivots: &Oriented<S>,
    k: usize,
) {
    let mut a = a;
    let mut end = k;
    while end > 0 {
        let jj = end - 1;
        let (start, target) = match pivots.get(jj) {
            Pivot::NoInterchange => (jj, jj),
            Pivot::Interchange(p) => (jj, p),
            Pivot::PartOfPair(p) => (jj - 1, p),
        };
        if target != jj && start > 0 {
            swap_rows(a.rb_mut().subcols(0, start), jj, target);
        }
        end = start;
    }
}
