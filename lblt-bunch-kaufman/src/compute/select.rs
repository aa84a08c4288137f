use lblt_core::RealField;

/// Result of testing the diagonal entry of the current column against its largest off-diagonal
/// magnitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ColumnTest {
    /// The column is exactly zero.
    Zero,
    /// The diagonal entry is large enough to be used as a $1\times 1$ pivot.
    Accept,
    /// The decision needs the largest off-diagonal magnitude of the candidate row.
    NeedsRow,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PivotKind {
    /// $1\times 1$ pivot on the current column.
    OneByOne,
    /// $1\times 1$ pivot on the candidate column, interchanged into the current position.
    OneByOneSwap,
    /// $2\times 2$ pivot on the current and candidate columns.
    TwoByTwo,
}

/// Bunch-Kaufman pivot selection with the growth bounding threshold $\alpha = (1+\sqrt{17})/8$.
pub(crate) struct PivotSelector<E> {
    alpha: E,
}

impl<E: RealField> PivotSelector<E> {
    #[inline]
    pub(crate) fn new() -> Self {
        let alpha = (E::lblt_one() + E::lblt_from_f64(17.0).lblt_sqrt()) / E::lblt_from_f64(8.0);
        Self { alpha }
    }

    /// `abs_akk` is the magnitude of the diagonal entry, `colmax` the largest off-diagonal
    /// magnitude of the column.
    #[inline]
    pub(crate) fn test_column(&self, abs_akk: E, colmax: E) -> ColumnTest {
        if abs_akk.lblt_max(colmax) == E::lblt_zero() {
            ColumnTest::Zero
        } else if abs_akk >= self.alpha * colmax {
            ColumnTest::Accept
        } else {
            ColumnTest::NeedsRow
        }
    }

    /// `rowmax` is the largest off-diagonal magnitude of the candidate row, and `abs_amax` the
    /// magnitude of its diagonal entry.
    #[inline]
    pub(crate) fn test_row(&self, abs_akk: E, colmax: E, rowmax: E, abs_amax: E) -> PivotKind {
        if abs_akk >= self.alpha * colmax * (colmax / rowmax) {
            PivotKind::OneByOne
        } else if abs_amax >= self.alpha * rowmax {
            PivotKind::OneByOneSwap
        } else {
            PivotKind::TwoByTwo
        }
    }
}
