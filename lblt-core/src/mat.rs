//! Strided matrix views and an owned column-major matrix.

use crate::{assert, debug_assert, RealField};
use core::{fmt::Debug, marker::PhantomData};
use reborrow::*;

/// Immutable view over a matrix, with arbitrary (possibly negative) row and column strides.
pub struct MatRef<'a, E> {
    ptr: *const E,
    nrows: usize,
    ncols: usize,
    row_stride: isize,
    col_stride: isize,
    __marker: PhantomData<&'a E>,
}

/// Mutable view over a matrix, with arbitrary (possibly negative) row and column strides.
pub struct MatMut<'a, E> {
    ptr: *mut E,
    nrows: usize,
    ncols: usize,
    row_stride: isize,
    col_stride: isize,
    __marker: PhantomData<&'a mut E>,
}

unsafe impl<E: Sync> Send for MatRef<'_, E> {}
unsafe impl<E: Sync> Sync for MatRef<'_, E> {}
unsafe impl<E: Send> Send for MatMut<'_, E> {}
unsafe impl<E: Sync> Sync for MatMut<'_, E> {}

impl<E> Copy for MatRef<'_, E> {}
impl<E> Clone for MatRef<'_, E> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'short, E> Reborrow<'short> for MatRef<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline(always)]
    fn rb(&'short self) -> Self::Target {
        *self
    }
}

impl<'short, E> ReborrowMut<'short> for MatRef<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline(always)]
    fn rb_mut(&'short mut self) -> Self::Target {
        *self
    }
}

impl<'a, E> IntoConst for MatRef<'a, E> {
    type Target = MatRef<'a, E>;

    #[inline(always)]
    fn into_const(self) -> Self::Target {
        self
    }
}

impl<'short, E> Reborrow<'short> for MatMut<'_, E> {
    type Target = MatRef<'short, E>;

    #[inline(always)]
    fn rb(&'short self) -> Self::Target {
        MatRef {
            ptr: self.ptr,
            nrows: self.nrows,
            ncols: self.ncols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
            __marker: PhantomData,
        }
    }
}

impl<'short, E> ReborrowMut<'short> for MatMut<'_, E> {
    type Target = MatMut<'short, E>;

    #[inline(always)]
    fn rb_mut(&'short mut self) -> Self::Target {
        MatMut {
            ptr: self.ptr,
            nrows: self.nrows,
            ncols: self.ncols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
            __marker: PhantomData,
        }
    }
}

impl<'a, E> IntoConst for MatMut<'a, E> {
    type Target = MatRef<'a, E>;

    #[inline(always)]
    fn into_const(self) -> Self::Target {
        MatRef {
            ptr: self.ptr,
            nrows: self.nrows,
            ncols: self.ncols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
            __marker: PhantomData,
        }
    }
}

#[inline(always)]
fn offset(row: usize, col: usize, row_stride: isize, col_stride: isize) -> isize {
    (row as isize)
        .wrapping_mul(row_stride)
        .wrapping_add((col as isize).wrapping_mul(col_stride))
}

impl<'a, E: RealField> MatRef<'a, E> {
    /// Creates a `MatRef` from a pointer to the matrix data, dimensions, and strides.
    ///
    /// # Safety
    /// For each `i < nrows` and `j < ncols`, `ptr.offset(i * row_stride + j * col_stride)` must
    /// point to a valid initialized value for the lifetime `'a`, and must not be mutated through
    /// any other path while the view is alive.
    #[inline(always)]
    pub unsafe fn from_raw_parts(
        ptr: *const E,
        nrows: usize,
        ncols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            ptr,
            nrows,
            ncols,
            row_stride,
            col_stride,
            __marker: PhantomData,
        }
    }

    /// Creates a column-major view over the given slice.
    ///
    /// # Panics
    /// The function panics if `slice.len() != nrows * ncols`.
    #[inline]
    #[track_caller]
    pub fn from_column_major_slice(slice: &'a [E], nrows: usize, ncols: usize) -> Self {
        assert!(Some(slice.len()) == nrows.checked_mul(ncols));
        unsafe { Self::from_raw_parts(slice.as_ptr(), nrows, ncols, 1, nrows as isize) }
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline(always)]
    pub fn row_stride(&self) -> isize {
        self.row_stride
    }

    #[inline(always)]
    pub fn col_stride(&self) -> isize {
        self.col_stride
    }

    /// Returns a pointer to the element at index `(0, 0)`.
    #[inline(always)]
    pub fn as_ptr(self) -> *const E {
        self.ptr
    }

    #[inline(always)]
    fn overflowing_ptr_at(self, row: usize, col: usize) -> *const E {
        self.ptr
            .wrapping_offset(offset(row, col, self.row_stride, self.col_stride))
    }

    /// Reads the value of the element at the given indices.
    ///
    /// # Safety
    /// The behavior is undefined if `row >= self.nrows()` or `col >= self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn read_unchecked(&self, row: usize, col: usize) -> E {
        debug_assert!(all(row < self.nrows(), col < self.ncols()));
        *self.overflowing_ptr_at(row, col)
    }

    /// Reads the value of the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if `row >= self.nrows()` or `col >= self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        assert!(all(row < self.nrows(), col < self.ncols()));
        unsafe { self.read_unchecked(row, col) }
    }

    /// Returns the view over the submatrix starting at `(row_start, col_start)` with dimensions
    /// `(nrows, ncols)`.
    ///
    /// # Panics
    /// The function panics if the submatrix does not fit inside `self`.
    #[inline(always)]
    #[track_caller]
    pub fn submatrix(self, row_start: usize, col_start: usize, nrows: usize, ncols: usize) -> Self {
        assert!(all(
            row_start <= self.nrows(),
            col_start <= self.ncols(),
            nrows <= self.nrows() - row_start,
            ncols <= self.ncols() - col_start,
        ));
        unsafe {
            Self::from_raw_parts(
                self.overflowing_ptr_at(row_start, col_start),
                nrows,
                ncols,
                self.row_stride,
                self.col_stride,
            )
        }
    }

    /// Returns the view over the rows `row_start..row_start + nrows`.
    #[inline(always)]
    #[track_caller]
    pub fn subrows(self, row_start: usize, nrows: usize) -> Self {
        let ncols = self.ncols();
        self.submatrix(row_start, 0, nrows, ncols)
    }

    /// Returns the view over the columns `col_start..col_start + ncols`.
    #[inline(always)]
    #[track_caller]
    pub fn subcols(self, col_start: usize, ncols: usize) -> Self {
        let nrows = self.nrows();
        self.submatrix(0, col_start, nrows, ncols)
    }

    /// Returns the column at index `col`, as an `nrows×1` view.
    #[inline(always)]
    #[track_caller]
    pub fn col(self, col: usize) -> Self {
        assert!(col < self.ncols());
        self.subcols(col, 1)
    }

    /// Returns the row at index `row`, as a `1×ncols` view.
    #[inline(always)]
    #[track_caller]
    pub fn row(self, row: usize) -> Self {
        assert!(row < self.nrows());
        self.subrows(row, 1)
    }

    #[inline(always)]
    pub fn transpose(self) -> Self {
        unsafe {
            Self::from_raw_parts(
                self.ptr,
                self.ncols,
                self.nrows,
                self.col_stride,
                self.row_stride,
            )
        }
    }

    /// Returns a view over `self`, with the rows in reversed order.
    #[inline(always)]
    pub fn reverse_rows(self) -> Self {
        let last = self.nrows.saturating_sub(1);
        unsafe {
            Self::from_raw_parts(
                self.overflowing_ptr_at(last, 0),
                self.nrows,
                self.ncols,
                self.row_stride.wrapping_neg(),
                self.col_stride,
            )
        }
    }

    /// Returns a view over `self`, with the rows and the columns in reversed order.
    #[inline(always)]
    pub fn reverse_rows_and_cols(self) -> Self {
        let last_row = self.nrows.saturating_sub(1);
        let last_col = self.ncols.saturating_sub(1);
        unsafe {
            Self::from_raw_parts(
                self.overflowing_ptr_at(last_row, last_col),
                self.nrows,
                self.ncols,
                self.row_stride.wrapping_neg(),
                self.col_stride.wrapping_neg(),
            )
        }
    }

    /// Splits the matrix horizontally at the given row into the top and bottom parts.
    #[inline(always)]
    #[track_caller]
    pub fn split_at_row(self, row: usize) -> (Self, Self) {
        assert!(row <= self.nrows());
        let nrows = self.nrows();
        (self.subrows(0, row), self.subrows(row, nrows - row))
    }

    /// Splits the matrix vertically at the given column into the left and right parts.
    #[inline(always)]
    #[track_caller]
    pub fn split_at_col(self, col: usize) -> (Self, Self) {
        assert!(col <= self.ncols());
        let ncols = self.ncols();
        (self.subcols(0, col), self.subcols(col, ncols - col))
    }

    /// Returns an owned copy of the matrix.
    pub fn to_owned(&self) -> Mat<E> {
        Mat::from_fn(self.nrows(), self.ncols(), |i, j| self.read(i, j))
    }
}

impl<'a, E: RealField> MatMut<'a, E> {
    /// Creates a `MatMut` from a pointer to the matrix data, dimensions, and strides.
    ///
    /// # Safety
    /// For each `i < nrows` and `j < ncols`, `ptr.offset(i * row_stride + j * col_stride)` must
    /// point to a valid initialized value for the lifetime `'a`, not aliased by any other path
    /// while the view is alive. Distinct indices must map to distinct elements.
    #[inline(always)]
    pub unsafe fn from_raw_parts(
        ptr: *mut E,
        nrows: usize,
        ncols: usize,
        row_stride: isize,
        col_stride: isize,
    ) -> Self {
        Self {
            ptr,
            nrows,
            ncols,
            row_stride,
            col_stride,
            __marker: PhantomData,
        }
    }

    /// Creates a mutable column-major view over the given slice.
    ///
    /// # Panics
    /// The function panics if `slice.len() != nrows * ncols`.
    #[inline]
    #[track_caller]
    pub fn from_column_major_slice_mut(slice: &'a mut [E], nrows: usize, ncols: usize) -> Self {
        assert!(Some(slice.len()) == nrows.checked_mul(ncols));
        unsafe { Self::from_raw_parts(slice.as_mut_ptr(), nrows, ncols, 1, nrows as isize) }
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline(always)]
    pub fn row_stride(&self) -> isize {
        self.row_stride
    }

    #[inline(always)]
    pub fn col_stride(&self) -> isize {
        self.col_stride
    }

    /// Returns a mutable pointer to the element at index `(0, 0)`.
    #[inline(always)]
    pub fn as_ptr_mut(self) -> *mut E {
        self.ptr
    }

    #[inline(always)]
    fn overflowing_ptr_at_mut(self, row: usize, col: usize) -> *mut E {
        self.ptr
            .wrapping_offset(offset(row, col, self.row_stride, self.col_stride))
    }

    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.rb().read(row, col)
    }

    /// Writes the value to the element at the given indices.
    ///
    /// # Safety
    /// The behavior is undefined if `row >= self.nrows()` or `col >= self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn write_unchecked(&mut self, row: usize, col: usize, value: E) {
        debug_assert!(all(row < self.nrows(), col < self.ncols()));
        *self.rb_mut().overflowing_ptr_at_mut(row, col) = value;
    }

    /// Writes the value to the element at the given indices, with bound checks.
    ///
    /// # Panics
    /// The function panics if `row >= self.nrows()` or `col >= self.ncols()`.
    #[inline(always)]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: E) {
        assert!(all(row < self.nrows(), col < self.ncols()));
        unsafe { self.write_unchecked(row, col, value) }
    }

    #[inline(always)]
    #[track_caller]
    pub fn submatrix(self, row_start: usize, col_start: usize, nrows: usize, ncols: usize) -> Self {
        let view = self.rb().submatrix(row_start, col_start, nrows, ncols);
        unsafe {
            Self::from_raw_parts(
                view.as_ptr() as *mut E,
                view.nrows(),
                view.ncols(),
                view.row_stride(),
                view.col_stride(),
            )
        }
    }

    #[inline(always)]
    #[track_caller]
    pub fn subrows(self, row_start: usize, nrows: usize) -> Self {
        let ncols = self.ncols();
        self.submatrix(row_start, 0, nrows, ncols)
    }

    #[inline(always)]
    #[track_caller]
    pub fn subcols(self, col_start: usize, ncols: usize) -> Self {
        let nrows = self.nrows();
        self.submatrix(0, col_start, nrows, ncols)
    }

    #[inline(always)]
    #[track_caller]
    pub fn col(self, col: usize) -> Self {
        assert!(col < self.ncols());
        self.subcols(col, 1)
    }

    #[inline(always)]
    #[track_caller]
    pub fn row(self, row: usize) -> Self {
        assert!(row < self.nrows());
        self.subrows(row, 1)
    }

    #[inline(always)]
    pub fn transpose(self) -> Self {
        unsafe {
            Self::from_raw_parts(
                self.ptr,
                self.ncols,
                self.nrows,
                self.col_stride,
                self.row_stride,
            )
        }
    }

    #[inline(always)]
    pub fn reverse_rows(self) -> Self {
        let view = self.rb().reverse_rows();
        unsafe {
            Self::from_raw_parts(
                view.as_ptr() as *mut E,
                view.nrows(),
                view.ncols(),
                view.row_stride(),
                view.col_stride(),
            )
        }
    }

    #[inline(always)]
    pub fn reverse_rows_and_cols(self) -> Self {
        let view = self.rb().reverse_rows_and_cols();
        unsafe {
            Self::from_raw_parts(
                view.as_ptr() as *mut E,
                view.nrows(),
                view.ncols(),
                view.row_stride(),
                view.col_stride(),
            )
        }
    }

    /// Splits the matrix horizontally at the given row into two non overlapping parts.
    #[inline(always)]
    #[track_caller]
    pub fn split_at_row(self, row: usize) -> (Self, Self) {
        assert!(row <= self.nrows());
        let nrows = self.nrows();
        let (top, bot) = self.into_const().split_at_row(row);
        unsafe {
            (
                Self::from_raw_parts(
                    top.as_ptr() as *mut E,
                    row,
                    top.ncols(),
                    top.row_stride(),
                    top.col_stride(),
                ),
                Self::from_raw_parts(
                    bot.as_ptr() as *mut E,
                    nrows - row,
                    bot.ncols(),
                    bot.row_stride(),
                    bot.col_stride(),
                ),
            )
        }
    }

    /// Splits the matrix vertically at the given column into two non overlapping parts.
    #[inline(always)]
    #[track_caller]
    pub fn split_at_col(self, col: usize) -> (Self, Self) {
        let (left, right) = self.transpose().split_at_row(col);
        (left.transpose(), right.transpose())
    }

    /// Copies the values from `src` into `self`.
    ///
    /// # Panics
    /// The function panics if `self` and `src` do not have the same dimensions.
    #[track_caller]
    pub fn copy_from(&mut self, src: MatRef<'_, E>) {
        assert!(all(self.nrows() == src.nrows(), self.ncols() == src.ncols()));
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                unsafe { self.write_unchecked(i, j, src.read_unchecked(i, j)) };
            }
        }
    }

    /// Fills the elements of `self` with `value`.
    pub fn fill(&mut self, value: E) {
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                unsafe { self.write_unchecked(i, j, value) };
            }
        }
    }
}

impl<E: RealField> PartialEq for MatRef<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        if (self.nrows(), self.ncols()) != (other.nrows(), other.ncols()) {
            return false;
        }
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                if self.read(i, j) != other.read(i, j) {
                    return false;
                }
            }
        }
        true
    }
}

impl<E: RealField> Debug for MatRef<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct DebugRow<'a, E: RealField>(MatRef<'a, E>);

        impl<E: RealField> Debug for DebugRow<'_, E> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let mut list = f.debug_list();
                for j in 0..self.0.ncols() {
                    list.entry(&self.0.read(0, j));
                }
                list.finish()
            }
        }

        let mut list = f.debug_list();
        for i in 0..self.nrows() {
            list.entry(&DebugRow(self.row(i)));
        }
        list.finish()
    }
}

impl<E: RealField> Debug for MatMut<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.rb().fmt(f)
    }
}

/// Heap allocated column-major matrix.
#[derive(Clone)]
pub struct Mat<E> {
    data: Vec<E>,
    nrows: usize,
    ncols: usize,
}

impl<E: RealField> Mat<E> {
    /// Returns a matrix of dimensions `(nrows, ncols)` filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_fn(nrows, ncols, |_, _| E::lblt_zero())
    }

    /// Returns the identity matrix of dimensions `(nrows, ncols)`.
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        Self::from_fn(nrows, ncols, |i, j| {
            if i == j {
                E::lblt_one()
            } else {
                E::lblt_zero()
            }
        })
    }

    /// Returns a matrix of dimensions `(nrows, ncols)` whose element at `(i, j)` is `f(i, j)`.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> E) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline(always)]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.as_ref().read(row, col)
    }

    #[inline(always)]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: E) {
        self.as_mut().write(row, col, value)
    }

    #[inline(always)]
    pub fn as_ref(&self) -> MatRef<'_, E> {
        MatRef::from_column_major_slice(&self.data, self.nrows, self.ncols)
    }

    #[inline(always)]
    pub fn as_mut(&mut self) -> MatMut<'_, E> {
        MatMut::from_column_major_slice_mut(&mut self.data, self.nrows, self.ncols)
    }

    /// Returns the values of column `col` as a slice.
    #[inline(always)]
    #[track_caller]
    pub fn col_as_slice(&self, col: usize) -> &[E] {
        assert!(col < self.ncols());
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }
}

impl<E: RealField> core::ops::Index<(usize, usize)> for Mat<E> {
    type Output = E;

    #[inline(always)]
    #[track_caller]
    fn index(&self, (row, col): (usize, usize)) -> &E {
        assert!(all(row < self.nrows(), col < self.ncols()));
        &self.data[row + col * self.nrows]
    }
}

impl<E: RealField> core::ops::IndexMut<(usize, usize)> for Mat<E> {
    #[inline(always)]
    #[track_caller]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut E {
        assert!(all(row < self.nrows(), col < self.ncols()));
        let nrows = self.nrows;
        &mut self.data[row + col * nrows]
    }
}

impl<E: RealField> PartialEq for Mat<E> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<E: RealField> Debug for Mat<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.as_ref().fmt(f)
    }
}
