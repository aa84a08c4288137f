//! `lblt` computes the Bunch-Kaufman factorization of dense symmetric indefinite matrices,
//! $$A = P L D L^\top P^\top,$$
//! with a blocked algorithm in the style of the LAPACK `sytrf` family, generic over the scalar
//! precision.
//!
//! The building block is [`bunch_kaufman::factor_panel`], which factors one panel of columns and
//! applies the resulting update to the trailing matrix. [`bunch_kaufman::compute::factorize_in_place`]
//! chains panels over the whole matrix.
//!
//! # Example
//!
//! ```
//! use lblt::{
//!     bunch_kaufman::{compute, solve},
//!     dyn_stack::{GlobalPodBuffer, PodStack},
//!     Mat, Parallelism, Pivot, Side,
//! };
//!
//! let n = 3;
//! let a = Mat::<f64>::from_fn(n, n, |i, j| [[0.0, 1.0, 2.0], [1.0, 0.0, 3.0], [2.0, 3.0, 1.0]][i][j]);
//!
//! let mut factors = a.clone();
//! let mut pivots = vec![Pivot::NoInterchange; n];
//! let params = Default::default();
//! let mut mem = GlobalPodBuffer::new(
//!     compute::factorize_in_place_req::<f64>(n, Parallelism::None, params).unwrap(),
//! );
//! let info = compute::factorize_in_place(
//!     Side::Lower,
//!     factors.as_mut(),
//!     &mut pivots,
//!     Parallelism::None,
//!     PodStack::new(&mut mem),
//!     params,
//! )
//! .unwrap();
//! assert_eq!(info.singular_column(), None);
//!
//! let mut x = Mat::<f64>::from_fn(n, 1, |i, _| [3.0, 4.0, 6.0][i]);
//! solve::solve_in_place(Side::Lower, factors.as_ref(), &pivots, x.as_mut(), Parallelism::None)
//!     .unwrap();
//! for i in 0..n {
//!     assert!((x[(i, 0)] - 1.0).abs() < 1e-12);
//! }
//! ```

pub use dyn_stack;
pub use reborrow;

pub use lblt_bunch_kaufman as bunch_kaufman;
pub use lblt_core::{
    join_raw, level1, mul, parallelism_degree, permutation, DoubleF64, Mat, MatMut, MatRef,
    Parallelism, RealField,
};

pub use bunch_kaufman::{
    factor_panel, inertia::Inertia, FactorError, PanelInfo, Pivot, PivotError, Side,
};
