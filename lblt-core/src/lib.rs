//! `lblt-core` provides the matrix views, the parallelism switch, the scratch memory helpers and
//! the elementary kernels shared by the `lblt` factorization crates.
//!
//! Matrices are accessed through [`MatRef`] and [`MatMut`], which carry arbitrary row and column
//! strides. Negative strides are allowed, which is how a reversed view of a matrix is expressed
//! without moving any data.

#![allow(clippy::too_many_arguments)]

use dyn_stack::{PodStack, SizeOverflow, StackReq};

#[doc(hidden)]
pub use equator::{assert, debug_assert};

pub use lblt_entity::{DoubleF64, RealField};

pub mod level1;
pub mod mat;
pub mod mul;
pub mod permutation;

pub use mat::{Mat, MatMut, MatRef};

#[cfg(feature = "perf-warn")]
#[macro_export]
#[doc(hidden)]
macro_rules! __perf_warn {
    ($name: ident) => {{
        #[inline(always)]
        #[allow(non_snake_case)]
        fn $name() -> &'static ::core::sync::atomic::AtomicBool {
            static $name: ::core::sync::atomic::AtomicBool =
                ::core::sync::atomic::AtomicBool::new(false);
            &$name
        }
        ::core::matches!(
            $name().compare_exchange(
                false,
                true,
                ::core::sync::atomic::Ordering::Relaxed,
                ::core::sync::atomic::Ordering::Relaxed,
            ),
            Ok(_)
        )
    }};
}

/// Parallelism strategy that can be passed to the routines of the library.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// No parallelism.
    ///
    /// The code is executed sequentially on the same thread that calls a function
    /// and passes this argument.
    None,
    /// Rayon parallelism. Only available with the `rayon` feature.
    ///
    /// The code is possibly executed in parallel on the current thread, as well as the currently
    /// active rayon thread pool.
    ///
    /// The contained value represents a hint about the number of threads an implementation should
    /// use, but there is no way to guarantee how many or which threads will be used.
    ///
    /// A value of `0` treated as equivalent to `rayon::current_num_threads()`.
    #[cfg(feature = "rayon")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rayon")))]
    Rayon(usize),
}

/// Runs `op_a` and `op_b`, possibly in parallel, passing each of them the parallelism
/// budget that remains for it.
#[inline]
pub fn join_raw(
    op_a: impl Send + FnOnce(Parallelism),
    op_b: impl Send + FnOnce(Parallelism),
    parallelism: Parallelism,
) {
    fn implementation(
        op_a: &mut (dyn Send + FnMut(Parallelism)),
        op_b: &mut (dyn Send + FnMut(Parallelism)),
        parallelism: Parallelism,
    ) {
        match parallelism {
            Parallelism::None => (op_a(parallelism), op_b(parallelism)),
            #[cfg(feature = "rayon")]
            Parallelism::Rayon(n_threads) => {
                if n_threads == 1 {
                    (op_a(Parallelism::None), op_b(Parallelism::None))
                } else {
                    let n_threads = if n_threads > 0 {
                        n_threads
                    } else {
                        rayon::current_num_threads()
                    };
                    let parallelism = Parallelism::Rayon(n_threads - n_threads / 2);
                    rayon::join(|| op_a(parallelism), || op_b(parallelism))
                }
            }
        };
    }
    let mut op_a = Some(op_a);
    let mut op_b = Some(op_b);
    implementation(
        &mut |parallelism| {
            if let Some(op_a) = op_a.take() {
                op_a(parallelism)
            }
        },
        &mut |parallelism| {
            if let Some(op_b) = op_b.take() {
                op_b(parallelism)
            }
        },
        parallelism,
    )
}

/// Returns the number of threads that the given parallelism strategy may use.
#[inline]
pub fn parallelism_degree(parallelism: Parallelism) -> usize {
    match parallelism {
        Parallelism::None => 1,
        #[cfg(feature = "rayon")]
        Parallelism::Rayon(0) => rayon::current_num_threads(),
        #[cfg(feature = "rayon")]
        Parallelism::Rayon(n_threads) => n_threads,
    }
}

/// Creates a temporary column-major matrix from the given memory stack.
///
/// The contents of the matrix are unspecified and must be written before being read.
#[track_caller]
pub fn temp_mat_uninit<E: RealField>(
    nrows: usize,
    ncols: usize,
    stack: PodStack<'_>,
) -> (MatMut<'_, E>, PodStack<'_>) {
    let len = nrows * ncols;
    let (alloc, stack) = stack.make_raw::<E>(len);
    (MatMut::from_column_major_slice_mut(alloc, nrows, ncols), stack)
}

/// Returns the stack requirements for creating a temporary matrix with the given dimensions.
#[inline]
pub fn temp_mat_req<E: RealField>(nrows: usize, ncols: usize) -> Result<StackReq, SizeOverflow> {
    let len = nrows.checked_mul(ncols).ok_or(SizeOverflow)?;
    StackReq::try_new::<E>(len)
}
