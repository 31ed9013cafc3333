//! `z2linalg` is a Rust library for doing linear algebra over the 2-element field, with every
//! vector and matrix packed into machine words. Some features include:
//! - getting and setting individual entries (as `bool`s), with bounds-checked and panicking
//!   variants
//! - vector addition and dot product in a single word operation
//! - matrices in either row-major or column-major layout, with O(1) transpose by switching
//!   layout and explicit conversions between layouts
//! - elementwise complement, AND, OR, XOR, NOR and NAND
//! - matrix-vector and matrix-matrix multiplication
//! - Gaussian elimination and related methods (rank, determinant, inverse, linear solve)
//!
//! The main data structures provided by this crate are:
//! - [`PackedWord`]: an 8, 16, 32 or 64-bit word, or an arbitrary-precision word for longer
//!   vectors; the class is chosen by [`minimal_width`]
//! - [`Z2Vector`]: a vector of bits packed into a single [`PackedWord`]
//! - [`RowMatrix`] and [`ColMatrix`]: matrices stored as a sequence of packed rows or packed
//!   columns, sharing the [`Z2Matrix`] interface
//!
//! Storage bits beyond the logical length of a vector, row or column are always zero. Every
//! operation in this crate preserves that, including complement.
//!
//! Enable the `parallel` feature for rayon-based versions of elimination and multiplication
//! (the `ParallelMatrixOps` trait).

#![allow(
    clippy::needless_range_loop,
    clippy::uninlined_format_args,
    clippy::bool_assert_comparison,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::bool_to_int_with_if
)]
pub mod error;
pub mod lanes;
pub mod matrix;
pub mod vector;
pub mod width;
pub mod word;

pub use error::{Result, Z2Error};
pub use lanes::LaneOps;
pub use matrix::{ColMatrix, RowMatrix, Z2Matrix};
pub use vector::{IntoBit, Z2Vector};
pub use width::{minimal_width, WidthClass};
pub use word::PackedWord;

#[cfg(feature = "parallel")]
pub use matrix::parallel::ParallelMatrixOps;
