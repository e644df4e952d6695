#![doc = include_str!("../README.md")]
//! ## Sessions
//!
//! - [`MatFile`] opened with [`Mode::Read`] or [`Mode::Write`]
//!
//! ## Arrays and values
//!
//! - [`MatFile::write_array`] / [`MatFile::read_array`] for real arrays of
//!   rank 1 to 3, with [`Dims`] carrying the dimension conventions
//! - [`MatFile::write_value`] / [`MatFile::read_value`] for scalars
//! - [`MatFile::write_complex_array`] / [`MatFile::read_complex_array`] for
//!   [`Complex`] arrays (crate feature `num-complex`, on by default)
//!
//! ## `ndarray` integration
//!
//! - [`WriteMatExt`] and [`ReadMatExt`] extension traits (crate feature
//!   `ndarray`)
//!
//! ## Limitations
//!
//! - Element types are limited to the fixed-width scalars MATLAB's numeric
//!   classes map onto; see [`Element`].
//! - Datasets are written and read whole: no chunked or partial access, no
//!   compression.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]

mod mat;

#[cfg(feature = "ndarray")]
mod impl_ndarray;

#[cfg(feature = "ndarray")]
pub use crate::impl_ndarray::{ReadMatExt, WriteMatExt};
pub use crate::mat::{Dims, Element, Error, MatFile, Mode, Result};
#[cfg(feature = "num-complex")]
pub use num_complex::Complex;
