//! Shared foundational types used across the drumbench verification harness.
//!
//! This crate provides the bit-field helpers every oracle and diagnostic relies
//! on, frequency values for clock configuration, the drum machine's modes and
//! voices, and the internal error type that marks defects in the harness itself.

#![warn(missing_docs)]

pub mod bits;
pub mod frequency;
pub mod mode;
pub mod result;

pub use bits::{bit, concat, extract_bits, mask, to_binary_string, BitRangeError};
pub use frequency::{DivisionError, Frequency, ParseFrequencyError};
pub use mode::{Drum, Mode};
pub use result::{BenchResult, InternalError};
