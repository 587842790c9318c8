//! The device-facing half of the drumbench harness.
//!
//! A device under test is anything that implements [`Device`]: a set of named
//! integer ports plus an `eval` primitive that resolves the device's logic for
//! the current inputs. This crate provides the port bookkeeping devices share,
//! the [`ClockDriver`] that issues `pulse`/`settle`, the [`StimulusStep`]
//! description the runner executes, and the loader for the fixed memory images
//! the sample players read.
//!
//! # Modules
//!
//! - `error`: Port and image error types
//! - `port`: Port specifications, the port value table, and the `Device` trait
//! - `driver`: Clock/reset driver
//! - `stimulus`: Input assignments paired with a settle or pulse action
//! - `image`: Hex-per-line memory image loader

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod image;
pub mod port;
pub mod stimulus;

pub use driver::ClockDriver;
pub use error::SimError;
pub use image::{load_image, MemoryImage};
pub use port::{Device, Direction, PortId, PortMap, PortSpec, Radix};
pub use stimulus::{Action, StimulusStep};
