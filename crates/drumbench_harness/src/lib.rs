//! The drumbench harness: runs stimulus against device models, compares
//! every observable output with an oracle, and keeps score.
//!
//! A run is a list of [`Phase`]s. Each phase builds its stimulus up front,
//! drives a [`Device`](drumbench_sim::Device) and its oracle in lockstep
//! through [`runner::run_steps`], and returns a [`PhaseResult`]. The
//! [`Bench`] loads memory images, builds the reference models, runs the
//! phases (optionally in parallel) and folds them into a [`Scoreboard`].

#![warn(missing_docs)]

pub mod audio;
pub mod bench;
pub mod compare;
pub mod error;
pub mod phases;
pub mod probe;
pub mod report;
pub mod runner;
pub mod tally;

pub use audio::{ClockDivider, Recording, SampleWindow};
pub use bench::{Bench, ImageSet};
pub use compare::Comparator;
pub use error::HarnessError;
pub use phases::{Phase, PhaseResult};
pub use probe::{probe_priority, PriorityProbe, ProbeObservation};
pub use tally::{Scoreboard, Tally};
