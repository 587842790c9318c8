//! Register-level reference models of the drum machine circuits.
//!
//! Each model implements [`drumbench_sim::Device`] the way a compiled hardware
//! model would: inputs are latched into a port table, and `eval` detects
//! rising clock edges by comparing against the previous clock level, applies
//! level-sensitive asynchronous resets, and recomputes every output.
//!
//! Every model can be built with an injected fault, a deliberate deviation
//! from the correct circuit, so the harness's failure reporting can be
//! exercised against a device known to be wrong.

#![warn(missing_docs)]

pub mod controller;
pub mod pwm;
pub mod sample;
pub mod sequence_editor;
pub mod sequencer;
pub mod top;

pub use controller::{Controller, ControllerFault};
pub use pwm::{Pwm, PwmFault};
pub use sample::{SampleFault, SamplePlayer};
pub use sequence_editor::{EditorFault, SequenceEditor};
pub use sequencer::{Sequencer, SequencerFault};
pub use top::{DrumMachine, DrumMachineFault};

/// Rising-edge detector for one clock input.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EdgeDetector {
    last: u64,
}

impl EdgeDetector {
    /// Records `level` and returns `true` on a 0 to 1 transition.
    pub(crate) fn rising(&mut self, level: u64) -> bool {
        let rose = self.last == 0 && level != 0;
        self.last = level;
        rose
    }
}
