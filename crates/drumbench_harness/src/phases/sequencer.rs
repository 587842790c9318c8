//! Sequencer phase.

use super::{run_module, Phase, PhaseResult};
use crate::error::HarnessError;
use drumbench_oracle::SequencerOracle;
use drumbench_sim::{Device, StimulusStep};

fn repeat(steps: &mut Vec<StimulusStep>, name: &str, first: StimulusStep, count: u32) {
    steps.push(first);
    for edge in 1..count {
        steps.push(StimulusStep::pulse(format!("{name} edge {edge}")));
    }
}

/// The sequencer stimulus: rotations both ways, both directions at once,
/// a synchronous reset that must wait for an edge, and an asynchronous one
/// that must not.
pub fn steps() -> Vec<StimulusStep> {
    let mut steps = vec![
        StimulusStep::settle("power-on").unchecked(),
        StimulusStep::settle("reset").with("rst", 1),
    ];
    repeat(
        &mut steps,
        "go_right",
        StimulusStep::pulse("go_right edge 0")
            .with("rst", 0)
            .with("go_right", 1),
        12,
    );
    repeat(
        &mut steps,
        "go_left",
        StimulusStep::pulse("go_left edge 0")
            .with("go_right", 0)
            .with("go_left", 1),
        13,
    );
    repeat(
        &mut steps,
        "both directions",
        StimulusStep::pulse("both directions edge 0").with("go_right", 1),
        4,
    );
    steps.push(
        StimulusStep::settle("srst before edge")
            .with("go_left", 0)
            .with("go_right", 0)
            .with("srst", 1),
    );
    repeat(
        &mut steps,
        "srst",
        StimulusStep::pulse("srst edge 0"),
        16,
    );
    repeat(
        &mut steps,
        "go_left after srst",
        StimulusStep::pulse("go_left after srst edge 0")
            .with("srst", 0)
            .with("go_left", 1),
        8,
    );
    steps.push(StimulusStep::settle("reset after operation").with("rst", 1));
    steps
}

/// Runs the sequencer phase against `device`.
pub fn run<D: Device>(
    device: D,
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    run_module(
        Phase::Sequencer,
        device,
        SequencerOracle::new(),
        &steps(),
        max_mismatches,
    )
}
