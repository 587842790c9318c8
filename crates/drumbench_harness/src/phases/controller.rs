//! Mode controller phase.
//!
//! Walks the controller through every transition and hold, checks that a
//! request without a clock edge changes nothing, resolves each combination
//! of simultaneous requests against the configured priority, and finishes
//! with an asynchronous reset out of a non-EDIT mode.

use super::{run_module, Phase, PhaseResult};
use crate::error::HarnessError;
use drumbench_common::Mode;
use drumbench_config::{ConfigError, ControllerConfig};
use drumbench_oracle::ModeOracle;
use drumbench_sim::{Device, StimulusStep};

/// Request combinations exercised together, in order.
pub const SIMULTANEOUS: [&[Mode]; 4] = [
    &[Mode::Raw, Mode::Play],
    &[Mode::Edit, Mode::Play],
    &[Mode::Edit, Mode::Raw],
    &[Mode::Edit, Mode::Play, Mode::Raw],
];

/// Converts the configured priority list into a fixed ranking.
pub fn priority(config: &ControllerConfig) -> Result<[Mode; 3], HarnessError> {
    <[Mode; 3]>::try_from(config.priority.as_slice()).map_err(|_| {
        ConfigError::ValidationError(format!(
            "controller.priority must name 3 modes, found {}",
            config.priority.len()
        ))
        .into()
    })
}

/// Names a combination of requests as `set_raw+set_play`.
pub fn describe_requests(modes: &[Mode]) -> String {
    modes
        .iter()
        .map(|m| m.request_port())
        .collect::<Vec<_>>()
        .join("+")
}

fn requests(label: String, modes: &[Mode]) -> StimulusStep {
    Mode::ALL.iter().fold(StimulusStep::pulse(label), |step, &m| {
        step.with(m.request_port(), u64::from(modes.contains(&m)))
    })
}

/// The controller stimulus.
pub fn steps() -> Vec<StimulusStep> {
    let mut steps = vec![
        StimulusStep::settle("power-on").unchecked(),
        StimulusStep::settle("reset asserted").with("rst", 1),
        StimulusStep::settle("reset released").with("rst", 0),
        StimulusStep::pulse("EDIT request in EDIT").with("set_edit", 1),
        StimulusStep::settle("PLAY request before edge")
            .with("set_edit", 0)
            .with("set_play", 1),
        StimulusStep::pulse("EDIT to PLAY"),
        StimulusStep::pulse("PLAY holds").with("set_play", 0),
        StimulusStep::pulses("PLAY to RAW", 2).with("set_raw", 1),
        StimulusStep::pulse("RAW holds").with("set_raw", 0),
        StimulusStep::pulse("RAW to EDIT").with("set_edit", 1),
        StimulusStep::pulse("EDIT holds under request"),
    ];
    for modes in SIMULTANEOUS {
        steps.push(requests(
            format!("simultaneous {}", describe_requests(modes)),
            modes,
        ));
    }
    steps.extend([
        StimulusStep::pulse("requests released")
            .with("set_edit", 0)
            .with("set_play", 0)
            .with("set_raw", 0),
        StimulusStep::settle("asynchronous reset").with("rst", 1),
        StimulusStep::pulse("reset beats request").with("set_raw", 1),
        StimulusStep::settle("reset released again")
            .with("rst", 0)
            .with("set_raw", 0)
            .unchecked(),
    ]);
    steps
}

/// Runs the controller phase against `device`.
pub fn run<D: Device>(
    device: D,
    config: &ControllerConfig,
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    let oracle = ModeOracle::with_priority(priority(config)?);
    run_module(Phase::Controller, device, oracle, &steps(), max_mismatches)
}
