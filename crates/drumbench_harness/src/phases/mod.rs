//! The six test phases and their shared plumbing.
//!
//! Each phase module exposes a `steps` builder describing its stimulus and a
//! `run` entry point generic over the device, so a faulty model can be put
//! through the same sequence as the reference one.

pub mod controller;
pub mod editor;
pub mod pwm;
pub mod sample;
pub mod sequencer;
pub mod top;

use crate::audio::Recording;
use crate::compare::Comparator;
use crate::error::HarnessError;
use crate::runner::run_steps;
use crate::tally::Tally;
use drumbench_diagnostics::Diagnostic;
use drumbench_oracle::ModuleOracle;
use drumbench_sim::{ClockDriver, Device, StimulusStep};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One independently scored test phase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Mode controller transitions and request priority.
    Controller,
    /// PWM counter and comparator.
    Pwm,
    /// Rotating one-hot sequencer.
    Sequencer,
    /// Toggle-accumulator sequence editor.
    SequenceEditor,
    /// Pipelined sample player.
    Sample,
    /// Integrated drum machine with audio capture.
    Top,
}

impl Phase {
    /// Every phase in run order.
    pub const ALL: [Phase; 6] = [
        Phase::Controller,
        Phase::Pwm,
        Phase::Sequencer,
        Phase::SequenceEditor,
        Phase::Sample,
        Phase::Top,
    ];

    /// The phase's name in reports and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Controller => "controller",
            Phase::Pwm => "pwm",
            Phase::Sequencer => "sequencer",
            Phase::SequenceEditor => "sequence_editor",
            Phase::Sample => "sample",
            Phase::Top => "top",
        }
    }

    /// One-line description for `drumbench list`.
    pub fn description(self) -> &'static str {
        match self {
            Phase::Controller => "mode transitions, holds, reset and request priority",
            Phase::Pwm => "counter wrap, duty-cycle comparison and enable gating",
            Phase::Sequencer => "one-hot rotation, synchronous and asynchronous reset",
            Phase::SequenceEditor => "every cell and toggle pattern in EDIT mode",
            Phase::Sample => "pipelined playback through the sample image",
            Phase::Top => "integrated machine: mode lights and captured audio",
        }
    }

    /// Returns `true` if the phase reads memory images.
    pub fn needs_images(self) -> bool {
        matches!(self, Phase::Sample | Phase::Top)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Phase::ALL
            .into_iter()
            .find(|phase| phase.name() == wanted)
            .ok_or_else(|| HarnessError::UnknownPhase(s.to_string()))
    }
}

/// Outcome of one phase.
#[derive(Debug)]
pub struct PhaseResult {
    /// Which phase ran.
    pub phase: Phase,
    /// Checks passed and performed.
    pub tally: Tally,
    /// Stored mismatch reports, oldest first.
    pub diagnostics: Vec<Diagnostic>,
    /// Mismatches counted but not stored.
    pub suppressed: usize,
    /// Informational notes, such as probe observations.
    pub notes: Vec<Diagnostic>,
    /// Captured audio, one recording per drum (top phase only).
    pub recordings: Vec<Recording>,
}

impl PhaseResult {
    /// Creates an empty result.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            tally: Tally::new(),
            diagnostics: Vec::new(),
            suppressed: 0,
            notes: Vec::new(),
            recordings: Vec::new(),
        }
    }
}

/// Runs a stimulus list against a single-clock module.
pub(crate) fn run_module<D: Device>(
    phase: Phase,
    device: D,
    oracle: impl Into<ModuleOracle>,
    steps: &[StimulusStep],
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    let _span = tracing::info_span!("phase", name = phase.name()).entered();
    let mut driver = ClockDriver::new(device, "clk")?;
    let mut oracle = oracle.into();
    let mut cmp = Comparator::new(phase, max_mismatches);
    run_steps(&mut driver, &mut oracle, steps, &mut cmp)?;
    let edges = driver.edges();
    driver.finish();

    let result = cmp.finish();
    tracing::info!(
        passed = result.tally.passed(),
        total = result.tally.total(),
        edges,
        "phase finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("pwm".parse::<Phase>().unwrap(), Phase::Pwm);
        assert_eq!(
            "sequence-editor".parse::<Phase>().unwrap(),
            Phase::SequenceEditor
        );
        assert_eq!("TOP".parse::<Phase>().unwrap(), Phase::Top);
    }

    #[test]
    fn parse_unknown() {
        let err = "alu".parse::<Phase>().unwrap_err();
        assert!(matches!(err, HarnessError::UnknownPhase(ref name) if name == "alu"));
    }

    #[test]
    fn names_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(phase.name().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn only_sample_and_top_need_images() {
        let needing: Vec<_> = Phase::ALL.into_iter().filter(|p| p.needs_images()).collect();
        assert_eq!(needing, vec![Phase::Sample, Phase::Top]);
    }
}
