//! Drives a stimulus list through a device and its oracle in lockstep.
//!
//! Each step drives its assignments, settles both sides, then issues its
//! clock pulses. A checked step then compares every output the oracle
//! predicts against what the device shows. The oracle is told the same
//! inputs the device saw, so the two can only disagree through the device's
//! own behavior.

use crate::compare::{mismatch, Comparator};
use crate::error::HarnessError;
use drumbench_diagnostics::DiagnosticCode;
use drumbench_oracle::{ModuleOracle, Oracle, Signals};
use drumbench_sim::{Action, ClockDriver, Device, StimulusStep};

/// Runs `steps` against `driver` and `oracle`, recording every check in `cmp`.
///
/// Only port errors abort; mismatches are counted.
pub fn run_steps<D: Device>(
    driver: &mut ClockDriver<D>,
    oracle: &mut ModuleOracle,
    steps: &[StimulusStep],
    cmp: &mut Comparator,
) -> Result<(), HarnessError> {
    let mut inputs = Signals::new();
    for step in steps {
        let previous = oracle.peek(&inputs);
        for &(port, value) in step.assignments() {
            driver.set(port, value)?;
            inputs.set(port, value);
        }

        driver.settle();
        let mut predicted = oracle.settle(&inputs);
        if let Action::Pulse(count) = step.action() {
            for _ in 0..count {
                driver.pulse()?;
                predicted = oracle.apply(&inputs);
            }
        }

        if !step.is_checked() {
            continue;
        }
        let ports = driver.device().ports();
        let observed = oracle.observe(ports, &inputs)?;
        for (signal, expected) in predicted.iter() {
            let actual = observed.get(signal);
            let oracle = &*oracle;
            cmp.check(actual == expected, || {
                let diag = mismatch(
                    DiagnosticCode::VALUE_MISMATCH,
                    step.label(),
                    signal,
                    &oracle.format(ports, signal, expected),
                    &oracle.format(ports, signal, actual),
                );
                oracle
                    .context(ports, signal, &previous, &inputs)
                    .into_iter()
                    .fold(diag, |diag, note| diag.with_note(note))
            });
        }
    }
    tracing::trace!(edges = driver.edges(), steps = steps.len(), "stimulus finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::Phase;
    use drumbench_models::{Sequencer, SequencerFault};
    use drumbench_oracle::SequencerOracle;

    fn run(device: Sequencer, steps: &[StimulusStep]) -> crate::PhaseResult {
        let mut driver = ClockDriver::new(device, "clk").unwrap();
        let mut oracle = ModuleOracle::from(SequencerOracle::new());
        let mut cmp = Comparator::new(Phase::Sequencer, Some(8));
        run_steps(&mut driver, &mut oracle, steps, &mut cmp).unwrap();
        cmp.finish()
    }

    #[test]
    fn unchecked_steps_do_not_count() {
        let steps = [
            StimulusStep::settle("init").unchecked(),
            StimulusStep::settle("reset").with("rst", 1),
        ];
        let result = run(Sequencer::new(), &steps);
        assert_eq!((result.tally.passed(), result.tally.total()), (1, 1));
    }

    #[test]
    fn correct_device_passes_rotation() {
        let steps = [
            StimulusStep::settle("reset").with("rst", 1),
            StimulusStep::pulses("rotate", 3).with("rst", 0).with("go_right", 1),
        ];
        let result = run(Sequencer::new(), &steps);
        assert!(result.tally.all_passed());
        assert_eq!(result.tally.total(), 2);
    }

    #[test]
    fn mismatch_carries_context() {
        let steps = [
            StimulusStep::settle("reset").with("rst", 1),
            StimulusStep::pulse("both").with("rst", 0).with("go_left", 1).with("go_right", 1),
        ];
        let result = run(Sequencer::with_fault(SequencerFault::BothRotatesLeft), &steps);
        assert_eq!(result.tally.failed(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.message, "both: seq_out expected 0x80, observed 0x01");
        assert!(diag.notes.iter().any(|n| n.starts_with("inputs: ")));
    }

    #[test]
    fn unknown_port_aborts() {
        let steps = [StimulusStep::settle("bad").with("go_up", 1)];
        let mut driver = ClockDriver::new(Sequencer::new(), "clk").unwrap();
        let mut oracle = ModuleOracle::from(SequencerOracle::new());
        let mut cmp = Comparator::new(Phase::Sequencer, Some(8));
        let err = run_steps(&mut driver, &mut oracle, &steps, &mut cmp).unwrap_err();
        assert!(err.is_setup());
    }
}
