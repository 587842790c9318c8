//! PWM phase.
//!
//! Sweeps one full counter period at duty cycles 255, 128 and 0, one period
//! with the PWM disabled, and checks that reset clears the counter both
//! without and with a clock edge. Counter and output are checked on every edge.

use super::{run_module, Phase, PhaseResult};
use crate::error::HarnessError;
use drumbench_oracle::PwmOracle;
use drumbench_sim::{Device, StimulusStep};

/// Edges in one counter period.
pub const PERIOD: u32 = 256;

fn sweep(steps: &mut Vec<StimulusStep>, name: &str, first: StimulusStep) {
    steps.push(first);
    for edge in 1..PERIOD {
        steps.push(StimulusStep::pulse(format!("{name} edge {edge}")));
    }
}

/// The PWM stimulus.
pub fn steps() -> Vec<StimulusStep> {
    let mut steps = vec![
        StimulusStep::settle("power-on").unchecked(),
        StimulusStep::settle("reset").with("rst", 1),
    ];
    sweep(
        &mut steps,
        "duty_cycle=255",
        StimulusStep::pulse("duty_cycle=255 edge 0")
            .with("rst", 0)
            .with("enable", 1)
            .with("duty_cycle", 255),
    );
    sweep(
        &mut steps,
        "duty_cycle=128",
        StimulusStep::pulse("duty_cycle=128 edge 0").with("duty_cycle", 128),
    );
    sweep(
        &mut steps,
        "disabled",
        StimulusStep::pulse("disabled edge 0").with("enable", 0),
    );
    sweep(
        &mut steps,
        "duty_cycle=0",
        StimulusStep::pulse("duty_cycle=0 edge 0")
            .with("enable", 1)
            .with("duty_cycle", 0),
    );
    steps.extend([
        StimulusStep::settle("reset after operation").with("rst", 1),
        StimulusStep::pulse("reset held through edge"),
    ]);
    steps
}

/// Runs the PWM phase against `device`.
pub fn run<D: Device>(
    device: D,
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    run_module(Phase::Pwm, device, PwmOracle::new(), &steps(), max_mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drumbench_models::{Pwm, PwmFault};

    #[test]
    fn reference_pwm_passes() {
        let result = run(Pwm::new(), Some(8)).unwrap();
        assert!(result.tally.all_passed(), "{:?}", result.diagnostics);
        assert_eq!(result.tally.total(), 2 + 4 * 2 * u64::from(PERIOD) + 4);
    }

    #[test]
    fn off_by_one_fault_misses_equal_counter() {
        let result = run(Pwm::with_fault(PwmFault::CompareOffByOne), Some(8)).unwrap();
        assert_eq!(result.tally.failed(), 5);
        assert_eq!(
            result.diagnostics[0].message,
            "duty_cycle=255 edge 254: pwm_out expected 1, observed 0"
        );
    }

    #[test]
    fn counting_while_disabled_is_caught() {
        let result = run(Pwm::with_fault(PwmFault::CountsWhenDisabled), Some(4)).unwrap();
        assert_eq!(result.tally.failed(), 255);
        assert_eq!(result.diagnostics.len(), 4);
        assert_eq!(result.suppressed, 251);
    }
}
