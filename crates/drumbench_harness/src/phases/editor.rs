//! Sequence editor phase.
//!
//! Every toggle pattern is applied to every cell in EDIT mode, with the full
//! packed state checked after each edge.

use super::{run_module, Phase, PhaseResult};
use crate::error::HarnessError;
use drumbench_common::{to_binary_string, Mode};
use drumbench_oracle::EditorOracle;
use drumbench_sim::{Device, StimulusStep};

/// The sequence editor stimulus.
pub fn steps() -> Vec<StimulusStep> {
    let mut steps = vec![
        StimulusStep::settle("power-on").unchecked(),
        StimulusStep::settle("reset").with("rst", 1),
        StimulusStep::settle("enter EDIT")
            .with("rst", 0)
            .with("mode", Mode::Edit.encoding())
            .unchecked(),
    ];
    for index in 0..8u64 {
        for toggle in 0..16u64 {
            steps.push(
                StimulusStep::pulse(format!(
                    "cell {index} toggle 4'b{}",
                    to_binary_string(toggle, 4)
                ))
                .with("set_time_idx", index)
                .with("tgl_play_smpl", toggle),
            );
        }
    }
    for index in 0..8u64 {
        let toggle = (index * 5 + 3) & 0xF;
        for pass in ["toggle", "toggle back"] {
            steps.push(
                StimulusStep::pulse(format!("cell {index} {pass}"))
                    .with("set_time_idx", index)
                    .with("tgl_play_smpl", toggle),
            );
        }
    }
    steps.extend([
        StimulusStep::pulse("toggle ignored in PLAY")
            .with("mode", Mode::Play.encoding())
            .with("set_time_idx", 0)
            .with("tgl_play_smpl", 0xF),
        StimulusStep::settle("reset after operation").with("rst", 1),
    ]);
    steps
}

/// Runs the sequence editor phase against `device`.
pub fn run<D: Device>(
    device: D,
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    run_module(
        Phase::SequenceEditor,
        device,
        EditorOracle::new(),
        &steps(),
        max_mismatches,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use drumbench_models::{EditorFault, SequenceEditor};

    #[test]
    fn reference_editor_passes() {
        let result = run(SequenceEditor::new(), Some(8)).unwrap();
        assert!(result.tally.all_passed(), "{:?}", result.diagnostics);
        assert_eq!(result.tally.total(), 1 + 128 + 16 + 2);
    }

    #[test]
    fn toggle_all_fault_reports_first_nonzero_toggle() {
        let result = run(SequenceEditor::with_fault(EditorFault::ToggleAllCells), Some(8)).unwrap();
        assert!(result.tally.failed() > 0);
        let diag = &result.diagnostics[0];
        assert!(diag.message.starts_with("cell 0 toggle 4'b0001: seq_smpl expected 0x00000001"));
        assert!(diag.notes.iter().any(|n| n.starts_with("seq_smpl_1 was 4'b")));
    }
}
