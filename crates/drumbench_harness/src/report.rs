//! Text and JSON rendering of a finished run.

use crate::audio::Recording;
use crate::phases::{Phase, PhaseResult};
use crate::tally::{Scoreboard, Tally};
use drumbench_diagnostics::{Diagnostic, DiagnosticRenderer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Width the phase headers are centered in.
pub const HEADER_WIDTH: usize = 50;

/// A title centered between runs of dashes: `"------ Testing pwm ------"`.
pub fn header(title: &str) -> String {
    let dashes = "-".repeat(HEADER_WIDTH.saturating_sub(title.len()) / 2);
    format!("{dashes} {title} {dashes}")
}

/// The per-phase summary line.
pub fn phase_line(phase: Phase, tally: Tally) -> String {
    format!(
        "{phase}: {} out of {} tests passed.",
        tally.passed(),
        tally.total()
    )
}

/// The final verdict line.
pub fn verdict(global: Tally) -> String {
    if global.all_passed() {
        format!("ALL {} TESTS PASSED", global.total())
    } else {
        format!(
            "ERROR: {}/{} tests passed.",
            global.passed(),
            global.total()
        )
    }
}

/// Renders one phase: header, mismatches, notes and summary line.
pub fn render_phase(result: &PhaseResult, renderer: &dyn DiagnosticRenderer) -> String {
    let mut out = header(&format!("Testing {}", result.phase));
    out.push('\n');
    for diag in result.diagnostics.iter().chain(&result.notes) {
        out.push_str(&renderer.render(diag));
    }
    if result.suppressed > 0 {
        out.push_str(&format!(
            "... {} more mismatches suppressed\n",
            result.suppressed
        ));
    }
    for recording in &result.recordings {
        out.push_str(&format!(
            "recorded {} samples of {}\n",
            recording.samples().len(),
            recording.drum()
        ));
    }
    out.push_str(&phase_line(result.phase, result.tally));
    out.push('\n');
    out
}

/// The run banner naming the bench, or `None` for an unnamed scoreboard.
pub fn banner(board: &Scoreboard) -> Option<String> {
    (!board.bench().is_empty()).then(|| header(&format!("Bench {}", board.bench())))
}

/// Renders the whole run as text.
pub fn render_text(board: &Scoreboard, renderer: &dyn DiagnosticRenderer) -> String {
    let mut out = String::new();
    if let Some(banner) = banner(board) {
        out.push_str(&banner);
        out.push_str("\n\n");
    }
    for result in board.phases() {
        out.push_str(&render_phase(result, renderer));
        out.push('\n');
    }
    out.push_str(&verdict(board.global()));
    out.push('\n');
    out
}

#[derive(Serialize)]
struct JsonPhase<'a> {
    phase: Phase,
    passed: u64,
    total: u64,
    suppressed: usize,
    mismatches: &'a [Diagnostic],
    notes: &'a [Diagnostic],
    recordings: Vec<JsonRecording>,
}

#[derive(Serialize)]
struct JsonRecording {
    drum: String,
    samples: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    bench: &'a str,
    phases: Vec<JsonPhase<'a>>,
    passed: u64,
    total: u64,
    success: bool,
}

/// Renders the whole run as pretty-printed JSON.
pub fn render_json(board: &Scoreboard) -> Result<String, serde_json::Error> {
    let phases = board
        .phases()
        .iter()
        .map(|r| JsonPhase {
            phase: r.phase,
            passed: r.tally.passed(),
            total: r.tally.total(),
            suppressed: r.suppressed,
            mismatches: &r.diagnostics,
            notes: &r.notes,
            recordings: r
                .recordings
                .iter()
                .map(|rec| JsonRecording {
                    drum: rec.drum().to_string(),
                    samples: rec.samples().len(),
                })
                .collect(),
        })
        .collect();
    let global = board.global();
    serde_json::to_string_pretty(&JsonReport {
        bench: board.bench(),
        phases,
        passed: global.passed(),
        total: global.total(),
        success: board.success(),
    })
}

/// Writes every recording of the run to `dir/{drum}.mem`.
pub fn save_recordings(board: &Scoreboard, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let recordings: Vec<&Recording> = board
        .phases()
        .iter()
        .flat_map(|r| &r.recordings)
        .collect();
    let mut written = Vec::with_capacity(recordings.len());
    for recording in recordings {
        let path = dir.join(format!("{}.mem", recording.drum()));
        std::fs::write(&path, recording.to_image_text())?;
        tracing::debug!(path = %path.display(), "recording saved");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drumbench_common::Drum;
    use drumbench_diagnostics::{DiagnosticCode, TerminalRenderer};

    fn board(passes: &[bool]) -> Scoreboard {
        let mut result = PhaseResult::new(Phase::Pwm);
        for &ok in passes {
            result.tally.record(ok);
        }
        let mut board = Scoreboard::new();
        board.record(result).unwrap();
        board
    }

    #[test]
    fn header_is_centered() {
        let h = header("Testing pwm");
        assert_eq!(h, format!("{} Testing pwm {}", "-".repeat(19), "-".repeat(19)));
    }

    #[test]
    fn header_longer_than_width() {
        let title = "x".repeat(60);
        assert_eq!(header(&title), format!(" {title} "));
    }

    #[test]
    fn verdict_lines() {
        assert_eq!(verdict(board(&[true, true]).global()), "ALL 2 TESTS PASSED");
        assert_eq!(
            verdict(board(&[true, false, true]).global()),
            "ERROR: 2/3 tests passed."
        );
    }

    #[test]
    fn phase_line_format() {
        let t = Tally::from_counts("pwm", 3, 4).unwrap();
        assert_eq!(phase_line(Phase::Pwm, t), "pwm: 3 out of 4 tests passed.");
    }

    #[test]
    fn text_report_lists_suppressed() {
        let mut result = PhaseResult::new(Phase::Sequencer);
        result.tally.record(false);
        result.tally.record(false);
        result.diagnostics.push(Diagnostic::error(
            DiagnosticCode::VALUE_MISMATCH,
            "edge 1: seq_out expected 0x40, observed 0x80",
        ));
        result.suppressed = 1;
        let mut board = Scoreboard::new();
        board.record(result).unwrap();
        let text = render_text(&board, &TerminalRenderer::new(false));
        assert!(text.contains("error[M001]: edge 1: seq_out expected 0x40, observed 0x80"));
        assert!(text.contains("... 1 more mismatches suppressed"));
        assert!(text.contains("sequencer: 0 out of 2 tests passed."));
        assert!(text.ends_with("ERROR: 0/2 tests passed.\n"));
    }

    #[test]
    fn named_bench_gets_a_banner() {
        let mut board = Scoreboard::named("drum-machine");
        let mut result = PhaseResult::new(Phase::Pwm);
        result.tally.record(true);
        board.record(result).unwrap();

        let text = render_text(&board, &TerminalRenderer::new(false));
        let first = text.lines().next().unwrap();
        assert_eq!(first, header("Bench drum-machine"));
        assert!(text.contains("\n\n---"));

        let value: serde_json::Value =
            serde_json::from_str(&render_json(&board).unwrap()).unwrap();
        assert_eq!(value["bench"], "drum-machine");
    }

    #[test]
    fn unnamed_bench_has_no_banner() {
        let text = render_text(&board(&[true]), &TerminalRenderer::new(false));
        assert!(text.starts_with(&header("Testing pwm")));
        assert!(banner(&board(&[true])).is_none());
    }

    #[test]
    fn phase_block_lines() {
        let mut result = PhaseResult::new(Phase::Top);
        result.tally.record(true);
        let mut rec = Recording::new(Drum::Kick);
        rec.push(0x10);
        result.recordings.push(rec);
        result.suppressed = 2;
        let text = render_phase(&result, &TerminalRenderer::new(false));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                header("Testing top").as_str(),
                "... 2 more mismatches suppressed",
                "recorded 1 samples of kick",
                "top: 1 out of 1 tests passed.",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn json_report_fields() {
        let json = render_json(&board(&[true, false])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["total"], 2);
        assert_eq!(value["success"], false);
        assert_eq!(value["phases"][0]["phase"], "pwm");
    }

    #[test]
    fn recordings_are_saved_as_images() {
        let dir = tempfile::tempdir().unwrap();
        let mut result = PhaseResult::new(Phase::Top);
        let mut rec = Recording::new(Drum::Clap);
        rec.push(0x7f);
        rec.pad_silence(1);
        result.recordings.push(rec);
        let mut board = Scoreboard::new();
        board.record(result).unwrap();

        let written = save_recordings(&board, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("clap.mem")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(text, "7f\n80\n");
    }
}
