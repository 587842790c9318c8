//! Sample player phase.
//!
//! After reset and `latency` unchecked edges to fill the pipeline, the output
//! is checked on every edge against the image entry it should have reached,
//! wrapping past the end of the image.

use super::{run_module, Phase, PhaseResult};
use crate::error::HarnessError;
use drumbench_config::SampleConfig;
use drumbench_diagnostics::{Diagnostic, DiagnosticCode};
use drumbench_oracle::PlaybackOracle;
use drumbench_sim::{Device, MemoryImage, StimulusStep};

/// Checked edges beyond one pass through the image, so the wrap is exercised.
pub const WRAP_MARGIN: u64 = 126;

/// Number of checked playback edges for an image of `len` entries.
pub fn playback_checks(config: &SampleConfig, len: usize) -> u64 {
    config.checks.unwrap_or(len as u64 + WRAP_MARGIN)
}

/// The sample player stimulus for an image of `len` entries.
pub fn steps(config: &SampleConfig, len: usize) -> Vec<StimulusStep> {
    let checks = playback_checks(config, len);
    let len = len.max(1) as u64;
    let mut steps = vec![
        StimulusStep::settle("power-on").unchecked(),
        StimulusStep::settle("reset").with("rst", 1),
        StimulusStep::settle("enable")
            .with("rst", 0)
            .with("enable", 1)
            .unchecked(),
        StimulusStep::pulses("pipeline fill", config.latency).unchecked(),
    ];
    steps.extend((1..=checks).map(|i| StimulusStep::pulse(format!("entry {}", i % len))));
    steps.extend([
        StimulusStep::pulses("disabled holds", 3).with("enable", 0),
        StimulusStep::settle("reset after operation").with("rst", 1),
    ]);
    steps
}

/// Runs the sample phase against `device` playing `image`.
pub fn run<D: Device>(
    device: D,
    image: &MemoryImage,
    config: &SampleConfig,
    max_mismatches: Option<usize>,
) -> Result<PhaseResult, HarnessError> {
    let checks = playback_checks(config, image.len());
    let oracle = PlaybackOracle::new(image.clone(), config.latency as usize);
    let steps = steps(config, image.len());
    let mut result = run_module(Phase::Sample, device, oracle, &steps, max_mismatches)?;
    if checks < image.len() as u64 {
        tracing::warn!(
            checks,
            entries = image.len(),
            image = %image.path().display(),
            "playback checks stop before the end of the image"
        );
        result.notes.push(
            Diagnostic::warning(
                DiagnosticCode::SHORT_PLAYBACK,
                format!(
                    "playback checks stop at entry {checks} of {}",
                    image.len()
                ),
            )
            .with_note(format!("image {}", image.path().display()))
            .with_help("raise or remove sample.checks to cover the whole image"),
        );
    }
    Ok(result)
}
