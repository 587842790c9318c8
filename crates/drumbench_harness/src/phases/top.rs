//! Integrated drum machine phase.
//!
//! The machine is driven by two clocks: the fast audio clock, cycled
//! directly, and the slow control clock, derived from it by a
//! [`ClockDivider`]. After reset the bench checks the mode lights, requests
//! RAW mode, then plays each drum in turn and captures the PWM output as
//! 8-bit samples, comparing every sample with the oracle's prediction.

use super::controller::priority;
use super::{Phase, PhaseResult};
use crate::audio::{ClockDivider, Recording, SampleWindow};
use crate::compare::{mismatch, Comparator};
use crate::error::HarnessError;
use drumbench_common::{Drum, Mode};
use drumbench_config::BenchConfig;
use drumbench_diagnostics::DiagnosticCode;
use drumbench_oracle::DrumMachineOracle;
use drumbench_sim::{Device, MemoryImage, SimError};

/// A device and its oracle advanced together on both clocks.
struct TopBench<D: Device> {
    device: D,
    oracle: DrumMachineOracle,
    divider: ClockDivider,
    reset: bool,
    pb: u32,
}

impl<D: Device> TopBench<D> {
    fn drive(&mut self, reset: bool, pb: u32) -> Result<(), SimError> {
        self.reset = reset;
        self.pb = pb;
        self.device.set("reset", u64::from(reset))?;
        self.device.set("pb", u64::from(pb))?;
        self.device.eval();
        self.oracle.settle(reset, pb);
        Ok(())
    }

    fn fast_cycle(&mut self) -> Result<(), SimError> {
        self.device.set("hz2m", 0)?;
        self.device.eval();
        self.device.set("hz2m", 1)?;
        self.device.eval();
        self.oracle.fast_edge();
        if let Some(level) = self.divider.tick() {
            self.device.set("hz100", u64::from(level))?;
            self.device.eval();
            if level {
                self.oracle.slow_edge();
            }
        }
        Ok(())
    }

    fn cycles(&mut self, count: u64) -> Result<(), SimError> {
        for _ in 0..count {
            self.fast_cycle()?;
        }
        Ok(())
    }

    fn check_leds(&self, cmp: &mut Comparator, label: &str) -> Result<(), SimError> {
        let expected = self.oracle.leds();
        for (port, want) in [
            ("blue", expected.blue),
            ("green", expected.green),
            ("red", expected.red),
        ] {
            let want = u64::from(want);
            let seen = self.device.get(port)?;
            cmp.check(seen == want, || {
                mismatch(
                    DiagnosticCode::VALUE_MISMATCH,
                    label,
                    port,
                    &want.to_string(),
                    &seen.to_string(),
                )
                .with_note(format!("predicted mode {}", self.oracle.mode()))
                .with_note(format!("pb=0x{:05x} reset={}", self.pb, u8::from(self.reset)))
            });
        }
        Ok(())
    }

    fn record(
        &mut self,
        cmp: &mut Comparator,
        drum: Drum,
        samples: u32,
        window: u32,
    ) -> Result<Recording, SimError> {
        let mut recording = Recording::new(drum);
        let mut observed = SampleWindow::new(window);
        let mut predicted = SampleWindow::new(window);
        let mut index = 0;
        while index < samples {
            self.fast_cycle()?;
            let seen = observed.push(self.device.get("right")? != 0);
            let want = predicted.push(self.oracle.right());
            let (Some(seen), Some(want)) = (seen, want) else {
                continue;
            };
            recording.push(seen);
            cmp.check(seen == want, || {
                mismatch(
                    DiagnosticCode::SAMPLE_MISMATCH,
                    &format!("{drum} sample {index}"),
                    "right",
                    &format!("0x{want:02x}"),
                    &format!("0x{seen:02x}"),
                )
                .with_note(format!(
                    "{want} of {window} edges high expected, {seen} observed"
                ))
                .with_note(format!(
                    "{drum} player output 0x{:02x}",
                    self.oracle.player_output(drum)
                ))
            });
            index += 1;
        }
        Ok(recording)
    }
}

/// Runs the integrated phase against `device`, which must have been built
/// from `images` (in [`Drum::ALL`] order).
pub fn run<D: Device>(
    device: D,
    images: [MemoryImage; 4],
    config: &BenchConfig,
) -> Result<PhaseResult, HarnessError> {
    let _span = tracing::info_span!("phase", name = Phase::Top.name()).entered();
    let top = &config.top;
    let modulus = top
        .fast_clock
        .toggle_modulus(top.slow_clock)
        .map_err(|e| drumbench_config::ConfigError::ValidationError(format!("top clocks: {e}")))?;
    let oracle = DrumMachineOracle::new(
        priority(&config.controller)?,
        images,
        config.sample.latency as usize,
    );
    let mut bench = TopBench {
        device,
        oracle,
        divider: ClockDivider::new(modulus),
        reset: false,
        pb: 0,
    };
    let mut cmp = Comparator::new(Phase::Top, config.report.max_mismatches);

    bench.drive(false, 0)?;
    bench.drive(true, 0)?;
    bench.cycles(u64::from(top.reset_cycles))?;
    bench.drive(false, 0)?;
    bench.check_leds(&mut cmp, "after reset")?;

    let raw = 1 << Mode::Raw.button();
    bench.drive(false, raw)?;
    bench.cycles(bench.divider.edges_for(top.raw_periods))?;
    bench.check_leds(&mut cmp, "after RAW request")?;
    tracing::debug!(mode = %bench.oracle.mode(), "entered playback mode");

    let mut recordings = Vec::with_capacity(Drum::ALL.len());
    for drum in Drum::ALL {
        bench.drive(false, 0)?;
        bench.cycles(bench.divider.edges_for(top.release_periods))?;
        bench.drive(false, 1 << drum.button())?;
        bench.cycles(bench.divider.edges_for(top.press_periods))?;
        let mut recording = bench.record(&mut cmp, drum, top.samples, top.window)?;
        recording.pad_silence(top.tail_silence);
        tracing::debug!(%drum, samples = recording.samples().len(), "drum recorded");
        recordings.push(recording);
    }
    bench.device.finalize();

    let mut result = cmp.finish();
    result.recordings = recordings;
    tracing::info!(
        passed = result.tally.passed(),
        total = result.tally.total(),
        "phase finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drumbench_common::Frequency;
    use drumbench_models::{DrumMachine, DrumMachineFault};

    fn images() -> [MemoryImage; 4] {
        Drum::ALL.map(|drum| {
            let base = drum.button() as u8 * 16;
            MemoryImage::from_bytes(
                format!("{drum}.mem"),
                (0..32u8).map(|i| base.wrapping_add(i * 7)).collect(),
            )
            .unwrap()
        })
    }

    fn small_config() -> BenchConfig {
        let mut config = BenchConfig::default();
        config.top.fast_clock = Frequency::new(25_600.0);
        config.top.slow_clock = Frequency::new(100.0);
        config.top.samples = 12;
        config.top.tail_silence = 4;
        config.top.release_periods = 1;
        config
    }

    #[test]
    fn reference_machine_passes() {
        let config = small_config();
        let device = DrumMachine::new(images(), config.sample.latency as usize);
        let result = run(device, images(), &config).unwrap();
        assert!(result.tally.all_passed(), "{:?}", result.diagnostics);
        assert_eq!(result.tally.total(), 6 + 4 * 12);
        assert_eq!(result.recordings.len(), 4);
        assert_eq!(result.recordings[0].samples().len(), 16);
        assert_eq!(result.recordings[0].drum(), Drum::Kick);
    }

    #[test]
    fn unsigned_mix_fault_corrupts_audio() {
        let config = small_config();
        let device = DrumMachine::with_fault(
            images(),
            config.sample.latency as usize,
            DrumMachineFault::UnsignedMix,
        );
        let result = run(device, images(), &config).unwrap();
        assert!(result.tally.failed() > 0);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::SAMPLE_MISMATCH);
        assert!(result.diagnostics[0].message.starts_with("kick sample "));
    }
}
