//! Bench orchestration: image loading, model construction and the phase loop.

use crate::error::HarnessError;
use crate::phases::{self, controller, Phase, PhaseResult};
use crate::probe::probe_priority;
use crate::tally::Scoreboard;
use drumbench_common::{Drum, InternalError};
use drumbench_config::{BenchConfig, ImageConfig};
use drumbench_models::{Controller, DrumMachine, Pwm, SamplePlayer, SequenceEditor, Sequencer};
use drumbench_sim::{load_image, MemoryImage, SimError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Memory images loaded for a run, one optional slot per drum.
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    slots: [Option<MemoryImage>; 4],
}

fn slot(drum: Drum) -> usize {
    Drum::ALL.iter().position(|&d| d == drum).unwrap_or(0)
}

impl ImageSet {
    /// Loads the images of `drums` from `base` joined with the configured directory.
    pub fn load(config: &ImageConfig, base: &Path, drums: &[Drum]) -> Result<Self, SimError> {
        let mut set = Self::default();
        for &drum in drums {
            if set.slots[slot(drum)].is_some() {
                continue;
            }
            let image = load_image(&config.path(base, drum))?;
            tracing::info!(%drum, entries = image.len(), "image loaded");
            set.slots[slot(drum)] = Some(image);
        }
        Ok(set)
    }

    /// Returns the image of `drum`.
    pub fn get(&self, drum: Drum) -> Result<&MemoryImage, InternalError> {
        self.slots[slot(drum)]
            .as_ref()
            .ok_or_else(|| InternalError::new(format!("image for {drum} was never loaded")))
    }

    /// Returns all four images in [`Drum::ALL`] order.
    pub fn all(&self) -> Result<[MemoryImage; 4], InternalError> {
        Ok([
            self.get(Drum::Kick)?.clone(),
            self.get(Drum::Clap)?.clone(),
            self.get(Drum::Hihat)?.clone(),
            self.get(Drum::Snare)?.clone(),
        ])
    }
}

/// A configured bench rooted at a directory.
pub struct Bench {
    config: BenchConfig,
    root: PathBuf,
}

impl Bench {
    /// Creates a bench; relative image paths resolve against `root`.
    pub fn new(config: BenchConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Drums whose images `phases` read.
    pub fn required_drums(&self, phases: &[Phase]) -> Vec<Drum> {
        let mut drums = Vec::new();
        if phases.contains(&Phase::Top) {
            drums.extend(Drum::ALL);
        } else if phases.contains(&Phase::Sample) {
            drums.push(self.config.sample.image);
        }
        drums
    }

    /// Loads every image `phases` need, failing on the first one missing.
    pub fn load_images(&self, phases: &[Phase]) -> Result<ImageSet, HarnessError> {
        let drums = self.required_drums(phases);
        Ok(ImageSet::load(&self.config.images, &self.root, &drums)?)
    }

    /// Runs one phase against the reference model.
    pub fn run_phase(&self, phase: Phase, images: &ImageSet) -> Result<PhaseResult, HarnessError> {
        let max = self.config.report.max_mismatches;
        let latency = self.config.sample.latency as usize;
        match phase {
            Phase::Controller => {
                let mut result = controller::run(Controller::new(), &self.config.controller, max)?;
                let probe = probe_priority(Controller::new)?;
                if probe.ranking() != Some(controller::priority(&self.config.controller)?) {
                    tracing::warn!("controller priority differs from the configured order");
                }
                result.notes = probe.notes();
                Ok(result)
            }
            Phase::Pwm => phases::pwm::run(Pwm::new(), max),
            Phase::Sequencer => phases::sequencer::run(Sequencer::new(), max),
            Phase::SequenceEditor => phases::editor::run(SequenceEditor::new(), max),
            Phase::Sample => {
                let image = images.get(self.config.sample.image)?;
                let device = SamplePlayer::new(image.clone(), latency);
                phases::sample::run(device, image, &self.config.sample, max)
            }
            Phase::Top => {
                let device = DrumMachine::new(images.all()?, latency);
                phases::top::run(device, images.all()?, &self.config)
            }
        }
    }

    /// Runs `phases` in order (duplicates dropped) and folds their tallies.
    ///
    /// Images are loaded before any phase starts. With `parallel` the phases
    /// run on the rayon pool; results are still folded in the given order.
    pub fn run(&self, phases: &[Phase], parallel: bool) -> Result<Scoreboard, HarnessError> {
        let mut selected: Vec<Phase> = Vec::with_capacity(phases.len());
        for &phase in phases {
            if !selected.contains(&phase) {
                selected.push(phase);
            }
        }
        let images = self.load_images(&selected)?;
        tracing::info!(phases = selected.len(), parallel, "starting bench");

        let results: Vec<Result<PhaseResult, HarnessError>> = if parallel {
            selected
                .par_iter()
                .map(|&phase| self.run_phase(phase, &images))
                .collect()
        } else {
            selected
                .iter()
                .map(|&phase| self.run_phase(phase, &images))
                .collect()
        };

        let mut board = Scoreboard::named(&self.config.bench.name);
        for result in results {
            board.record(result?)?;
        }
        Ok(board)
    }
}
