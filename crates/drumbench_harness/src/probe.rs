//! Empirical request-priority probe for the mode controller.
//!
//! A fresh controller is reset, driven with one combination of simultaneous
//! requests and clocked once; the mode it lands in is the winner of that
//! combination. The pairwise winners rank the three modes.

use crate::error::HarnessError;
use crate::phases::controller::{describe_requests, SIMULTANEOUS};
use drumbench_common::Mode;
use drumbench_diagnostics::{Diagnostic, DiagnosticCode};
use drumbench_sim::{ClockDriver, Device};

/// The mode a controller selected for one request combination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeObservation {
    /// Requests asserted together.
    pub requests: Vec<Mode>,
    /// Raw value of the `mode` output after the edge.
    pub value: u64,
}

impl ProbeObservation {
    /// The selected mode, or `None` if the output is not a valid encoding.
    pub fn selected(&self) -> Option<Mode> {
        Mode::from_encoding(self.value)
    }
}

/// Observations for every request combination.
#[derive(Clone, Debug, Default)]
pub struct PriorityProbe {
    observations: Vec<ProbeObservation>,
}

impl PriorityProbe {
    /// Returns the observations in probe order.
    pub fn observations(&self) -> &[ProbeObservation] {
        &self.observations
    }

    /// Returns the observed winner when exactly `a` and `b` are requested.
    pub fn winner(&self, a: Mode, b: Mode) -> Option<Mode> {
        self.observations
            .iter()
            .find(|o| o.requests.len() == 2 && o.requests.contains(&a) && o.requests.contains(&b))
            .and_then(ProbeObservation::selected)
    }

    /// Ranks the modes highest first, or `None` if the observations are not
    /// consistent with a strict priority.
    pub fn ranking(&self) -> Option<[Mode; 3]> {
        let mut wins = [(Mode::Edit, 0u8), (Mode::Play, 0), (Mode::Raw, 0)];
        for observation in self.observations.iter().filter(|o| o.requests.len() == 2) {
            let selected = observation.selected()?;
            if !observation.requests.contains(&selected) {
                return None;
            }
            let slot = wins.iter_mut().find(|(mode, _)| *mode == selected)?;
            slot.1 += 1;
        }
        wins.sort_by(|a, b| b.1.cmp(&a.1));
        if wins.map(|(_, w)| w) != [2, 1, 0] {
            return None;
        }
        let ranking = wins.map(|(mode, _)| mode);
        let all = self.observations.iter().find(|o| o.requests.len() == 3)?;
        (all.selected() == Some(ranking[0])).then_some(ranking)
    }

    /// One note per observation, for the report.
    pub fn notes(&self) -> Vec<Diagnostic> {
        self.observations
            .iter()
            .map(|o| {
                let outcome = match o.selected() {
                    Some(mode) => mode.to_string(),
                    None => format!("invalid mode {}", o.value),
                };
                Diagnostic::note(
                    DiagnosticCode::PRIORITY_OBSERVED,
                    format!("{} selects {outcome}", describe_requests(&o.requests)),
                )
            })
            .collect()
    }
}

/// Probes controllers built by `make`, one fresh device per combination.
pub fn probe_priority<D: Device>(
    mut make: impl FnMut() -> D,
) -> Result<PriorityProbe, HarnessError> {
    let mut probe = PriorityProbe::default();
    for requests in SIMULTANEOUS {
        let mut driver = ClockDriver::new(make(), "clk")?;
        driver.set("rst", 1)?;
        driver.settle();
        driver.set("rst", 0)?;
        for mode in Mode::ALL {
            driver.set(mode.request_port(), u64::from(requests.contains(&mode)))?;
        }
        driver.settle();
        driver.pulse()?;
        let value = driver.get("mode")?;
        tracing::debug!(requests = %describe_requests(requests), value, "probe observation");
        probe.observations.push(ProbeObservation {
            requests: requests.to_vec(),
            value,
        });
    }
    Ok(probe)
}
