//! Cycle-accurate prediction models for the drum machine's modules.
//!
//! Each oracle keeps shadow copies of the registers its module is supposed to
//! have and advances them by the module's rules, independently of the device
//! under test. The five per-module oracles share the [`Oracle`] interface and
//! are gathered in the closed [`ModuleOracle`] enum so the generic stimulus
//! runner can drive any of them. [`DrumMachineOracle`] composes them into a
//! prediction of the integrated design.
//!
//! Every oracle exposes two kinds of update:
//!
//! - [`Oracle::settle`] applies only asynchronous effects (the dominant `rst`
//!   input) and never advances on a clock edge.
//! - [`Oracle::apply`] advances by exactly one rising clock edge.
//!
//! [`Oracle::peek`] reads the prediction without changing it.

#![warn(missing_docs)]

pub mod editor;
pub mod machine;
pub mod mode;
pub mod playback;
pub mod pwm;
pub mod sequencer;
pub mod signals;

use drumbench_sim::{PortMap, SimError};

pub use editor::EditorOracle;
pub use machine::{DrumMachineOracle, Leds};
pub use mode::{ModeOracle, Requests};
pub use playback::PlaybackOracle;
pub use pwm::PwmOracle;
pub use sequencer::SequencerOracle;
pub use signals::Signals;

/// Common contract of the per-module prediction engines.
pub trait Oracle {
    /// Short module name, used in labels and reports.
    fn name(&self) -> &'static str;

    /// Applies asynchronous effects of `inputs` without a clock edge and
    /// returns the predicted outputs.
    fn settle(&mut self, inputs: &Signals) -> Signals;

    /// Advances by one rising clock edge under `inputs` and returns the
    /// predicted outputs.
    fn apply(&mut self, inputs: &Signals) -> Signals;

    /// Returns the predicted outputs under `inputs` without advancing.
    ///
    /// Inputs matter only for outputs that are combinational in them.
    fn peek(&self, inputs: &Signals) -> Signals;

    /// Reads from the device the observables [`peek`](Oracle::peek) predicts.
    ///
    /// The default reads one port per predicted signal.
    fn observe(&self, ports: &PortMap, inputs: &Signals) -> Result<Signals, SimError> {
        let mut observed = Signals::new();
        for (name, _) in self.peek(inputs).iter() {
            observed.set(name, ports.value(name)?);
        }
        Ok(observed)
    }

    /// Renders a value of `signal` for a diagnostic.
    fn format(&self, ports: &PortMap, signal: &str, value: u64) -> String {
        match ports.spec(signal) {
            Ok(spec) => spec.format(value),
            Err(_) => value.to_string(),
        }
    }

    /// Context notes for a mismatch on `signal`, given the prediction before
    /// the step and the inputs it applied.
    fn context(&self, ports: &PortMap, signal: &str, previous: &Signals, inputs: &Signals) -> Vec<String> {
        let mut notes = Vec::new();
        if let Some(value) = previous.lookup(signal) {
            notes.push(format!(
                "{signal} was {} before this step",
                self.format(ports, signal, value)
            ));
        }
        if !inputs.is_empty() {
            notes.push(format!("inputs: {inputs}"));
        }
        notes
    }
}

/// The closed set of per-module oracles.
#[derive(Clone, Debug)]
pub enum ModuleOracle {
    /// Mode controller.
    Mode(ModeOracle),
    /// PWM counter.
    Pwm(PwmOracle),
    /// Rotating one-hot sequencer.
    Sequencer(SequencerOracle),
    /// Toggle-accumulator sequence editor.
    Editor(EditorOracle),
    /// ROM playback sequencer.
    Playback(PlaybackOracle),
}

macro_rules! dispatch {
    ($self:expr, $o:ident => $body:expr) => {
        match $self {
            ModuleOracle::Mode($o) => $body,
            ModuleOracle::Pwm($o) => $body,
            ModuleOracle::Sequencer($o) => $body,
            ModuleOracle::Editor($o) => $body,
            ModuleOracle::Playback($o) => $body,
        }
    };
}

impl Oracle for ModuleOracle {
    fn name(&self) -> &'static str {
        dispatch!(self, o => o.name())
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        dispatch!(self, o => o.settle(inputs))
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        dispatch!(self, o => o.apply(inputs))
    }

    fn peek(&self, inputs: &Signals) -> Signals {
        dispatch!(self, o => o.peek(inputs))
    }

    fn observe(&self, ports: &PortMap, inputs: &Signals) -> Result<Signals, SimError> {
        dispatch!(self, o => o.observe(ports, inputs))
    }

    fn format(&self, ports: &PortMap, signal: &str, value: u64) -> String {
        dispatch!(self, o => o.format(ports, signal, value))
    }

    fn context(&self, ports: &PortMap, signal: &str, previous: &Signals, inputs: &Signals) -> Vec<String> {
        dispatch!(self, o => o.context(ports, signal, previous, inputs))
    }
}

impl From<ModeOracle> for ModuleOracle {
    fn from(o: ModeOracle) -> Self {
        ModuleOracle::Mode(o)
    }
}

impl From<PwmOracle> for ModuleOracle {
    fn from(o: PwmOracle) -> Self {
        ModuleOracle::Pwm(o)
    }
}

impl From<SequencerOracle> for ModuleOracle {
    fn from(o: SequencerOracle) -> Self {
        ModuleOracle::Sequencer(o)
    }
}

impl From<EditorOracle> for ModuleOracle {
    fn from(o: EditorOracle) -> Self {
        ModuleOracle::Editor(o)
    }
}

impl From<PlaybackOracle> for ModuleOracle {
    fn from(o: PlaybackOracle) -> Self {
        ModuleOracle::Playback(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_variant() {
        let mut oracle = ModuleOracle::from(SequencerOracle::new());
        assert_eq!(oracle.name(), "sequencer");
        let inputs = Signals::new().with("go_right", 1);
        let out = oracle.apply(&inputs);
        assert_eq!(out.get("seq_out"), 0x40);
        assert_eq!(oracle.peek(&inputs).get("seq_out"), 0x40);
    }

    #[test]
    fn variants_are_independent() {
        let mut a = ModuleOracle::from(PwmOracle::new());
        let b = ModuleOracle::from(PwmOracle::new());
        let inputs = Signals::new().with("enable", 1).with("duty_cycle", 255);
        a.apply(&inputs);
        assert_eq!(a.peek(&inputs).get("counter"), 1);
        assert_eq!(b.peek(&inputs).get("counter"), 0);
    }
}
