//! Stimulus steps: input assignments paired with a settle or pulse action.

use std::fmt;

/// What the driver does after a step's inputs are applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    /// Re-evaluate without clocking.
    Settle,
    /// Settle, then issue this many clock pulses.
    Pulse(u32),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Settle => write!(f, "settle"),
            Action::Pulse(1) => write!(f, "pulse"),
            Action::Pulse(n) => write!(f, "{n} pulses"),
        }
    }
}

/// One step of a fixed stimulus sequence.
///
/// Steps are built by a phase before anything runs and are never modified
/// afterwards. Inputs not named in a step keep their previous value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StimulusStep {
    label: String,
    assignments: Vec<(&'static str, u64)>,
    action: Action,
    checked: bool,
}

impl StimulusStep {
    /// A step that applies its inputs and settles.
    pub fn settle(label: impl Into<String>) -> Self {
        Self::new(label, Action::Settle)
    }

    /// A step that applies its inputs and issues one clock pulse.
    pub fn pulse(label: impl Into<String>) -> Self {
        Self::new(label, Action::Pulse(1))
    }

    /// A step that applies its inputs and issues `count` clock pulses.
    pub fn pulses(label: impl Into<String>, count: u32) -> Self {
        Self::new(label, Action::Pulse(count))
    }

    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            assignments: Vec::new(),
            action,
            checked: true,
        }
    }

    /// Adds an input assignment.
    pub fn with(mut self, port: &'static str, value: u64) -> Self {
        self.assignments.push((port, value));
        self
    }

    /// Marks the step as stimulus only; its outputs are not compared.
    pub fn unchecked(mut self) -> Self {
        self.checked = false;
        self
    }

    /// Returns the label used in diagnostics.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the input assignments in application order.
    pub fn assignments(&self) -> &[(&'static str, u64)] {
        &self.assignments
    }

    /// Returns the action taken after the inputs are applied.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns `true` if the step's outputs are compared against the oracle.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Renders the assignments as `port=value` pairs.
    pub fn describe_inputs(&self) -> String {
        self.assignments
            .iter()
            .map(|(port, value)| format!("{port}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let step = StimulusStep::pulse("going right")
            .with("go_right", 1)
            .with("go_left", 0);
        assert_eq!(step.label(), "going right");
        assert_eq!(step.action(), Action::Pulse(1));
        assert_eq!(step.assignments(), &[("go_right", 1), ("go_left", 0)]);
        assert!(step.is_checked());
    }

    #[test]
    fn unchecked_step() {
        let step = StimulusStep::pulses("startup", 2).unchecked();
        assert_eq!(step.action(), Action::Pulse(2));
        assert!(!step.is_checked());
    }

    #[test]
    fn describe_inputs() {
        let step = StimulusStep::settle("reset").with("rst", 1).with("srst", 0);
        assert_eq!(step.describe_inputs(), "rst=1 srst=0");
        assert_eq!(StimulusStep::settle("x").describe_inputs(), "");
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Settle.to_string(), "settle");
        assert_eq!(Action::Pulse(1).to_string(), "pulse");
        assert_eq!(Action::Pulse(16).to_string(), "16 pulses");
    }
}
