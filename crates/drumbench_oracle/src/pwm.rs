//! PWM counter oracle.
//!
//! An 8-bit counter that increments modulo 256 on each enabled clock edge.
//! `pwm_out` is high iff the PWM is enabled and `counter <= duty_cycle`, so a
//! duty cycle of 255 is always on and 0 is on only while the counter is 0.

use crate::signals::Signals;
use crate::Oracle;

/// Shadow state of the PWM counter.
#[derive(Clone, Debug, Default)]
pub struct PwmOracle {
    counter: u8,
}

impl PwmOracle {
    /// Creates an oracle with the counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the predicted counter.
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Clears the counter, as the asynchronous reset does.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Advances by one clock edge.
    pub fn edge(&mut self, rst: bool, enable: bool) -> u8 {
        if rst {
            self.reset();
        } else if enable {
            self.counter = self.counter.wrapping_add(1);
        }
        self.counter
    }

    /// Returns the predicted output bit for the current counter.
    pub fn output(&self, enable: bool, duty_cycle: u8) -> bool {
        enable && self.counter <= duty_cycle
    }

    fn outputs(&self, inputs: &Signals) -> Signals {
        let out = self.output(inputs.is_high("enable"), duty_cycle(inputs));
        Signals::new()
            .with("counter", u64::from(self.counter))
            .with("pwm_out", u64::from(out))
    }
}

fn duty_cycle(inputs: &Signals) -> u8 {
    (inputs.get("duty_cycle") & 0xFF) as u8
}

impl Oracle for PwmOracle {
    fn name(&self) -> &'static str {
        "pwm"
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        if inputs.is_high("rst") {
            self.reset();
        }
        self.outputs(inputs)
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        self.edge(inputs.is_high("rst"), inputs.is_high("enable"));
        self.outputs(inputs)
    }

    fn peek(&self, inputs: &Signals) -> Signals {
        self.outputs(inputs)
    }

    fn context(
        &self,
        _ports: &drumbench_sim::PortMap,
        signal: &str,
        previous: &Signals,
        inputs: &Signals,
    ) -> Vec<String> {
        let mut notes = vec![format!(
            "counter was {} before this step",
            previous.get("counter")
        )];
        if signal == "pwm_out" {
            notes.push(format!(
                "predicted counter {} against duty_cycle {}",
                self.counter,
                duty_cycle(inputs)
            ));
        }
        notes.push(format!("inputs: {inputs}"));
        notes
    }
}
