//! PWM counter model.

use crate::EdgeDetector;
use drumbench_sim::{Device, PortId, PortMap, PortSpec};

const CLK: PortId = PortId::from_raw(0);
const RST: PortId = PortId::from_raw(1);
const ENABLE: PortId = PortId::from_raw(2);
const DUTY_CYCLE: PortId = PortId::from_raw(3);
const COUNTER: PortId = PortId::from_raw(4);
const PWM_OUT: PortId = PortId::from_raw(5);

const PORTS: [PortSpec; 6] = [
    PortSpec::input("clk", 1),
    PortSpec::input("rst", 1),
    PortSpec::input("enable", 1),
    PortSpec::input("duty_cycle", 8),
    PortSpec::output("counter", 8),
    PortSpec::output("pwm_out", 1),
];

/// Deliberate defects the PWM can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PwmFault {
    /// Compares `counter < duty_cycle`, losing the top step.
    CompareOffByOne,
    /// Keeps counting while disabled.
    CountsWhenDisabled,
}

/// An 8-bit free-running PWM counter with comparator output.
pub struct Pwm {
    ports: PortMap,
    clk: EdgeDetector,
    counter: u8,
    fault: Option<PwmFault>,
}

impl Pwm {
    /// Creates a correct PWM.
    pub fn new() -> Self {
        Self {
            ports: PortMap::new("pwm", &PORTS),
            clk: EdgeDetector::default(),
            counter: 0,
            fault: None,
        }
    }

    /// Creates a PWM with `fault` injected.
    pub fn with_fault(fault: PwmFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new()
        }
    }
}

impl Default for Pwm {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Pwm {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let rose = self.clk.rising(self.ports.read(CLK));
        let enable = self.ports.read(ENABLE) != 0;
        let duty = self.ports.read(DUTY_CYCLE) as u8;

        if self.ports.read(RST) != 0 {
            self.counter = 0;
        } else if rose && (enable || self.fault == Some(PwmFault::CountsWhenDisabled)) {
            self.counter = self.counter.wrapping_add(1);
        }

        let on = match self.fault {
            Some(PwmFault::CompareOffByOne) => self.counter < duty,
            _ => self.counter <= duty,
        };
        self.ports.write(COUNTER, u64::from(self.counter));
        self.ports.write(PWM_OUT, u64::from(enable && on));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(dev: &mut Pwm) {
        dev.set("clk", 1).unwrap();
        dev.eval();
        dev.set("clk", 0).unwrap();
        dev.eval();
    }

    #[test]
    fn counts_while_enabled() {
        let mut dev = Pwm::new();
        dev.set("enable", 1).unwrap();
        dev.set("duty_cycle", 255).unwrap();
        for _ in 0..3 {
            pulse(&mut dev);
        }
        assert_eq!(dev.get("counter").unwrap(), 3);
        assert_eq!(dev.get("pwm_out").unwrap(), 1);
    }

    #[test]
    fn output_low_when_disabled() {
        let mut dev = Pwm::new();
        dev.set("duty_cycle", 255).unwrap();
        pulse(&mut dev);
        assert_eq!(dev.get("counter").unwrap(), 0);
        assert_eq!(dev.get("pwm_out").unwrap(), 0);
    }

    #[test]
    fn off_by_one_fault_drops_equal_case() {
        let mut dev = Pwm::with_fault(PwmFault::CompareOffByOne);
        dev.set("enable", 1).unwrap();
        dev.set("duty_cycle", 0).unwrap();
        dev.eval();
        assert_eq!(dev.get("pwm_out").unwrap(), 0);
    }

    #[test]
    fn reset_clears_immediately() {
        let mut dev = Pwm::new();
        dev.set("enable", 1).unwrap();
        pulse(&mut dev);
        dev.set("rst", 1).unwrap();
        dev.eval();
        assert_eq!(dev.get("counter").unwrap(), 0);
    }
}
