//! The clock/reset driver.
//!
//! Every state transition a sequential device makes happens inside
//! [`ClockDriver::pulse`]. [`ClockDriver::settle`] re-evaluates without
//! touching the clock, which is how asynchronous behavior is told apart from
//! synchronous behavior: an asynchronous reset must show up after `settle`,
//! a synchronous one only after the next `pulse`.

use crate::error::SimError;
use crate::port::{Device, Direction};

/// Drives a device's clock and inputs, counting rising edges.
pub struct ClockDriver<D: Device> {
    device: D,
    clock: &'static str,
    edges: u64,
}

impl<D: Device> ClockDriver<D> {
    /// Wraps `device`, using the 1-bit input `clock` as its clock.
    pub fn new(device: D, clock: &'static str) -> Result<Self, SimError> {
        let spec = device.ports().spec(clock)?;
        if spec.direction != Direction::Input {
            return Err(SimError::NotAnInput {
                device: device.name().to_string(),
                port: clock.to_string(),
            });
        }
        Ok(Self {
            device,
            clock,
            edges: 0,
        })
    }

    /// Drives an input without evaluating.
    pub fn set(&mut self, port: &str, value: u64) -> Result<(), SimError> {
        self.device.set(port, value)
    }

    /// Reads a port.
    pub fn get(&self, port: &str) -> Result<u64, SimError> {
        self.device.get(port)
    }

    /// Drives several inputs without evaluating.
    pub fn drive(&mut self, assignments: &[(&str, u64)]) -> Result<(), SimError> {
        for &(port, value) in assignments {
            self.device.set(port, value)?;
        }
        Ok(())
    }

    /// Re-resolves the device from its current inputs without clocking it.
    pub fn settle(&mut self) {
        self.device.eval();
    }

    /// Issues one clock pulse: clock high and settle, then clock low and settle.
    pub fn pulse(&mut self) -> Result<(), SimError> {
        self.device.set(self.clock, 1)?;
        self.device.eval();
        self.device.set(self.clock, 0)?;
        self.device.eval();
        self.edges += 1;
        Ok(())
    }

    /// Issues `count` clock pulses.
    pub fn pulses(&mut self, count: u32) -> Result<(), SimError> {
        for _ in 0..count {
            self.pulse()?;
        }
        Ok(())
    }

    /// Returns the number of rising edges issued so far.
    pub fn edges(&self) -> u64 {
        self.edges
    }

    /// Returns the clock port name.
    pub fn clock(&self) -> &'static str {
        self.clock
    }

    /// Returns the wrapped device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the wrapped device mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Finalizes the device and returns it.
    pub fn finish(mut self) -> D {
        self.device.finalize();
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortId, PortMap, PortSpec};

    const CLK: PortId = PortId::from_raw(0);
    const RST: PortId = PortId::from_raw(1);
    const COUNT: PortId = PortId::from_raw(2);

    const PORTS: [PortSpec; 3] = [
        PortSpec::input("clk", 1),
        PortSpec::input("rst", 1),
        PortSpec::output("count", 8),
    ];

    /// Rising-edge counter with asynchronous reset.
    struct Counter {
        ports: PortMap,
        last_clk: u64,
        finalized: bool,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                ports: PortMap::new("counter", &PORTS),
                last_clk: 0,
                finalized: false,
            }
        }
    }

    impl Device for Counter {
        fn ports(&self) -> &PortMap {
            &self.ports
        }

        fn ports_mut(&mut self) -> &mut PortMap {
            &mut self.ports
        }

        fn eval(&mut self) {
            let clk = self.ports.read(CLK);
            let count = self.ports.read(COUNT);
            if self.ports.read(RST) == 1 {
                self.ports.write(COUNT, 0);
            } else if clk == 1 && self.last_clk == 0 {
                self.ports.write(COUNT, count + 1);
            }
            self.last_clk = clk;
        }

        fn finalize(&mut self) {
            self.finalized = true;
        }
    }

    #[test]
    fn pulse_advances_once() {
        let mut driver = ClockDriver::new(Counter::new(), "clk").unwrap();
        driver.pulse().unwrap();
        assert_eq!(driver.get("count").unwrap(), 1);
        assert_eq!(driver.get("clk").unwrap(), 0);
        assert_eq!(driver.edges(), 1);
    }

    #[test]
    fn settle_does_not_clock() {
        let mut driver = ClockDriver::new(Counter::new(), "clk").unwrap();
        driver.pulses(3).unwrap();
        driver.settle();
        driver.settle();
        assert_eq!(driver.get("count").unwrap(), 3);
    }

    #[test]
    fn async_reset_visible_after_settle() {
        let mut driver = ClockDriver::new(Counter::new(), "clk").unwrap();
        driver.pulses(5).unwrap();
        driver.drive(&[("rst", 1)]).unwrap();
        driver.settle();
        assert_eq!(driver.get("count").unwrap(), 0);
    }

    #[test]
    fn unknown_clock_rejected() {
        assert!(matches!(
            ClockDriver::new(Counter::new(), "hz2m"),
            Err(SimError::UnknownPort { .. })
        ));
    }

    #[test]
    fn output_clock_rejected() {
        assert!(matches!(
            ClockDriver::new(Counter::new(), "count"),
            Err(SimError::NotAnInput { .. })
        ));
    }

    #[test]
    fn finish_finalizes() {
        let driver = ClockDriver::new(Counter::new(), "clk").unwrap();
        assert!(driver.finish().finalized);
    }
}
