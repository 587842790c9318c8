//! Rotating one-hot sequencer model.

use crate::EdgeDetector;
use drumbench_sim::{Device, PortId, PortMap, PortSpec, Radix};

const CLK: PortId = PortId::from_raw(0);
const RST: PortId = PortId::from_raw(1);
const SRST: PortId = PortId::from_raw(2);
const GO_LEFT: PortId = PortId::from_raw(3);
const GO_RIGHT: PortId = PortId::from_raw(4);
const SEQ_OUT: PortId = PortId::from_raw(5);

const PORTS: [PortSpec; 6] = [
    PortSpec::input("clk", 1),
    PortSpec::input("rst", 1),
    PortSpec::input("srst", 1),
    PortSpec::input("go_left", 1),
    PortSpec::input("go_right", 1),
    PortSpec::output("seq_out", 8).with_radix(Radix::Hex),
];

const RESET_VALUE: u8 = 0x80;

/// Deliberate defects the sequencer can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SequencerFault {
    /// `srst` acts immediately instead of on the next edge.
    AsyncSrst,
    /// With both directions asserted the register rotates left instead of holding.
    BothRotatesLeft,
}

/// An 8-bit one-hot rotating shift register.
pub struct Sequencer {
    ports: PortMap,
    clk: EdgeDetector,
    value: u8,
    fault: Option<SequencerFault>,
}

impl Sequencer {
    /// Creates a correct sequencer.
    pub fn new() -> Self {
        Self {
            ports: PortMap::new("sequencer", &PORTS),
            clk: EdgeDetector::default(),
            value: RESET_VALUE,
            fault: None,
        }
    }

    /// Creates a sequencer with `fault` injected.
    pub fn with_fault(fault: SequencerFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new()
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Sequencer {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let rose = self.clk.rising(self.ports.read(CLK));
        let srst = self.ports.read(SRST) != 0;
        let left = self.ports.read(GO_LEFT) != 0;
        let right = self.ports.read(GO_RIGHT) != 0;

        if self.ports.read(RST) != 0 || (srst && self.fault == Some(SequencerFault::AsyncSrst)) {
            self.value = RESET_VALUE;
        } else if rose {
            self.value = if srst {
                RESET_VALUE
            } else if left && right && self.fault == Some(SequencerFault::BothRotatesLeft) {
                self.value.rotate_left(1)
            } else if left && !right {
                self.value.rotate_left(1)
            } else if right && !left {
                self.value.rotate_right(1)
            } else {
                self.value
            };
        }
        self.ports.write(SEQ_OUT, u64::from(self.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(dev: &mut Sequencer) {
        dev.set("clk", 1).unwrap();
        dev.eval();
        dev.set("clk", 0).unwrap();
        dev.eval();
    }

    #[test]
    fn rotates_right_with_wrap() {
        let mut dev = Sequencer::new();
        dev.set("go_right", 1).unwrap();
        for _ in 0..7 {
            pulse(&mut dev);
        }
        assert_eq!(dev.get("seq_out").unwrap(), 0x01);
        pulse(&mut dev);
        assert_eq!(dev.get("seq_out").unwrap(), 0x80);
    }

    #[test]
    fn srst_is_synchronous() {
        let mut dev = Sequencer::new();
        dev.set("go_left", 1).unwrap();
        pulse(&mut dev);
        dev.set("srst", 1).unwrap();
        dev.eval();
        assert_eq!(dev.get("seq_out").unwrap(), 0x01);
        pulse(&mut dev);
        assert_eq!(dev.get("seq_out").unwrap(), 0x80);
    }

    #[test]
    fn async_srst_fault_acts_immediately() {
        let mut dev = Sequencer::with_fault(SequencerFault::AsyncSrst);
        dev.set("go_left", 1).unwrap();
        pulse(&mut dev);
        dev.set("srst", 1).unwrap();
        dev.eval();
        assert_eq!(dev.get("seq_out").unwrap(), 0x80);
    }

    #[test]
    fn both_directions_hold() {
        let mut dev = Sequencer::new();
        dev.set("go_left", 1).unwrap();
        dev.set("go_right", 1).unwrap();
        pulse(&mut dev);
        assert_eq!(dev.get("seq_out").unwrap(), 0x80);
    }
}
