//! Sample player model: a wrapping ROM reader with a registered output pipeline.

use crate::EdgeDetector;
use drumbench_sim::{Device, MemoryImage, PortId, PortMap, PortSpec, Radix};

const CLK: PortId = PortId::from_raw(0);
const RST: PortId = PortId::from_raw(1);
const ENABLE: PortId = PortId::from_raw(2);
const OUT: PortId = PortId::from_raw(3);

const PORTS: [PortSpec; 4] = [
    PortSpec::input("clk", 1),
    PortSpec::input("rst", 1),
    PortSpec::input("enable", 1),
    PortSpec::output("out", 8).with_radix(Radix::Hex),
];

/// Deliberate defects the sample player can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SampleFault {
    /// One pipeline stage is missing, so the output runs an edge early.
    ShortPipeline,
}

/// Address counter, ROM and output registers shared with the drum machine model.
#[derive(Clone, Debug)]
pub(crate) struct PlayerCore {
    rom: MemoryImage,
    address: usize,
    stages: Vec<u8>,
}

impl PlayerCore {
    /// A player with `stages` output registers. Zero stages reads the ROM
    /// combinationally.
    pub(crate) fn new(rom: MemoryImage, stages: usize) -> Self {
        let first = rom.at(0);
        Self {
            rom,
            address: 0,
            stages: vec![first; stages],
        }
    }

    pub(crate) fn reset(&mut self) {
        self.address = 0;
        let first = self.rom.at(0);
        self.stages.iter_mut().for_each(|s| *s = first);
    }

    pub(crate) fn advance(&mut self) {
        let fetched = self.rom.at(self.address);
        if !self.stages.is_empty() {
            self.stages.remove(0);
            self.stages.push(fetched);
        }
        self.address = (self.address + 1) % self.rom.len();
    }

    pub(crate) fn output(&self) -> u8 {
        match self.stages.first() {
            Some(&value) => value,
            None => self.rom.at(self.address),
        }
    }
}

/// A sample player reading a memory image.
pub struct SamplePlayer {
    ports: PortMap,
    clk: EdgeDetector,
    core: PlayerCore,
}

impl SamplePlayer {
    /// Creates a correct player with `latency` edges between address and output.
    pub fn new(rom: MemoryImage, latency: usize) -> Self {
        Self {
            ports: PortMap::new("sample", &PORTS),
            clk: EdgeDetector::default(),
            core: PlayerCore::new(rom, latency),
        }
    }

    /// Creates a player with `fault` injected.
    pub fn with_fault(rom: MemoryImage, latency: usize, fault: SampleFault) -> Self {
        let stages = match fault {
            SampleFault::ShortPipeline => latency.saturating_sub(1),
        };
        Self {
            ports: PortMap::new("sample", &PORTS),
            clk: EdgeDetector::default(),
            core: PlayerCore::new(rom, stages),
        }
    }
}

impl Device for SamplePlayer {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let rose = self.clk.rising(self.ports.read(CLK));
        if self.ports.read(RST) != 0 {
            self.core.reset();
        } else if rose && self.ports.read(ENABLE) != 0 {
            self.core.advance();
        }
        self.ports.write(OUT, u64::from(self.core.output()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom() -> MemoryImage {
        MemoryImage::from_bytes("t.mem", vec![0xA0, 0xA1, 0xA2, 0xA3]).unwrap()
    }

    fn pulse(dev: &mut SamplePlayer) {
        dev.set("clk", 1).unwrap();
        dev.eval();
        dev.set("clk", 0).unwrap();
        dev.eval();
    }

    #[test]
    fn reset_shows_first_entry() {
        let mut dev = SamplePlayer::new(rom(), 2);
        dev.set("rst", 1).unwrap();
        dev.eval();
        assert_eq!(dev.get("out").unwrap(), 0xA0);
    }

    #[test]
    fn two_edge_latency() {
        let mut dev = SamplePlayer::new(rom(), 2);
        dev.set("enable", 1).unwrap();
        let seen: Vec<u64> = (0..6)
            .map(|_| {
                pulse(&mut dev);
                dev.get("out").unwrap()
            })
            .collect();
        assert_eq!(seen, vec![0xA0, 0xA0, 0xA1, 0xA2, 0xA3, 0xA0]);
    }

    #[test]
    fn short_pipeline_runs_early() {
        let mut dev = SamplePlayer::with_fault(rom(), 2, SampleFault::ShortPipeline);
        dev.set("enable", 1).unwrap();
        pulse(&mut dev);
        pulse(&mut dev);
        assert_eq!(dev.get("out").unwrap(), 0xA1);
    }

    #[test]
    fn holds_when_disabled() {
        let mut dev = SamplePlayer::new(rom(), 1);
        dev.set("enable", 1).unwrap();
        pulse(&mut dev);
        pulse(&mut dev);
        dev.set("enable", 0).unwrap();
        pulse(&mut dev);
        assert_eq!(dev.get("out").unwrap(), 0xA1);
    }

    #[test]
    fn zero_stage_core_reads_combinationally() {
        let mut core = PlayerCore::new(rom(), 0);
        assert_eq!(core.output(), 0xA0);
        core.advance();
        assert_eq!(core.output(), 0xA1);
    }
}
