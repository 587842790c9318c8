//! The integrated drum machine.

use crate::sample::PlayerCore;
use crate::EdgeDetector;
use drumbench_common::{bit, Drum, Mode};
use drumbench_sim::{Device, MemoryImage, PortId, PortMap, PortSpec, Radix};

const HZ2M: PortId = PortId::from_raw(0);
const HZ100: PortId = PortId::from_raw(1);
const RESET: PortId = PortId::from_raw(2);
const PB: PortId = PortId::from_raw(3);
const BLUE: PortId = PortId::from_raw(4);
const GREEN: PortId = PortId::from_raw(5);
const RED: PortId = PortId::from_raw(6);
const RIGHT: PortId = PortId::from_raw(7);

const PORTS: [PortSpec; 8] = [
    PortSpec::input("hz2m", 1),
    PortSpec::input("hz100", 1),
    PortSpec::input("reset", 1),
    PortSpec::input("pb", 20).with_radix(Radix::Hex),
    PortSpec::output("blue", 1),
    PortSpec::output("green", 1),
    PortSpec::output("red", 1),
    PortSpec::output("right", 1),
];

/// Deliberate defects the drum machine can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrumMachineFault {
    /// The signed mix is fed to the PWM without the offset to unsigned.
    UnsignedMix,
}

/// The drum machine: mode controller, four sample players, a mixer and a PWM
/// audio output.
///
/// The controller runs on `hz100` and the audio path on `hz2m`. Each player
/// advances once per PWM period and is held in reset unless the machine is in
/// RAW mode with its drum's button pressed.
pub struct DrumMachine {
    ports: PortMap,
    fast: EdgeDetector,
    slow: EdgeDetector,
    mode: Mode,
    counter: u8,
    players: Vec<PlayerCore>,
    fault: Option<DrumMachineFault>,
}

impl DrumMachine {
    /// Creates a correct drum machine from one ROM per drum in [`Drum::ALL`]
    /// order.
    pub fn new(roms: [MemoryImage; 4], latency: usize) -> Self {
        Self {
            ports: PortMap::new("top", &PORTS),
            fast: EdgeDetector::default(),
            slow: EdgeDetector::default(),
            mode: Mode::Edit,
            counter: 0,
            players: roms
                .into_iter()
                .map(|rom| PlayerCore::new(rom, latency))
                .collect(),
            fault: None,
        }
    }

    /// Creates a drum machine with `fault` injected.
    pub fn with_fault(roms: [MemoryImage; 4], latency: usize, fault: DrumMachineFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new(roms, latency)
        }
    }

    fn active(&self, drum: Drum) -> bool {
        self.ports.read(RESET) == 0
            && self.mode == Mode::Raw
            && bit(self.ports.read(PB), drum.button())
    }

    fn next_mode(&self) -> Mode {
        let pb = self.ports.read(PB);
        if bit(pb, Mode::Raw.button()) {
            Mode::Raw
        } else if bit(pb, Mode::Play.button()) {
            Mode::Play
        } else if bit(pb, Mode::Edit.button()) {
            Mode::Edit
        } else {
            self.mode
        }
    }

    fn duty(&self) -> u8 {
        let mix = Drum::ALL
            .iter()
            .zip(&self.players)
            .filter(|&(&drum, _)| self.active(drum))
            .fold(0i8, |acc, (_, player)| {
                acc.saturating_add(player.output() as i8)
            });
        match self.fault {
            Some(DrumMachineFault::UnsignedMix) => mix as u8,
            None => (mix as u8) ^ 0x80,
        }
    }
}

impl Device for DrumMachine {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let fast = self.fast.rising(self.ports.read(HZ2M));
        let slow = self.slow.rising(self.ports.read(HZ100));
        let reset = self.ports.read(RESET) != 0;

        if reset {
            self.mode = Mode::Edit;
            self.counter = 0;
        } else {
            if slow {
                self.mode = self.next_mode();
            }
            if fast {
                let wrap = self.counter == u8::MAX;
                for (i, drum) in Drum::ALL.into_iter().enumerate() {
                    if wrap && self.active(drum) {
                        self.players[i].advance();
                    }
                }
                self.counter = self.counter.wrapping_add(1);
            }
        }

        for (i, drum) in Drum::ALL.into_iter().enumerate() {
            if !self.active(drum) {
                self.players[i].reset();
            }
        }

        let right = self.counter <= self.duty();
        self.ports.write(BLUE, u64::from(self.mode == Mode::Edit));
        self.ports.write(GREEN, u64::from(self.mode == Mode::Play));
        self.ports.write(RED, u64::from(self.mode == Mode::Raw));
        self.ports.write(RIGHT, u64::from(right));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roms() -> [MemoryImage; 4] {
        [0x01u8, 0x02, 0x03, 0x04]
            .map(|v| MemoryImage::from_bytes("t.mem", vec![v; 4]).unwrap())
    }

    fn fast_cycle(dev: &mut DrumMachine) {
        dev.set("hz2m", 0).unwrap();
        dev.eval();
        dev.set("hz2m", 1).unwrap();
        dev.eval();
    }

    fn slow_edge(dev: &mut DrumMachine) {
        dev.set("hz100", 0).unwrap();
        dev.eval();
        dev.set("hz100", 1).unwrap();
        dev.eval();
    }

    #[test]
    fn reset_lights_blue() {
        let mut dev = DrumMachine::new(roms(), 2);
        dev.set("reset", 1).unwrap();
        dev.eval();
        assert_eq!(dev.get("blue").unwrap(), 1);
        assert_eq!(dev.get("red").unwrap(), 0);
    }

    #[test]
    fn raw_button_on_slow_edge() {
        let mut dev = DrumMachine::new(roms(), 2);
        dev.set("pb", 1 << Mode::Raw.button()).unwrap();
        fast_cycle(&mut dev);
        assert_eq!(dev.get("red").unwrap(), 0);
        slow_edge(&mut dev);
        assert_eq!(dev.get("red").unwrap(), 1);
        assert_eq!(dev.get("blue").unwrap(), 0);
    }

    #[test]
    fn silence_is_half_duty() {
        let mut dev = DrumMachine::new(roms(), 2);
        let mut highs = 0;
        for _ in 0..256 {
            fast_cycle(&mut dev);
            highs += dev.get("right").unwrap();
        }
        assert_eq!(highs, 129);
    }

    #[test]
    fn unsigned_mix_fault_changes_silence() {
        let mut dev = DrumMachine::with_fault(roms(), 2, DrumMachineFault::UnsignedMix);
        let mut highs = 0;
        for _ in 0..256 {
            fast_cycle(&mut dev);
            highs += dev.get("right").unwrap();
        }
        assert_eq!(highs, 1);
    }
}
