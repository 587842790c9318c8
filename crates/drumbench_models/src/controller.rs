//! Mode controller model.

use crate::EdgeDetector;
use drumbench_common::Mode;
use drumbench_sim::{Device, PortId, PortMap, PortSpec};

const CLK: PortId = PortId::from_raw(0);
const RST: PortId = PortId::from_raw(1);
const SET_EDIT: PortId = PortId::from_raw(2);
const SET_PLAY: PortId = PortId::from_raw(3);
const SET_RAW: PortId = PortId::from_raw(4);
const MODE: PortId = PortId::from_raw(5);

const PORTS: [PortSpec; 6] = [
    PortSpec::input("clk", 1),
    PortSpec::input("rst", 1),
    PortSpec::input("set_edit", 1),
    PortSpec::input("set_play", 1),
    PortSpec::input("set_raw", 1),
    PortSpec::output("mode", 2),
];

/// Deliberate defects the controller can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControllerFault {
    /// `set_play` beats `set_raw` when both are asserted.
    PlayOverRaw,
    /// `rst` only takes effect on a clock edge.
    ClockedReset,
}

/// The three-state mode controller.
///
/// On a rising edge the request inputs are checked raw, then play, then edit;
/// the first one asserted selects the next mode.
pub struct Controller {
    ports: PortMap,
    clk: EdgeDetector,
    mode: Mode,
    fault: Option<ControllerFault>,
}

impl Controller {
    /// Creates a correct controller.
    pub fn new() -> Self {
        Self {
            ports: PortMap::new("controller", &PORTS),
            clk: EdgeDetector::default(),
            mode: Mode::Edit,
            fault: None,
        }
    }

    /// Creates a controller with `fault` injected.
    pub fn with_fault(fault: ControllerFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new()
        }
    }

    fn next_mode(&self) -> Mode {
        let edit = self.ports.read(SET_EDIT) != 0;
        let play = self.ports.read(SET_PLAY) != 0;
        let raw = self.ports.read(SET_RAW) != 0;
        let play_first = self.fault == Some(ControllerFault::PlayOverRaw);
        if play_first && play {
            Mode::Play
        } else if raw {
            Mode::Raw
        } else if play {
            Mode::Play
        } else if edit {
            Mode::Edit
        } else {
            self.mode
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for Controller {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let rose = self.clk.rising(self.ports.read(CLK));
        let rst = self.ports.read(RST) != 0;
        let clocked_reset = self.fault == Some(ControllerFault::ClockedReset);

        if rst && (!clocked_reset || rose) {
            self.mode = Mode::Edit;
        } else if rose && !rst {
            self.mode = self.next_mode();
        }
        self.ports.write(MODE, self.mode.encoding());
    }
}
