//! Sequence editor model.

use crate::EdgeDetector;
use drumbench_common::Mode;
use drumbench_sim::{Device, PortId, PortMap, PortSpec, Radix};

const CLK: PortId = PortId::from_raw(0);
const RST: PortId = PortId::from_raw(1);
const MODE: PortId = PortId::from_raw(2);
const SET_TIME_IDX: PortId = PortId::from_raw(3);
const TGL_PLAY_SMPL: PortId = PortId::from_raw(4);
const FIRST_CELL: u32 = 5;

const PORTS: [PortSpec; 13] = [
    PortSpec::input("clk", 1),
    PortSpec::input("rst", 1),
    PortSpec::input("mode", 2),
    PortSpec::input("set_time_idx", 3).with_radix(Radix::Binary),
    PortSpec::input("tgl_play_smpl", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_1", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_2", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_3", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_4", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_5", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_6", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_7", 4).with_radix(Radix::Binary),
    PortSpec::output("seq_smpl_8", 4).with_radix(Radix::Binary),
];

/// Deliberate defects the sequence editor can be built with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditorFault {
    /// The toggle pattern is XORed into every cell, not just the selected one.
    ToggleAllCells,
}

/// Eight 4-bit step cells edited by XOR toggles.
pub struct SequenceEditor {
    ports: PortMap,
    clk: EdgeDetector,
    cells: [u8; 8],
    fault: Option<EditorFault>,
}

impl SequenceEditor {
    /// Creates a correct editor.
    pub fn new() -> Self {
        Self {
            ports: PortMap::new("sequence_editor", &PORTS),
            clk: EdgeDetector::default(),
            cells: [0; 8],
            fault: None,
        }
    }

    /// Creates an editor with `fault` injected.
    pub fn with_fault(fault: EditorFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new()
        }
    }
}

impl Default for SequenceEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for SequenceEditor {
    fn ports(&self) -> &PortMap {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        &mut self.ports
    }

    fn eval(&mut self) {
        let rose = self.clk.rising(self.ports.read(CLK));
        let editing = self.ports.read(MODE) == Mode::Edit.encoding();
        let index = self.ports.read(SET_TIME_IDX) as usize;
        let toggle = self.ports.read(TGL_PLAY_SMPL) as u8;

        if self.ports.read(RST) != 0 {
            self.cells = [0; 8];
        } else if rose && editing {
            if self.fault == Some(EditorFault::ToggleAllCells) {
                self.cells.iter_mut().for_each(|cell| *cell ^= toggle);
            } else {
                self.cells[index] ^= toggle;
            }
        }

        for (i, &cell) in self.cells.iter().enumerate() {
            self.ports
                .write(PortId::from_raw(FIRST_CELL + i as u32), u64::from(cell));
        }
    }
}
