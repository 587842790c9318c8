//! Sequence editor oracle: eight 4-bit toggle-accumulator cells.
//!
//! On each clock edge in EDIT mode, `tgl_play_smpl` is XORed into the cell
//! selected by `set_time_idx`; the other cells are unchanged. `rst` clears all
//! cells asynchronously. Cell `i` is visible on port `seq_smpl_{i+1}`.

use crate::signals::Signals;
use crate::Oracle;
use drumbench_common::{concat, extract_bits, to_binary_string, Mode};
use drumbench_sim::{PortMap, SimError};

/// Number of cells.
pub const CELLS: usize = 8;

/// Width of each cell in bits.
pub const CELL_WIDTH: u32 = 4;

/// Output ports, one per cell, in index order.
pub const CELL_PORTS: [&str; CELLS] = [
    "seq_smpl_1",
    "seq_smpl_2",
    "seq_smpl_3",
    "seq_smpl_4",
    "seq_smpl_5",
    "seq_smpl_6",
    "seq_smpl_7",
    "seq_smpl_8",
];

/// Name of the packed observable compared each step.
pub const PACKED: &str = "seq_smpl";

/// Packs cells MSB-first in descending index order: cell 7 in bits `[31:28]`.
pub fn pack(cells: &[u8; CELLS]) -> u64 {
    cells
        .iter()
        .rev()
        .fold(0, |acc, &cell| concat(CELL_WIDTH, acc, u64::from(cell)))
}

/// Returns cell `index` of a packed value.
pub fn cell_of(packed: u64, index: usize) -> u64 {
    let low = index as u32 * CELL_WIDTH;
    extract_bits(packed, low, low + CELL_WIDTH - 1).unwrap_or(0)
}

/// Shadow state of the eight cells.
#[derive(Clone, Debug, Default)]
pub struct EditorOracle {
    cells: [u8; CELLS],
}

impl EditorOracle {
    /// Creates an oracle with every cell cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the predicted cells.
    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    /// Returns the predicted packed value.
    pub fn packed(&self) -> u64 {
        pack(&self.cells)
    }

    /// Advances by one clock edge.
    pub fn edge(&mut self, rst: bool, mode: Mode, index: usize, toggle: u8) -> u64 {
        if rst {
            self.cells = [0; CELLS];
        } else if mode == Mode::Edit {
            self.cells[index % CELLS] ^= toggle & 0xF;
        }
        self.packed()
    }

    fn outputs(&self) -> Signals {
        Signals::new().with(PACKED, self.packed())
    }
}

fn mode_of(inputs: &Signals) -> Mode {
    Mode::from_encoding(inputs.get("mode")).unwrap_or(Mode::Edit)
}

fn index_of(inputs: &Signals) -> usize {
    (inputs.get("set_time_idx") & 0x7) as usize
}

impl Oracle for EditorOracle {
    fn name(&self) -> &'static str {
        "sequence_editor"
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        if inputs.is_high("rst") {
            self.cells = [0; CELLS];
        }
        self.outputs()
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        self.edge(
            inputs.is_high("rst"),
            mode_of(inputs),
            index_of(inputs),
            (inputs.get("tgl_play_smpl") & 0xF) as u8,
        );
        self.outputs()
    }

    fn peek(&self, _inputs: &Signals) -> Signals {
        self.outputs()
    }

    fn observe(&self, ports: &PortMap, _inputs: &Signals) -> Result<Signals, SimError> {
        let mut cells = [0u8; CELLS];
        for (cell, port) in cells.iter_mut().zip(CELL_PORTS) {
            *cell = (ports.value(port)? & 0xF) as u8;
        }
        Ok(Signals::new().with(PACKED, pack(&cells)))
    }

    fn format(&self, _ports: &PortMap, _signal: &str, value: u64) -> String {
        format!("0x{value:08x}")
    }

    fn context(&self, _ports: &PortMap, _signal: &str, previous: &Signals, inputs: &Signals) -> Vec<String> {
        let index = index_of(inputs);
        let before = cell_of(previous.get(PACKED), index);
        let expected = u64::from(self.cells[index]);
        vec![
            format!(
                "{} was 4'b{}",
                CELL_PORTS[index],
                to_binary_string(before, CELL_WIDTH as usize)
            ),
            format!(
                "inputs: set_time_idx=3'b{} tgl_play_smpl=4'b{}",
                to_binary_string(index as u64, 3),
                to_binary_string(inputs.get("tgl_play_smpl"), CELL_WIDTH as usize)
            ),
            format!(
                "expected {} = 4'b{}",
                CELL_PORTS[index],
                to_binary_string(expected, CELL_WIDTH as usize)
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pack_order() {
        let mut cells = [0u8; CELLS];
        cells[0] = 0x1;
        cells[7] = 0xA;
        assert_eq!(pack(&cells), 0xA000_0001);
        assert_eq!(cell_of(0xA000_0001, 7), 0xA);
        assert_eq!(cell_of(0xA000_0001, 0), 0x1);
    }

    #[test]
    fn toggles_only_selected_cell() {
        let mut o = EditorOracle::new();
        o.edge(false, Mode::Edit, 2, 0b1010);
        assert_eq!(o.cells(), &[0, 0, 0b1010, 0, 0, 0, 0, 0]);
        assert_eq!(o.packed(), 0x0000_0A00);
    }

    #[test]
    fn ignores_toggles_outside_edit() {
        let mut o = EditorOracle::new();
        o.edge(false, Mode::Play, 1, 0xF);
        o.edge(false, Mode::Raw, 1, 0xF);
        assert_eq!(o.packed(), 0);
    }

    #[test]
    fn full_sweep_matches_cumulative_xor() {
        let mut o = EditorOracle::new();
        let mut expected = 0u64;
        for idx in 0..8usize {
            for tgl in 0..16u8 {
                o.edge(false, Mode::Edit, idx, tgl);
                expected ^= u64::from(tgl) << (idx * 4);
                assert_eq!(o.packed(), expected);
            }
        }
    }

    #[test]
    fn reset_is_immediate() {
        let mut o = EditorOracle::new();
        o.edge(false, Mode::Edit, 5, 0x3);
        let out = o.settle(&Signals::new().with("rst", 1));
        assert_eq!(out.get(PACKED), 0);
    }

    #[test]
    fn context_shows_selected_cell_in_binary() {
        let o = EditorOracle::new();
        let ports = PortMap::new("sequence_editor", &[]);
        let previous = Signals::new().with(PACKED, 0x0000_0050);
        let inputs = Signals::new().with("set_time_idx", 1).with("tgl_play_smpl", 0x3);
        let notes = o.context(&ports, PACKED, &previous, &inputs);
        assert_eq!(notes[0], "seq_smpl_2 was 4'b0101");
        assert_eq!(notes[1], "inputs: set_time_idx=3'b001 tgl_play_smpl=4'b0011");
    }

    proptest! {
        #[test]
        fn double_toggle_is_identity(
            seed in proptest::collection::vec((0usize..8, 0u8..16), 0..20),
            idx in 0usize..8,
            tgl in 0u8..16,
        ) {
            let mut o = EditorOracle::new();
            for (i, t) in seed {
                o.edge(false, Mode::Edit, i, t);
            }
            let before = o.packed();
            o.edge(false, Mode::Edit, idx, tgl);
            o.edge(false, Mode::Edit, idx, tgl);
            prop_assert_eq!(o.packed(), before);
        }
    }
}
