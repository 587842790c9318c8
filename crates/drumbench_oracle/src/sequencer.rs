//! Rotating one-hot sequencer oracle.

use crate::signals::Signals;
use crate::Oracle;

/// Power-on value of the one-hot register.
pub const SEQ_RESET: u8 = 0x80;

/// Shadow state of the sequencer's 8-bit one-hot register.
///
/// `rst` is asynchronous and forces [`SEQ_RESET`] immediately. `srst` is
/// synchronous: it forces [`SEQ_RESET`] on the next edge regardless of the
/// rotate inputs and has no effect without one. `go_right` rotates toward
/// bit 0 with bit 0 wrapping to bit 7, `go_left` the other way; neither or
/// both holds.
#[derive(Clone, Debug)]
pub struct SequencerOracle {
    value: u8,
}

impl SequencerOracle {
    /// Creates an oracle holding the power-on value.
    pub fn new() -> Self {
        Self { value: SEQ_RESET }
    }

    /// Returns the predicted register value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Advances by one clock edge.
    pub fn edge(&mut self, rst: bool, srst: bool, go_left: bool, go_right: bool) -> u8 {
        self.value = if rst || srst {
            SEQ_RESET
        } else {
            match (go_left, go_right) {
                (true, false) => self.value.rotate_left(1),
                (false, true) => self.value.rotate_right(1),
                _ => self.value,
            }
        };
        self.value
    }

    fn outputs(&self) -> Signals {
        Signals::new().with("seq_out", u64::from(self.value))
    }
}

impl Default for SequencerOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for SequencerOracle {
    fn name(&self) -> &'static str {
        "sequencer"
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        if inputs.is_high("rst") {
            self.value = SEQ_RESET;
        }
        self.outputs()
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        self.edge(
            inputs.is_high("rst"),
            inputs.is_high("srst"),
            inputs.is_high("go_left"),
            inputs.is_high("go_right"),
        );
        self.outputs()
    }

    fn peek(&self, _inputs: &Signals) -> Signals {
        self.outputs()
    }
}
