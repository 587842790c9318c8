//! Mode controller oracle.
//!
//! Three states: EDIT, PLAY and RAW. `rst` forces EDIT asynchronously. On a
//! clock edge the highest-priority asserted request wins; with no request
//! asserted the mode holds.

use crate::signals::Signals;
use crate::Oracle;
use drumbench_common::Mode;

/// Snapshot of the three request inputs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Requests {
    /// `set_edit`
    pub edit: bool,
    /// `set_play`
    pub play: bool,
    /// `set_raw`
    pub raw: bool,
}

impl Requests {
    /// Reads the request inputs from a signal set.
    pub fn from_signals(inputs: &Signals) -> Self {
        Self {
            edit: inputs.is_high("set_edit"),
            play: inputs.is_high("set_play"),
            raw: inputs.is_high("set_raw"),
        }
    }

    /// Returns `true` if the request for `mode` is asserted.
    pub fn requests(&self, mode: Mode) -> bool {
        match mode {
            Mode::Edit => self.edit,
            Mode::Play => self.play,
            Mode::Raw => self.raw,
        }
    }
}

/// Shadow state of the mode controller.
#[derive(Clone, Debug)]
pub struct ModeOracle {
    mode: Mode,
    priority: [Mode; 3],
}

impl ModeOracle {
    /// Request priority of the reference controller, highest first.
    pub const DEFAULT_PRIORITY: [Mode; 3] = [Mode::Raw, Mode::Play, Mode::Edit];

    /// Creates an oracle in EDIT with the reference priority.
    pub fn new() -> Self {
        Self::with_priority(Self::DEFAULT_PRIORITY)
    }

    /// Creates an oracle in EDIT resolving simultaneous requests by `priority`, highest first.
    pub fn with_priority(priority: [Mode; 3]) -> Self {
        Self {
            mode: Mode::Edit,
            priority,
        }
    }

    /// Returns the predicted mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the priority order in use.
    pub fn priority(&self) -> [Mode; 3] {
        self.priority
    }

    /// Forces EDIT, as the asynchronous reset does.
    pub fn reset(&mut self) {
        self.mode = Mode::Edit;
    }

    /// Returns the mode selected by `requests`, if any request is asserted.
    pub fn resolve(&self, requests: Requests) -> Option<Mode> {
        self.priority.iter().copied().find(|&m| requests.requests(m))
    }

    /// Advances by one clock edge.
    pub fn edge(&mut self, rst: bool, requests: Requests) -> Mode {
        if rst {
            self.reset();
        } else if let Some(mode) = self.resolve(requests) {
            self.mode = mode;
        }
        self.mode
    }

    fn outputs(&self) -> Signals {
        Signals::new().with("mode", self.mode.encoding())
    }
}

impl Default for ModeOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for ModeOracle {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        if inputs.is_high("rst") {
            self.reset();
        }
        self.outputs()
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        self.edge(inputs.is_high("rst"), Requests::from_signals(inputs));
        self.outputs()
    }

    fn peek(&self, _inputs: &Signals) -> Signals {
        self.outputs()
    }

    fn format(&self, _ports: &drumbench_sim::PortMap, _signal: &str, value: u64) -> String {
        match Mode::from_encoding(value) {
            Some(mode) => mode.to_string(),
            None => format!("invalid mode {value}"),
        }
    }
}
