//! ROM playback sequencer oracle.
//!
//! A read index walks a fixed table, wrapping at its length. The table entry
//! read at an edge reaches `out` only `latency` edges later, so after `p`
//! enabled edges the output is `table[(p - latency) mod N]` once `p >= latency`.
//! Until then the pipeline still holds the reset value `table[0]`.

use crate::signals::Signals;
use crate::Oracle;
use drumbench_sim::MemoryImage;
use std::collections::VecDeque;

/// Shadow state of a sample player.
#[derive(Clone, Debug)]
pub struct PlaybackOracle {
    table: MemoryImage,
    latency: usize,
    index: usize,
    pipeline: VecDeque<u8>,
}

impl PlaybackOracle {
    /// Creates an oracle over `table` with `latency` edges between the read
    /// index and the output. A latency of zero is treated as one.
    pub fn new(table: MemoryImage, latency: usize) -> Self {
        let latency = latency.max(1);
        let first = table.at(0);
        Self {
            table,
            latency,
            index: 0,
            pipeline: std::iter::repeat(first).take(latency).collect(),
        }
    }

    /// Returns the table being played.
    pub fn table(&self) -> &MemoryImage {
        &self.table
    }

    /// Returns the configured latency.
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Returns the next table index to be read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the predicted output.
    pub fn output(&self) -> u8 {
        self.pipeline.front().copied().unwrap_or_else(|| self.table.at(0))
    }

    /// Rewinds to index 0 with `table[0]` on the output.
    pub fn reset(&mut self) {
        self.index = 0;
        let first = self.table.at(0);
        self.pipeline.iter_mut().for_each(|stage| *stage = first);
    }

    /// Advances by one clock edge.
    pub fn edge(&mut self, rst: bool, enable: bool) -> u8 {
        if rst {
            self.reset();
        } else if enable {
            self.pipeline.pop_front();
            self.pipeline.push_back(self.table.at(self.index));
            self.index = (self.index + 1) % self.table.len();
        }
        self.output()
    }

    fn outputs(&self) -> Signals {
        Signals::new().with("out", u64::from(self.output()))
    }
}

impl Oracle for PlaybackOracle {
    fn name(&self) -> &'static str {
        "sample"
    }

    fn settle(&mut self, inputs: &Signals) -> Signals {
        if inputs.is_high("rst") {
            self.reset();
        }
        self.outputs()
    }

    fn apply(&mut self, inputs: &Signals) -> Signals {
        self.edge(inputs.is_high("rst"), inputs.is_high("enable"));
        self.outputs()
    }

    fn peek(&self, _inputs: &Signals) -> Signals {
        self.outputs()
    }

    fn context(
        &self,
        ports: &drumbench_sim::PortMap,
        signal: &str,
        previous: &Signals,
        _inputs: &Signals,
    ) -> Vec<String> {
        let shown = (self.index + self.table.len() - self.latency % self.table.len())
            % self.table.len();
        vec![
            format!(
                "{signal} was {} before this step",
                self.format(ports, signal, previous.get(signal))
            ),
            format!("expected table index {shown} of {}", self.table.len()),
        ]
    }
}
