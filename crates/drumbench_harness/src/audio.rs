//! Audio capture for the integrated machine.
//!
//! The PWM output is reduced to 8-bit samples by counting how many fast-clock
//! edges of each window see it high. Between drums the recording is padded
//! with silence.

use drumbench_common::Drum;

/// The 8-bit sample value of silence.
pub const SILENCE: u8 = 0x80;

/// Toggles a derived clock every `modulus` source edges.
///
/// The divider has no reset: it keeps counting through the machine's reset
/// sequence, as the bench's clock generator does.
#[derive(Clone, Debug)]
pub struct ClockDivider {
    modulus: u64,
    count: u64,
    level: bool,
}

impl ClockDivider {
    /// Creates a divider starting low. A zero modulus is treated as one.
    pub fn new(modulus: u64) -> Self {
        Self {
            modulus: modulus.max(1),
            count: 0,
            level: false,
        }
    }

    /// Returns the modulus.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Returns the current level of the derived clock.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Counts one source edge. Returns the new level when the derived clock toggles.
    pub fn tick(&mut self) -> Option<bool> {
        self.count += 1;
        if self.count < self.modulus {
            return None;
        }
        self.count = 0;
        self.level = !self.level;
        Some(self.level)
    }

    /// Number of source edges in `periods` full periods of the derived clock.
    pub fn edges_for(&self, periods: u32) -> u64 {
        self.modulus * 2 * u64::from(periods)
    }
}

/// Reduces a stream of PWM levels to samples, one per `window` edges.
#[derive(Clone, Debug)]
pub struct SampleWindow {
    window: u32,
    seen: u32,
    ones: u32,
}

impl SampleWindow {
    /// Creates an empty window. A zero width is treated as one.
    pub fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
            seen: 0,
            ones: 0,
        }
    }

    /// Adds one edge's level. Returns the sample when the window closes.
    pub fn push(&mut self, high: bool) -> Option<u8> {
        self.seen += 1;
        if high {
            self.ones += 1;
        }
        if self.seen < self.window {
            return None;
        }
        let sample = reduce(self.ones);
        self.seen = 0;
        self.ones = 0;
        Some(sample)
    }
}

/// Converts a count of high edges to a sample, saturating at 255.
pub fn reduce(ones: u32) -> u8 {
    ones.min(u32::from(u8::MAX)) as u8
}

/// The captured samples of one drum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recording {
    drum: Drum,
    samples: Vec<u8>,
}

impl Recording {
    /// Starts an empty recording for `drum`.
    pub fn new(drum: Drum) -> Self {
        Self {
            drum,
            samples: Vec::new(),
        }
    }

    /// Returns the drum that was played.
    pub fn drum(&self) -> Drum {
        self.drum
    }

    /// Appends one sample.
    pub fn push(&mut self, sample: u8) {
        self.samples.push(sample);
    }

    /// Appends `count` samples of silence.
    pub fn pad_silence(&mut self, count: u32) {
        self.samples
            .extend(std::iter::repeat(SILENCE).take(count as usize));
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Renders the samples as a memory image: one two-digit hex byte per line.
    pub fn to_image_text(&self) -> String {
        self.samples.iter().map(|s| format!("{s:02x}\n")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn divider_toggles_every_modulus_edges() {
        let mut div = ClockDivider::new(3);
        let toggles: Vec<_> = (0..7).map(|_| div.tick()).collect();
        assert_eq!(
            toggles,
            vec![None, None, Some(true), None, None, Some(false), None]
        );
    }

    #[test]
    fn divider_edges_for_periods() {
        let div = ClockDivider::new(10_000);
        assert_eq!(div.edges_for(1), 20_000);
        assert_eq!(div.edges_for(8), 160_000);
    }

    #[test]
    fn full_window_saturates() {
        let mut w = SampleWindow::new(256);
        let samples: Vec<_> = (0..256).filter_map(|_| w.push(true)).collect();
        assert_eq!(samples, vec![255]);
    }

    #[test]
    fn half_window() {
        let mut w = SampleWindow::new(256);
        let samples: Vec<_> = (0..256).filter_map(|i| w.push(i % 2 == 0)).collect();
        assert_eq!(samples, vec![128]);
    }

    #[test]
    fn window_restarts_after_close() {
        let mut w = SampleWindow::new(4);
        let samples: Vec<_> = [true, true, true, true, false, true, false, false]
            .into_iter()
            .filter_map(|b| w.push(b))
            .collect();
        assert_eq!(samples, vec![4, 1]);
    }

    #[test]
    fn recording_pads_silence() {
        let mut r = Recording::new(Drum::Kick);
        r.push(0x10);
        r.pad_silence(2);
        assert_eq!(r.samples(), &[0x10, SILENCE, SILENCE]);
        assert_eq!(r.to_image_text(), "10\n80\n80\n");
    }

    proptest! {
        #[test]
        fn sample_counts_high_edges(bits in proptest::collection::vec(any::<bool>(), 256)) {
            let mut w = SampleWindow::new(256);
            let mut last = None;
            for &b in &bits {
                last = w.push(b);
            }
            let ones = bits.iter().filter(|&&b| b).count() as u32;
            prop_assert_eq!(last, Some(reduce(ones)));
        }
    }
}
