//! Clock frequencies with unit parsing and integer clock-division support.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Parses strings like "2MHz", "100Hz", "8KHz" and bare numbers (Hz), and
/// displays with the most readable unit.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in kilohertz.
    pub fn khz(&self) -> f64 {
        self.0 / 1_000.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns how many edges of this clock elapse between toggles of a
    /// derived clock running at `slow`.
    ///
    /// A derived clock toggles twice per period, so the modulus is
    /// `self / (2 * slow)`. Fails unless the ratio is a positive integer.
    pub fn toggle_modulus(&self, slow: Frequency) -> Result<u64, DivisionError> {
        let err = || DivisionError {
            fast: *self,
            slow,
        };
        if slow.0 <= 0.0 || self.0 <= 0.0 {
            return Err(err());
        }
        let ratio = self.0 / (2.0 * slow.0);
        if ratio < 1.0 || ratio.fract() != 0.0 || ratio > u64::MAX as f64 {
            return Err(err());
        }
        Ok(ratio as u64)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

/// Error returned when a slow clock cannot be derived from a fast one by
/// integer division.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("cannot derive {slow} from {fast} by integer division")]
pub struct DivisionError {
    /// The source clock.
    pub fast: Frequency,
    /// The requested derived clock.
    pub slow: Frequency,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        if !val.is_finite() || val < 0.0 {
            return Err(err());
        }
        Ok(Frequency(val * scale))
    }
}
