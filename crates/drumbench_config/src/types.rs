//! Configuration types deserialized from `drumbench.toml`.

use drumbench_common::{Drum, Frequency, Mode};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// The top-level bench configuration parsed from `drumbench.toml`.
///
/// Every section is optional; omitted sections take the values the stock
/// drum-machine testbenches use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Bench metadata.
    #[serde(default)]
    pub bench: BenchMeta,
    /// Locations of the drum sample memory images.
    #[serde(default)]
    pub images: ImageConfig,
    /// Mode controller settings.
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Sample playback phase settings.
    #[serde(default)]
    pub sample: SampleConfig,
    /// Integrated drum machine settings.
    #[serde(default)]
    pub top: TopConfig,
    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Bench metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchMeta {
    /// Name shown in the report banner.
    pub name: String,
}

impl Default for BenchMeta {
    fn default() -> Self {
        Self {
            name: "drum-machine".to_string(),
        }
    }
}

/// Where the drum sample memory images live.
///
/// Relative `directory` values are resolved against the directory holding
/// `drumbench.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Directory containing the images.
    pub directory: PathBuf,
    /// Kick image file name.
    pub kick: String,
    /// Clap image file name.
    pub clap: String,
    /// Hi-hat image file name.
    pub hihat: String,
    /// Snare image file name.
    pub snare: String,
}

impl ImageConfig {
    /// Returns the configured file name for `drum`.
    pub fn file_name(&self, drum: Drum) -> &str {
        match drum {
            Drum::Kick => &self.kick,
            Drum::Clap => &self.clap,
            Drum::Hihat => &self.hihat,
            Drum::Snare => &self.snare,
        }
    }

    /// Returns the full path of the image for `drum`, relative to `base`.
    pub fn path(&self, base: &Path, drum: Drum) -> PathBuf {
        base.join(&self.directory).join(self.file_name(drum))
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("audio"),
            kick: "kick.mem".to_string(),
            clap: "clap.mem".to_string(),
            hihat: "hihat.mem".to_string(),
            snare: "snare.mem".to_string(),
        }
    }
}

/// Mode controller settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Request priority, highest first. Must name each mode exactly once with
    /// `edit` last.
    pub priority: Vec<Mode>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            priority: vec![Mode::Raw, Mode::Play, Mode::Edit],
        }
    }
}

/// Sample playback phase settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Which drum image the standalone player is loaded with.
    pub image: Drum,
    /// Clock edges between the address register and the output.
    pub latency: u32,
    /// Number of checked edges. Defaults to `N + 126` for an `N`-entry image,
    /// so every entry after the first is checked and the index wraps.
    pub checks: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            image: Drum::Kick,
            latency: 2,
            checks: None,
        }
    }
}

/// Integrated drum machine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopConfig {
    /// Fast clock driving the PWM and audio path.
    #[serde(deserialize_with = "deserialize_frequency")]
    pub fast_clock: Frequency,
    /// Slow clock driving the mode controller, derived by division.
    #[serde(deserialize_with = "deserialize_frequency")]
    pub slow_clock: Frequency,
    /// Fast cycles reset is held for at start-up.
    pub reset_cycles: u32,
    /// Fast edges folded into one audio sample.
    pub window: u32,
    /// Recorded samples per drum.
    pub samples: u32,
    /// Silent samples appended to each recording.
    pub tail_silence: u32,
    /// Slow periods the RAW request is held for.
    pub raw_periods: u32,
    /// Slow periods all buttons are released before a drum is pressed.
    pub release_periods: u32,
    /// Slow periods a drum button is held before recording starts.
    pub press_periods: u32,
}

impl Default for TopConfig {
    fn default() -> Self {
        Self {
            fast_clock: Frequency::new(2_000_000.0),
            slow_clock: Frequency::new(100.0),
            reset_cycles: 5,
            window: 256,
            samples: 6500,
            tail_silence: 1500,
            raw_periods: 1,
            release_periods: 8,
            press_periods: 2,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Mismatch diagnostics printed per phase before the rest are suppressed.
    /// Every mismatch is printed when unset.
    pub max_mismatches: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_mismatches: None,
        }
    }
}

/// Deserializes a frequency from either a unit string (`"2MHz"`) or a bare number of Hertz.
fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    struct FrequencyVisitor;

    impl<'de> Visitor<'de> for FrequencyVisitor {
        type Value = Frequency;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a frequency such as \"2MHz\" or a number of Hertz")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            if v < 0 {
                return Err(E::custom(format!("negative frequency {v}")));
            }
            Ok(Frequency::new(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Frequency::new(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() || v < 0.0 {
                return Err(E::custom(format!("invalid frequency {v}")));
            }
            Ok(Frequency::new(v))
        }
    }

    deserializer.deserialize_any(FrequencyVisitor)
}
