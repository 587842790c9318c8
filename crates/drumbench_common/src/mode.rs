//! Operating modes of the drum machine and the drum voices it plays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three operating modes of the mode controller.
///
/// The discriminant is the value the controller drives on its 2-bit `mode` port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sequence editing; the power-on mode.
    #[default]
    Edit = 0,
    /// Sequence playback.
    Play = 1,
    /// Direct drum triggering from the pushbuttons.
    Raw = 2,
}

impl Mode {
    /// All modes in encoding order.
    pub const ALL: [Mode; 3] = [Mode::Edit, Mode::Play, Mode::Raw];

    /// Returns the value driven on the `mode` port.
    pub fn encoding(self) -> u64 {
        self as u64
    }

    /// Decodes a `mode` port value, returning `None` for the unused encoding.
    pub fn from_encoding(value: u64) -> Option<Mode> {
        match value {
            0 => Some(Mode::Edit),
            1 => Some(Mode::Play),
            2 => Some(Mode::Raw),
            _ => None,
        }
    }

    /// Returns the pushbutton bit that requests this mode on the drum machine.
    pub fn button(self) -> u32 {
        match self {
            Mode::Edit => 19,
            Mode::Play => 18,
            Mode::Raw => 16,
        }
    }

    /// Returns the name of the request input that selects this mode.
    pub fn request_port(self) -> &'static str {
        match self {
            Mode::Edit => "set_edit",
            Mode::Play => "set_play",
            Mode::Raw => "set_raw",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Edit => write!(f, "EDIT"),
            Mode::Play => write!(f, "PLAY"),
            Mode::Raw => write!(f, "RAW"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edit" => Ok(Mode::Edit),
            "play" => Ok(Mode::Play),
            "raw" => Ok(Mode::Raw),
            _ => Err(format!("unknown mode '{s}'")),
        }
    }
}

/// The four drum voices of the drum machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Drum {
    /// Bass drum, on pushbutton 3.
    Kick,
    /// Handclap, on pushbutton 2.
    Clap,
    /// Closed hi-hat, on pushbutton 1.
    Hihat,
    /// Snare drum, on pushbutton 0.
    Snare,
}

impl Drum {
    /// All drums in recording order.
    pub const ALL: [Drum; 4] = [Drum::Kick, Drum::Clap, Drum::Hihat, Drum::Snare];

    /// Returns the pushbutton bit that triggers this drum in RAW mode.
    pub fn button(self) -> u32 {
        match self {
            Drum::Kick => 3,
            Drum::Clap => 2,
            Drum::Hihat => 1,
            Drum::Snare => 0,
        }
    }

    /// Returns the lowercase drum name.
    pub fn name(self) -> &'static str {
        match self {
            Drum::Kick => "kick",
            Drum::Clap => "clap",
            Drum::Hihat => "hihat",
            Drum::Snare => "snare",
        }
    }
}

impl fmt::Display for Drum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_encoding_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_encoding(mode.encoding()), Some(mode));
        }
        assert_eq!(Mode::from_encoding(3), None);
    }

    #[test]
    fn mode_default_is_edit() {
        assert_eq!(Mode::default(), Mode::Edit);
    }

    #[test]
    fn mode_parse() {
        assert_eq!("RAW".parse::<Mode>(), Ok(Mode::Raw));
        assert_eq!("play".parse::<Mode>(), Ok(Mode::Play));
        assert!("stop".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_display() {
        assert_eq!(Mode::Edit.to_string(), "EDIT");
        assert_eq!(Mode::Raw.to_string(), "RAW");
    }

    #[test]
    fn drum_buttons_are_distinct() {
        let mut bits: Vec<u32> = Drum::ALL.iter().map(|d| d.button()).collect();
        bits.sort_unstable();
        assert_eq!(bits, vec![0, 1, 2, 3]);
    }

    #[test]
    fn mode_buttons_do_not_overlap_drums() {
        for mode in Mode::ALL {
            assert!(Drum::ALL.iter().all(|d| d.button() != mode.button()));
        }
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Drum::Hihat).unwrap();
        assert_eq!(json, "\"hihat\"");
        let mode: Mode = serde_json::from_str("\"play\"").unwrap();
        assert_eq!(mode, Mode::Play);
    }
}
