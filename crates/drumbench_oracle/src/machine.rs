//! Prediction of the integrated drum machine.
//!
//! The drum machine wires the per-module circuits together:
//!
//! - the mode controller runs on the slow clock, taking its requests from
//!   pushbuttons 19 (edit), 18 (play) and 16 (raw);
//! - a drum is *active* while the mode is RAW and its pushbutton is held; an
//!   inactive drum's player is held in reset;
//! - the PWM counter runs on the fast clock, always enabled, and an active
//!   player advances once per PWM period, on the edge where the counter wraps;
//! - the active players' signed outputs are summed with saturation and offset
//!   to unsigned to form the PWM duty cycle, whose output drives `right`.
//!
//! The oracle reuses [`ModeOracle`], [`PwmOracle`] and [`PlaybackOracle`] for
//! the pieces and only adds the wiring.

use crate::mode::{ModeOracle, Requests};
use crate::playback::PlaybackOracle;
use crate::pwm::PwmOracle;
use drumbench_common::{bit, Drum, Mode};
use drumbench_sim::MemoryImage;

/// The three mode LEDs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Leds {
    /// Lit in EDIT.
    pub blue: bool,
    /// Lit in PLAY.
    pub green: bool,
    /// Lit in RAW.
    pub red: bool,
}

impl Leds {
    /// The LED pattern for `mode`.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            blue: mode == Mode::Edit,
            green: mode == Mode::Play,
            red: mode == Mode::Raw,
        }
    }
}

/// Offsets a signed mix to the unsigned duty cycle the PWM expects.
pub fn duty_from_mix(mix: i8) -> u8 {
    (mix as u8) ^ 0x80
}

/// Shadow state of the whole drum machine.
#[derive(Clone, Debug)]
pub struct DrumMachineOracle {
    mode: ModeOracle,
    pwm: PwmOracle,
    players: [PlaybackOracle; 4],
    reset: bool,
    pb: u32,
}

impl DrumMachineOracle {
    /// Creates an oracle from the controller priority and one table per drum
    /// in [`Drum::ALL`] order.
    pub fn new(priority: [Mode; 3], tables: [MemoryImage; 4], latency: usize) -> Self {
        let players = tables.map(|table| PlaybackOracle::new(table, latency));
        Self {
            mode: ModeOracle::with_priority(priority),
            pwm: PwmOracle::new(),
            players,
            reset: false,
            pb: 0,
        }
    }

    /// Returns the predicted mode.
    pub fn mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Returns the predicted PWM counter.
    pub fn counter(&self) -> u8 {
        self.pwm.counter()
    }

    /// Returns the predicted output of `drum`'s player.
    pub fn player_output(&self, drum: Drum) -> u8 {
        self.players[slot(drum)].output()
    }

    /// Returns `true` if `drum` is currently sounding.
    pub fn is_active(&self, drum: Drum) -> bool {
        !self.reset && self.mode.mode() == Mode::Raw && bit(u64::from(self.pb), drum.button())
    }

    /// Updates the inputs and applies their asynchronous effects.
    pub fn settle(&mut self, reset: bool, pb: u32) {
        self.reset = reset;
        self.pb = pb;
        self.apply_async();
    }

    /// Advances by one rising edge of the fast clock.
    pub fn fast_edge(&mut self) {
        if !self.reset {
            let wrap = self.pwm.counter() == u8::MAX;
            for drum in Drum::ALL {
                let active = self.is_active(drum);
                self.players[slot(drum)].edge(!active, active && wrap);
            }
            self.pwm.edge(false, true);
        }
        self.apply_async();
    }

    /// Advances by one rising edge of the slow clock.
    pub fn slow_edge(&mut self) {
        let pb = u64::from(self.pb);
        let requests = Requests {
            edit: bit(pb, Mode::Edit.button()),
            play: bit(pb, Mode::Play.button()),
            raw: bit(pb, Mode::Raw.button()),
        };
        self.mode.edge(self.reset, requests);
        self.apply_async();
    }

    /// Returns the saturating sum of the active players' signed outputs.
    pub fn mix(&self) -> i8 {
        Drum::ALL
            .iter()
            .filter(|&&drum| self.is_active(drum))
            .fold(0i8, |acc, &drum| {
                acc.saturating_add(self.players[slot(drum)].output() as i8)
            })
    }

    /// Returns the predicted PWM duty cycle.
    pub fn duty(&self) -> u8 {
        duty_from_mix(self.mix())
    }

    /// Returns the predicted audio output bit.
    pub fn right(&self) -> bool {
        self.pwm.output(true, self.duty())
    }

    /// Returns the predicted LEDs.
    pub fn leds(&self) -> Leds {
        Leds::for_mode(self.mode.mode())
    }

    fn apply_async(&mut self) {
        if self.reset {
            self.mode.reset();
            self.pwm.reset();
        }
        for drum in Drum::ALL {
            if !self.is_active(drum) {
                self.players[slot(drum)].reset();
            }
        }
    }
}

fn slot(drum: Drum) -> usize {
    match drum {
        Drum::Kick => 0,
        Drum::Clap => 1,
        Drum::Hihat => 2,
        Drum::Snare => 3,
    }
}
