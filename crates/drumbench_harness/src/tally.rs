//! Pass/total counters and the run-wide scoreboard.
//!
//! A [`Tally`] only grows through [`Tally::record`], so `passed <= total`
//! holds by construction; every fold into a larger tally re-checks it anyway
//! and turns a violation into an [`InternalError`].

use crate::phases::PhaseResult;
use drumbench_common::{BenchResult, InternalError};
use serde::Serialize;

/// An ordered (passed, total) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    passed: u64,
    total: u64,
}

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tally from raw counts, rejecting `passed > total`.
    pub fn from_counts(scope: &str, passed: u64, total: u64) -> BenchResult<Self> {
        let tally = Self { passed, total };
        tally.verify(scope)?;
        Ok(tally)
    }

    /// Counts one check.
    pub fn record(&mut self, ok: bool) {
        self.total += 1;
        if ok {
            self.passed += 1;
        }
    }

    /// Returns the number of checks that passed.
    pub fn passed(&self) -> u64 {
        self.passed
    }

    /// Returns the number of checks performed.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the number of checks that failed.
    pub fn failed(&self) -> u64 {
        self.total.saturating_sub(self.passed)
    }

    /// Returns `true` if every check passed.
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Fails if `passed > total`.
    pub fn verify(&self, scope: &str) -> BenchResult<()> {
        if self.passed > self.total {
            return Err(InternalError::tally_overflow(scope, self.passed, self.total));
        }
        Ok(())
    }

    /// Adds `other` into this tally and re-checks the invariant.
    pub fn absorb(&mut self, scope: &str, other: Tally) -> BenchResult<()> {
        other.verify(scope)?;
        let overflow = || InternalError::new(format!("{scope} tally overflowed"));
        self.passed = self.passed.checked_add(other.passed).ok_or_else(overflow)?;
        self.total = self.total.checked_add(other.total).ok_or_else(overflow)?;
        self.verify(scope)
    }
}

/// Phase results in run order plus the running global tally.
#[derive(Debug, Default)]
pub struct Scoreboard {
    bench: String,
    phases: Vec<PhaseResult>,
    global: Tally,
}

impl Scoreboard {
    /// Creates an empty, unnamed scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scoreboard for the bench called `bench`.
    pub fn named(bench: impl Into<String>) -> Self {
        Self {
            bench: bench.into(),
            ..Self::default()
        }
    }

    /// Returns the bench name, empty when unnamed.
    pub fn bench(&self) -> &str {
        &self.bench
    }

    /// Folds a finished phase into the global tally.
    pub fn record(&mut self, result: PhaseResult) -> BenchResult<()> {
        self.global.absorb("global", result.tally)?;
        tracing::debug!(
            phase = %result.phase,
            passed = self.global.passed(),
            total = self.global.total(),
            "global tally updated"
        );
        self.phases.push(result);
        Ok(())
    }

    /// Returns the recorded phases in run order.
    pub fn phases(&self) -> &[PhaseResult] {
        &self.phases
    }

    /// Returns the global tally.
    pub fn global(&self) -> Tally {
        self.global
    }

    /// Returns `true` if every check of every phase passed.
    pub fn success(&self) -> bool {
        self.global.all_passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::Phase;
    use proptest::prelude::*;

    #[test]
    fn record_counts() {
        let mut t = Tally::new();
        t.record(true);
        t.record(false);
        t.record(true);
        assert_eq!((t.passed(), t.total(), t.failed()), (2, 3, 1));
        assert!(!t.all_passed());
    }

    #[test]
    fn empty_tally_passes() {
        assert!(Tally::new().all_passed());
    }

    #[test]
    fn from_counts_rejects_overflow() {
        let err = Tally::from_counts("pwm", 5, 4).unwrap_err();
        assert_eq!(err.message, "pwm tally reports 5 passed out of 4 checks");
        assert!(Tally::from_counts("pwm", 4, 4).is_ok());
    }

    #[test]
    fn absorb_sums() {
        let mut global = Tally::new();
        global
            .absorb("global", Tally::from_counts("a", 3, 4).unwrap())
            .unwrap();
        global
            .absorb("global", Tally::from_counts("b", 2, 2).unwrap())
            .unwrap();
        assert_eq!((global.passed(), global.total()), (5, 6));
    }

    #[test]
    fn scoreboard_folds_in_order() {
        let mut board = Scoreboard::new();
        let mut a = PhaseResult::new(Phase::Pwm);
        a.tally.record(true);
        let mut b = PhaseResult::new(Phase::Sequencer);
        b.tally.record(false);
        board.record(a).unwrap();
        board.record(b).unwrap();
        let names: Vec<_> = board.phases().iter().map(|p| p.phase).collect();
        assert_eq!(names, vec![Phase::Pwm, Phase::Sequencer]);
        assert_eq!((board.global().passed(), board.global().total()), (1, 2));
        assert!(!board.success());
    }

    #[test]
    fn named_scoreboard_keeps_bench_name() {
        assert_eq!(Scoreboard::named("drum-machine").bench(), "drum-machine");
        assert_eq!(Scoreboard::new().bench(), "");
    }

    proptest! {
        #[test]
        fn passed_never_exceeds_total(outcomes in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut t = Tally::new();
            for ok in outcomes {
                t.record(ok);
                prop_assert!(t.verify("p").is_ok());
            }
        }
    }
}
