//! A small ordered map of signal names to values.

use std::fmt;

/// Named signal values, in insertion order.
///
/// Used both for the inputs an oracle is given and for the outputs it
/// predicts. Signals never assigned read as zero, matching a device's
/// power-on port values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signals {
    entries: Vec<(&'static str, u64)>,
}

impl Signals {
    /// Creates an empty signal set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: u64) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`set`](Signals::set).
    pub fn with(mut self, name: &'static str, value: u64) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value of `name`, or zero if it was never set.
    pub fn get(&self, name: &str) -> u64 {
        self.lookup(name).unwrap_or(0)
    }

    /// Returns the value of `name` if it was set.
    pub fn lookup(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }

    /// Returns `true` if `name` is set to a nonzero value.
    pub fn is_high(&self, name: &str) -> bool {
        self.get(name) != 0
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Returns the number of signals set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no signal has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(&'static str, u64)> for Signals {
    fn from_iter<I: IntoIterator<Item = (&'static str, u64)>>(iter: I) -> Self {
        let mut signals = Signals::new();
        for (name, value) in iter {
            signals.set(name, value);
        }
        signals
    }
}

impl fmt::Display for Signals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces() {
        let mut s = Signals::new().with("rst", 1);
        s.set("rst", 0);
        assert_eq!(s.get("rst"), 0);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn unset_reads_zero() {
        let s = Signals::new();
        assert_eq!(s.get("enable"), 0);
        assert_eq!(s.lookup("enable"), None);
        assert!(!s.is_high("enable"));
    }

    #[test]
    fn order_preserved() {
        let s: Signals = [("b", 2), ("a", 1), ("b", 3)].into_iter().collect();
        let names: Vec<_> = s.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(s.get("b"), 3);
    }

    #[test]
    fn display() {
        let s = Signals::new().with("go_left", 1).with("go_right", 0);
        assert_eq!(s.to_string(), "go_left=1 go_right=0");
    }
}
