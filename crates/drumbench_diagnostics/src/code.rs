//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Observed output disagreed with the oracle, prefixed with `M`.
    Mismatch,
    /// The harness could not be set up (missing image, bad config), prefixed with `S`.
    Setup,
    /// The harness detected an inconsistency in itself, prefixed with `I`.
    Internal,
    /// Observations that are not failures (probe results), prefixed with `N`.
    Observation,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Mismatch => 'M',
            Category::Setup => 'S',
            Category::Internal => 'I',
            Category::Observation => 'N',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the prefix followed by a zero-padded 3-digit number, e.g. `M001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// An output port disagreed with its predicted value.
    pub const VALUE_MISMATCH: Self = Self::new(Category::Mismatch, 1);
    /// A reconstructed audio sample disagreed with its prediction.
    pub const SAMPLE_MISMATCH: Self = Self::new(Category::Mismatch, 2);
    /// The bench could not be set up: a missing image, a bad config or port.
    pub const SETUP_FAILED: Self = Self::new(Category::Setup, 1);
    /// The harness found itself inconsistent, such as a tally with more passes than checks.
    pub const INTERNAL_INCONSISTENCY: Self = Self::new(Category::Internal, 1);
    /// The controller resolved simultaneous requests.
    pub const PRIORITY_OBSERVED: Self = Self::new(Category::Observation, 1);
    /// Sample playback checks stop before the end of the image.
    pub const SHORT_PLAYBACK: Self = Self::new(Category::Observation, 2);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
