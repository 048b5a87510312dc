//! # Threshold Triggers
//!
//! A trigger is a named threshold. Evaluating a reading against it yields
//! [`Decision::Fire`] when the reading meets or exceeds the threshold and
//! [`Decision::Hold`] otherwise.
//!
//! Non-finite inputs follow IEEE-754 ordering:
//! - NaN on either side never fires
//! - `+inf` fires against any threshold except NaN
//! - a `-inf` threshold fires for any reading except NaN

use crate::{GuardianError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// DECISION
// =============================================================================

/// Outcome of evaluating a reading against a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Reading met the threshold.
    Fire,
    /// Reading stayed below the threshold.
    Hold,
}

impl Decision {
    /// Wire name: `"fire"` or `"hold"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Hold => "hold",
        }
    }

    #[must_use]
    pub const fn is_fire(self) -> bool {
        matches!(self, Self::Fire)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = GuardianError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fire" => Ok(Self::Fire),
            "hold" => Ok(Self::Hold),
            other => Err(GuardianError::Parse(format!("unknown decision '{other}'"))),
        }
    }
}

// =============================================================================
// TRIGGER
// =============================================================================

/// A named threshold. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trigger {
    name: String,
    threshold: f64,
}

impl Trigger {
    /// Build a trigger without validation.
    ///
    /// A NaN threshold is accepted here and simply never fires.
    #[must_use]
    pub fn new(name: impl Into<String>, threshold: f64) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }

    /// Build a trigger, rejecting thresholds that can never be met.
    pub fn try_new(name: impl Into<String>, threshold: f64) -> Result<Self> {
        let trigger = Self::new(name, threshold);
        trigger.validate()?;
        Ok(trigger)
    }

    /// Reject a NaN threshold.
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() {
            return Err(GuardianError::InvalidThreshold {
                name: self.name.clone(),
                threshold: self.threshold,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate a reading against this trigger. Equality fires.
    #[must_use]
    pub fn evaluate(&self, value: f64) -> Decision {
        if value >= self.threshold {
            Decision::Fire
        } else {
            Decision::Hold
        }
    }
}

/// Evaluate `value` against `trigger`.
///
/// Free-function form of [`Trigger::evaluate`].
#[must_use]
pub fn evaluate_trigger(value: f64, trigger: &Trigger) -> Decision {
    trigger.evaluate(value)
}

// =============================================================================
// TESTS
// =============================================================================
