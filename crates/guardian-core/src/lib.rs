//! # Guardian Core
//!
//! Pure building blocks for the guardian sidecar.
//!
//! This crate contains:
//! - [`ToggleStore`] / [`SharedToggles`]: named boolean flags, off unless set
//! - [`Trigger`] and [`evaluate_trigger`]: threshold checks returning [`Decision`]
//! - [`PyramidingConfig`] and [`next_size`]: layer sizing for pyramiding entries
//! - [`GuardianProfile`]: the JSON document that bundles all of the above
//!
//! Nothing here performs I/O or logs. File access and reporting live in the
//! app layer (apps/guardian).

pub mod profile;
pub mod pyramiding;
pub mod toggles;
pub mod trigger;

pub use profile::GuardianProfile;
pub use pyramiding::{next_size, remaining_schedule, PyramidingConfig};
pub use toggles::{SharedToggles, ToggleStore};
pub use trigger::{evaluate_trigger, Decision, Trigger};

use thiserror::Error;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors raised at the edges of the core (profile loading, validation).
///
/// Toggle lookups and trigger evaluation are total and never produce one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardianError {
    /// The profile document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two triggers in one profile share a name.
    #[error("Duplicate trigger: {0}")]
    DuplicateTrigger(String),

    /// A trigger was requested by name but is not defined.
    #[error("Unknown trigger: {0}")]
    UnknownTrigger(String),

    /// A trigger threshold can never be met (NaN).
    #[error("Invalid threshold for trigger '{name}': {threshold}")]
    InvalidThreshold { name: String, threshold: f64 },

    /// Rendering output failed.
    #[error("Serialize error: {0}")]
    Serialize(String),

    /// Reading an input failed (raised by callers that do I/O).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias used throughout the guardian crates.
pub type Result<T> = std::result::Result<T, GuardianError>;
