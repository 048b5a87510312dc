//! # Pyramiding
//!
//! Size of the next layer when adding to a position in steps.
//!
//! - Risk-neutral: every layer has the base size
//! - Aggressive: each existing layer adds 25% of the base size
//! - Once `max_layers` layers exist, the next size is zero
//!
//! Sizes are integer quantities (lots or minimal units). The growth step is
//! expressed in basis points so no floating-point arithmetic is involved.

use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default maximum number of layers.
pub const DEFAULT_MAX_LAYERS: u32 = 3;

/// Growth per existing layer in aggressive mode (basis points of base size).
pub const AGGRESSIVE_STEP_BPS: u64 = 2_500;

/// One whole in basis points.
const BPS_SCALE: u64 = 10_000;

// =============================================================================
// CONFIG
// =============================================================================

/// Configuration for pyramiding position sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PyramidingConfig {
    /// Number of layers after which no more are added.
    pub max_layers: u32,
    /// Keep every layer at the base size.
    pub risk_neutral: bool,
}

impl Default for PyramidingConfig {
    fn default() -> Self {
        Self {
            max_layers: DEFAULT_MAX_LAYERS,
            risk_neutral: true,
        }
    }
}

impl PyramidingConfig {
    #[must_use]
    pub fn new(max_layers: u32, risk_neutral: bool) -> Self {
        Self {
            max_layers,
            risk_neutral,
        }
    }

    /// Whether another layer may be added on top of `current_layers`.
    #[must_use]
    pub fn has_capacity(&self, current_layers: u32) -> bool {
        current_layers < self.max_layers
    }
}

// =============================================================================
// SIZING
// =============================================================================

/// Size of the next layer given how many layers already exist.
///
/// Aggressive sizing is `base * (1 + 0.25 * current_layers)`, floored to
/// whole units. Saturates at `u64::MAX` instead of overflowing.
#[must_use]
pub fn next_size(current_layers: u32, base_size: u64, config: &PyramidingConfig) -> u64 {
    if !config.has_capacity(current_layers) {
        return 0;
    }

    if config.risk_neutral {
        return base_size;
    }

    let factor_bps =
        BPS_SCALE.saturating_add(AGGRESSIVE_STEP_BPS.saturating_mul(u64::from(current_layers)));
    let scaled = u128::from(base_size) * u128::from(factor_bps) / u128::from(BPS_SCALE);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Sizes of every remaining layer from `current_layers` up to the limit.
#[must_use]
pub fn remaining_schedule(
    current_layers: u32,
    base_size: u64,
    config: &PyramidingConfig,
) -> Vec<u64> {
    (current_layers..config.max_layers)
        .map(|layer| next_size(layer, base_size, config))
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
