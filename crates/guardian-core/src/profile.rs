//! # Guardian Profile
//!
//! One JSON document carrying the toggles, triggers and pyramiding settings
//! a sidecar starts with:
//!
//! ```text
//! {
//!   "toggles":    { "riskNeutralPyramiding": true },
//!   "triggers":   [ { "name": "pnlVelocity", "threshold": 10.0 } ],
//!   "pyramiding": { "max_layers": 3, "risk_neutral": true }
//! }
//! ```
//!
//! Every section is optional. Parsing is a pure transformation; reading the
//! file is the caller's job.

use crate::pyramiding::PyramidingConfig;
use crate::toggles::ToggleStore;
use crate::trigger::Trigger;
use crate::{GuardianError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parsed and validated profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardianProfile {
    pub toggles: ToggleStore,
    pub triggers: Vec<Trigger>,
    pub pyramiding: PyramidingConfig,
}

impl GuardianProfile {
    /// Parse and validate a profile document.
    pub fn from_json(input: &str) -> Result<Self> {
        let profile: Self =
            serde_json::from_str(input).map_err(|e| GuardianError::Parse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Render the profile as indented JSON.
    ///
    /// Validates first: JSON has no encoding for infinite thresholds.
    pub fn to_json_pretty(&self) -> Result<String> {
        self.validate()?;
        serde_json::to_string_pretty(self).map_err(|e| GuardianError::Serialize(e.to_string()))
    }

    /// Check trigger names are unique and every threshold is finite.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for trigger in &self.triggers {
            trigger.validate()?;
            if !trigger.threshold().is_finite() {
                return Err(GuardianError::InvalidThreshold {
                    name: trigger.name().to_string(),
                    threshold: trigger.threshold(),
                });
            }
            if !seen.insert(trigger.name()) {
                return Err(GuardianError::DuplicateTrigger(trigger.name().to_string()));
            }
        }
        Ok(())
    }

    /// Look a trigger up by name.
    #[must_use]
    pub fn trigger(&self, name: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.name() == name)
    }

    /// Like [`Self::trigger`], but a missing name is an error.
    pub fn require_trigger(&self, name: &str) -> Result<&Trigger> {
        self.trigger(name)
            .ok_or_else(|| GuardianError::UnknownTrigger(name.to_string()))
    }

    /// Fresh toggle store seeded from the profile.
    #[must_use]
    pub fn toggle_store(&self) -> ToggleStore {
        self.toggles.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::trigger::Decision;

    const FULL_PROFILE: &str = r#"{
        "toggles": { "riskNeutralPyramiding": true, "purge": false },
        "triggers": [
            { "name": "pnlVelocity", "threshold": 10.0 },
            { "name": "drawdown", "threshold": -250 }
        ],
        "pyramiding": { "max_layers": 5, "risk_neutral": false }
    }"#;

    #[test]
    fn parses_full_profile() {
        let profile = GuardianProfile::from_json(FULL_PROFILE).unwrap();

        let toggles = profile.toggle_store();
        assert!(toggles.is_enabled("riskNeutralPyramiding"));
        assert!(!toggles.is_enabled("purge"));
        assert!(!toggles.is_enabled("neverMentioned"));

        assert_eq!(profile.triggers.len(), 2);
        let trigger = profile.trigger("pnlVelocity").unwrap();
        assert_eq!(trigger.evaluate(12.0), Decision::Fire);

        assert_eq!(profile.pyramiding, PyramidingConfig::new(5, false));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let profile = GuardianProfile::from_json("{}").unwrap();
        assert!(profile.toggles.is_empty());
        assert!(profile.triggers.is_empty());
        assert_eq!(profile.pyramiding, PyramidingConfig::default());
    }

    #[test]
    fn rejects_duplicate_trigger_names() {
        let input = r#"{ "triggers": [
            { "name": "pnlVelocity", "threshold": 10 },
            { "name": "pnlVelocity", "threshold": 20 }
        ] }"#;

        let err = GuardianProfile::from_json(input).unwrap_err();
        assert_eq!(err, GuardianError::DuplicateTrigger("pnlVelocity".to_string()));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GuardianProfile::from_json("not valid json").unwrap_err();
        assert!(matches!(err, GuardianError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_sections() {
        let err = GuardianProfile::from_json(r#"{ "toggels": {} }"#).unwrap_err();
        assert!(matches!(err, GuardianError::Parse(_)));
    }

    #[test]
    fn rejects_nan_threshold_built_in_code() {
        let profile = GuardianProfile {
            triggers: vec![Trigger::new("broken", f64::NAN)],
            ..GuardianProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(GuardianError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn rejects_misspelled_pyramiding_field() {
        let err = GuardianProfile::from_json(r#"{ "pyramiding": { "max_layer": 10 } }"#)
            .unwrap_err();
        assert!(matches!(err, GuardianError::Parse(ref msg) if msg.contains("max_layer")));
    }

    #[test]
    fn rejects_misspelled_trigger_field() {
        let input = r#"{ "triggers": [
            { "name": "pnlVelocity", "threshold": 10, "threshhold": 99 }
        ] }"#;
        let err = GuardianProfile::from_json(input).unwrap_err();
        assert!(matches!(err, GuardianError::Parse(_)));
    }

    #[test]
    fn rejects_infinite_threshold_at_profile_boundary() {
        let profile = GuardianProfile {
            triggers: vec![Trigger::new("ceiling", f64::INFINITY)],
            ..GuardianProfile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(GuardianError::InvalidThreshold { ref name, .. }) if name == "ceiling"
        ));
        assert!(matches!(
            profile.to_json_pretty(),
            Err(GuardianError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn require_trigger_reports_missing_name() {
        let profile = GuardianProfile::from_json(FULL_PROFILE).unwrap();
        assert!(profile.require_trigger("drawdown").is_ok());
        assert_eq!(
            profile.require_trigger("latency").unwrap_err(),
            GuardianError::UnknownTrigger("latency".to_string())
        );
    }

    #[test]
    fn pretty_output_parses_back() {
        let profile = GuardianProfile::from_json(FULL_PROFILE).unwrap();
        let text = profile.to_json_pretty().unwrap();
        assert_eq!(GuardianProfile::from_json(&text).unwrap(), profile);
    }
}
