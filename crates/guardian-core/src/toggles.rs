//! # Admin Toggles
//!
//! Named boolean flags for switching sidecar behaviour on and off.
//!
//! Semantics:
//! - A name that was never set reads as disabled
//! - `set` overwrites; there is no history
//! - Any string is a valid name, including the empty string
//!
//! Storage is a `BTreeMap` so iteration and serialized output are in name order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

// =============================================================================
// TOGGLE STORE
// =============================================================================

/// Owned toggle mapping for single-threaded use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToggleStore {
    flags: BTreeMap<String, bool>,
}

impl ToggleStore {
    /// Create an empty store. Every toggle reads as disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the state for `name`.
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.flags.insert(name.into(), enabled);
    }

    /// Stored state for `name`, or `false` if it was never set.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Whether `name` has an explicit entry (enabled or not).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Number of explicitly set toggles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if no toggle has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// All explicit entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// Names of the toggles currently enabled, in name order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for ToggleStore {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<S: Into<String>> Extend<(S, bool)> for ToggleStore {
    fn extend<I: IntoIterator<Item = (S, bool)>>(&mut self, iter: I) {
        for (name, enabled) in iter {
            self.set(name, enabled);
        }
    }
}

// =============================================================================
// SHARED TOGGLES
// =============================================================================

/// Toggle store guarded by an `RwLock` for use across threads.
///
/// Same contract as [`ToggleStore`], but `set` takes `&self`. A poisoned lock
/// is recovered: the map only holds booleans, so a writer that panicked
/// mid-insert cannot leave it in an invalid state.
#[derive(Debug, Default)]
pub struct SharedToggles {
    inner: RwLock<ToggleStore>,
}

impl SharedToggles {
    /// Create an empty shared store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the state for `name`.
    pub fn set(&self, name: impl Into<String>, enabled: bool) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(name, enabled);
    }

    /// Stored state for `name`, or `false` if it was never set.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_enabled(name)
    }

    /// Copy of the current mapping.
    #[must_use]
    pub fn snapshot(&self) -> ToggleStore {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl From<ToggleStore> for SharedToggles {
    fn from(store: ToggleStore) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fresh_store_disables_feature() {
        let toggles = ToggleStore::new();
        assert!(!toggles.is_enabled("riskNeutralPyramiding"));
        assert!(toggles.is_empty());
    }

    #[test]
    fn set_enables_feature() {
        let mut toggles = ToggleStore::new();
        toggles.set("riskNeutralPyramiding", true);
        assert!(toggles.is_enabled("riskNeutralPyramiding"));
        assert!(!toggles.is_enabled("somethingElse"));
    }

    #[test]
    fn set_overwrites_previous_state() {
        let mut toggles = ToggleStore::new();
        toggles.set("purge", true);
        toggles.set("purge", false);

        assert!(!toggles.is_enabled("purge"));
        assert!(toggles.contains("purge"));
        assert_eq!(toggles.len(), 1);
    }

    #[test]
    fn empty_name_is_a_valid_toggle() {
        let mut toggles = ToggleStore::new();
        assert!(!toggles.is_enabled(""));
        toggles.set("", true);
        assert!(toggles.is_enabled(""));
    }

    #[test]
    fn iteration_is_in_name_order() {
        let toggles: ToggleStore = [("zeta", true), ("alpha", false), ("mid", true)]
            .into_iter()
            .collect();

        let names: Vec<_> = toggles.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);

        let enabled: Vec<_> = toggles.enabled().collect();
        assert_eq!(enabled, vec!["mid", "zeta"]);
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut toggles = ToggleStore::new();
        toggles.set("b", false);
        toggles.set("a", true);

        let json = serde_json::to_string(&toggles).unwrap();
        assert_eq!(json, r#"{"a":true,"b":false}"#);

        let back: ToggleStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, toggles);
    }

    #[test]
    fn shared_toggles_across_threads() {
        let shared = Arc::new(SharedToggles::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || shared.set(format!("flag{i}"), i % 2 == 0))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(shared.is_enabled("flag0"));
        assert!(!shared.is_enabled("flag1"));
        assert!(shared.is_enabled("flag2"));
        assert!(!shared.is_enabled("flag3"));
        assert!(!shared.is_enabled("flag4"));
        assert_eq!(shared.snapshot().len(), 4);
    }

    #[test]
    fn shared_toggles_survive_poisoned_lock() {
        let shared = Arc::new(SharedToggles::new());
        shared.set("a", true);

        let writer = Arc::clone(&shared);
        let result = thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(shared.inner.is_poisoned());

        assert!(shared.is_enabled("a"));
        assert!(!shared.is_enabled("b"));
        shared.set("b", true);
        assert!(shared.is_enabled("b"));
        assert_eq!(shared.snapshot().len(), 2);
    }

    #[test]
    fn shared_toggles_from_store() {
        let mut store = ToggleStore::new();
        store.set("purge", true);

        let shared = SharedToggles::from(store);
        assert!(shared.is_enabled("purge"));
        shared.set("purge", false);
        assert!(!shared.is_enabled("purge"));
    }

    proptest! {
        #[test]
        fn unset_names_read_disabled(
            set in prop::collection::btree_map(".{0,8}", any::<bool>(), 0..8),
            probe in ".{0,8}",
        ) {
            prop_assume!(!set.contains_key(&probe));
            let toggles: ToggleStore = set.into_iter().collect();
            prop_assert!(!toggles.is_enabled(&probe));
        }

        #[test]
        fn set_then_read_returns_value(name in ".{0,12}", enabled in any::<bool>()) {
            let mut toggles = ToggleStore::new();
            toggles.set(name.clone(), enabled);
            prop_assert_eq!(toggles.is_enabled(&name), enabled);

            // Idempotent
            toggles.set(name.clone(), enabled);
            prop_assert_eq!(toggles.is_enabled(&name), enabled);
            prop_assert_eq!(toggles.len(), 1);
        }
    }
}
