//! User preference store — per-user default config plus symbol overrides.
//!
//! Read far more often than written. Writes are atomic per user key: the
//! read-modify-write that merges an override into a profile happens inside the
//! store, under its write lock.

use crate::domain::{SlippageConfig, UserSlippagePreference};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Capability contract for the preference store. Configs are validated by the
/// policy layer before they reach a setter; the store never sees an invalid one.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, user_id: &str) -> Option<UserSlippagePreference>;

    /// Set the user's default config, creating the profile on first write.
    fn set_default(&self, user_id: &str, config: SlippageConfig);

    /// Set a per-symbol override, creating the profile on first write.
    fn set_symbol_override(&self, user_id: &str, symbol: &str, config: SlippageConfig);

    fn delete(&self, user_id: &str);

    fn clear(&self);
}

/// Default store: map behind an RwLock, shared readers, exclusive writers.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    prefs: RwLock<HashMap<String, UserSlippagePreference>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, user_id: &str) -> Option<UserSlippagePreference> {
        self.prefs.read().unwrap().get(user_id).cloned()
    }

    fn set_default(&self, user_id: &str, config: SlippageConfig) {
        let mut prefs = self.prefs.write().unwrap();
        let pref = prefs
            .entry(user_id.to_string())
            .or_insert_with(|| UserSlippagePreference::new(user_id));
        pref.default_config = config;
        pref.last_updated = Utc::now();
    }

    fn set_symbol_override(&self, user_id: &str, symbol: &str, config: SlippageConfig) {
        let mut prefs = self.prefs.write().unwrap();
        let pref = prefs
            .entry(user_id.to_string())
            .or_insert_with(|| UserSlippagePreference::new(user_id));
        pref.symbol_overrides.insert(symbol.to_string(), config);
        pref.last_updated = Utc::now();
    }

    fn delete(&self, user_id: &str) {
        self.prefs.write().unwrap().remove(user_id);
    }

    fn clear(&self) {
        self.prefs.write().unwrap().clear();
    }
}
