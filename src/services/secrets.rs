use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

/// Secret resolution for provider clients: runtime overrides layered over
/// the process environment.
///
/// A config update that carries an API key publishes it here, so clients
/// constructed afterwards (or reading lazily) see the new credential for the
/// rest of the process lifetime without re-reading the config file.
pub struct SecretStore {
    overrides: RwLock<HashMap<String, String>>,
}

impl SecretStore {
    pub fn new() -> Self {
        SecretStore {
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.read().unwrap().get(key) {
            if !value.is_empty() {
                return Some(value.clone());
            }
        }
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut overrides = self.overrides.write().unwrap();
        overrides.insert(key.to_string(), value.to_string());
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn override_wins_over_environment() {
        let key = format!("CARE_TEST_SECRET_{}", Uuid::new_v4().simple());
        let store = SecretStore::new();
        assert_eq!(store.get(&key), None);

        store.set(&key, "runtime-value");
        assert_eq!(store.get(&key), Some("runtime-value".to_string()));
    }

    #[test]
    fn empty_override_counts_as_absent() {
        let key = format!("CARE_TEST_SECRET_{}", Uuid::new_v4().simple());
        let store = SecretStore::new();
        store.set(&key, "");
        assert_eq!(store.get(&key), None);
    }
}
