use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key holding the visitor's cookie decision.
pub const CONSENT_STORAGE_KEY: &str = "cookie-consent";

/// Client-local string storage (browser `localStorage` in the UI).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// The visitor's analytics decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsentValue {
    Accepted,
    Rejected,
    #[default]
    Unset,
}

impl ConsentValue {
    /// Parse a stored value. Anything unrecognised counts as no decision.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some("accepted") => Self::Accepted,
            Some("rejected") => Self::Rejected,
            _ => Self::Unset,
        }
    }

    pub fn as_stored(self) -> Option<&'static str> {
        match self {
            Self::Accepted => Some("accepted"),
            Self::Rejected => Some("rejected"),
            Self::Unset => None,
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Tri-state consent gate backed by client-local storage.
///
/// `Unset` moves to `Accepted` or `Rejected` once and stays there; only
/// clearing storage outside the app resets it.
pub struct ConsentGate<S> {
    store: S,
    key: String,
    value: ConsentValue,
}

impl<S: KeyValueStore> ConsentGate<S> {
    /// Read the persisted decision under the default key.
    pub fn load(store: S) -> Self {
        Self::load_with_key(store, CONSENT_STORAGE_KEY)
    }

    pub fn load_with_key(store: S, key: &str) -> Self {
        let value = ConsentValue::from_stored(store.get(key).as_deref());
        tracing::debug!(?value, "Loaded cookie consent");
        Self {
            store,
            key: key.to_string(),
            value,
        }
    }

    pub fn value(&self) -> ConsentValue {
        self.value
    }

    pub fn banner_visible(&self) -> bool {
        self.value == ConsentValue::Unset
    }

    /// Persist `accepted`. Returns true when this call made the decision.
    pub fn accept(&mut self) -> bool {
        self.decide(ConsentValue::Accepted)
    }

    /// Persist `rejected`. Returns true when this call made the decision.
    pub fn reject(&mut self) -> bool {
        self.decide(ConsentValue::Rejected)
    }

    fn decide(&mut self, value: ConsentValue) -> bool {
        if self.value != ConsentValue::Unset {
            return false;
        }
        if let Some(raw) = value.as_stored() {
            self.store.set(&self.key, raw);
        }
        self.value = value;
        tracing::info!(?value, "Cookie consent recorded");
        true
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_visit_shows_banner() {
        let store = MemoryStore::new();
        let gate = ConsentGate::load(&store);
        assert_eq!(gate.value(), ConsentValue::Unset);
        assert!(gate.banner_visible());
    }

    #[test]
    fn accept_persists_and_hides_banner_across_remounts() {
        let store = MemoryStore::new();
        let mut gate = ConsentGate::load(&store);
        assert!(gate.accept());
        assert!(!gate.banner_visible());
        assert_eq!(store.get(CONSENT_STORAGE_KEY).as_deref(), Some("accepted"));

        let remounted = ConsentGate::load(&store);
        assert_eq!(remounted.value(), ConsentValue::Accepted);
        assert!(!remounted.banner_visible());
    }

    #[test]
    fn reject_persists() {
        let store = MemoryStore::new();
        let mut gate = ConsentGate::load(&store);
        assert!(gate.reject());
        assert_eq!(store.get(CONSENT_STORAGE_KEY).as_deref(), Some("rejected"));
        assert_eq!(ConsentGate::load(&store).value(), ConsentValue::Rejected);
    }

    #[test]
    fn decision_is_terminal() {
        let store = MemoryStore::new();
        let mut gate = ConsentGate::load(&store);
        gate.reject();
        assert!(!gate.accept());
        assert_eq!(gate.value(), ConsentValue::Rejected);
        assert_eq!(store.get(CONSENT_STORAGE_KEY).as_deref(), Some("rejected"));
    }

    #[test]
    fn clearing_storage_resets_decision() {
        let store = MemoryStore::new();
        ConsentGate::load(&store).accept();
        store.remove(CONSENT_STORAGE_KEY);
        assert!(ConsentGate::load(&store).banner_visible());
    }

    #[test]
    fn garbage_value_reads_as_unset() {
        let store = MemoryStore::new();
        store.set(CONSENT_STORAGE_KEY, "maybe");
        assert_eq!(ConsentGate::load(&store).value(), ConsentValue::Unset);
    }
}
