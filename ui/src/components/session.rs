use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use shamba_common::consent::KeyValueStore;

use super::browser::BrowserStorage;

/// Key under which the auth system leaves the signed-in user.
const SESSION_STORAGE_KEY: &str = "shamba_session";

/// Who is looking at the page. Written by the external auth system;
/// the frontend only reads it to tell "own" messages from the rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn load() -> Self {
        Self::load_from(&BrowserStorage)
    }

    pub fn load_from(store: &impl KeyValueStore) -> Self {
        store
            .get(SESSION_STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save_to(&self, store: &impl KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            store.set(SESSION_STORAGE_KEY, &json);
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn viewer_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or_default()
    }
}

pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}
