//! Consent-gated bridge to the third-party analytics tag.
//!
//! The tag is injected lazily: nothing touches the page until the visitor
//! has accepted cookies, and the init sequence (command stub, script tag,
//! config call) runs at most once per page. The host reports whether a tag
//! is already installed, so a second bridge over the same page never
//! re-injects it.
//!
//! The config call must not emit its own page view: arming sends one for
//! the current path, and consecutive page views for the same path are
//! collapsed so a route effect racing the arm cannot double count.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::consent::ConsentValue;

const TAG_SCRIPT_BASE: &str = "https://www.googletagmanager.com/gtag/js";

/// Script URL for a given tag id.
pub fn tag_script_url(tag_id: &str) -> String {
    format!("{TAG_SCRIPT_BASE}?id={tag_id}")
}

/// A command forwarded to the tag after it has been armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCommand {
    PageView { path: String },
    Event { name: String, params: Vec<(String, String)> },
}

/// The page the tag lives in. The UI implements this over the DOM.
pub trait TagHost {
    /// Install the command queue stub so calls made before the script
    /// loads are buffered.
    fn create_stub(&self);
    fn inject_script(&self, url: &str);
    /// Configure the tag without an automatic page view.
    fn configure(&self, tag_id: &str);
    /// Whether the tag script is already on the page.
    fn is_installed(&self) -> bool;
    fn send(&self, command: &TagCommand);
}

pub struct AnalyticsBridge<H> {
    host: H,
    tag_id: Option<String>,
    armed: AtomicBool,
    last_page_view: Mutex<Option<String>>,
}

impl<H: TagHost> AnalyticsBridge<H> {
    /// `tag_id = None` builds a bridge that never arms.
    pub fn new(host: H, tag_id: Option<String>) -> Self {
        Self {
            host,
            tag_id: tag_id.filter(|id| !id.trim().is_empty()),
            armed: AtomicBool::new(false),
            last_page_view: Mutex::new(None),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Run the tag init sequence if consent allows it, then record a page
    /// view for `current_path`. Idempotent. Returns true only on the call
    /// that actually injected the tag.
    pub fn arm(&self, consent: ConsentValue, current_path: &str) -> bool {
        if !consent.is_accepted() {
            return false;
        }
        let Some(tag_id) = self.tag_id.as_deref() else {
            tracing::debug!("Analytics tag id not configured; skipping");
            return false;
        };
        if self
            .armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        if self.host.is_installed() {
            tracing::debug!(tag_id, "Analytics tag already on the page");
            return false;
        }
        self.host.create_stub();
        self.host.inject_script(&tag_script_url(tag_id));
        self.host.configure(tag_id);
        tracing::info!(tag_id, "Analytics tag armed");
        self.track_page_view(consent, current_path);
        true
    }

    /// Forward a page view unless the previous one was for the same path.
    pub fn track_page_view(&self, consent: ConsentValue, path: &str) {
        if !consent.is_accepted() || !self.is_armed() {
            return;
        }
        let mut last = self
            .last_page_view
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(path) {
            return;
        }
        *last = Some(path.to_string());
        drop(last);
        self.host.send(&TagCommand::PageView {
            path: path.to_string(),
        });
    }

    pub fn track_event(&self, consent: ConsentValue, name: &str, params: &[(&str, &str)]) {
        self.forward(
            consent,
            TagCommand::Event {
                name: name.to_string(),
                params: params
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            },
        );
    }

    fn forward(&self, consent: ConsentValue, command: TagCommand) {
        if consent.is_accepted() && self.is_armed() {
            self.host.send(&command);
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}
