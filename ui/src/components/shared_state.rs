use std::rc::Rc;

use dioxus::prelude::*;

use shamba_common::analytics::AnalyticsBridge;
use shamba_common::api::ApiClient;
use shamba_common::config::FrontendConfig;
use shamba_common::consent::ConsentGate;

use super::browser::{BrowserStorage, DomTagHost, FetchTransport};
use super::session::Session;

pub type Api = Rc<ApiClient<FetchTransport>>;

/// One bridge per app, provided from the root. Arming is guarded per bridge
/// and per page: `DomTagHost` reports an existing tag script, so a remounted
/// root never injects a second one.
pub type Analytics = Rc<AnalyticsBridge<DomTagHost>>;

pub type Consent = Signal<ConsentGate<BrowserStorage>>;

/// Install the app-wide contexts. Called once from the root component.
pub fn use_app_providers() {
    let config = use_hook(FrontendConfig::from_env);
    let api_base = config.api_base_url.clone();
    let tag_id = config.analytics_tag_id.clone();
    let consent_key = config.consent_key;

    use_context_provider(|| config);
    use_context_provider(move || -> Api { Rc::new(ApiClient::new(FetchTransport::new(api_base))) });
    use_context_provider(move || -> Analytics { Rc::new(AnalyticsBridge::new(DomTagHost, tag_id)) });
    use_context_provider(move || Signal::new(ConsentGate::load_with_key(BrowserStorage, consent_key)));
    use_context_provider(|| Signal::new(Session::load()));
}

pub fn use_api() -> Api {
    use_context::<Api>()
}

pub fn use_analytics() -> Analytics {
    use_context::<Analytics>()
}

pub fn use_consent() -> Consent {
    use_context::<Consent>()
}
