use std::rc::Rc;

use dioxus::prelude::*;

use shamba_common::api::ApiClient;
use shamba_common::legal::{LegalDocument, LegalPage};
use shamba_common::site::page_title;

use super::browser::FetchTransport;

/// Fetches a legal document once on mount and shows it as preformatted text.
/// Documents are static assets on the app's own origin, not the API host.
#[component]
pub fn LegalPageView(doc: LegalDocument) -> Element {
    let assets = use_hook(|| Rc::new(ApiClient::new(FetchTransport::new(""))));
    let mut page = use_signal(|| LegalPage::Loading);

    use_effect(use_reactive((&doc,), move |(doc,)| {
        page.set(LegalPage::Loading);
        let assets = assets.clone();
        spawn(async move {
            let result = assets.fetch_text(doc.path()).await;
            page.set(LegalPage::from_result(doc, result));
        });
    }));

    let title = page_title(Some(doc.title()));
    rsx! {
        document::Title { "{title}" }
        article { class: "legal-page",
            h1 { "{doc.title()}" }
            LegalBody { page: page() }
        }
    }
}

#[component]
pub fn LegalBody(page: LegalPage) -> Element {
    match page {
        LegalPage::Loading => rsx! {
            div { class: "loading-spinner", role: "status", "aria-label": "Loading document" }
        },
        LegalPage::Ready(text) => rsx! {
            pre { class: "legal-text", "{text}" }
        },
        LegalPage::Failed(message) => rsx! {
            p { class: "error-message", role: "alert", "{message}" }
        },
    }
}
