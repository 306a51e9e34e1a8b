use chrono::Datelike;
use dioxus::prelude::*;

use shamba_common::legal::LegalDocument;
use shamba_common::site::{paths, NavLink, BRAND, DESKTOP_NAV, FOOTER_NAV, MOBILE_NAV};

use super::about_view::AboutView;
use super::buy_request_form::BuyRequestView;
use super::consent_banner::ConsentBanner;
use super::conversation_view::ConversationPage;
use super::home_view::HomeView;
use super::legal_page::LegalPageView;
use super::listings_view::ListingsView;
use super::login_view::LoginPage;
use super::sell_view::SellView;
use super::shared_state::{use_analytics, use_app_providers, use_consent};

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/browse")]
    Browse {},
    #[route("/request")]
    BuyRequest {},
    #[route("/sell")]
    Sell {},
    #[route("/about")]
    About {},
    #[route("/login?:mode")]
    Login { mode: String },
    #[route("/messages/:id")]
    Messages { id: String },
    #[route("/privacy")]
    Privacy {},
    #[route("/terms")]
    Terms {},
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

#[component]
pub fn App() -> Element {
    use_app_providers();

    rsx! { Router::<Route> {} }
}

#[component]
fn AppLayout() -> Element {
    let route = use_route::<Route>();
    let analytics = use_analytics();
    let consent = use_consent();
    let mut menu_open = use_signal(|| false);
    let year = use_hook(|| chrono::Utc::now().year());

    use_effect(use_reactive((&route,), move |(route,)| {
        analytics.track_page_view(consent.peek().value(), &route.to_string());
    }));

    rsx! {
        div { class: "shamba-app",
            header { class: "site-header",
                div { class: "header-bar",
                    Link { class: "brand", to: paths::HOME, "{BRAND}" }
                    nav { class: "nav-desktop",
                        for link in DESKTOP_NAV {
                            NavItem { key: "{link.href}", link }
                        }
                    }
                    button {
                        class: "nav-toggle",
                        "aria-label": "Menu",
                        "aria-expanded": menu_open(),
                        onclick: move |_| menu_open.toggle(),
                        if menu_open() { "✕" } else { "☰" }
                    }
                }
                if menu_open() {
                    nav { class: "nav-mobile", onclick: move |_| menu_open.set(false),
                        for link in MOBILE_NAV {
                            NavItem { key: "{link.href}", link }
                        }
                    }
                }
            }
            main { class: "site-main",
                Outlet::<Route> {}
            }
            footer { class: "site-footer",
                nav {
                    for link in FOOTER_NAV {
                        NavItem { key: "{link.href}", link }
                    }
                }
                p { class: "copyright", "© {year} {BRAND}" }
            }
            ConsentBanner {}
        }
    }
}

#[component]
fn NavItem(link: NavLink) -> Element {
    let class = if link.cta { "btn btn-primary nav-cta" } else { "nav-link" };
    rsx! {
        Link { class: "{class}", to: link.href, "{link.label}" }
    }
}

#[component]
fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
fn Browse() -> Element {
    rsx! { ListingsView {} }
}

#[component]
fn BuyRequest() -> Element {
    rsx! { BuyRequestView {} }
}

#[component]
fn Sell() -> Element {
    rsx! { SellView {} }
}

#[component]
fn About() -> Element {
    rsx! { AboutView {} }
}

/// Route component: log-in or sign-up depending on `?mode=`.
#[component]
fn Login(mode: String) -> Element {
    rsx! { LoginPage { mode } }
}

/// Route component: a conversation thread by id from the URL.
#[component]
fn Messages(id: String) -> Element {
    rsx! { ConversationPage { id } }
}

#[component]
fn Privacy() -> Element {
    rsx! { LegalPageView { doc: LegalDocument::PrivacyPolicy } }
}

#[component]
fn Terms() -> Element {
    rsx! { LegalPageView { doc: LegalDocument::TermsOfService } }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        section { class: "not-found",
            h1 { "Page not found" }
            p { "There is nothing at /{path}." }
            Link { class: "btn btn-primary", to: paths::HOME, "Back to Shamba" }
        }
    }
}
