use dioxus::prelude::*;

use shamba_common::site::paths;

use super::app::Route;
use super::shared_state::{use_analytics, use_consent};

/// Cookie banner wired to the consent gate and analytics bridge.
///
/// On mount an earlier `accepted` decision arms the tag straight away; a
/// visitor with no decision sees the prompt. Arming records the current
/// route as the first page view.
#[component]
pub fn ConsentBanner() -> Element {
    let mut consent = use_consent();
    let analytics = use_analytics();
    let route = use_route::<Route>();
    let path = route.to_string();

    let arm_on_mount = analytics.clone();
    let mount_path = path.clone();
    use_effect(move || {
        arm_on_mount.arm(consent.read().value(), &mount_path);
    });

    if !consent.read().banner_visible() {
        return rsx! {};
    }

    rsx! {
        ConsentPrompt {
            on_accept: move |_| {
                if consent.write().accept() {
                    analytics.arm(consent.peek().value(), &path);
                }
            },
            on_reject: move |_| {
                consent.write().reject();
            },
        }
    }
}

#[component]
pub fn ConsentPrompt(on_accept: EventHandler<()>, on_reject: EventHandler<()>) -> Element {
    rsx! {
        div { class: "consent-banner", role: "dialog", "aria-label": "Cookie consent",
            p {
                "We use cookies to understand how Shamba is used and to improve it. "
                a { href: paths::PRIVACY, "Read our Privacy Policy" }
            }
            div { class: "consent-actions",
                button {
                    class: "btn btn-secondary consent-reject",
                    onclick: move |_| on_reject.call(()),
                    "Reject"
                }
                button {
                    class: "btn btn-primary consent-accept",
                    onclick: move |_| on_accept.call(()),
                    "Accept"
                }
            }
        }
    }
}
