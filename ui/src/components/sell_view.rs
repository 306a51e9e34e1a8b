use dioxus::prelude::*;

use shamba_common::site::{page_title, paths};

#[component]
pub fn SellView() -> Element {
    let title = page_title(Some("Sell"));
    rsx! {
        document::Title { "{title}" }
        section { class: "sell-view",
            h1 { "Sell on Shamba" }
            p { class: "lead",
                "Reach buyers across all 47 counties. Listing is free and you set your own price."
            }
            ul { class: "benefits",
                li { "Buyers message you directly, no middlemen." }
                li { "Good reviews help new buyers trust you." }
                li { "See what buyers near you are asking for." }
            }
            div { class: "hero-actions",
                Link { class: "btn btn-primary", to: paths::SIGNUP, "Create a seller account" }
                Link { class: "btn btn-secondary", to: paths::REQUEST, "See buy requests" }
            }
        }
    }
}
