use dioxus::prelude::*;

use shamba_common::site::{page_title, paths, TAGLINE};

#[component]
pub fn HomeView() -> Element {
    let title = page_title(None);
    rsx! {
        document::Title { "{title}" }
        section { class: "hero",
            h1 { "{TAGLINE}" }
            p { class: "lead",
                "Buy maize, potatoes, milk and more straight from the farmers who grow them."
            }
            div { class: "hero-actions",
                Link { class: "btn btn-primary", to: paths::BROWSE, "Browse Listings" }
                Link { class: "btn btn-secondary", to: paths::REQUEST, "Post a Buy Request" }
            }
        }
        section { class: "how-it-works",
            h2 { "How it works" }
            ol {
                li { "Sellers list what they are harvesting, with price and county." }
                li { "Buyers browse or post what they need." }
                li { "Both sides agree the details in a private conversation." }
                li { "After the deal, buyers leave a review for the seller." }
            }
        }
    }
}
