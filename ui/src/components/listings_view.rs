use dioxus::prelude::*;

use shamba_common::county::KENYAN_COUNTIES;
use shamba_common::listing::{Listing, ListingCategory, ListingFilter};
use shamba_common::site::page_title;

use super::shared_state::use_api;

#[component]
pub fn ListingsView() -> Element {
    let api = use_api();
    let mut filter = use_signal(ListingFilter::default);

    let listings = use_resource(move || {
        let api = api.clone();
        async move { api.list_listings().await }
    });

    let body = match &*listings.read_unchecked() {
        None => rsx! {
            div { class: "loading-spinner", role: "status", "aria-label": "Loading listings" }
        },
        Some(Err(e)) => {
            let message = e.user_message("Failed to load listings. Please try again.");
            rsx! { p { class: "error-message", role: "alert", "{message}" } }
        }
        Some(Ok(all)) => {
            let current = filter.read();
            let shown: Vec<Listing> = current.apply(all).into_iter().cloned().collect();
            let filtered = !current.is_empty();
            rsx! {
                if shown.is_empty() {
                    p { class: "empty-state",
                        if filtered {
                            "No listings match your filters."
                        } else {
                            "No listings yet. Check back soon."
                        }
                    }
                } else {
                    div { class: "listing-grid",
                        for listing in shown {
                            ListingCard { key: "{listing.id}", listing: listing.clone() }
                        }
                    }
                }
            }
        }
    };

    let title = page_title(Some("Listings"));
    rsx! {
        document::Title { "{title}" }
        section { class: "listings-view",
            h1 { "Fresh from the farm" }
            div { class: "filter-bar",
                input {
                    r#type: "search",
                    placeholder: "Search listings...",
                    value: "{filter.read().query}",
                    oninput: move |evt| filter.write().query = evt.value(),
                }
                select {
                    "aria-label": "Category",
                    onchange: move |evt| filter.write().category = ListingCategory::from_slug(&evt.value()),
                    option { value: "", "All categories" }
                    for category in ListingCategory::ALL {
                        option { value: category.slug(), "{category.label()}" }
                    }
                }
                select {
                    "aria-label": "County",
                    onchange: move |evt| {
                        let value = evt.value();
                        filter.write().county = (!value.is_empty()).then_some(value);
                    },
                    option { value: "", "All counties" }
                    for county in KENYAN_COUNTIES {
                        option { value: county, "{county}" }
                    }
                }
            }
            {body}
        }
    }
}

#[component]
pub fn ListingCard(listing: Listing) -> Element {
    let price = listing.price_label();
    rsx! {
        div { class: "listing-card",
            span { class: "listing-category", "{listing.category.label()}" }
            h3 { "{listing.title}" }
            if !listing.description.is_empty() {
                p { class: "listing-description", "{listing.description}" }
            }
            p { class: "listing-price", "{price}" }
            p { class: "listing-meta",
                "{listing.quantity_available} {listing.unit} available · {listing.county}"
            }
            p { class: "listing-seller", "Sold by {listing.seller.name}" }
        }
    }
}
