use dioxus::prelude::*;

use shamba_common::review::Rating;

/// Five clickable stars; the first `value` are filled.
#[component]
pub fn StarRating(label: String, value: Rating, on_select: EventHandler<u8>) -> Element {
    let filled = value.filled_stars();

    rsx! {
        div { class: "star-rating", "aria-label": "{label}",
            span { class: "star-rating-label", "{label}" }
            for k in Rating::MIN..=Rating::MAX {
                button {
                    key: "{k}",
                    r#type: "button",
                    class: if usize::from(k) <= filled { "star filled" } else { "star" },
                    title: "{k} of 5",
                    onclick: move |_| on_select.call(k),
                    if usize::from(k) <= filled { "★" } else { "☆" }
                }
            }
        }
    }
}
