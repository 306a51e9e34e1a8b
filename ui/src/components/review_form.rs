use dioxus::prelude::*;

use shamba_common::review::{ReviewCategory, ReviewForm, MIN_COMMENT_LEN};

use super::shared_state::use_api;
use super::star_rating::StarRating;

#[component]
pub fn ReviewFormView(
    reviewed_id: String,
    listing_id: String,
    on_complete: EventHandler<()>,
) -> Element {
    let api = use_api();
    let mut form = use_signal(|| ReviewForm::new(reviewed_id.clone(), listing_id.clone()));

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(submission) = form.write().begin_submit() else {
            return;
        };
        let api = api.clone();
        spawn(async move {
            let result = api.submit_review(&submission).await;
            let notify = move || on_complete.call(());
            form.write().finish_submit(result, Some(&notify));
        });
    };

    let state = form.read();
    let comment_len = state.comment_len();
    let can_submit = state.can_submit();
    let submitting = state.is_submitting();
    let error = state.error.clone();
    let rating = state.rating;
    let categories = state.categories;
    let comment = state.comment.clone();
    drop(state);

    rsx! {
        form { class: "review-form", onsubmit: submit,
            h3 { "Leave a review" }
            StarRating {
                label: "Overall",
                value: rating,
                on_select: move |k| form.write().click_star(k),
            }
            div { class: "review-categories",
                for category in ReviewCategory::ALL {
                    StarRating {
                        key: "{category.label()}",
                        label: category.label().to_string(),
                        value: categories.get(category),
                        on_select: move |k| form.write().click_category_star(category, k),
                    }
                }
            }
            div { class: "form-group",
                label { "Your experience:" }
                textarea {
                    placeholder: "What went well? What could be better?",
                    value: "{comment}",
                    oninput: move |evt| form.write().comment = evt.value(),
                }
                if comment_len < MIN_COMMENT_LEN {
                    span { class: "field-hint", "{comment_len}/{MIN_COMMENT_LEN} characters minimum" }
                }
            }
            if let Some(err) = error {
                p { class: "field-error", "{err}" }
            }
            button {
                r#type: "submit",
                class: "btn btn-primary",
                disabled: !can_submit,
                if submitting { "Submitting..." } else { "Submit Review" }
            }
        }
    }
}
