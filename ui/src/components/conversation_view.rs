use dioxus::prelude::*;

use shamba_common::conversation::{message_rows, ConversationView, LoadState, MessageRow, MessageSide};
use shamba_common::site::paths;

use super::review_form::ReviewFormView;
use super::session::use_session;
use super::shared_state::use_api;

/// Buyer/seller thread for one conversation id.
///
/// Loads on mount and whenever `id` changes. After a successful send the
/// whole conversation is refetched; nothing is appended optimistically.
#[component]
pub fn ConversationPage(id: String) -> Element {
    let api = use_api();
    let session = use_session();
    let mut view = use_signal(ConversationView::new);
    let mut show_review = use_signal(|| false);

    let load = {
        let api = api.clone();
        move |conversation_id: String| {
            let ticket = view.write().begin_load(&conversation_id);
            let api = api.clone();
            spawn(async move {
                let result = api.get_conversation(&conversation_id).await;
                view.write().finish_load(ticket, result);
            });
        }
    };

    let mut load_on_change = load.clone();
    use_effect(use_reactive((&id,), move |(id,)| load_on_change(id)));

    let send = {
        let reload = load.clone();
        move || {
            let Ok(pending) = view.write().begin_send() else {
                return;
            };
            let api = api.clone();
            let mut reload = reload.clone();
            spawn(async move {
                let result = api.send_message(&pending.conversation_id, &pending.text).await;
                if view.write().finish_send(&pending, result) {
                    reload(pending.conversation_id);
                }
            });
        }
    };

    let viewer_id = session.read().viewer_id().to_string();
    let state = view.read();

    let conversation = match state.state() {
        LoadState::Idle | LoadState::Loading => {
            return rsx! { div { class: "loading", "Loading conversation..." } };
        }
        LoadState::NotFound => {
            return rsx! {
                div { class: "empty-state",
                    h2 { "Conversation not found" }
                    p { "It may have been removed, or the link is wrong." }
                    Link { to: paths::BROWSE, "Back to listings" }
                }
            };
        }
        LoadState::Failed(message) => {
            return rsx! { div { class: "error-state", p { "{message}" } } };
        }
        LoadState::Ready(conversation) => conversation.clone(),
    };
    let refreshing = state.is_refreshing();
    let refresh_error = state.refresh_error().map(String::from);
    let compose_text = state.compose.text.clone();
    let compose_error = state.compose.error.clone();
    let can_send = state.compose.can_send();
    let sending = state.compose.is_sending();
    drop(state);

    let rows = message_rows(&conversation, &viewer_id);
    let counterpart = conversation.counterpart_name(&viewer_id).to_string();
    let counterpart_id = if conversation.buyer.id == viewer_id {
        conversation.seller.id.clone()
    } else {
        conversation.buyer.id.clone()
    };

    rsx! {
        div { class: "conversation",
            header { class: "conversation-header",
                h2 { "{counterpart}" }
                if let Some(listing) = conversation.listing.as_ref() {
                    p { class: "conversation-listing", "About: {listing.title}" }
                }
                if refreshing {
                    span { class: "refreshing", "Updating..." }
                }
                if let Some(err) = refresh_error {
                    span { class: "field-error refresh-error", "{err}" }
                }
            }

            MessageList { rows }

            div { class: "chat-input",
                input {
                    r#type: "text",
                    placeholder: "Type a message...",
                    value: "{compose_text}",
                    oninput: move |evt| view.write().compose.set_text(evt.value()),
                    onkeypress: {
                        let mut send = send.clone();
                        move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                send();
                            }
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    disabled: !can_send,
                    onclick: {
                        let mut send = send.clone();
                        move |_| send()
                    },
                    if sending { "Sending..." } else { "Send" }
                }
            }
            if let Some(err) = compose_error {
                p { class: "field-error compose-error", "{err}" }
            }

            if let Some(listing) = conversation.listing.clone() {
                div { class: "conversation-review",
                    if *show_review.read() {
                        ReviewFormView {
                            reviewed_id: counterpart_id,
                            listing_id: listing.id,
                            on_complete: move |_| show_review.set(false),
                        }
                    } else {
                        button {
                            class: "btn btn-secondary",
                            onclick: move |_| show_review.set(true),
                            "Review {counterpart}"
                        }
                    }
                }
            }
        }
    }
}

/// Messages in the order the API returned them.
#[component]
pub fn MessageList(rows: Vec<MessageRow>) -> Element {
    if rows.is_empty() {
        return rsx! { p { class: "chat-empty", "No messages yet. Say hello!" } };
    }

    rsx! {
        div { class: "chat-messages",
            for row in rows.iter() {
                div {
                    class: match row.side {
                        MessageSide::Own => "chat-bubble chat-sent",
                        MessageSide::Other => "chat-bubble chat-received",
                    },
                    if row.side == MessageSide::Other {
                        span { class: "chat-sender", "{row.sender_name}" }
                    }
                    p { "{row.text}" }
                    span { class: "chat-time", "{row.time_label}" }
                }
            }
        }
    }
}
