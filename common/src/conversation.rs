use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

pub type ConversationId = String;

/// The buyer side of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// The seller side of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
}

/// Listing a conversation was started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price_kes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A message as returned by the API. Never modified client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: MessageSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Archived,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub buyer: Buyer,
    pub seller: Seller,
    #[serde(default)]
    pub listing: Option<ListingRef>,
    /// In API order; assumed chronological and never re-sorted.
    pub messages: Vec<Message>,
    pub status: ConversationStatus,
    #[serde(default)]
    pub last_message: Option<String>,
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    /// Display name of the other participant from the viewer's side.
    pub fn counterpart_name(&self, viewer_id: &str) -> &str {
        if self.buyer.id == viewer_id {
            &self.seller.name
        } else {
            &self.buyer.name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSide {
    Own,
    Other,
}

impl Message {
    pub fn side(&self, viewer_id: &str) -> MessageSide {
        if self.sender.id == viewer_id {
            MessageSide::Own
        } else {
            MessageSide::Other
        }
    }
}

/// A message prepared for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub side: MessageSide,
    pub sender_name: String,
    pub text: String,
    pub time_label: String,
}

pub fn message_rows(conversation: &Conversation, viewer_id: &str) -> Vec<MessageRow> {
    conversation
        .messages
        .iter()
        .map(|m| MessageRow {
            side: m.side(viewer_id),
            sender_name: m.sender.name.clone(),
            text: m.text.clone(),
            time_label: m.timestamp.format("%H:%M").to_string(),
        })
        .collect()
}

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load conversation";
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";
pub const REFRESH_FAILED_MESSAGE: &str = "Couldn't refresh this conversation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Conversation),
    NotFound,
    Failed(String),
}

/// Identifies one load request. Completions carrying anything but the
/// latest ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// A message send bound to the conversation it was composed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub conversation_id: ConversationId,
    pub text: String,
    epoch: u64,
}

/// Read-only cached view of one conversation plus its compose box.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationView {
    conversation_id: Option<ConversationId>,
    state: LoadState,
    latest: u64,
    in_flight: bool,
    /// Bumped whenever the shown conversation id changes.
    epoch: u64,
    refresh_error: Option<String>,
    pub compose: ComposeState,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    pub fn new() -> Self {
        Self {
            conversation_id: None,
            state: LoadState::Idle,
            latest: 0,
            in_flight: false,
            epoch: 0,
            refresh_error: None,
            compose: ComposeState::default(),
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        match &self.state {
            LoadState::Ready(c) => Some(c),
            _ => None,
        }
    }

    /// True while a refetch runs behind an already rendered conversation.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight && self.conversation().is_some()
    }

    /// Set when a refetch behind a rendered conversation failed; the
    /// previous thread stays on screen.
    pub fn refresh_error(&self) -> Option<&str> {
        self.refresh_error.as_deref()
    }

    /// Start loading `conversation_id`. A refetch of the conversation
    /// already on screen keeps it visible; switching ids shows `Loading`.
    pub fn begin_load(&mut self, conversation_id: &str) -> LoadTicket {
        self.latest += 1;
        self.in_flight = true;
        let same_id = self.conversation_id.as_deref() == Some(conversation_id);
        if !same_id {
            self.conversation_id = Some(conversation_id.to_string());
            self.compose = ComposeState::default();
            self.epoch += 1;
        }
        self.refresh_error = None;
        if !(same_id && matches!(self.state, LoadState::Ready(_))) {
            self.state = LoadState::Loading;
        }
        tracing::debug!(conversation_id, ticket = self.latest, "Loading conversation");
        LoadTicket(self.latest)
    }

    /// Apply a load result. Returns false when the ticket is stale and the
    /// result was ignored.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Conversation, ApiError>,
    ) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "Dropping stale conversation response");
            return false;
        }
        self.in_flight = false;
        let showing_thread = self.conversation().is_some();
        self.state = match result {
            Ok(conversation) => LoadState::Ready(conversation),
            Err(ApiError::NotFound) => LoadState::NotFound,
            Err(e) if showing_thread => {
                tracing::warn!("Conversation refresh failed: {e}");
                self.refresh_error = Some(REFRESH_FAILED_MESSAGE.to_string());
                return true;
            }
            Err(e) => {
                tracing::warn!("Conversation load failed: {e}");
                LoadState::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        };
        true
    }

    /// Validate the compose box and bind the send to the conversation on
    /// screen.
    pub fn begin_send(&mut self) -> Result<PendingSend, ComposeError> {
        let conversation_id = self
            .conversation_id
            .clone()
            .ok_or(ComposeError::NoConversation)?;
        let text = self.compose.begin_send()?;
        Ok(PendingSend {
            conversation_id,
            text,
            epoch: self.epoch,
        })
    }

    /// Apply a send result. Returns true when `send.conversation_id` should
    /// be refetched. Results for a conversation no longer on screen are
    /// dropped without touching the current compose box.
    pub fn finish_send(&mut self, send: &PendingSend, result: Result<(), ApiError>) -> bool {
        if send.epoch != self.epoch {
            tracing::debug!(
                conversation_id = %send.conversation_id,
                "Dropping send result for a conversation no longer shown"
            );
            return false;
        }
        self.compose.finish_send(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    Empty,
    NoConversation,
}

/// The compose box under a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    pub text: String,
    pub error: Option<String>,
    pending: usize,
}

impl ComposeState {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn can_send(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Number of sends still in flight. Sends are not deduplicated.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_sending(&self) -> bool {
        self.pending > 0
    }

    /// Validate and mark a send in flight, returning the text to post.
    pub fn begin_send(&mut self) -> Result<String, ComposeError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ComposeError::Empty);
        }
        let text = text.to_string();
        self.pending += 1;
        self.error = None;
        Ok(text)
    }

    /// Apply a send result. Returns true when the conversation should be
    /// refetched.
    pub fn finish_send(&mut self, result: Result<(), ApiError>) -> bool {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(()) => {
                self.text.clear();
                true
            }
            Err(e) => {
                tracing::warn!("Message send failed: {e}");
                self.error = Some(e.user_message(SEND_FAILED_MESSAGE));
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const CONVERSATION_JSON: &str = r#"{
        "data": {
            "id": "c1",
            "buyer": {"id": "u-buyer", "name": "Achieng", "email": "achieng@example.com"},
            "seller": {"id": "u-seller", "name": "Kamau Farm", "county": "Nakuru"},
            "listing": {"id": "l9", "title": "Yellow maize, 90kg bags", "priceKes": 4200},
            "messages": [
                {"sender": {"id": "u-buyer", "name": "Achieng", "email": "achieng@example.com"},
                 "text": "Is the maize still available?", "timestamp": "2026-03-02T08:15:00Z", "read": true},
                {"sender": {"id": "u-seller", "name": "Kamau Farm", "email": "kamau@example.com"},
                 "text": "Yes, 40 bags.", "timestamp": "2026-03-02T07:00:00Z"}
            ],
            "status": "active",
            "lastMessage": "Yes, 40 bags.",
            "lastMessageAt": "2026-03-02T07:00:00Z"
        }
    }"#;
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::fixtures::CONVERSATION_JSON;
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::{decode_envelope, ApiClient};

    fn sample() -> Conversation {
        decode_envelope(CONVERSATION_JSON).unwrap()
    }

    #[test]
    fn decodes_typed_participants() {
        let c = sample();
        assert_eq!(c.buyer.name, "Achieng");
        assert_eq!(c.seller.county.as_deref(), Some("Nakuru"));
        assert_eq!(c.listing.as_ref().map(|l| l.price_kes), Some(Some(4200)));
        assert_eq!(c.status, ConversationStatus::Active);
        assert!(!c.messages[1].read);
    }

    #[test]
    fn rejects_untyped_participants() {
        let body = r#"{"data":{"id":"c1","buyer":"u1","seller":{"id":"s","name":"S"},
            "messages":[],"status":"active","lastMessageAt":"2026-03-02T07:00:00Z"}}"#;
        assert!(matches!(
            decode_envelope::<Conversation>(body),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let body = CONVERSATION_JSON.replace(r#""status": "active""#, r#""status": "disputed""#);
        let c: Conversation = decode_envelope(&body).unwrap();
        assert_eq!(c.status, ConversationStatus::Unknown);
    }

    #[test]
    fn rows_keep_api_order_and_mark_own_messages() {
        let rows = message_rows(&sample(), "u-buyer");
        assert_eq!(rows.len(), 2);
        // Second message has the earlier timestamp; order is still the API's.
        assert_eq!(rows[0].text, "Is the maize still available?");
        assert_eq!(rows[0].side, MessageSide::Own);
        assert_eq!(rows[0].time_label, "08:15");
        assert_eq!(rows[1].side, MessageSide::Other);
        assert_eq!(rows[1].sender_name, "Kamau Farm");
    }

    #[test]
    fn counterpart_depends_on_viewer() {
        let c = sample();
        assert_eq!(c.counterpart_name("u-buyer"), "Kamau Farm");
        assert_eq!(c.counterpart_name("u-seller"), "Achieng");
    }

    #[test]
    fn load_success_and_not_found() {
        let transport = MockTransport::new();
        transport.respond("/api/conversations/c1", 200, CONVERSATION_JSON);
        transport.respond("/api/conversations/missing", 404, "");
        let client = ApiClient::new(transport);

        let mut view = ConversationView::new();
        let t = view.begin_load("c1");
        assert_eq!(view.state(), &LoadState::Loading);
        assert!(view.finish_load(t, block_on(client.get_conversation("c1"))));
        assert_eq!(view.conversation().map(|c| c.id.as_str()), Some("c1"));

        let t = view.begin_load("missing");
        assert_eq!(view.state(), &LoadState::Loading);
        view.finish_load(t, block_on(client.get_conversation("missing")));
        assert_eq!(view.state(), &LoadState::NotFound);
    }

    #[test]
    fn load_failure_is_generic_and_terminal() {
        let transport = MockTransport::new();
        transport.respond("/api/conversations/c1", 500, r#"{"error":"db down"}"#);
        let client = ApiClient::new(transport);

        let mut view = ConversationView::new();
        let t = view.begin_load("c1");
        view.finish_load(t, block_on(client.get_conversation("c1")));
        assert_eq!(
            view.state(),
            &LoadState::Failed(LOAD_FAILED_MESSAGE.to_string())
        );
        // Nothing retried on its own.
        assert_eq!(client.transport().gets.borrow().len(), 1);
    }

    #[test]
    fn stale_response_does_not_overwrite_newer_view() {
        let mut view = ConversationView::new();
        let first = view.begin_load("c1");
        let second = view.begin_load("c2");

        let mut c2 = sample();
        c2.id = "c2".into();
        assert!(view.finish_load(second, Ok(c2)));
        assert!(!view.finish_load(first, Ok(sample())));
        assert_eq!(view.conversation().map(|c| c.id.as_str()), Some("c2"));

        assert!(!view.finish_load(first, Err(ApiError::NotFound)));
        assert!(matches!(view.state(), LoadState::Ready(_)));
    }

    #[test]
    fn refetch_keeps_current_thread_visible() {
        let mut view = ConversationView::new();
        let t = view.begin_load("c1");
        view.finish_load(t, Ok(sample()));

        let t = view.begin_load("c1");
        assert!(view.is_refreshing());
        assert!(view.conversation().is_some());
        view.finish_load(t, Ok(sample()));
        assert!(!view.is_refreshing());
    }

    #[test]
    fn empty_compose_cannot_send() {
        let mut compose = ComposeState::default();
        compose.set_text("   \n ");
        assert!(!compose.can_send());
        assert_eq!(compose.begin_send(), Err(ComposeError::Empty));
        assert_eq!(compose.pending(), 0);
    }

    #[test]
    fn send_success_clears_text_and_requests_refetch() {
        let transport = MockTransport::new();
        transport.respond("/api/conversations/c1/messages", 201, "{}");
        transport.respond("/api/conversations/c1", 200, CONVERSATION_JSON);
        let client = ApiClient::new(transport);

        let mut view = ConversationView::new();
        let t = view.begin_load("c1");
        view.finish_load(t, Ok(sample()));

        view.compose.set_text("  Deliver to Nakuru?  ");
        let send = view.begin_send().unwrap();
        assert_eq!(send.text, "Deliver to Nakuru?");
        assert_eq!(send.conversation_id, "c1");
        assert!(view.compose.is_sending());

        let result = block_on(client.send_message(&send.conversation_id, &send.text));
        assert!(view.finish_send(&send, result));
        assert_eq!(view.compose.text, "");
        assert!(view.compose.error.is_none());

        let t = view.begin_load("c1");
        view.finish_load(t, block_on(client.get_conversation("c1")));
        assert_eq!(
            client.transport().gets.borrow().as_slice(),
            ["/api/conversations/c1"]
        );
    }

    #[test]
    fn send_failure_preserves_text() {
        let transport = MockTransport::new();
        transport.respond(
            "/api/conversations/c1/messages",
            403,
            r#"{"message":"Conversation is closed"}"#,
        );
        transport.fail("/api/conversations/c1/messages", "offline");
        let client = ApiClient::new(transport);

        let mut compose = ComposeState::default();
        compose.set_text("Hello");
        let text = compose.begin_send().unwrap();
        assert!(!compose.finish_send(block_on(client.send_message("c1", &text))));
        assert_eq!(compose.text, "Hello");
        assert_eq!(compose.error.as_deref(), Some("Conversation is closed"));

        let text = compose.begin_send().unwrap();
        assert!(compose.error.is_none());
        compose.finish_send(block_on(client.send_message("c1", &text)));
        assert_eq!(compose.error.as_deref(), Some(SEND_FAILED_MESSAGE));
        assert_eq!(compose.text, "Hello");
    }

    #[test]
    fn concurrent_sends_race() {
        let mut compose = ComposeState::default();
        compose.set_text("one");
        compose.begin_send().unwrap();
        compose.begin_send().unwrap();
        assert_eq!(compose.pending(), 2);
        compose.finish_send(Ok(()));
        compose.finish_send(Err(ApiError::Network("reset".into())));
        assert_eq!(compose.pending(), 0);
        assert_eq!(compose.error.as_deref(), Some(SEND_FAILED_MESSAGE));
    }

    #[test]
    fn switching_conversation_resets_compose() {
        let mut view = ConversationView::new();
        view.begin_load("c1");
        view.compose.set_text("draft");
        view.begin_load("c1");
        assert_eq!(view.compose.text, "draft");
        view.begin_load("c2");
        assert_eq!(view.compose.text, "");
    }

    fn loaded(id: &str) -> ConversationView {
        let mut view = ConversationView::new();
        let t = view.begin_load(id);
        let mut c = sample();
        c.id = id.into();
        view.finish_load(t, Ok(c));
        view
    }

    #[test]
    fn send_without_conversation_is_rejected() {
        let mut view = ConversationView::new();
        view.compose.set_text("hello");
        assert_eq!(view.begin_send(), Err(ComposeError::NoConversation));
        assert_eq!(view.compose.pending(), 0);
    }

    #[test]
    fn send_finishing_after_switch_leaves_new_view_alone() {
        let mut view = loaded("c1");
        view.compose.set_text("for c1");
        let send = view.begin_send().unwrap();

        let t = view.begin_load("c2");
        let mut c2 = sample();
        c2.id = "c2".into();
        view.finish_load(t, Ok(c2));
        view.compose.set_text("c2 draft");

        assert!(!view.finish_send(&send, Ok(())));
        assert_eq!(view.conversation_id(), Some("c2"));
        assert_eq!(view.conversation().map(|c| c.id.as_str()), Some("c2"));
        assert_eq!(view.compose.text, "c2 draft");

        assert!(!view.finish_send(&send, Err(ApiError::Network("reset".into()))));
        assert!(view.compose.error.is_none());
    }

    #[test]
    fn send_from_earlier_visit_is_dropped_after_returning() {
        let mut view = loaded("c1");
        view.compose.set_text("first visit");
        let send = view.begin_send().unwrap();
        view.begin_load("c2");
        view.begin_load("c1");
        view.compose.set_text("second visit");

        assert!(!view.finish_send(&send, Ok(())));
        assert_eq!(view.compose.text, "second visit");
    }

    #[test]
    fn failed_refresh_keeps_thread_visible() {
        let mut view = loaded("c1");
        view.compose.set_text("hi");
        let send = view.begin_send().unwrap();
        assert!(view.finish_send(&send, Ok(())));

        let t = view.begin_load(&send.conversation_id);
        assert!(view.finish_load(t, Err(ApiError::Network("offline".into()))));
        assert!(matches!(view.state(), LoadState::Ready(_)));
        assert_eq!(view.refresh_error(), Some(REFRESH_FAILED_MESSAGE));
        assert!(!view.is_refreshing());

        let t = view.begin_load("c1");
        assert!(view.refresh_error().is_none());
        view.finish_load(t, Ok(sample()));
        assert!(view.refresh_error().is_none());
    }

    #[test]
    fn refresh_finding_conversation_gone_shows_not_found() {
        let mut view = loaded("c1");
        let t = view.begin_load("c1");
        view.finish_load(t, Err(ApiError::NotFound));
        assert_eq!(view.state(), &LoadState::NotFound);
    }
}
