use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ApiError;

/// Shortest comment the form will submit.
pub const MIN_COMMENT_LEN: usize = 10;

pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit review. Please try again.";

/// A star rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn max() -> Self {
        Self(Self::MAX)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of filled stars when rendered out of five.
    pub fn filled_stars(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {0} is outside 1..=5")]
pub struct RatingOutOfRange(pub u8);

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(RatingOutOfRange(value))
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self {
        r.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewCategories {
    pub communication: Rating,
    pub accuracy: Rating,
    pub reliability: Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCategory {
    Communication,
    Accuracy,
    Reliability,
}

impl ReviewCategory {
    pub const ALL: [Self; 3] = [Self::Communication, Self::Accuracy, Self::Reliability];

    pub fn label(self) -> &'static str {
        match self {
            Self::Communication => "Communication",
            Self::Accuracy => "Listing accuracy",
            Self::Reliability => "Reliability",
        }
    }
}

impl ReviewCategories {
    pub fn get(&self, category: ReviewCategory) -> Rating {
        match category {
            ReviewCategory::Communication => self.communication,
            ReviewCategory::Accuracy => self.accuracy,
            ReviewCategory::Reliability => self.reliability,
        }
    }

    pub fn set(&mut self, category: ReviewCategory, rating: Rating) {
        match category {
            ReviewCategory::Communication => self.communication = rating,
            ReviewCategory::Accuracy => self.accuracy = rating,
            ReviewCategory::Reliability => self.reliability = rating,
        }
    }
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub reviewed_id: String,
    pub listing_id: String,
    pub rating: Rating,
    pub comment: String,
    pub categories: ReviewCategories,
}

/// In-memory state of the review form for one reviewed user + listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    reviewed_id: String,
    listing_id: String,
    pub rating: Rating,
    pub categories: ReviewCategories,
    pub comment: String,
    pub error: Option<String>,
    submitting: bool,
}

impl ReviewForm {
    pub fn new(reviewed_id: impl Into<String>, listing_id: impl Into<String>) -> Self {
        Self {
            reviewed_id: reviewed_id.into(),
            listing_id: listing_id.into(),
            rating: Rating::default(),
            categories: ReviewCategories::default(),
            comment: String::new(),
            error: None,
            submitting: false,
        }
    }

    /// Star `k` was clicked. Out-of-range clicks are ignored.
    pub fn click_star(&mut self, k: u8) {
        if let Some(rating) = Rating::new(k) {
            self.rating = rating;
        }
    }

    pub fn click_category_star(&mut self, category: ReviewCategory, k: u8) {
        if let Some(rating) = Rating::new(k) {
            self.categories.set(category, rating);
        }
    }

    pub fn comment_len(&self) -> usize {
        self.comment.chars().count()
    }

    pub fn comment_too_short(&self) -> bool {
        self.comment_len() < MIN_COMMENT_LEN
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.comment_too_short()
    }

    /// Build the submission and mark the form busy. `None` while the
    /// submit control would be disabled.
    pub fn begin_submit(&mut self) -> Option<ReviewSubmission> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(ReviewSubmission {
            reviewed_id: self.reviewed_id.clone(),
            listing_id: self.listing_id.clone(),
            rating: self.rating,
            comment: self.comment.clone(),
            categories: self.categories,
        })
    }

    /// Apply the server's answer. On success every field goes back to its
    /// default and `on_complete` fires; on failure the input is kept.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>, on_complete: Option<&dyn Fn()>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.rating = Rating::default();
                self.categories = ReviewCategories::default();
                self.comment.clear();
                self.error = None;
                tracing::info!(listing_id = %self.listing_id, "Review submitted");
                if let Some(cb) = on_complete {
                    cb();
                }
            }
            Err(e) => {
                tracing::warn!("Review submission failed: {e}");
                self.error = Some(e.user_message(SUBMIT_FAILED_MESSAGE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::ApiClient;

    fn form_with_comment(comment: &str) -> ReviewForm {
        let mut form = ReviewForm::new("seller-1", "listing-7");
        form.comment = comment.to_string();
        form
    }

    #[test]
    fn defaults_are_five_stars() {
        let form = ReviewForm::new("s", "l");
        assert_eq!(form.rating.get(), 5);
        for c in ReviewCategory::ALL {
            assert_eq!(form.categories.get(c).get(), 5);
        }
    }

    #[test]
    fn rating_range_is_enforced() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert!(serde_json::from_str::<Rating>("7").is_err());
        assert_eq!(serde_json::from_str::<Rating>("3").unwrap().get(), 3);
    }

    #[test]
    fn out_of_range_rating_is_a_std_error() {
        let err = Rating::try_from(6u8).unwrap_err();
        assert_eq!(err, RatingOutOfRange(6));
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert_eq!(boxed.to_string(), "rating 6 is outside 1..=5");
    }

    #[test]
    fn clicking_star_sets_filled_count() {
        let mut form = ReviewForm::new("s", "l");
        for k in 1..=5 {
            form.click_star(k);
            assert_eq!(form.rating.filled_stars(), usize::from(k));
        }
        form.click_star(0);
        form.click_star(9);
        assert_eq!(form.rating.get(), 5);
    }

    #[test]
    fn category_stars_are_independent() {
        let mut form = ReviewForm::new("s", "l");
        form.click_category_star(ReviewCategory::Accuracy, 2);
        assert_eq!(form.categories.accuracy.get(), 2);
        assert_eq!(form.categories.communication.get(), 5);
        assert_eq!(form.categories.reliability.get(), 5);
    }

    #[test]
    fn comment_length_boundary() {
        assert!(!form_with_comment("123456789").can_submit());
        assert!(form_with_comment("1234567890").can_submit());
        // Counted in characters, not bytes.
        assert!(!form_with_comment("ñññññññññ").can_submit());
    }

    #[test]
    fn submission_serializes_in_camel_case() {
        let mut form = form_with_comment("Great sukuma wiki, fresh.");
        form.click_star(4);
        form.click_category_star(ReviewCategory::Reliability, 3);
        let sub = form.begin_submit().unwrap();
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "reviewedId": "seller-1",
                "listingId": "listing-7",
                "rating": 4,
                "comment": "Great sukuma wiki, fresh.",
                "categories": {"communication": 5, "accuracy": 5, "reliability": 3}
            })
        );
    }

    #[test]
    fn submit_blocked_while_pending() {
        let mut form = form_with_comment("Very reliable seller");
        assert!(form.begin_submit().is_some());
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn success_resets_and_fires_callback() {
        let transport = MockTransport::new();
        transport.respond("/api/reviews", 201, r#"{"data":{"id":"r1"}}"#);
        let client = ApiClient::new(transport);

        let mut form = form_with_comment("Beans were as described");
        form.click_star(2);
        form.click_category_star(ReviewCategory::Communication, 1);
        let sub = form.begin_submit().unwrap();

        let fired = Cell::new(0);
        let cb = || fired.set(fired.get() + 1);
        form.finish_submit(block_on(client.submit_review(&sub)), Some(&cb));

        assert_eq!(fired.get(), 1);
        assert_eq!(form, ReviewForm::new("seller-1", "listing-7"));
    }

    #[test]
    fn failure_keeps_input_and_surfaces_server_message() {
        let transport = MockTransport::new();
        transport.respond("/api/reviews", 409, r#"{"error":"You already reviewed this listing"}"#);
        transport.fail("/api/reviews", "offline");
        let client = ApiClient::new(transport);

        let mut form = form_with_comment("Tomatoes arrived late");
        form.click_star(3);
        let sub = form.begin_submit().unwrap();
        form.finish_submit(block_on(client.submit_review(&sub)), None);
        assert_eq!(
            form.error.as_deref(),
            Some("You already reviewed this listing")
        );
        assert_eq!(form.rating.get(), 3);
        assert_eq!(form.comment, "Tomatoes arrived late");
        assert!(form.can_submit());

        let sub = form.begin_submit().unwrap();
        form.finish_submit(block_on(client.submit_review(&sub)), None);
        assert_eq!(form.error.as_deref(), Some(SUBMIT_FAILED_MESSAGE));
    }
}
