use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::county::canonical_county;
use crate::validation::{
    validate_email_or_phone, validate_name, ContactKind, FieldState, FieldVerdict,
};

pub const BUY_REQUEST_FAILED_MESSAGE: &str = "Failed to post your request. Please try again.";

/// Units offered in the buy-request form.
pub const UNITS: [&str; 6] = ["kg", "90kg bag", "crate", "litre", "piece", "head"];

/// Body of `POST /api/buy-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub product: String,
    pub quantity: u32,
    pub unit: String,
    pub county: String,
    pub contact: String,
    pub contact_kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn validate_product(product: &str) -> FieldVerdict {
    let verdict = validate_name(product);
    if verdict.is_valid {
        verdict
    } else if product.trim().is_empty() {
        FieldVerdict::invalid("Tell sellers what you want to buy")
    } else {
        FieldVerdict::invalid("Product name is too short")
    }
}

pub fn validate_quantity(quantity: &str) -> FieldVerdict {
    match quantity.trim().parse::<u32>() {
        Ok(0) => FieldVerdict::invalid("Quantity must be at least 1"),
        Ok(_) => FieldVerdict::valid(),
        Err(_) if quantity.trim().is_empty() => FieldVerdict::invalid("Quantity is required"),
        Err(_) => FieldVerdict::invalid("Quantity must be a whole number"),
    }
}

pub fn validate_county(county: &str) -> FieldVerdict {
    if county.trim().is_empty() {
        return FieldVerdict::invalid("County is required");
    }
    if canonical_county(county).is_none() {
        return FieldVerdict::invalid("Please choose a Kenyan county");
    }
    FieldVerdict::valid()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequestForm {
    pub product: FieldState,
    pub quantity: FieldState,
    pub unit: String,
    pub county: FieldState,
    pub contact: FieldState,
    pub notes: String,
    pub error: Option<String>,
    submitting: bool,
    submitted: bool,
}

impl Default for BuyRequestForm {
    fn default() -> Self {
        Self {
            product: FieldState::new(),
            quantity: FieldState::new(),
            unit: UNITS[0].to_string(),
            county: FieldState::new(),
            contact: FieldState::new(),
            notes: String::new(),
            error: None,
            submitting: false,
            submitted: false,
        }
    }
}

impl BuyRequestForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn was_submitted(&self) -> bool {
        self.submitted
    }

    fn touch_all(&mut self) {
        self.product.blur(validate_product);
        self.quantity.blur(validate_quantity);
        self.county.blur(validate_county);
        self.contact.blur(validate_email_or_phone);
    }

    pub fn is_valid(&self) -> bool {
        validate_product(&self.product.value).is_valid
            && validate_quantity(&self.quantity.value).is_valid
            && validate_county(&self.county.value).is_valid
            && validate_email_or_phone(&self.contact.value).is_valid
    }

    /// Touch every field so errors show, then build the request if the
    /// draft is valid.
    pub fn begin_submit(&mut self) -> Option<BuyRequest> {
        if self.submitting {
            return None;
        }
        self.touch_all();
        if !self.is_valid() {
            return None;
        }
        let contact = self.contact.value.trim().to_string();
        let contact_kind = validate_email_or_phone(&contact).contact_kind?;
        let quantity = self.quantity.value.trim().parse().ok()?;
        let county = canonical_county(&self.county.value)?.to_string();
        let notes = self.notes.trim();

        self.submitting = true;
        self.error = None;
        Some(BuyRequest {
            product: self.product.value.trim().to_string(),
            quantity,
            unit: self.unit.clone(),
            county,
            contact,
            contact_kind,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), ApiError>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                tracing::info!(product = %self.product.value.trim(), "Buy request posted");
                *self = Self {
                    submitted: true,
                    ..Self::default()
                };
            }
            Err(e) => {
                tracing::warn!("Buy request failed: {e}");
                self.error = Some(e.user_message(BUY_REQUEST_FAILED_MESSAGE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::api::testing::MockTransport;
    use crate::api::ApiClient;

    fn filled() -> BuyRequestForm {
        let mut form = BuyRequestForm::new();
        form.product.set_value("Irish potatoes", validate_product);
        form.quantity.set_value(" 25 ", validate_quantity);
        form.unit = "90kg bag".into();
        form.county.set_value("nyandarua", validate_county);
        form.contact.set_value("0711 222 333", validate_email_or_phone);
        form
    }

    #[test]
    fn quantity_rules() {
        assert!(validate_quantity("3").is_valid);
        assert!(!validate_quantity("0").is_valid);
        assert!(!validate_quantity("-2").is_valid);
        assert!(!validate_quantity("2.5").is_valid);
        assert_eq!(
            validate_quantity("").error.as_deref(),
            Some("Quantity is required")
        );
    }

    #[test]
    fn county_must_exist() {
        assert!(validate_county("Kisumu").is_valid);
        assert!(!validate_county("Arusha").is_valid);
        assert!(!validate_county(" ").is_valid);
    }

    #[test]
    fn invalid_draft_shows_all_errors() {
        let mut form = BuyRequestForm::new();
        assert!(form.begin_submit().is_none());
        assert!(form.product.visible_error().is_some());
        assert!(form.quantity.visible_error().is_some());
        assert!(form.county.visible_error().is_some());
        assert!(form.contact.visible_error().is_some());
        assert!(!form.is_submitting());
    }

    #[test]
    fn builds_normalized_request() {
        let mut form = filled();
        form.notes = "  Delivery to Ol Kalou  ".into();
        let req = form.begin_submit().unwrap();
        assert_eq!(req.product, "Irish potatoes");
        assert_eq!(req.quantity, 25);
        assert_eq!(req.county, "Nyandarua");
        assert_eq!(req.contact_kind, ContactKind::Phone);
        assert_eq!(req.notes.as_deref(), Some("Delivery to Ol Kalou"));
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn empty_notes_are_omitted() {
        let req = filled().begin_submit().unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["contactKind"], "phone");
    }

    #[test]
    fn success_resets_form() {
        let transport = MockTransport::new();
        transport.respond("/api/buy-requests", 201, r#"{"data":{"id":"br1"}}"#);
        let client = ApiClient::new(transport);

        let mut form = filled();
        let req = form.begin_submit().unwrap();
        form.finish_submit(block_on(client.create_buy_request(&req)));
        assert!(form.was_submitted());
        assert_eq!(form.product.value, "");
        assert_eq!(form.unit, UNITS[0]);
    }

    #[test]
    fn failure_keeps_draft() {
        let transport = MockTransport::new();
        transport.respond("/api/buy-requests", 401, r#"{"error":"Please log in first"}"#);
        let client = ApiClient::new(transport);

        let mut form = filled();
        let req = form.begin_submit().unwrap();
        form.finish_submit(block_on(client.create_buy_request(&req)));
        assert_eq!(form.error.as_deref(), Some("Please log in first"));
        assert_eq!(form.product.value, "Irish potatoes");
        assert!(!form.was_submitted());
    }
}
