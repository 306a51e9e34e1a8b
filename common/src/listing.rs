use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::Seller;

/// Broad produce category used for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Produce,
    Grains,
    Livestock,
    Dairy,
    Inputs,
    Equipment,
}

impl ListingCategory {
    pub const ALL: [Self; 6] = [
        Self::Produce,
        Self::Grains,
        Self::Livestock,
        Self::Dairy,
        Self::Inputs,
        Self::Equipment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Produce => "Fruit & Vegetables",
            Self::Grains => "Grains & Pulses",
            Self::Livestock => "Livestock",
            Self::Dairy => "Dairy",
            Self::Inputs => "Seeds & Inputs",
            Self::Equipment => "Equipment",
        }
    }

    /// Value used in `<option>` elements and query strings.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Grains => "grains",
            Self::Livestock => "livestock",
            Self::Dairy => "dairy",
            Self::Inputs => "inputs",
            Self::Equipment => "equipment",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

/// A listing in the marketplace browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: ListingCategory,
    pub county: String,
    /// Price per unit in Kenyan shillings.
    pub price_kes: u64,
    pub unit: String,
    pub quantity_available: u32,
    pub seller: Seller,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn price_label(&self) -> String {
        format!("KES {} / {}", format_kes(self.price_kes), self.unit)
    }
}

/// Thousands-separated shilling amount, e.g. `4,200`.
pub fn format_kes(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Client-side browse filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub query: String,
    pub category: Option<ListingCategory>,
    pub county: Option<String>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.category.is_none() && self.county.is_none()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() && !listing.title.to_lowercase().contains(&query) {
            return false;
        }
        if self.category.is_some_and(|c| c != listing.category) {
            return false;
        }
        if let Some(county) = &self.county {
            if !county.eq_ignore_ascii_case(&listing.county) {
                return false;
            }
        }
        true
    }

    /// Matching listings in their original order.
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}
