use crate::api::ApiError;

pub const LEGAL_LOAD_FAILED_MESSAGE: &str =
    "We couldn't load this document. Please refresh the page to try again.";

/// Static legal documents served as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegalDocument {
    PrivacyPolicy,
    TermsOfService,
}

impl LegalDocument {
    pub fn path(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "/legal/PRIVACY_POLICY.md",
            Self::TermsOfService => "/legal/TERMS_OF_SERVICE.md",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "Privacy Policy",
            Self::TermsOfService => "Terms of Service",
        }
    }
}

/// Legal page body. Text is rendered verbatim, never parsed as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegalPage {
    Loading,
    Ready(String),
    Failed(String),
}

impl LegalPage {
    pub fn from_result(document: LegalDocument, result: Result<String, ApiError>) -> Self {
        match result {
            Ok(text) => Self::Ready(text),
            Err(e) => {
                tracing::warn!(path = document.path(), "Legal document fetch failed: {e}");
                Self::Failed(LEGAL_LOAD_FAILED_MESSAGE.to_string())
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
