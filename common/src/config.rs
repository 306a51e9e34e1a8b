use crate::consent::CONSENT_STORAGE_KEY;

/// Build-time frontend configuration read with `option_env!`:
/// `SHAMBA_API_URL` (empty = same origin) and `SHAMBA_GA_TAG_ID`
/// (analytics stays off when unset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    pub api_base_url: String,
    pub analytics_tag_id: Option<String>,
    pub consent_key: &'static str,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

impl FrontendConfig {
    pub fn from_env() -> Self {
        Self::from_parts(option_env!("SHAMBA_API_URL"), option_env!("SHAMBA_GA_TAG_ID"))
    }

    pub fn from_parts(api_base_url: Option<&str>, analytics_tag_id: Option<&str>) -> Self {
        Self {
            api_base_url: api_base_url
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .unwrap_or_default(),
            analytics_tag_id: analytics_tag_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from),
            consent_key: CONSENT_STORAGE_KEY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_same_origin_without_analytics() {
        let cfg = FrontendConfig::default();
        assert_eq!(cfg.api_base_url, "");
        assert_eq!(cfg.analytics_tag_id, None);
        assert_eq!(cfg.consent_key, "cookie-consent");
    }

    #[test]
    fn trims_base_url_and_blank_tag() {
        let cfg = FrontendConfig::from_parts(Some(" https://api.shamba.co.ke/ "), Some("  "));
        assert_eq!(cfg.api_base_url, "https://api.shamba.co.ke");
        assert_eq!(cfg.analytics_tag_id, None);

        let cfg = FrontendConfig::from_parts(None, Some("G-ABC123"));
        assert_eq!(cfg.analytics_tag_id.as_deref(), Some("G-ABC123"));
    }
}
