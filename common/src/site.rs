//! Site map shared by the router, the header navigation and the smoke tests.

pub const BRAND: &str = "Shamba";
pub const TAGLINE: &str = "Kenya's farm-to-buyer marketplace";

/// Document title for a page, always carrying the brand.
pub fn page_title(page: Option<&str>) -> String {
    match page {
        Some(page) if !page.trim().is_empty() => format!("{page} | {BRAND}"),
        _ => format!("{BRAND} | {TAGLINE}"),
    }
}

pub mod paths {
    pub const HOME: &str = "/";
    pub const BROWSE: &str = "/browse";
    pub const REQUEST: &str = "/request";
    pub const SELL: &str = "/sell";
    pub const ABOUT: &str = "/about";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/login?mode=signup";
    pub const PRIVACY: &str = "/privacy";
    pub const TERMS: &str = "/terms";

    pub fn messages(conversation_id: &str) -> String {
        format!("/messages/{conversation_id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    /// Rendered as a call-to-action button rather than a plain link.
    pub cta: bool,
}

const fn link(label: &'static str, href: &'static str) -> NavLink {
    NavLink {
        label,
        href,
        cta: false,
    }
}

pub const SIGNUP_CTA: NavLink = NavLink {
    label: "Sign Up",
    href: paths::SIGNUP,
    cta: true,
};

/// Header links on wide screens.
pub const DESKTOP_NAV: [NavLink; 3] = [
    link("Listings", paths::BROWSE),
    link("Buy Requests", paths::REQUEST),
    SIGNUP_CTA,
];

/// Links revealed by the hamburger menu on narrow screens.
pub const MOBILE_NAV: [NavLink; 5] = [
    link("Listings", paths::BROWSE),
    link("Buy Requests", paths::REQUEST),
    link("Sell", paths::SELL),
    link("About", paths::ABOUT),
    SIGNUP_CTA,
];

pub const FOOTER_NAV: [NavLink; 3] = [
    link("About", paths::ABOUT),
    link("Privacy Policy", paths::PRIVACY),
    link("Terms of Service", paths::TERMS),
];
