pub mod about_view;
pub mod app;
pub mod browser;
pub mod buy_request_form;
pub mod consent_banner;
pub mod conversation_view;
pub mod home_view;
pub mod legal_page;
pub mod listings_view;
pub mod login_view;
pub mod review_form;
pub mod sell_view;
pub mod session;
pub mod shared_state;
pub mod star_rating;
