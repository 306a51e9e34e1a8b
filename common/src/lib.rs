pub mod analytics;
pub mod api;
pub mod auth_form;
pub mod buy_request;
pub mod config;
pub mod consent;
pub mod conversation;
pub mod county;
pub mod legal;
pub mod listing;
pub mod review;
pub mod site;
pub mod validation;
