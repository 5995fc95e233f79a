//! Endpoint wrappers on [`ApiClient`](crate::api::ApiClient), one file per caller.

pub mod admin;
pub mod auth;
pub mod doctor;
pub mod patient;
pub mod public;
