//! Domain layer containing provider-independent types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Canonical errors and input sanitizing
//! - `webhook` - Notification model and signature verification rules
//! - `region` - Supported countries and their endpoints

pub mod foundation;
pub mod region;
pub mod webhook;
