//! MercadoLibre SDK - client library for the MercadoLibre / MercadoPago platform.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - `domain` - canonical errors, webhook authentication rules, region endpoints
//! - `ports` - traits the adapters implement (HTTP round-trip, webhook handler, payments)
//! - `adapters` - the MercadoLibre integration (resilient transport, classifier, webhooks)
//! - `application` - command handlers composed from ports
//! - `config` - typed configuration loaded from the environment

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
