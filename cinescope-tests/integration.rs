//! Integration tests for CineScope
//!
//! Exercises source resolution against a live mock backend, the playback
//! session actor, provider switching, the catalog client, and embed
//! presentation.

#[path = "integration/support.rs"]
pub mod support;

#[path = "integration/source_resolution.rs"]
mod source_resolution;

#[path = "integration/playback_session.rs"]
mod playback_session;

#[path = "integration/provider_switching.rs"]
mod provider_switching;

#[path = "integration/catalog_api.rs"]
mod catalog_api;

#[path = "integration/embed_frame.rs"]
mod embed_frame;

#[path = "integration/resolution_properties.rs"]
mod resolution_properties;
