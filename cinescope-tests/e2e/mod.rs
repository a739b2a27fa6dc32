//! End-to-end tests for CineScope
//!
//! Drives the full watch flow against a mock backend: browse the catalog,
//! open an episode, resolve sources, render the frame, switch providers and
//! episodes.

#[path = "../integration/support.rs"]
pub mod support;

mod watch_workflow;
