//! CLI subcommand handlers.
//!
//! This module groups the implementations for each `rbconnect` subcommand,
//! keeping the top-level dispatch in `cli.rs` lightweight while still
//! allowing the handlers to share utilities and types.

pub mod auth;
pub mod clear;
pub mod completions;
pub mod configure;
pub mod version;
