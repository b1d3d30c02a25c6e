//! Client library for the swiftgg.org WordPress backend: paginated post
//! feed loading, sponsor/contributor listings, and the static guide index.
//! The TUI binary in `main.rs` is a thin consumer of these modules.

pub mod config;
pub mod feed;
pub mod guide;
pub mod site;
pub mod wordpress;
