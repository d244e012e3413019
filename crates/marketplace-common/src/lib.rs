//! Marketplace Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared infrastructure for the marketplace workspace members.
//!
//! - **Logging**: subscriber setup, output targets and file rotation

pub mod logging;
