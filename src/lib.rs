//! geoverride-rs
//!
//! Umbrella crate for the workspace: re-exports `geoverride-core` and hosts
//! the runnable demos (`cargo run --example edit_override`).
pub use geoverride_core::*;
