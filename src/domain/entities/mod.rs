//! Core domain entities.
//!
//! - [`LinkRecord`] - A short code mapped to a destination with a validity window
//! - [`ClickEvent`] - A single visit appended to a link's history
//!
//! Entities are plain data; lifecycle rules that need the current time take it
//! as an argument so callers decide which [`crate::domain::clock::Clock`] to use.

pub mod click;
pub mod link;

pub use click::ClickEvent;
pub use link::{LinkRecord, LinkStatus};
