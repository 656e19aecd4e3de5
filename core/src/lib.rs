//! Core domain logic for Mosaic.
//!
//! Pure, synchronous building blocks used by the engine:
//! placeholder substitution for endpoint URLs and page templates,
//! and eager resolution of the component configuration document.

pub mod resolve;
pub mod template;

pub use resolve::resolve;
pub use template::{expand_url, placeholders, render, substitute};
