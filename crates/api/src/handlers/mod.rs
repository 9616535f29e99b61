//! HTTP request handlers.

pub mod categories;
pub mod comments;
pub mod entries;
