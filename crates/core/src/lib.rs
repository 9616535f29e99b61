//! NatureLog domain core.
//!
//! Pure types, constants, and policy logic shared by the persistence layer
//! and the HTTP API: field validation, the category enumeration, place
//! normalization, media limits, observation records and their photo-reference
//! merge rules, comments, the weather snapshot sentinel, and access control.
//!
//! This crate has no internal dependencies and performs no I/O so it can be
//! used from the API, the repositories, and any future CLI tooling.

pub mod access;
pub mod category;
pub mod comment;
pub mod entry;
pub mod error;
pub mod media;
pub mod observation;
pub mod pagination;
pub mod place;
pub mod types;
pub mod weather;
