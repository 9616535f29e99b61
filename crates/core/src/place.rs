//! Place string normalization.
//!
//! Reverse-geocoded addresses arrive at street granularity (e.g.
//! `"123 Main St, Springfield, Illinois, USA"`). Entries display a coarser
//! "locality, region" string, so submitted place names are simplified before
//! persistence. This is a lossy display simplification, not a canonical
//! geocode.

/// Normalize a free-text place string to "locality, region" granularity.
///
/// Splits on commas and keeps the second and third components when at least
/// three exist; shorter inputs are kept unchanged (apart from trimming).
pub fn normalize_place(input: &str) -> String {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() >= 3 {
        format!("{}, {}", parts[1], parts[2])
    } else {
        parts.join(", ")
    }
}
