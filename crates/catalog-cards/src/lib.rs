//! Card Catalog: card commands and queries.
//!
//! Command handlers validate input, persist card events through a
//! `CardRepository`, then publish them best-effort. Query handlers read
//! projections and return serializable views.

pub mod application;
pub mod domain;
