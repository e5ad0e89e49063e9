//! The search core: date-range resolution, provider query construction,
//! record normalization and permalink tokens. Everything here is pure and
//! synchronous; the async search lifecycle lives in [`crate::app`].

pub mod dates;
pub mod normalize;
pub mod query;
pub mod share;
