//! Typed representation of a fetched design file. Pure data, no behavior
//! beyond top-level validation.

pub mod model;
