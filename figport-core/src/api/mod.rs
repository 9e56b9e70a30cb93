//! HTTP access to the design-tool web API, behind a trait so tests can
//! substitute an in-memory fake.

pub mod client;
