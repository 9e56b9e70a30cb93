//! Top-level orchestration: fetch, build, spawn image fetches, drain.

pub mod session;
