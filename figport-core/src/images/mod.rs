//! Asynchronous image resolution: per-request fetch pipeline, transcoding,
//! and the outstanding-request accounting that gates import completion.

pub mod encode;
pub mod pipeline;
pub mod track;
