//! Figport fetches a design document from the Figma web API and
//! reconstructs it as a hierarchy of positioned scene nodes, persisting
//! each top-level frame as a reusable canvas template.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: `file key -> DesignFile` (typed tree, decoded once)
//! 2. **Build**: `DesignFile -> SceneTree` (document-order traversal;
//!    containers, text runs, and image placeholders)
//! 3. **Resolve**: one async task per image-backed shape
//!    (resolve URL → download → transcode → persist → bind)
//! 4. **Drain**: poll the outstanding-image count to zero, or stop at the
//!    next checkpoint on cancellation
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Decode once**: node types become a closed enum at the API boundary;
//!   dispatch never re-compares strings.
//! - **Synchronous materialization**: the scene tree is fully built in
//!   document order before any image binds; bindings mutate only their own
//!   shared slot.
//! - **Partial results are normal**: a missing image or an unsupported
//!   node is reported and counted, never fatal.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod document;
mod foundation;
mod images;
mod import;
mod package;
mod scene;

pub use api::client::{DesignApi, FigmaClient};
pub use document::model::{DesignFile, Document, Fill, Node, NodeType, TextStyle};
pub use foundation::cancel::CancelHandle;
pub use foundation::core::{BoundingBox, ImageFormat, Placement, Rgba, TextBackend, Vec2};
pub use foundation::error::{FigportError, FigportResult};
pub use images::encode::{image_path, transcode};
pub use images::pipeline::{FetchOutcome, ImageRequest, RATE_LIMIT_BACKOFF, resolve_request};
pub use images::track::CompletionTracker;
pub use import::session::{ImageStats, ImportConfig, ImportReport, ImportSession, ImportStatus};
pub use package::sink::{AssetSink, FsAssetSink, ImageHandle, ensure_parent_dir};
pub use scene::builder::{BuildOutput, BuildStats, SceneBuilder};
pub use scene::node::{
    ImageSlot, Payload, PayloadSnapshot, SceneId, SceneNode, SceneTree, SnapshotNode,
    TemplateSnapshot, TextRun,
};
pub use scene::placement::local_placement;
