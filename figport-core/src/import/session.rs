use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::info;

use crate::api::client::DesignApi;
use crate::foundation::cancel::CancelHandle;
use crate::foundation::core::{ImageFormat, TextBackend};
use crate::foundation::error::FigportResult;
use crate::images::pipeline::{self, FetchOutcome};
use crate::images::track::CompletionTracker;
use crate::package::sink::AssetSink;
use crate::scene::builder::{BuildStats, SceneBuilder};
use crate::scene::node::SceneTree;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration surface consumed by an import.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    /// Design file key (from the file URL).
    pub file_key: String,
    /// Personal access token for the design API.
    pub token: String,
    /// Output encoding for rasterized shape layers.
    pub image_format: ImageFormat,
    /// Text materialization backend.
    pub text_backend: TextBackend,
}

/// Final state of an import.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ImportStatus {
    /// Every image request reached a terminal state.
    Completed,
    /// Cancellation was observed while draining; the partial scene is kept.
    Cancelled,
}

/// Terminal-outcome counts for the image pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImageStats {
    /// Requests that bound a handle.
    pub bound: usize,
    /// Requests abandoned on error.
    pub failed: usize,
    /// Requests that observed cancellation.
    pub cancelled: usize,
}

/// What an import produced. Ownership of the scene passes to the caller.
#[derive(Debug)]
pub struct ImportReport {
    /// Final status.
    pub status: ImportStatus,
    /// Build-phase counters.
    pub build: BuildStats,
    /// Image-pipeline counters at the moment the drain ended.
    pub images: ImageStats,
    /// The materialized scene forest.
    pub scene: SceneTree,
}

#[derive(Debug, Default)]
struct Tally {
    bound: AtomicUsize,
    failed: AtomicUsize,
    cancelled: AtomicUsize,
}

impl Tally {
    fn record(&self, outcome: FetchOutcome) {
        let counter = match outcome {
            FetchOutcome::Bound => &self.bound,
            FetchOutcome::Failed => &self.failed,
            FetchOutcome::Cancelled => &self.cancelled,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> ImageStats {
        ImageStats {
            bound: self.bound.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            cancelled: self.cancelled.load(Ordering::SeqCst),
        }
    }
}

/// One import run over an API handle and a packaging sink.
///
/// The session's cancel handle can be cloned out and triggered from
/// anywhere; new work halts at the next checkpoint and whatever was
/// materialized so far is returned as-is.
pub struct ImportSession {
    api: Arc<dyn DesignApi>,
    sink: Arc<dyn AssetSink>,
    cancel: CancelHandle,
}

impl ImportSession {
    /// Create a session over the given collaborators.
    pub fn new(api: Arc<dyn DesignApi>, sink: Arc<dyn AssetSink>) -> Self {
        Self {
            api,
            sink,
            cancel: CancelHandle::new(),
        }
    }

    /// The session's cancellation handle.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run a full import: fetch the file, materialize the scene, spawn one
    /// pipeline task per image request, and wait for the outstanding count
    /// to drain (or cancellation).
    ///
    /// Only a failed document fetch or a malformed document aborts; every
    /// error below that level is reported, counted, and survived.
    #[tracing::instrument(skip_all, fields(file_key = %cfg.file_key))]
    pub async fn import(&self, cfg: &ImportConfig) -> FigportResult<ImportReport> {
        info!("fetching file");
        let file = self.api.fetch_file(&cfg.file_key).await?;
        file.validate()?;

        info!("building scene");
        let tracker = CompletionTracker::new();
        let builder = SceneBuilder::new(cfg.text_backend, self.sink.as_ref(), &tracker);
        let output = builder.build(&file.document);

        let tally = Arc::new(Tally::default());
        let request_count = output.requests.len();
        for req in output.requests {
            let api = Arc::clone(&self.api);
            let sink = Arc::clone(&self.sink);
            let cancel = self.cancel.clone();
            let tracker = tracker.clone();
            let tally = Arc::clone(&tally);
            let file_key = cfg.file_key.clone();
            let format = cfg.image_format;
            tokio::spawn(async move {
                let outcome = pipeline::resolve_request(
                    api.as_ref(),
                    sink.as_ref(),
                    &file_key,
                    format,
                    req,
                    &cancel,
                    &tracker,
                )
                .await;
                tally.record(outcome);
            });
        }

        info!(images = request_count, "waiting for image pipeline");
        let status = loop {
            if tracker.outstanding() == 0 {
                break ImportStatus::Completed;
            }
            if self.cancel.is_cancelled() {
                break ImportStatus::Cancelled;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        };

        let images = tally.snapshot();
        info!(?status, bound = images.bound, failed = images.failed, "import finished");
        Ok(ImportReport {
            status,
            build: output.stats,
            images,
            scene: output.tree,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/import/session.rs"]
mod tests;
