use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::client::DesignApi;
use crate::foundation::cancel::CancelHandle;
use crate::foundation::core::ImageFormat;
use crate::foundation::error::{FigportError, FigportResult};
use crate::images::encode;
use crate::images::track::CompletionTracker;
use crate::package::sink::AssetSink;
use crate::scene::node::ImageSlot;

/// Fixed backoff between retries of a rate-limited call.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_millis(200);

/// One pending image resolution, keyed by the source node's id and name.
///
/// The slot is shared with the materialized shape; binding it is the last
/// step of a successful fetch.
#[derive(Clone, Debug)]
pub struct ImageRequest {
    /// Reference accepted by the image-export endpoint (the node id).
    pub image_ref: String,
    /// Layer name, used to derive the persisted image path.
    pub layer_name: String,
    /// Slot on the waiting shape.
    pub slot: ImageSlot,
}

/// Terminal state of an image request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Resolved, downloaded, persisted, and bound onto the shape.
    Bound,
    /// Abandoned after a resolution, transport, or persistence error.
    Failed,
    /// Cancellation observed before the request could complete.
    Cancelled,
}

/// Drive one image request to a terminal state.
///
/// The request walks resolve → download → persist → bind; a 429 on either
/// network step waits [`RATE_LIMIT_BACKOFF`] and retries the same step
/// until cancellation. Whatever the outcome, the tracker is decremented
/// exactly once on the way out.
#[tracing::instrument(skip_all, fields(image_ref = %req.image_ref))]
pub async fn resolve_request(
    api: &dyn DesignApi,
    sink: &dyn AssetSink,
    file_key: &str,
    format: ImageFormat,
    req: ImageRequest,
    cancel: &CancelHandle,
    tracker: &CompletionTracker,
) -> FetchOutcome {
    let outcome = match run_stages(api, sink, file_key, format, &req, cancel).await {
        Ok(()) => FetchOutcome::Bound,
        Err(FigportError::Cancelled) => {
            debug!("image request cancelled");
            FetchOutcome::Cancelled
        }
        Err(err) => {
            warn!(layer = %req.layer_name, error = %err, "image request abandoned");
            FetchOutcome::Failed
        }
    };
    tracker.complete();
    outcome
}

async fn run_stages(
    api: &dyn DesignApi,
    sink: &dyn AssetSink,
    file_key: &str,
    format: ImageFormat,
    req: &ImageRequest,
    cancel: &CancelHandle,
) -> FigportResult<()> {
    let url = retry_rate_limited(cancel, || {
        api.resolve_image_url(file_key, &req.image_ref, format)
    })
    .await?
    .ok_or_else(|| {
        FigportError::resolution(format!("no export url for reference {}", req.image_ref))
    })?;

    let bytes = retry_rate_limited(cancel, || api.download(&url)).await?;

    if cancel.is_cancelled() {
        return Err(FigportError::Cancelled);
    }
    let encoded = encode::transcode(&bytes, format)?;
    let path = encode::image_path(&req.layer_name, format);
    let handle = sink.persist_image(&path, &encoded, format)?;
    req.slot.bind(handle);
    debug!(layer = %req.layer_name, "image bound");
    Ok(())
}

/// Repeat `op` until it returns anything other than a rate-limit signal,
/// sleeping a fixed [`RATE_LIMIT_BACKOFF`] between attempts. There is no
/// attempt cap; cancellation is checked before every attempt.
async fn retry_rate_limited<T, F, Fut>(cancel: &CancelHandle, mut op: F) -> FigportResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FigportResult<T>>,
{
    loop {
        if cancel.is_cancelled() {
            return Err(FigportError::Cancelled);
        }
        match op().await {
            Err(FigportError::RateLimited(what)) => {
                debug!(%what, "rate limited, backing off");
                tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/images/pipeline.rs"]
mod tests;
