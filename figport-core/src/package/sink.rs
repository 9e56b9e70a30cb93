use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::ImageFormat;
use crate::foundation::error::FigportResult;
use crate::scene::node::{SceneId, SceneTree};

/// Handle to an imported image that materialized shapes can reference.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImageHandle {
    /// Location of the imported asset within the host environment.
    pub path: PathBuf,
}

/// External packaging collaborator.
///
/// The core only requires these two operations; how assets are actually
/// imported into the host is the implementation's business.
pub trait AssetSink: Send + Sync {
    /// Persist encoded image bytes at (or keyed by) `path_hint` and return
    /// a referenceable handle.
    fn persist_image(
        &self,
        path_hint: &Path,
        bytes: &[u8],
        format: ImageFormat,
    ) -> FigportResult<ImageHandle>;

    /// Persist the subtree rooted at `root` as a reusable template.
    fn persist_template(&self, tree: &SceneTree, root: SceneId, name: &str) -> FigportResult<()>;
}

/// Filesystem-backed [`AssetSink`]: images land under the root directory at
/// their hinted path, templates as JSON snapshots under `templates/`.
#[derive(Debug)]
pub struct FsAssetSink {
    root: PathBuf,
}

impl FsAssetSink {
    /// Create a sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory assets are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSink for FsAssetSink {
    fn persist_image(
        &self,
        path_hint: &Path,
        bytes: &[u8],
        _format: ImageFormat,
    ) -> FigportResult<ImageHandle> {
        let path = self.root.join(path_hint);
        ensure_parent_dir(&path)?;
        fs::write(&path, bytes).with_context(|| format!("write image '{}'", path.display()))?;
        Ok(ImageHandle { path })
    }

    fn persist_template(&self, tree: &SceneTree, root: SceneId, name: &str) -> FigportResult<()> {
        let snapshot = tree.snapshot(root, name);
        let path = self.root.join("templates").join(format!("{name}.json"));
        ensure_parent_dir(&path)?;
        let json = serde_json::to_vec_pretty(&snapshot)
            .with_context(|| format!("serialize template '{name}'"))?;
        fs::write(&path, json)
            .with_context(|| format!("write template '{}'", path.display()))?;
        Ok(())
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> FigportResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    Ok(())
}
