use tracing::warn;

use crate::document::model::{Document, Node, NodeType};
use crate::foundation::core::{Placement, TextBackend};
use crate::images::pipeline::ImageRequest;
use crate::images::track::CompletionTracker;
use crate::package::sink::AssetSink;
use crate::scene::dispatch;
use crate::scene::node::{Payload, SceneId, SceneTree};
use crate::scene::placement::local_placement;

/// Counters for the non-fatal conditions observed while building a scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BuildStats {
    /// CANVAS pages processed.
    pub pages: usize,
    /// Nodes materialized through the generic path.
    pub materialized: usize,
    /// Canvas templates successfully persisted.
    pub templates: usize,
    /// Nodes skipped with an unsupported-type warning.
    pub unsupported_nodes: usize,
    /// TEXT nodes left textless for lack of a fill color.
    pub textless_text_nodes: usize,
}

/// Result of materializing a document.
#[derive(Debug)]
pub struct BuildOutput {
    /// The materialized scene forest.
    pub tree: SceneTree,
    /// Image resolution requests enqueued during dispatch, in traversal
    /// order. The completion tracker was incremented once per entry.
    pub requests: Vec<ImageRequest>,
    /// Build counters.
    pub stats: BuildStats,
}

/// Depth-first materialization of a document into a forest of scene nodes.
///
/// The builder is fully synchronous: it creates containers in strict
/// document order and collects image requests for the session to spawn
/// afterwards, so a child's container always exists before its own
/// children are processed.
pub struct SceneBuilder<'a> {
    backend: TextBackend,
    sink: &'a dyn AssetSink,
    tracker: &'a CompletionTracker,
}

#[derive(Default)]
struct BuildCtx {
    tree: SceneTree,
    requests: Vec<ImageRequest>,
    stats: BuildStats,
}

impl<'a> SceneBuilder<'a> {
    /// Create a builder over the given sink and tracker.
    pub fn new(
        backend: TextBackend,
        sink: &'a dyn AssetSink,
        tracker: &'a CompletionTracker,
    ) -> Self {
        Self {
            backend,
            sink,
            tracker,
        }
    }

    /// Materialize every CANVAS page of the document.
    ///
    /// Per page, SECTION children become section containers (their FRAME
    /// children turning into section-parented canvas templates) and FRAME
    /// children become free-standing canvas templates. Any other direct
    /// child of a page is not materialized.
    #[tracing::instrument(skip_all)]
    pub fn build(&self, doc: &Document) -> BuildOutput {
        let mut ctx = BuildCtx::default();
        for page in &doc.children {
            if page.node_type != NodeType::Canvas {
                continue;
            }
            ctx.stats.pages += 1;
            for layer in &page.children {
                match layer.node_type {
                    NodeType::Section => self.section(layer, &mut ctx),
                    NodeType::Frame => self.canvas_for_frame(layer, None, &mut ctx),
                    _ => {}
                }
            }
        }
        BuildOutput {
            tree: ctx.tree,
            requests: ctx.requests,
            stats: ctx.stats,
        }
    }

    fn section(&self, section: &Node, ctx: &mut BuildCtx) {
        let id = ctx.tree.insert(
            format!("Section_{}", section.name),
            Placement::sized(section.absolute_bounding_box.size()),
            Payload::Container,
            None,
        );
        for child in &section.children {
            if child.node_type == NodeType::Frame {
                self.canvas_for_frame(child, Some(id), ctx);
            } else {
                self.materialize(child, section, id, ctx);
            }
        }
    }

    /// Materialize a FRAME as a root-level canvas template: a surface sized
    /// to the frame box with a full-size panel as the mount point for the
    /// frame's children, persisted as `Canvas_<name>` once the subtree is
    /// complete.
    fn canvas_for_frame(&self, frame: &Node, section: Option<SceneId>, ctx: &mut BuildCtx) {
        let size = frame.absolute_bounding_box.size();
        let name = format!("Canvas_{}", frame.name);
        let canvas = ctx.tree.insert(
            name.clone(),
            Placement::sized(size),
            Payload::Surface {
                reference_size: size,
            },
            section,
        );
        let panel = ctx.tree.insert(
            "Panel".to_string(),
            Placement::sized(size),
            Payload::Container,
            Some(canvas),
        );
        for child in &frame.children {
            self.materialize(child, frame, panel, ctx);
        }
        match self.sink.persist_template(&ctx.tree, canvas, &name) {
            Ok(()) => ctx.stats.templates += 1,
            Err(err) => {
                warn!(template = %name, error = %err, "failed to persist canvas template");
            }
        }
    }

    /// Generic materialization path, driven by an explicit work list so deep
    /// trees cannot exhaust the call stack. Each item carries the source
    /// node, its coordinate parent, and its composition parent; children
    /// are pushed in reverse so they are visited in document order.
    fn materialize<'n>(
        &self,
        node: &'n Node,
        parent: &'n Node,
        parent_id: SceneId,
        ctx: &mut BuildCtx,
    ) {
        let mut work: Vec<(&Node, &Node, SceneId)> = vec![(node, parent, parent_id)];
        while let Some((n, coord_parent, pid)) = work.pop() {
            let placement = local_placement(
                &n.absolute_bounding_box,
                &coord_parent.absolute_bounding_box,
                coord_parent.node_type,
            );
            let payload = dispatch::payload_for(
                n,
                self.backend,
                &mut ctx.requests,
                self.tracker,
                &mut ctx.stats,
            );
            let id = ctx.tree.insert(n.name.clone(), placement, payload, Some(pid));
            ctx.stats.materialized += 1;
            for child in n.children.iter().rev() {
                work.push((child, n, id));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
