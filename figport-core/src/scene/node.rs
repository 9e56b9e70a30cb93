use std::sync::{Arc, Mutex};

use crate::foundation::core::{Placement, Rgba, Vec2};
use crate::package::sink::ImageHandle;

/// Stable index of a node inside a [`SceneTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SceneId(pub(crate) usize);

impl SceneId {
    /// Access the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena of materialized scene nodes.
///
/// Nodes are stored in visitation order: the position of a node in the arena
/// is exactly the order in which the builder materialized it, which makes
/// traversal-order properties directly observable.
#[derive(Debug, Default, serde::Serialize)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    roots: Vec<SceneId>,
}

impl SceneTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent` (or as a root) and return its id.
    pub(crate) fn insert(
        &mut self,
        name: String,
        placement: Placement,
        payload: Payload,
        parent: Option<SceneId>,
    ) -> SceneId {
        let id = SceneId(self.nodes.len());
        self.nodes.push(SceneNode {
            name,
            placement,
            payload,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Borrow a node by id.
    pub fn get(&self, id: SceneId) -> &SceneNode {
        &self.nodes[id.0]
    }

    /// Root node ids in creation order.
    pub fn roots(&self) -> &[SceneId] {
        &self.roots
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in visitation order.
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// Preorder ids of the subtree rooted at `root`, using an explicit
    /// stack so arbitrarily deep trees cannot exhaust the call stack.
    pub fn subtree(&self, root: SceneId) -> Vec<SceneId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// Snapshot the subtree rooted at `root` for persistence.
    ///
    /// Arena ids are remapped to subtree-local indices so the snapshot is
    /// self-contained; index 0 is the root. Unbound image slots serialize
    /// as null handles.
    pub fn snapshot(&self, root: SceneId, name: &str) -> TemplateSnapshot {
        let order = self.subtree(root);
        let local: std::collections::HashMap<SceneId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let nodes = order
            .iter()
            .map(|&id| {
                let n = &self.nodes[id.0];
                SnapshotNode {
                    name: n.name.clone(),
                    placement: n.placement,
                    payload: n.payload.snapshot(),
                    children: n.children.iter().map(|c| local[c]).collect(),
                }
            })
            .collect();

        TemplateSnapshot {
            name: name.to_string(),
            nodes,
        }
    }
}

/// A materialized scene node.
///
/// Created by the builder during traversal; an image payload is mutated at
/// most once by the resolution pipeline when its fetch completes. Ownership
/// of the whole tree passes to the host in the import report.
#[derive(Debug, serde::Serialize)]
pub struct SceneNode {
    /// Display name carried over from the source node.
    pub name: String,
    /// Local anchored position and size.
    pub placement: Placement,
    /// Visual payload.
    pub payload: Payload,
    /// Composition parent, if any.
    pub parent: Option<SceneId>,
    /// Children in materialization order.
    pub children: Vec<SceneId>,
}

/// Visual payload bound to a scene node.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// Canvas-template root; `reference_size` is the reference resolution
    /// for scale-with-screen-size behavior.
    Surface {
        /// Reference resolution taken from the source frame box.
        reference_size: Vec2,
    },
    /// Pure grouping container, name only.
    Container,
    /// Plain text run.
    Text(TextRun),
    /// Rich (measured) text run; same data, distinct type for host routing.
    RichText(TextRun),
    /// Image-backed shape awaiting its asynchronously resolved handle.
    Image(ImageSlot),
}

impl Payload {
    fn snapshot(&self) -> PayloadSnapshot {
        match self {
            Payload::Surface { reference_size } => PayloadSnapshot::Surface {
                reference_size: *reference_size,
            },
            Payload::Container => PayloadSnapshot::Container,
            Payload::Text(run) => PayloadSnapshot::Text(run.clone()),
            Payload::RichText(run) => PayloadSnapshot::RichText(run.clone()),
            Payload::Image(slot) => PayloadSnapshot::Image {
                handle: slot.handle(),
            },
        }
    }
}

/// Text content materialized from a TEXT node, laid out from the top-left
/// anchor.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextRun {
    /// UTF-8 text content.
    pub content: String,
    /// Font size, rounded to the nearest integer.
    pub font_size: u32,
    /// Fill color of the first paint.
    pub color: Rgba,
}

/// Shared, once-bound cell connecting a materialized shape to its
/// asynchronously resolved image handle.
#[derive(Clone, Debug, Default)]
pub struct ImageSlot {
    handle: Arc<Mutex<Option<ImageHandle>>>,
}

impl ImageSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the resolved handle onto the waiting shape.
    pub fn bind(&self, handle: ImageHandle) {
        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Current handle, if the fetch has completed.
    pub fn handle(&self) -> Option<ImageHandle> {
        self.handle.lock().unwrap().clone()
    }

    /// Whether the fetch has completed and the handle is bound.
    pub fn is_bound(&self) -> bool {
        self.handle.lock().unwrap().is_some()
    }
}

impl serde::Serialize for ImageSlot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.handle().serialize(serializer)
    }
}

/// Self-contained, serializable snapshot of a canvas-template subtree.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TemplateSnapshot {
    /// Template name (`Canvas_<frame name>`).
    pub name: String,
    /// Subtree nodes in preorder; index 0 is the root, child references are
    /// subtree-local indices.
    pub nodes: Vec<SnapshotNode>,
}

/// One node of a [`TemplateSnapshot`].
#[derive(Clone, Debug, serde::Serialize)]
pub struct SnapshotNode {
    /// Display name.
    pub name: String,
    /// Local anchored position and size.
    pub placement: Placement,
    /// Payload at snapshot time.
    pub payload: PayloadSnapshot,
    /// Subtree-local child indices.
    pub children: Vec<usize>,
}

/// Payload state captured into a [`TemplateSnapshot`].
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSnapshot {
    /// Canvas-template root.
    Surface {
        /// Reference resolution.
        reference_size: Vec2,
    },
    /// Pure container.
    Container,
    /// Plain text run.
    Text(TextRun),
    /// Rich text run.
    RichText(TextRun),
    /// Image shape; `handle` is null while the fetch is still in flight.
    Image {
        /// Bound handle, if resolution completed before the snapshot.
        handle: Option<ImageHandle>,
    },
}
