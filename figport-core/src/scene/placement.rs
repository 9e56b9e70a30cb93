use crate::document::model::NodeType;
use crate::foundation::core::{BoundingBox, Placement, Vec2};

/// Convert a node's absolute bounding box into a placement relative to its
/// coordinate parent.
///
/// Source data is top-left origin with Y down; the target frame of
/// reference is Y up from a top-left anchor, so the local Y is negated. A
/// FRAME or CANVAS parent defines a new local origin, in which case the
/// child keeps its own absolute position; any other parent is a plain
/// container whose own anchored position is subtracted out.
///
/// Sizes are copied verbatim; malformed (negative or zero) sizes pass
/// through unchanged.
pub fn local_placement(
    node_box: &BoundingBox,
    parent_box: &BoundingBox,
    parent_type: NodeType,
) -> Placement {
    let mut position = Vec2::new(node_box.x, -node_box.y);
    if !matches!(parent_type, NodeType::Frame | NodeType::Canvas) {
        position.x -= parent_box.x;
        position.y -= -parent_box.y;
    }
    Placement {
        position,
        size: node_box.size(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/placement.rs"]
mod tests;
