use tracing::warn;

use crate::document::model::{Node, NodeType};
use crate::foundation::core::TextBackend;
use crate::images::pipeline::ImageRequest;
use crate::images::track::CompletionTracker;
use crate::scene::builder::BuildStats;
use crate::scene::node::{ImageSlot, Payload, TextRun};

/// Attach the visual payload appropriate for a node's declared type.
///
/// CANVAS never reaches this point; pages are consumed one level up by the
/// builder. Image-backed shapes enqueue a resolution request keyed by the
/// node's id and name, incrementing the completion tracker at enqueue time.
pub(crate) fn payload_for(
    node: &Node,
    backend: TextBackend,
    requests: &mut Vec<ImageRequest>,
    tracker: &CompletionTracker,
    stats: &mut BuildStats,
) -> Payload {
    match node.node_type {
        NodeType::Canvas
        | NodeType::Group
        | NodeType::Section
        | NodeType::Frame
        | NodeType::Slice => Payload::Container,

        NodeType::Text => match node.first_fill_color() {
            Some(color) => {
                let run = TextRun {
                    content: node.characters.clone().unwrap_or_default(),
                    font_size: node
                        .style
                        .map(|s| s.font_size)
                        .unwrap_or_default()
                        .round() as u32,
                    color,
                };
                match backend {
                    TextBackend::Plain => Payload::Text(run),
                    TextBackend::Rich => Payload::RichText(run),
                }
            }
            None => {
                warn!(id = %node.id, name = %node.name, "text layer has no fill color");
                stats.textless_text_nodes += 1;
                Payload::Container
            }
        },

        NodeType::Vector
        | NodeType::BooleanOperation
        | NodeType::Rectangle
        | NodeType::Line
        | NodeType::Ellipse
        | NodeType::RegularPolygon
        | NodeType::Star => {
            let slot = ImageSlot::new();
            tracker.enqueue();
            requests.push(ImageRequest {
                image_ref: node.id.clone(),
                layer_name: node.name.clone(),
                slot: slot.clone(),
            });
            Payload::Image(slot)
        }

        NodeType::Other => {
            warn!(id = %node.id, name = %node.name, "unsupported node type");
            stats.unsupported_nodes += 1;
            Payload::Container
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dispatch.rs"]
mod tests;
