use crate::foundation::core::{BoundingBox, Rgba};
use crate::foundation::error::{FigportError, FigportResult};

/// Response body of the files endpoint.
///
/// Decoded once at the API boundary; immutable afterwards.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DesignFile {
    /// The document tree.
    pub document: Document,
}

impl DesignFile {
    /// Reject files with no top-level structure to walk.
    pub fn validate(&self) -> FigportResult<()> {
        if self.document.children.is_empty() {
            return Err(FigportError::malformed_document(
                "document has no top-level nodes",
            ));
        }
        Ok(())
    }
}

/// Synthetic root of the design tree; owns the top-level pages in document
/// order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Top-level nodes (pages).
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A single element of the design tree: page, frame, shape, text, and so on.
///
/// Bounding boxes are always absolute (page space) regardless of nesting
/// depth. Children are owned exclusively by their parent.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Identifier, unique within the document.
    pub id: String,
    /// Authoring name.
    #[serde(default)]
    pub name: String,
    /// Declared node type, decoded into the closed enumeration.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Absolute bounding box.
    #[serde(default)]
    pub absolute_bounding_box: BoundingBox,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Paints applied to the node; the first entry is authoritative for
    /// color.
    #[serde(default)]
    pub fills: Vec<Fill>,
    /// Text content for TEXT nodes.
    #[serde(default)]
    pub characters: Option<String>,
    /// Text style for TEXT nodes.
    #[serde(default)]
    pub style: Option<TextStyle>,
}

impl Node {
    /// Color of the first fill, when present.
    pub fn first_fill_color(&self) -> Option<Rgba> {
        self.fills.first().and_then(|f| f.color)
    }
}

/// Closed enumeration of node types the importer understands.
///
/// The wire `type` string is decoded into this enum exactly once; every
/// unrecognized value lands in [`NodeType::Other`] so dispatch stays
/// exhaustive without re-comparing strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// A page; processed one level above the dispatcher.
    Canvas,
    /// A section grouping frames on a page.
    Section,
    /// A frame; becomes a root-level canvas template.
    Frame,
    /// Plain grouping container.
    Group,
    /// Export slice; materialized as an empty container.
    Slice,
    /// Text layer.
    Text,
    /// Vector shape, exported as a raster image.
    Vector,
    /// Boolean shape combination, exported as a raster image.
    BooleanOperation,
    /// Rectangle shape, exported as a raster image.
    Rectangle,
    /// Line shape, exported as a raster image.
    Line,
    /// Ellipse shape, exported as a raster image.
    Ellipse,
    /// Regular polygon shape, exported as a raster image.
    RegularPolygon,
    /// Star shape, exported as a raster image.
    Star,
    /// Anything the importer does not understand.
    #[serde(other)]
    Other,
}

/// A color or image-reference paint applied to a node.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    /// Solid fill color.
    #[serde(default)]
    pub color: Option<Rgba>,
    /// Opaque reference to a raster image backing this paint.
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Text attributes carried by TEXT nodes.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in document units.
    #[serde(default)]
    pub font_size: f32,
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
