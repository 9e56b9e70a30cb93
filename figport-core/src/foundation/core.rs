/// 2D vector used for local positions and sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Construct a vector from components.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Absolute document-space rectangle as delivered by the design API.
///
/// Top-left origin with Y increasing downward; coordinates are absolute
/// (page space) regardless of nesting depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Left edge in document units.
    #[serde(default)]
    pub x: f32,
    /// Top edge in document units.
    #[serde(default)]
    pub y: f32,
    /// Width in document units.
    #[serde(default)]
    pub width: f32,
    /// Height in document units.
    #[serde(default)]
    pub height: f32,
}

impl BoundingBox {
    /// Construct a box from position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the box as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Anchored position and size of a scene node relative to its composition
/// parent.
///
/// Top-left anchor with Y increasing upward, so source positions have their
/// Y negated on the way in. Sizes are copied verbatim from the source box.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Anchored position relative to the parent origin.
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Placement {
    /// Placement at the parent origin with the given size.
    pub fn sized(size: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
        }
    }
}

/// RGBA color with channels in `[0, 1]`, as delivered by the design API.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    #[serde(default)]
    pub r: f32,
    /// Green channel.
    #[serde(default)]
    pub g: f32,
    /// Blue channel.
    #[serde(default)]
    pub b: f32,
    /// Alpha channel.
    #[serde(default)]
    pub a: f32,
}

/// Output encoding for rasterized shape exports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG, re-encoded without alpha.
    Jpg,
    /// PNG, re-encoded with alpha.
    #[default]
    Png,
}

impl ImageFormat {
    /// File extension without the leading dot.
    pub fn ext(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    /// Value of the `format` query parameter on the image-export endpoint.
    pub fn as_query(self) -> &'static str {
        self.ext()
    }
}

/// Text materialization backend.
///
/// Both backends carry the same data; they differ only in which payload
/// variant the dispatcher attaches, so the host can route them to different
/// renderers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBackend {
    /// Plain text runs.
    #[default]
    Plain,
    /// Rich (measured) text runs.
    Rich,
}
