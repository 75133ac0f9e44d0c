/*
    types.rs - Common types for the component_sync model

    Defines:
    - IDs for shapes, pages, files, and library assets
    - Visual primitives shared by shapes and text nodes (gradients,
      shadows, blur, image metadata, stroke styling)
    - The asset kind selector used by the sync drivers
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a shape
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: String) -> Self {
        ShapeId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        ShapeId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a page
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId(pub String);

impl PageId {
    pub fn new(id: String) -> Self {
        PageId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        PageId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a file. Library references carry an
/// `Option<FileId>` where `None` means "this file's own library".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(id: String) -> Self {
        FileId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        FileId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a component asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: String) -> Self {
        ComponentId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        ComponentId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a color asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColorId(pub String);

impl ColorId {
    pub fn new(id: String) -> Self {
        ColorId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        ColorId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a typography asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypographyId(pub String);

impl TypographyId {
    pub fn new(id: String) -> Self {
        TypographyId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        TypographyId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TypographyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a media asset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaId(pub String);

impl MediaId {
    pub fn new(id: String) -> Self {
        MediaId(id)
    }

    pub fn generate() -> Self {
        use uuid::Uuid;
        MediaId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which asset family of a library a sync pass operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Components,
    Colors,
    Typographies,
    Media,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Components => "components",
            AssetKind::Colors => "colors",
            AssetKind::Typographies => "typographies",
            AssetKind::Media => "media",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stop in a gradient ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Hex color, e.g. "#fabada"
    pub color: String,
    pub opacity: f64,
    /// Offset along the ramp, 0.0 to 1.0
    pub offset: f64,
}

/// Linear or radial gradient fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub gradient_type: GradientType,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub width: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradientType {
    Linear,
    Radial,
}

/// Drop or inner shadow attached to a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub style: ShadowStyle,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub opacity: f64,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowStyle {
    DropShadow,
    InnerShadow,
}

/// Layer blur applied to a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blur {
    pub value: f64,
    pub hidden: bool,
}

/// Raster metadata for image shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub mtype: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeStyle {
    Solid,
    Dotted,
    Dashed,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeAlignment {
    Center,
    Inner,
    Outer,
}
