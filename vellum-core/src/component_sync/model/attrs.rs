/*
    attrs.rs - Syncable attribute table

    Every attribute the sync engine may copy between a master shape and
    an instance shape, together with the touched group it belongs to.
    Overriding any attribute of a group marks the whole group as touched
    on the instance shape; forward sync skips touched groups.

    Attributes outside this table (currently only shape_ref) carry no
    group and are always overwritten.
*/

use serde::{Deserialize, Serialize};

use super::content::ContentNode;
use super::types::{
    Blur, ColorId, FileId, Gradient, ImageMetadata, Shadow, ShapeId, StrokeAlignment,
    StrokeStyle, TypographyId,
};

/// Equivalence class of attributes that are touched/untouched together
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SyncGroup {
    NameGroup,
    GeometryGroup,
    FillGroup,
    StrokeGroup,
    TextGroup,
    TypographyGroup,
    ImageGroup,
    ShadowGroup,
    BlurGroup,
}

/// A syncable shape attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attr {
    Name,
    X,
    Y,
    Width,
    Height,
    Rotation,
    FillColor,
    FillOpacity,
    FillColorGradient,
    FillColorRefId,
    FillColorRefFile,
    StrokeColor,
    StrokeOpacity,
    StrokeColorGradient,
    StrokeColorRefId,
    StrokeColorRefFile,
    StrokeWidth,
    StrokeStyle,
    StrokeAlignment,
    Content,
    TypographyRefId,
    TypographyRefFile,
    Metadata,
    Shadow,
    Blur,
    /// Master-shape pointer; not part of the sync table
    ShapeRef,
}

/// Dynamically-typed value of a shape attribute.
///
/// `None` stands for an absent optional attribute, so a single `set`
/// operation can both assign and clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttrValue {
    None,
    Str(String),
    Num(f64),
    Gradient(Gradient),
    StrokeStyle(StrokeStyle),
    StrokeAlignment(StrokeAlignment),
    Shadows(Vec<Shadow>),
    Blur(Blur),
    Metadata(ImageMetadata),
    Content(ContentNode),
    ColorRef(ColorId),
    TypographyRef(TypographyId),
    FileRef(FileId),
    ShapeRef(ShapeId),
}

impl AttrValue {
    pub fn is_none(&self) -> bool {
        matches!(self, AttrValue::None)
    }
}

/// Attribute -> touched-group table driving [`update_attrs`].
///
/// The updater iterates this table (minus x/y, which are repositioned
/// relative to the component roots instead of copied verbatim).
///
/// [`update_attrs`]: crate::component_sync::sync::update_attrs
pub const COMPONENT_SYNC_ATTRS: &[(Attr, SyncGroup)] = &[
    (Attr::Name, SyncGroup::NameGroup),
    (Attr::X, SyncGroup::GeometryGroup),
    (Attr::Y, SyncGroup::GeometryGroup),
    (Attr::Width, SyncGroup::GeometryGroup),
    (Attr::Height, SyncGroup::GeometryGroup),
    (Attr::Rotation, SyncGroup::GeometryGroup),
    (Attr::FillColor, SyncGroup::FillGroup),
    (Attr::FillOpacity, SyncGroup::FillGroup),
    (Attr::FillColorGradient, SyncGroup::FillGroup),
    (Attr::FillColorRefId, SyncGroup::FillGroup),
    (Attr::FillColorRefFile, SyncGroup::FillGroup),
    (Attr::StrokeColor, SyncGroup::StrokeGroup),
    (Attr::StrokeOpacity, SyncGroup::StrokeGroup),
    (Attr::StrokeColorGradient, SyncGroup::StrokeGroup),
    (Attr::StrokeColorRefId, SyncGroup::StrokeGroup),
    (Attr::StrokeColorRefFile, SyncGroup::StrokeGroup),
    (Attr::StrokeWidth, SyncGroup::StrokeGroup),
    (Attr::StrokeStyle, SyncGroup::StrokeGroup),
    (Attr::StrokeAlignment, SyncGroup::StrokeGroup),
    (Attr::Content, SyncGroup::TextGroup),
    (Attr::TypographyRefId, SyncGroup::TypographyGroup),
    (Attr::TypographyRefFile, SyncGroup::TypographyGroup),
    (Attr::Metadata, SyncGroup::ImageGroup),
    (Attr::Shadow, SyncGroup::ShadowGroup),
    (Attr::Blur, SyncGroup::BlurGroup),
];

/// Touched group of an attribute, or `None` for ungrouped attributes
pub fn attr_group(attr: Attr) -> Option<SyncGroup> {
    COMPONENT_SYNC_ATTRS.iter().find(|(a, _)| *a == attr).map(|(_, g)| *g)
}
