/*
    shape.rs - Shape model

    A shape is a node in a container tree: geometry, visual attributes,
    asset references into a library, and (for instance shapes) linkage to
    the master shape they mirror.

    Component linkage:
    - component_id/component_file are set on the root of an instance and
      name the component it was created from (file None = local library).
    - shape_ref points at the master shape this shape mirrors; it is the
      stable identity used to match children during reconciliation.
    - touched is the set of attribute groups the user has overridden on
      this instance shape; forward sync must not clobber them.
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::attrs::{Attr, AttrValue, SyncGroup};
use super::content::ContentNode;
use super::types::{
    Blur, ColorId, ComponentId, FileId, Gradient, ImageMetadata, Shadow, ShapeId,
    StrokeAlignment, StrokeStyle, TypographyId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    Rect,
    Circle,
    Line,
    Path,
    Text,
    Image,
    Group,
    Frame,
}

/// A shape in a page or component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub shape_type: ShapeType,

    /// Parent in the tree; None at the container root
    pub parent_id: Option<ShapeId>,
    /// Frame this shape is clipped to; None at the container root
    pub frame_id: Option<ShapeId>,
    /// Ordered list of child ids
    pub shapes: Vec<ShapeId>,

    // Geometry, absolute within the container
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,

    // Fill
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub fill_color_gradient: Option<Gradient>,
    pub fill_color_ref_id: Option<ColorId>,
    pub fill_color_ref_file: Option<FileId>,

    // Stroke
    pub stroke_color: Option<String>,
    pub stroke_opacity: Option<f64>,
    pub stroke_color_gradient: Option<Gradient>,
    pub stroke_color_ref_id: Option<ColorId>,
    pub stroke_color_ref_file: Option<FileId>,
    pub stroke_width: Option<f64>,
    pub stroke_style: Option<StrokeStyle>,
    pub stroke_alignment: Option<StrokeAlignment>,

    // Effects
    pub shadow: Option<Vec<Shadow>>,
    pub blur: Option<Blur>,

    // Image shapes
    pub metadata: Option<ImageMetadata>,

    // Text shapes
    pub content: Option<ContentNode>,
    pub typography_ref_id: Option<TypographyId>,
    pub typography_ref_file: Option<FileId>,

    // Component linkage
    pub component_id: Option<ComponentId>,
    pub component_file: Option<FileId>,
    pub component_root: bool,
    pub shape_ref: Option<ShapeId>,

    /// Attribute groups overridden locally on this instance shape
    pub touched: BTreeSet<SyncGroup>,
}

impl Shape {
    pub fn new(name: &str, shape_type: ShapeType) -> Self {
        Shape {
            id: ShapeId::generate(),
            name: name.to_string(),
            shape_type,
            parent_id: None,
            frame_id: None,
            shapes: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            fill_color: None,
            fill_opacity: None,
            fill_color_gradient: None,
            fill_color_ref_id: None,
            fill_color_ref_file: None,
            stroke_color: None,
            stroke_opacity: None,
            stroke_color_gradient: None,
            stroke_color_ref_id: None,
            stroke_color_ref_file: None,
            stroke_width: None,
            stroke_style: None,
            stroke_alignment: None,
            shadow: None,
            blur: None,
            metadata: None,
            content: None,
            typography_ref_id: None,
            typography_ref_file: None,
            component_id: None,
            component_file: None,
            component_root: false,
            shape_ref: None,
            touched: BTreeSet::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.shape_type == ShapeType::Text
    }

    /// True iff this shape is the root of a component instance
    pub fn is_instance_root(&self) -> bool {
        self.component_id.is_some()
    }

    pub fn is_touched(&self, group: SyncGroup) -> bool {
        self.touched.contains(&group)
    }

    /// Current value of a syncable attribute
    pub fn get_attr(&self, attr: Attr) -> AttrValue {
        match attr {
            Attr::Name => AttrValue::Str(self.name.clone()),
            Attr::X => AttrValue::Num(self.x),
            Attr::Y => AttrValue::Num(self.y),
            Attr::Width => AttrValue::Num(self.width),
            Attr::Height => AttrValue::Num(self.height),
            Attr::Rotation => AttrValue::Num(self.rotation),
            Attr::FillColor => opt_str(&self.fill_color),
            Attr::FillOpacity => opt_num(self.fill_opacity),
            Attr::FillColorGradient => {
                self.fill_color_gradient.clone().map(AttrValue::Gradient).unwrap_or(AttrValue::None)
            }
            Attr::FillColorRefId => {
                self.fill_color_ref_id.clone().map(AttrValue::ColorRef).unwrap_or(AttrValue::None)
            }
            Attr::FillColorRefFile => {
                self.fill_color_ref_file.clone().map(AttrValue::FileRef).unwrap_or(AttrValue::None)
            }
            Attr::StrokeColor => opt_str(&self.stroke_color),
            Attr::StrokeOpacity => opt_num(self.stroke_opacity),
            Attr::StrokeColorGradient => self
                .stroke_color_gradient
                .clone()
                .map(AttrValue::Gradient)
                .unwrap_or(AttrValue::None),
            Attr::StrokeColorRefId => {
                self.stroke_color_ref_id.clone().map(AttrValue::ColorRef).unwrap_or(AttrValue::None)
            }
            Attr::StrokeColorRefFile => self
                .stroke_color_ref_file
                .clone()
                .map(AttrValue::FileRef)
                .unwrap_or(AttrValue::None),
            Attr::StrokeWidth => opt_num(self.stroke_width),
            Attr::StrokeStyle => {
                self.stroke_style.map(AttrValue::StrokeStyle).unwrap_or(AttrValue::None)
            }
            Attr::StrokeAlignment => {
                self.stroke_alignment.map(AttrValue::StrokeAlignment).unwrap_or(AttrValue::None)
            }
            Attr::Content => {
                self.content.clone().map(AttrValue::Content).unwrap_or(AttrValue::None)
            }
            Attr::TypographyRefId => self
                .typography_ref_id
                .clone()
                .map(AttrValue::TypographyRef)
                .unwrap_or(AttrValue::None),
            Attr::TypographyRefFile => {
                self.typography_ref_file.clone().map(AttrValue::FileRef).unwrap_or(AttrValue::None)
            }
            Attr::Metadata => {
                self.metadata.clone().map(AttrValue::Metadata).unwrap_or(AttrValue::None)
            }
            Attr::Shadow => self.shadow.clone().map(AttrValue::Shadows).unwrap_or(AttrValue::None),
            Attr::Blur => self.blur.clone().map(AttrValue::Blur).unwrap_or(AttrValue::None),
            Attr::ShapeRef => {
                self.shape_ref.clone().map(AttrValue::ShapeRef).unwrap_or(AttrValue::None)
            }
        }
    }

    /// Assign a syncable attribute. Mismatched value types are ignored
    /// with a warning; change records built by this crate never produce
    /// them.
    pub fn set_attr(&mut self, attr: Attr, value: AttrValue) {
        if value.is_none() {
            self.clear_attr(attr);
            return;
        }
        match (attr, value) {
            (Attr::Name, AttrValue::Str(v)) => self.name = v,
            (Attr::X, AttrValue::Num(v)) => self.x = v,
            (Attr::Y, AttrValue::Num(v)) => self.y = v,
            (Attr::Width, AttrValue::Num(v)) => self.width = v,
            (Attr::Height, AttrValue::Num(v)) => self.height = v,
            (Attr::Rotation, AttrValue::Num(v)) => self.rotation = v,
            (Attr::FillColor, AttrValue::Str(v)) => self.fill_color = Some(v),
            (Attr::FillOpacity, AttrValue::Num(v)) => self.fill_opacity = Some(v),
            (Attr::FillColorGradient, AttrValue::Gradient(v)) => {
                self.fill_color_gradient = Some(v)
            }
            (Attr::FillColorRefId, AttrValue::ColorRef(v)) => self.fill_color_ref_id = Some(v),
            (Attr::FillColorRefFile, AttrValue::FileRef(v)) => self.fill_color_ref_file = Some(v),
            (Attr::StrokeColor, AttrValue::Str(v)) => self.stroke_color = Some(v),
            (Attr::StrokeOpacity, AttrValue::Num(v)) => self.stroke_opacity = Some(v),
            (Attr::StrokeColorGradient, AttrValue::Gradient(v)) => {
                self.stroke_color_gradient = Some(v)
            }
            (Attr::StrokeColorRefId, AttrValue::ColorRef(v)) => self.stroke_color_ref_id = Some(v),
            (Attr::StrokeColorRefFile, AttrValue::FileRef(v)) => {
                self.stroke_color_ref_file = Some(v)
            }
            (Attr::StrokeWidth, AttrValue::Num(v)) => self.stroke_width = Some(v),
            (Attr::StrokeStyle, AttrValue::StrokeStyle(v)) => self.stroke_style = Some(v),
            (Attr::StrokeAlignment, AttrValue::StrokeAlignment(v)) => {
                self.stroke_alignment = Some(v)
            }
            (Attr::Content, AttrValue::Content(v)) => self.content = Some(v),
            (Attr::TypographyRefId, AttrValue::TypographyRef(v)) => {
                self.typography_ref_id = Some(v)
            }
            (Attr::TypographyRefFile, AttrValue::FileRef(v)) => {
                self.typography_ref_file = Some(v)
            }
            (Attr::Metadata, AttrValue::Metadata(v)) => self.metadata = Some(v),
            (Attr::Shadow, AttrValue::Shadows(v)) => self.shadow = Some(v),
            (Attr::Blur, AttrValue::Blur(v)) => self.blur = Some(v),
            (Attr::ShapeRef, AttrValue::ShapeRef(v)) => self.shape_ref = Some(v),
            (attr, value) => {
                tracing::warn!(?attr, ?value, "attribute/value type mismatch ignored");
            }
        }
    }

    fn clear_attr(&mut self, attr: Attr) {
        match attr {
            // Non-optional attributes cannot be cleared
            Attr::Name | Attr::X | Attr::Y | Attr::Width | Attr::Height | Attr::Rotation => {}
            Attr::FillColor => self.fill_color = None,
            Attr::FillOpacity => self.fill_opacity = None,
            Attr::FillColorGradient => self.fill_color_gradient = None,
            Attr::FillColorRefId => self.fill_color_ref_id = None,
            Attr::FillColorRefFile => self.fill_color_ref_file = None,
            Attr::StrokeColor => self.stroke_color = None,
            Attr::StrokeOpacity => self.stroke_opacity = None,
            Attr::StrokeColorGradient => self.stroke_color_gradient = None,
            Attr::StrokeColorRefId => self.stroke_color_ref_id = None,
            Attr::StrokeColorRefFile => self.stroke_color_ref_file = None,
            Attr::StrokeWidth => self.stroke_width = None,
            Attr::StrokeStyle => self.stroke_style = None,
            Attr::StrokeAlignment => self.stroke_alignment = None,
            Attr::Content => self.content = None,
            Attr::TypographyRefId => self.typography_ref_id = None,
            Attr::TypographyRefFile => self.typography_ref_file = None,
            Attr::Metadata => self.metadata = None,
            Attr::Shadow => self.shadow = None,
            Attr::Blur => self.blur = None,
            Attr::ShapeRef => self.shape_ref = None,
        }
    }
}

/// True iff `instance` mirrors `master` via its shape_ref
pub fn is_master_of(master: &Shape, instance: &Shape) -> bool {
    instance.shape_ref.as_ref() == Some(&master.id)
}

fn opt_str(value: &Option<String>) -> AttrValue {
    value.clone().map(AttrValue::Str).unwrap_or(AttrValue::None)
}

fn opt_num(value: Option<f64>) -> AttrValue {
    value.map(AttrValue::Num).unwrap_or(AttrValue::None)
}
