/*
    Shape & container model

    Data model for shapes, pages, components, and library assets, plus
    the tree accessors and deep-clone machinery the sync engine builds
    on. Containers own their shapes; shapes refer to parents and
    children by id, so trees are walked by map lookup only.
*/

pub mod attrs;
pub mod container;
pub mod content;
pub mod library;
pub mod shape;
pub mod types;

pub use attrs::{attr_group, Attr, AttrValue, SyncGroup, COMPONENT_SYNC_ATTRS};
pub use container::{
    clone_object, container_root, get_children, get_object_with_children, get_parents,
    make_component, position_on_parent, Component, Container, Page,
};
pub use content::{map_node, some_node, ContentNode, ContentNodeType};
pub use library::{ColorAsset, FileData, LibraryEntry, MediaAsset, Typography, WorkspaceSnapshot};
pub use shape::{is_master_of, Shape, ShapeType};
pub use types::{
    AssetKind, Blur, ColorId, ComponentId, FileId, Gradient, GradientStop, GradientType,
    ImageMetadata, MediaId, PageId, Shadow, ShadowStyle, ShapeId, StrokeAlignment, StrokeStyle,
    TypographyId,
};
