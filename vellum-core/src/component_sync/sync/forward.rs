/*
    forward.rs - Forward sync driver (library -> instances)

    Walks every page of the file (or every component of the local
    library) and, for each shape referencing an asset of the requested
    kind, emits the change pair that re-applies the library value:
    component instances go through the tree reconciler, colors and
    typographies are copied attribute by attribute or rewritten inside
    the text content tree.

    Color and typography sets never interact with the touched
    bookkeeping (ignore_touched is always true for them).
*/

use tracing::{debug, trace};

use crate::component_sync::changes::{mod_obj_pair, ChangeSet, Operation};
use crate::component_sync::model::{
    map_node, AssetKind, Attr, AttrValue, ColorAsset, ColorId, Container, FileData, FileId,
    Shape, Typography, TypographyId, WorkspaceSnapshot,
};

use super::reconcile::sync_shape_and_children;
use super::refs::uses_asset;

/// Propagate library changes of one asset kind into every page of the
/// file
pub fn generate_sync_file(
    kind: AssetKind,
    library_id: Option<&FileId>,
    snapshot: &WorkspaceSnapshot,
) -> ChangeSet {
    let Some(library) = snapshot.library_data(library_id) else {
        debug!(?library_id, "library not linked to this file");
        return ChangeSet::new();
    };
    if library.assets_empty(kind) {
        return ChangeSet::new();
    }

    debug!(kind = %kind, ?library_id, "sync file with library");
    let mut changes = ChangeSet::new();
    for page_id in &snapshot.data.pages {
        if let Some(page) = snapshot.data.get_page(page_id) {
            changes.append(sync_container(
                kind,
                library_id,
                library,
                snapshot,
                &Container::Page(page),
            ));
        }
    }
    changes
}

/// Propagate library changes of one asset kind into every component of
/// the local library
pub fn generate_sync_library(
    kind: AssetKind,
    library_id: Option<&FileId>,
    snapshot: &WorkspaceSnapshot,
) -> ChangeSet {
    let Some(library) = snapshot.library_data(library_id) else {
        debug!(?library_id, "library not linked to this file");
        return ChangeSet::new();
    };
    if library.assets_empty(kind) {
        return ChangeSet::new();
    }

    debug!(kind = %kind, ?library_id, "sync local components with library");
    let mut changes = ChangeSet::new();
    for component in snapshot.data.components.values() {
        changes.append(sync_container(
            kind,
            library_id,
            library,
            snapshot,
            &Container::Component(component),
        ));
    }
    changes
}

fn sync_container(
    kind: AssetKind,
    library_id: Option<&FileId>,
    library: &FileData,
    snapshot: &WorkspaceSnapshot,
    container: &Container<'_>,
) -> ChangeSet {
    trace!(container = %container.name(), "sync container");
    let mut changes = ChangeSet::new();
    for shape in container.objects().values() {
        if !uses_asset(shape, kind, library_id) {
            continue;
        }
        let pair = match kind {
            AssetKind::Components => sync_shape_and_children(
                container.page_id(),
                container.component_id(),
                &shape.id,
                snapshot,
                false,
            ),
            AssetKind::Colors => {
                if shape.is_text() {
                    sync_text_colors(shape, library_id, library, container)
                } else {
                    sync_shape_colors(shape, library_id, library, container)
                }
            }
            AssetKind::Typographies => {
                sync_text_typographies(shape, library_id, library, container)
            }
            AssetKind::Media => ChangeSet::new(),
        };
        changes.append(pair);
    }
    changes
}

enum ColorField {
    Color,
    Gradient,
    Opacity,
}

impl ColorField {
    fn value(&self, color: &ColorAsset) -> AttrValue {
        match self {
            ColorField::Color => {
                color.color.clone().map(AttrValue::Str).unwrap_or(AttrValue::None)
            }
            ColorField::Gradient => {
                color.gradient.clone().map(AttrValue::Gradient).unwrap_or(AttrValue::None)
            }
            ColorField::Opacity => color.opacity.map(AttrValue::Num).unwrap_or(AttrValue::None),
        }
    }
}

/// Copy library color values onto a non-text shape, one target
/// attribute per referenced field
fn sync_shape_colors(
    shape: &Shape,
    library_id: Option<&FileId>,
    library: &FileData,
    container: &Container<'_>,
) -> ChangeSet {
    let fill_ref = color_ref(
        shape.fill_color_ref_id.as_ref(),
        shape.fill_color_ref_file.as_ref(),
        library_id,
        library,
    );
    let stroke_ref = color_ref(
        shape.stroke_color_ref_id.as_ref(),
        shape.stroke_color_ref_file.as_ref(),
        library_id,
        library,
    );

    let table: [(Option<&ColorAsset>, ColorField, Attr); 6] = [
        (fill_ref, ColorField::Color, Attr::FillColor),
        (fill_ref, ColorField::Gradient, Attr::FillColorGradient),
        (fill_ref, ColorField::Opacity, Attr::FillOpacity),
        (stroke_ref, ColorField::Color, Attr::StrokeColor),
        (stroke_ref, ColorField::Gradient, Attr::StrokeColorGradient),
        (stroke_ref, ColorField::Opacity, Attr::StrokeOpacity),
    ];

    let mut redo_ops = Vec::new();
    let mut undo_ops = Vec::new();
    for (color, field, target) in table {
        let Some(color) = color else { continue };
        let new_val = field.value(color);
        let old_val = shape.get_attr(target);
        if new_val == old_val {
            continue;
        }
        redo_ops.push(Operation::Set { attr: target, val: new_val, ignore_touched: true });
        undo_ops.push(Operation::Set { attr: target, val: old_val, ignore_touched: true });
    }

    mod_obj_pair(&shape.id, container.page_id(), container.component_id(), redo_ops, undo_ops)
}

fn color_ref<'a>(
    ref_id: Option<&ColorId>,
    ref_file: Option<&FileId>,
    library_id: Option<&FileId>,
    library: &'a FileData,
) -> Option<&'a ColorAsset> {
    if ref_file != library_id {
        return None;
    }
    ref_id.and_then(|id| library.colors.get(id))
}

/// Rewrite the content tree of a text shape, replacing fill values of
/// nodes that reference a library color. A traversal with no effect
/// collapses to the empty pair.
fn sync_text_colors(
    shape: &Shape,
    library_id: Option<&FileId>,
    library: &FileData,
    container: &Container<'_>,
) -> ChangeSet {
    let Some(content) = shape.content.as_ref() else {
        return ChangeSet::new();
    };

    let new_content = map_node(
        &|node| {
            let mut node = node.clone();
            if node.fill_color_ref_file.as_ref() == library_id {
                if let Some(color) =
                    node.fill_color_ref_id.as_ref().and_then(|id| library.colors.get(id))
                {
                    node.fill_color = color.color.clone();
                    node.fill_opacity = color.opacity;
                    node.fill_color_gradient = color.gradient.clone();
                }
            }
            node
        },
        content,
    );

    if new_content == *content {
        return ChangeSet::new();
    }
    mod_obj_pair(
        &shape.id,
        container.page_id(),
        container.component_id(),
        vec![Operation::Set {
            attr: Attr::Content,
            val: AttrValue::Content(new_content),
            ignore_touched: true,
        }],
        vec![Operation::Set {
            attr: Attr::Content,
            val: AttrValue::Content(content.clone()),
            ignore_touched: true,
        }],
    )
}

/// Merge library typography fields into every content node that
/// references one
fn sync_text_typographies(
    shape: &Shape,
    library_id: Option<&FileId>,
    library: &FileData,
    container: &Container<'_>,
) -> ChangeSet {
    let Some(content) = shape.content.as_ref() else {
        return ChangeSet::new();
    };

    let new_content = map_node(
        &|node| {
            let mut node = node.clone();
            if node.typography_ref_file.as_ref() == library_id {
                if let Some(typography) = typography_ref(&node.typography_ref_id, library) {
                    typography.apply_to_node(&mut node);
                }
            }
            node
        },
        content,
    );

    if new_content == *content {
        return ChangeSet::new();
    }
    mod_obj_pair(
        &shape.id,
        container.page_id(),
        container.component_id(),
        vec![Operation::Set {
            attr: Attr::Content,
            val: AttrValue::Content(new_content),
            ignore_touched: true,
        }],
        vec![Operation::Set {
            attr: Attr::Content,
            val: AttrValue::Content(content.clone()),
            ignore_touched: true,
        }],
    )
}

fn typography_ref<'a>(
    ref_id: &Option<TypographyId>,
    library: &'a FileData,
) -> Option<&'a Typography> {
    ref_id.as_ref().and_then(|id| library.typographies.get(id))
}
