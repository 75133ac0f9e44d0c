/*
    refs.rs - Asset-reference detection

    Decides whether a shape references an asset of a given kind coming
    from a given library. A None library id selects the local library
    and matches references whose *-ref-file is None.
*/

use crate::component_sync::model::{some_node, AssetKind, FileId, Shape};

/// True iff the shape references an asset of `kind` from `library_id`
pub fn uses_asset(shape: &Shape, kind: AssetKind, library_id: Option<&FileId>) -> bool {
    match kind {
        AssetKind::Components => {
            shape.component_id.is_some() && file_matches(shape.component_file.as_ref(), library_id)
        }

        AssetKind::Colors => uses_color(shape, library_id),

        AssetKind::Typographies => match &shape.content {
            Some(content) if shape.is_text() => some_node(
                &|node| {
                    node.typography_ref_id.is_some()
                        && file_matches(node.typography_ref_file.as_ref(), library_id)
                },
                content,
            ),
            _ => false,
        },

        // Media assets are embedded at upload time; nothing to keep in
        // sync afterwards.
        AssetKind::Media => false,
    }
}

fn uses_color(shape: &Shape, library_id: Option<&FileId>) -> bool {
    if let Some(content) = shape.content.as_ref().filter(|_| shape.is_text()) {
        let referenced = some_node(
            &|node| {
                (node.fill_color_ref_id.is_some()
                    && file_matches(node.fill_color_ref_file.as_ref(), library_id))
                    || (node.stroke_color_ref_id.is_some()
                        && file_matches(node.stroke_color_ref_file.as_ref(), library_id))
            },
            content,
        );
        if referenced {
            return true;
        }
    }

    (shape.fill_color_ref_id.is_some()
        && file_matches(shape.fill_color_ref_file.as_ref(), library_id))
        || (shape.stroke_color_ref_id.is_some()
            && file_matches(shape.stroke_color_ref_file.as_ref(), library_id))
}

fn file_matches(ref_file: Option<&FileId>, library_id: Option<&FileId>) -> bool {
    ref_file == library_id
}
