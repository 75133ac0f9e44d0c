/*
    Round-trip tests

    For every generated pair (redo, undo): applying redo then undo must
    restore the input snapshot. Forward pairs restore the file exactly.
    Inverse pairs restore every attribute; the touched bookkeeping on
    the master side is compared separately, because master-bound sets
    deliberately register as overrides (ignore_touched false) in both
    directions.
*/

use crate::component_sync::changes::{apply_changes, ChangeSet};
use crate::component_sync::model::{AssetKind, FileData, SyncGroup};
use crate::component_sync::sync::{
    generate_sync_file, generate_sync_shape_inverse, sync_shape_and_children,
};
use crate::component_sync::tests::fixtures::{frame, rect, text, Workspace};

fn assert_round_trip(before: &FileData, changes: &ChangeSet) {
    let mut data = before.clone();
    apply_changes(&mut data, &changes.redo).unwrap();
    apply_changes(&mut data, &changes.undo).unwrap();
    assert_eq!(&data, before);
}

fn assert_round_trip_attrs(before: &FileData, changes: &ChangeSet) {
    let mut data = before.clone();
    apply_changes(&mut data, &changes.redo).unwrap();
    apply_changes(&mut data, &changes.undo).unwrap();
    assert_eq!(untouched(&data), untouched(before));
}

/// Copy of the file with every touched set cleared
fn untouched(data: &FileData) -> FileData {
    let mut data = data.clone();
    for page in data.pages_index.values_mut() {
        for shape in page.objects.values_mut() {
            shape.touched.clear();
        }
    }
    for component in data.components.values_mut() {
        for shape in component.objects.values_mut() {
            shape.touched.clear();
        }
    }
    data
}

#[test]
fn test_recolor_round_trips() {
    let mut ws = Workspace::new();
    let red = ws.add_color("Red", "#ff0000");
    let mut shape = rect("Button");
    shape.fill_color = Some("#ff0000".to_string());
    shape.fill_color_ref_id = Some(red.clone());
    let root_id = ws.root_id.clone();
    ws.add_shape(&root_id, shape);
    ws.snapshot.data.colors.get_mut(&red).unwrap().color = Some("#cc0000".to_string());

    let changes = generate_sync_file(AssetKind::Colors, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_text_recolor_round_trips() {
    let mut ws = Workspace::new();
    let red = ws.add_color("Red", "#ff0000");
    let mut shape = text("Label", "hello");
    if let Some(content) = shape.content.as_mut() {
        let leaf = &mut content.children[0].children[0];
        leaf.fill_color = Some("#ff0000".to_string());
        leaf.fill_color_ref_id = Some(red.clone());
    }
    let root_id = ws.root_id.clone();
    ws.add_shape(&root_id, shape);
    ws.snapshot.data.colors.get_mut(&red).unwrap().color = Some("#cc0000".to_string());

    let changes = generate_sync_file(AssetKind::Colors, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_reorder_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let a = ws.add_shape(&frame_id, rect("a"));
    let b = ws.add_shape(&frame_id, rect("b"));
    let c = ws.add_shape(&frame_id, rect("c"));
    ws.promote(&frame_id, "Card");
    ws.shape_mut(&frame_id).shapes = vec![a, c, b];

    let changes = generate_sync_file(AssetKind::Components, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_remove_extra_child_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    ws.add_shape(&frame_id, rect("a"));
    ws.promote(&frame_id, "Card");
    let extra = ws.add_shape(&frame_id, rect("extra"));
    ws.add_shape(&extra, rect("grandchild"));

    let changes = generate_sync_file(AssetKind::Components, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_add_master_child_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    ws.add_shape(&frame_id, rect("a"));
    let component_id = ws.promote(&frame_id, "Card");
    let master_root = ws.shape(&frame_id).shape_ref.clone().unwrap();
    ws.add_master_shape(&component_id, &master_root, rect("e"));

    let changes = generate_sync_file(AssetKind::Components, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_attribute_propagation_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let a = ws.add_shape(&frame_id, rect("a"));
    let component_id = ws.promote(&frame_id, "Card");
    let master_a = ws.master_of(&component_id, &a);
    ws.master_shape_mut(&component_id, &master_a).fill_color = Some("#123456".to_string());

    let changes = generate_sync_file(AssetKind::Components, None, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_reset_mode_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let a = ws.add_shape(&frame_id, rect("a"));
    ws.promote(&frame_id, "Card");
    {
        let shape = ws.shape_mut(&a);
        shape.fill_color = Some("#00ff00".to_string());
        shape.touched.insert(SyncGroup::FillGroup);
    }

    let page_id = ws.page_id.clone();
    let changes = sync_shape_and_children(Some(&page_id), None, &frame_id, &ws.snapshot, true);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_inverse_override_round_trips_attributes() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let a = ws.add_shape(&frame_id, rect("a"));
    ws.promote(&frame_id, "Card");
    {
        let shape = ws.shape_mut(&a);
        shape.fill_color = Some("#00ff00".to_string());
        shape.touched.insert(SyncGroup::FillGroup);
    }

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip_attrs(&ws.snapshot.data, &changes);

    // The page-side touched flags round-trip exactly
    let mut data = ws.snapshot.data.clone();
    apply_changes(&mut data, &changes.redo).unwrap();
    apply_changes(&mut data, &changes.undo).unwrap();
    assert_eq!(data.pages_index[&page_id].objects[&a].touched, ws.shape(&a).touched);
}

#[test]
fn test_inverse_new_child_round_trips() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    ws.add_shape(&frame_id, rect("a"));
    ws.promote(&frame_id, "Card");
    ws.add_shape(&frame_id, rect("extra"));

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);
    assert!(!changes.is_empty());
    assert_round_trip(&ws.snapshot.data, &changes);
}

#[test]
fn test_positional_pairing_is_index_aligned() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let a = ws.add_shape(&frame_id, rect("a"));
    let b = ws.add_shape(&frame_id, rect("b"));
    let component_id = ws.promote(&frame_id, "Card");

    // Attribute change plus a re-order in the same pass
    let master_a = ws.master_of(&component_id, &a);
    ws.master_shape_mut(&component_id, &master_a).fill_color = Some("#123456".to_string());
    ws.shape_mut(&frame_id).shapes = vec![b, a];

    let changes = generate_sync_file(AssetKind::Components, None, &ws.snapshot);
    assert_eq!(changes.redo.len(), changes.undo.len());
    assert_round_trip(&ws.snapshot.data, &changes);
}
