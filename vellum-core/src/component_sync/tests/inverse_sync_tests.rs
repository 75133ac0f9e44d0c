/*
    Inverse sync tests (instance -> master)

    Covers pushing local overrides back into the master, touched-flag
    clearing on the source, cloning new instance children into the
    component, and touched propagation through nested components.
*/

use crate::component_sync::changes::{apply_changes, Change, Operation};
use crate::component_sync::model::{ComponentId, ShapeId, SyncGroup};
use crate::component_sync::sync::generate_sync_shape_inverse;
use crate::component_sync::tests::fixtures::{frame, rect, Workspace};

fn card_fixture() -> (Workspace, ShapeId, ShapeId, ComponentId) {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();
    let frame_id = ws.add_shape(&root_id, frame("Card"));
    let child_id = ws.add_shape(&frame_id, rect("child"));
    let component_id = ws.promote(&frame_id, "Card");
    (ws, frame_id, child_id, component_id)
}

#[test]
fn test_override_is_pushed_to_master_and_touched_cleared() {
    let (mut ws, frame_id, child_id, component_id) = card_fixture();

    // User override on the instance child
    {
        let child = ws.shape_mut(&child_id);
        child.fill_color = Some("#00ff00".to_string());
        child.touched.insert(SyncGroup::FillGroup);
    }

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);
    assert!(!changes.is_empty());

    let mut data = ws.snapshot.data.clone();
    apply_changes(&mut data, &changes.redo).unwrap();

    let master_child = ws.master_of(&component_id, &child_id);
    let master = &data.components[&component_id].objects[&master_child];
    assert_eq!(master.fill_color.as_deref(), Some("#00ff00"));

    let source = &data.pages_index[&page_id].objects[&child_id];
    assert!(source.touched.is_empty(), "inverse sync must clear the source's touched flags");
}

#[test]
fn test_inverse_sets_register_as_overrides() {
    let (mut ws, frame_id, child_id, _) = card_fixture();
    ws.shape_mut(&child_id).fill_color = Some("#00ff00".to_string());

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);

    // Master-bound sets carry ignore_touched false, so they register as
    // overrides when the master is itself nested in another component
    let has_registering_set = changes.redo.iter().any(|change| match change {
        Change::ModObj { component_id: Some(_), operations, .. } => operations
            .iter()
            .any(|op| matches!(op, Operation::Set { ignore_touched: false, .. })),
        _ => false,
    });
    assert!(has_registering_set);
}

#[test]
fn test_pristine_instance_produces_empty_pair() {
    let (ws, frame_id, _, _) = card_fixture();
    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);
    assert!(changes.is_empty());
}

#[test]
fn test_new_instance_child_is_cloned_into_component() {
    let (mut ws, frame_id, _, component_id) = card_fixture();
    let extra_id = ws.add_shape(&frame_id, rect("extra"));

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);

    let master_root = ws.shape(&frame_id).shape_ref.clone().unwrap();
    let new_master_id = changes
        .redo
        .iter()
        .find_map(|change| match change {
            Change::AddObj { id, component_id: Some(target), parent_id, .. } => {
                assert_eq!(*target, component_id);
                assert_eq!(parent_id.as_ref(), Some(&master_root));
                Some(id.clone())
            }
            _ => None,
        })
        .expect("inverse sync must clone the new child into the component");

    // The source shape is re-pointed at its new master
    let repointed = changes.redo.iter().any(|change| match change {
        Change::ModObj { id, page_id: Some(_), operations, .. } => {
            *id == extra_id
                && operations.iter().any(|op| {
                    matches!(op, Operation::Set { val, .. }
                        if *val == crate::component_sync::model::AttrValue::ShapeRef(new_master_id.clone()))
                })
        }
        _ => false,
    });
    assert!(repointed);

    let mut data = ws.snapshot.data.clone();
    apply_changes(&mut data, &changes.redo).unwrap();
    assert!(data.components[&component_id].objects.contains_key(&new_master_id));
    assert_eq!(
        data.pages_index[&page_id].objects[&extra_id].shape_ref.as_ref(),
        Some(&new_master_id)
    );
}

#[test]
fn test_nested_component_receives_touched_flags() {
    let mut ws = Workspace::new();
    let root_id = ws.root_id.clone();

    // Inner component with one leaf
    let inner_frame = ws.add_shape(&root_id, frame("Inner"));
    ws.add_shape(&inner_frame, rect("leaf"));
    let inner_id = ws.promote(&inner_frame, "Inner");

    // Outer component embedding an instance of Inner
    let outer_frame = ws.add_shape(&root_id, frame("Outer"));
    let nested_instance = ws.instantiate(&inner_id, &outer_frame, 10.0, 10.0);
    let outer_id = ws.promote(&outer_frame, "Outer");

    // User edits the nested instance's leaf on the page
    let nested_leaf = ws.shape(&nested_instance).shapes[0].clone();
    {
        let leaf = ws.shape_mut(&nested_leaf);
        leaf.fill_color = Some("#222222".to_string());
        leaf.touched.insert(SyncGroup::FillGroup);
    }

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &outer_frame, &ws.snapshot);

    let mut data = ws.snapshot.data.clone();
    apply_changes(&mut data, &changes.redo).unwrap();

    // The matching shape inside the outer master got the value and the
    // touched flag, rather than a cleared flag set
    let master_leaf = ws.shape(&nested_leaf).shape_ref.clone().unwrap();
    let master = &data.components[&outer_id].objects[&master_leaf];
    assert_eq!(master.fill_color.as_deref(), Some("#222222"));
    assert!(master.touched.contains(&SyncGroup::FillGroup));

    // And the nested source keeps its flags (no reset on the nested
    // path)
    let source = &data.pages_index[&page_id].objects[&nested_leaf];
    assert!(source.touched.contains(&SyncGroup::FillGroup));
}

#[test]
fn test_undo_lists_are_concatenated_per_shape() {
    let (mut ws, frame_id, child_id, _) = card_fixture();
    {
        let child = ws.shape_mut(&child_id);
        child.fill_color = Some("#00ff00".to_string());
        child.touched.insert(SyncGroup::FillGroup);
    }

    let page_id = ws.page_id.clone();
    let changes = generate_sync_shape_inverse(&page_id, &frame_id, &ws.snapshot);

    // One master-bound pair and one page-bound reset pair, positionally
    // aligned
    assert_eq!(changes.redo.len(), changes.undo.len());
    assert_eq!(changes.redo.len(), 2);
    assert!(matches!(
        (&changes.redo[0], &changes.undo[0]),
        (Change::ModObj { component_id: Some(_), .. }, Change::ModObj { component_id: Some(_), .. })
    ));
    assert!(matches!(
        (&changes.redo[1], &changes.undo[1]),
        (Change::ModObj { page_id: Some(_), .. }, Change::ModObj { page_id: Some(_), .. })
    ));
}
