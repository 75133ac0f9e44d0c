/*
    reconcile.rs - Instance/master tree reconciliation

    Walks an instance subtree and its master component in parallel,
    emitting the change pairs that bring the instance back in line:
    attribute updates per matched node, clones for children only the
    master has, deletions for children only the instance has, and moves
    for children the user re-ordered.

    shape_ref is the rename-stable identity used for matching. The
    fallback search in compare_children is O(n^2) in the worst case;
    fan-outs here are tens of children, so a positional index is not
    worth its bookkeeping.
*/

use tracing::{debug, trace, warn};

use crate::component_sync::changes::{Change, ChangeSet};
use crate::component_sync::model::{
    clone_object, get_children, get_object_with_children, get_parents, is_master_of,
    position_on_parent, Component, ComponentId, Container, PageId, Shape, ShapeId,
    WorkspaceSnapshot,
};

use super::attrs::{reposition_shape, update_attrs, SyncOptions};

/// Reconcile one instance subtree with its master component.
///
/// `page_id`/`component_id` name the container holding the instance
/// (exactly one must be set). With `reset` false, user overrides are
/// preserved; with `reset` true they are discarded and the touched
/// flags cleared, which is the "reset overrides" operation.
pub fn sync_shape_and_children(
    page_id: Option<&PageId>,
    component_id: Option<&ComponentId>,
    shape_id: &ShapeId,
    snapshot: &WorkspaceSnapshot,
    reset: bool,
) -> ChangeSet {
    let Some(container) = snapshot.get_container(page_id, component_id) else {
        warn!(?page_id, ?component_id, "sync target container not found");
        return ChangeSet::new();
    };
    let Some(shape_inst) = container.get_shape(shape_id) else {
        warn!(shape = %shape_id, "sync target shape not found");
        return ChangeSet::new();
    };
    let Some(instance_component_id) = shape_inst.component_id.as_ref() else {
        warn!(shape = %shape_inst.name, "shape is not an instance root");
        return ChangeSet::new();
    };
    let Some(component) =
        snapshot.get_component(instance_component_id, shape_inst.component_file.as_ref())
    else {
        warn!(component = %instance_component_id, "component not found in any library");
        return ChangeSet::new();
    };
    let Some(shape_master) =
        shape_inst.shape_ref.as_ref().and_then(|shape_ref| component.objects.get(shape_ref))
    else {
        warn!(shape = %shape_inst.name, "dangling shape_ref on instance root");
        return ChangeSet::new();
    };
    let Some(root_master) = component.root() else {
        warn!(component = %component.name, "component has no root");
        return ChangeSet::new();
    };

    debug!(
        component = %component.name,
        shape = %shape_inst.name,
        reset,
        "synchronizing instance with component"
    );

    let options = SyncOptions {
        omit_touched: !reset,
        reset_touched: reset,
        set_touched: false,
        copy_touched: false,
    };
    let mut changes = ChangeSet::new();
    sync_normal(
        &container,
        component,
        shape_inst,
        shape_master,
        shape_inst,
        root_master,
        options,
        &mut changes,
    );
    changes
}

#[allow(clippy::too_many_arguments)]
fn sync_normal(
    container: &Container<'_>,
    component: &Component,
    inst: &Shape,
    master: &Shape,
    root_inst: &Shape,
    root_master: &Shape,
    options: SyncOptions,
    changes: &mut ChangeSet,
) {
    // A nested instance root re-anchors positions for its own subtree
    let (root_inst, root_master) =
        if inst.is_instance_root() { (inst, master) } else { (root_inst, root_master) };

    trace!(inst = %inst.name, master = %master.name, "sync shape");
    changes.append(update_attrs(
        inst,
        master,
        root_inst,
        root_master,
        container.page_id(),
        container.component_id(),
        options,
    ));

    let children_inst = get_children(&inst.id, container.objects());
    let children_master = get_children(&master.id, &component.objects);

    for action in compare_children(&children_inst, &children_master) {
        match action {
            ChildAction::OnlyInst(child) => {
                trace!(child = %child.name, "child only in instance");
                changes.append(remove_shape(child, container));
            }
            ChildAction::OnlyMaster(child) => {
                trace!(child = %child.name, "child only in master");
                changes.append(add_shape_to_instance(
                    child, component, container, root_inst, root_master,
                ));
            }
            ChildAction::Matched(child_inst, child_master) => {
                let child_options = child_sync_options(child_inst, options);
                sync_normal(
                    container,
                    component,
                    child_inst,
                    child_master,
                    root_inst,
                    root_master,
                    child_options,
                    changes,
                );
            }
            ChildAction::Moved(child_inst, child_master) => {
                // Recurse first, then emit the move
                let child_options = child_sync_options(child_inst, options);
                sync_normal(
                    container,
                    component,
                    child_inst,
                    child_master,
                    root_inst,
                    root_master,
                    child_options,
                    changes,
                );
                let index_before =
                    children_inst.iter().position(|c| c.id == child_inst.id).unwrap_or(0);
                let index_after =
                    children_master.iter().position(|c| c.id == child_master.id).unwrap_or(0);
                trace!(child = %child_inst.name, index_before, index_after, "child moved");
                changes.append(move_shape(child_inst, index_before, index_after, container));
            }
        }
    }
}

/// Nested instances propagate touched flags instead of suppressing them
fn child_sync_options(child_inst: &Shape, parent_options: SyncOptions) -> SyncOptions {
    if child_inst.is_instance_root() {
        SyncOptions {
            omit_touched: false,
            reset_touched: false,
            set_touched: false,
            copy_touched: true,
        }
    } else {
        parent_options
    }
}

/// Pairing of one instance child with one master child
pub enum ChildAction<'a> {
    OnlyInst(&'a Shape),
    OnlyMaster(&'a Shape),
    Matched(&'a Shape, &'a Shape),
    Moved(&'a Shape, &'a Shape),
}

/// Walk both ordered child lists from the head, matching children via
/// shape_ref. A head mismatch searches the rest of both lists to decide
/// between an addition, a removal, or a re-order.
pub fn compare_children<'a>(
    children_inst: &[&'a Shape],
    children_master: &[&'a Shape],
) -> Vec<ChildAction<'a>> {
    let mut actions = Vec::new();
    let mut inst: Vec<&Shape> = children_inst.to_vec();
    let mut master: Vec<&Shape> = children_master.to_vec();

    loop {
        match (inst.first().copied(), master.first().copied()) {
            (None, None) => break,
            (None, Some(_)) => {
                for child in master.drain(..) {
                    actions.push(ChildAction::OnlyMaster(child));
                }
                break;
            }
            (Some(_), None) => {
                for child in inst.drain(..) {
                    actions.push(ChildAction::OnlyInst(child));
                }
                break;
            }
            (Some(child_inst), Some(child_master)) => {
                if is_master_of(child_master, child_inst) {
                    actions.push(ChildAction::Matched(child_inst, child_master));
                    inst.remove(0);
                    master.remove(0);
                    continue;
                }
                let inst_pos = inst.iter().position(|&c| is_master_of(child_master, c));
                let master_pos = master.iter().position(|&c| is_master_of(c, child_inst));
                match (inst_pos, master_pos) {
                    (None, _) => {
                        // This master child has no instance counterpart
                        actions.push(ChildAction::OnlyMaster(child_master));
                        master.remove(0);
                    }
                    (_, None) => {
                        // This instance child has no master counterpart
                        actions.push(ChildAction::OnlyInst(child_inst));
                        inst.remove(0);
                    }
                    (Some(inst_pos), Some(_)) => {
                        // Both exist further on: the instance re-ordered
                        let moved = inst.remove(inst_pos);
                        actions.push(ChildAction::Moved(moved, child_master));
                        master.remove(0);
                    }
                }
            }
        }
    }
    actions
}

/// Delete an instance child with no master counterpart. The undo
/// re-inserts the whole subtree in increasing depth order and asks the
/// host to refresh the ancestors' caches.
fn remove_shape(shape: &Shape, container: &Container<'_>) -> ChangeSet {
    let objects = container.objects();
    let page_id = container.page_id().cloned();
    let component_id = container.component_id().cloned();

    let redo = vec![Change::DelObj {
        id: shape.id.clone(),
        page_id: page_id.clone(),
        component_id: component_id.clone(),
    }];

    let mut undo: Vec<Change> = get_object_with_children(&shape.id, objects)
        .into_iter()
        .filter_map(|id| objects.get(&id))
        .map(|obj| Change::AddObj {
            id: obj.id.clone(),
            page_id: page_id.clone(),
            component_id: component_id.clone(),
            parent_id: obj.parent_id.clone(),
            frame_id: obj.frame_id.clone(),
            index: Some(position_on_parent(&obj.id, objects)),
            obj: Box::new(obj.clone()),
        })
        .collect();
    undo.push(Change::RegObjects {
        page_id,
        component_id,
        shapes: get_parents(&shape.id, objects),
    });

    ChangeSet { redo, undo }
}

/// Clone a master child the instance is missing, under the instance
/// counterpart of the master parent.
fn add_shape_to_instance(
    component_shape: &Shape,
    component: &Component,
    container: &Container<'_>,
    root_inst: &Shape,
    root_master: &Shape,
) -> ChangeSet {
    let objects = container.objects();
    let Some(component_parent) = component_shape
        .parent_id
        .as_ref()
        .and_then(|parent_id| component.objects.get(parent_id))
    else {
        warn!(shape = %component_shape.name, "master child has no parent");
        return ChangeSet::new();
    };
    let Some(parent_shape) = get_object_with_children(&root_inst.id, objects)
        .into_iter()
        .filter_map(|id| objects.get(&id))
        .find(|shape| is_master_of(component_parent, shape))
    else {
        warn!(shape = %component_shape.name, "no instance counterpart for master parent");
        return ChangeSet::new();
    };

    let parent_frame_id = parent_shape.frame_id.clone();
    let (_, new_shapes, _) = clone_object(
        component_shape,
        Some(&parent_shape.id),
        &component.objects,
        &mut |new_shape: Shape, original: &Shape| {
            let mut new_shape = reposition_shape(new_shape, root_master, root_inst);
            new_shape.frame_id = parent_frame_id.clone();
            new_shape.shape_ref = Some(original.id.clone());
            new_shape
        },
        &mut |original: Shape, _new_shape: &Shape| original,
    );

    let page_id = container.page_id().cloned();
    let component_id = container.component_id().cloned();
    let redo = new_shapes
        .iter()
        .map(|shape| Change::AddObj {
            id: shape.id.clone(),
            page_id: page_id.clone(),
            component_id: component_id.clone(),
            parent_id: shape.parent_id.clone(),
            frame_id: shape.frame_id.clone(),
            index: None,
            obj: Box::new(shape.clone()),
        })
        .collect();
    // Deleting the root would suffice; one del-obj per clone keeps the
    // lists positionally paired.
    let undo = new_shapes
        .iter()
        .map(|shape| Change::DelObj {
            id: shape.id.clone(),
            page_id: page_id.clone(),
            component_id: component_id.clone(),
        })
        .collect();

    ChangeSet { redo, undo }
}

/// Re-order pair for a child the user moved within its parent
fn move_shape(
    child_inst: &Shape,
    index_before: usize,
    index_after: usize,
    container: &Container<'_>,
) -> ChangeSet {
    let Some(parent_id) = child_inst.parent_id.clone() else {
        warn!(shape = %child_inst.name, "moved shape has no parent");
        return ChangeSet::new();
    };
    let page_id = container.page_id().cloned();
    let component_id = container.component_id().cloned();
    ChangeSet {
        redo: vec![Change::MovObjects {
            parent_id: parent_id.clone(),
            shapes: vec![child_inst.id.clone()],
            index: index_after,
            page_id: page_id.clone(),
            component_id: component_id.clone(),
        }],
        undo: vec![Change::MovObjects {
            parent_id,
            shapes: vec![child_inst.id.clone()],
            index: index_before,
            page_id,
            component_id,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component_sync::model::ShapeType;

    fn linked_pair(name: &str) -> (Shape, Shape) {
        let master = Shape::new(name, ShapeType::Rect);
        let mut inst = Shape::new(name, ShapeType::Rect);
        inst.shape_ref = Some(master.id.clone());
        (master, inst)
    }

    #[test]
    fn test_compare_children_all_matched() {
        let (master_a, inst_a) = linked_pair("a");
        let (master_b, inst_b) = linked_pair("b");
        let actions = compare_children(&[&inst_a, &inst_b], &[&master_a, &master_b]);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], ChildAction::Matched(..)));
        assert!(matches!(actions[1], ChildAction::Matched(..)));
    }

    #[test]
    fn test_compare_children_remaining_master_children_are_added() {
        let (master_a, inst_a) = linked_pair("a");
        let (master_b, _) = linked_pair("b");
        let actions = compare_children(&[&inst_a], &[&master_a, &master_b]);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[1], ChildAction::OnlyMaster(shape) if shape.id == master_b.id));
    }

    #[test]
    fn test_compare_children_remaining_instance_children_are_removed() {
        let (master_a, inst_a) = linked_pair("a");
        let (_, extra) = linked_pair("extra");
        let mut extra = extra;
        extra.shape_ref = None;
        let actions = compare_children(&[&inst_a, &extra], &[&master_a]);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[1], ChildAction::OnlyInst(shape) if shape.id == extra.id));
    }

    #[test]
    fn test_compare_children_reorder_is_detected() {
        let (master_a, inst_a) = linked_pair("a");
        let (master_b, inst_b) = linked_pair("b");
        let (master_c, inst_c) = linked_pair("c");
        // Instance order a, c, b against master order a, b, c
        let actions =
            compare_children(&[&inst_a, &inst_c, &inst_b], &[&master_a, &master_b, &master_c]);
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], ChildAction::Matched(..)));
        assert!(
            matches!(actions[1], ChildAction::Moved(inst, master) if inst.id == inst_b.id && master.id == master_b.id)
        );
        assert!(
            matches!(actions[2], ChildAction::Matched(inst, master) if inst.id == inst_c.id && master.id == master_c.id)
        );
    }
}
