/*
    inverse.rs - Inverse sync driver (instance -> master)

    Pushes the edits made on an instance back into its master component.
    Attribute sets are emitted with ignore_touched false so that, when a
    master is itself nested inside another component, the pushed values
    register as overrides there; the source shapes on the page get their
    touched flags cleared.

    Children the master does not know yet are cloned into the component,
    and the source shapes are re-pointed at the new master ids.
*/

use tracing::{debug, warn};

use crate::component_sync::changes::{mod_obj_pair, Change, ChangeSet, Operation};
use crate::component_sync::model::{
    clone_object, get_object_with_children, is_master_of, Attr, AttrValue, Component, Page,
    PageId, Shape, ShapeId, WorkspaceSnapshot,
};

use super::attrs::{reposition_shape, update_attrs, SyncOptions};

/// Push the edits of the instance rooted at `shape_id` back to its
/// master component
pub fn generate_sync_shape_inverse(
    page_id: &PageId,
    shape_id: &ShapeId,
    snapshot: &WorkspaceSnapshot,
) -> ChangeSet {
    let Some(page) = snapshot.data.get_page(page_id) else {
        warn!(page = %page_id, "page not found");
        return ChangeSet::new();
    };
    let Some(shape) = page.objects.get(shape_id) else {
        warn!(shape = %shape_id, "shape not found");
        return ChangeSet::new();
    };
    let Some(component_id) = shape.component_id.as_ref() else {
        warn!(shape = %shape.name, "shape is not an instance root");
        return ChangeSet::new();
    };
    let Some(component) = snapshot.get_component(component_id, shape.component_file.as_ref())
    else {
        warn!(component = %component_id, "component not found in any library");
        return ChangeSet::new();
    };
    let Some(root_master) = component.root() else {
        warn!(component = %component.name, "component has no root");
        return ChangeSet::new();
    };

    debug!(component = %component.name, shape = %shape.name, "synchronizing component with instance");

    let mut changes = ChangeSet::new();
    sync_inverse_normal(page, component, shape, shape, root_master, &mut changes);
    changes
}

fn sync_inverse_normal(
    page: &Page,
    component: &Component,
    shape: &Shape,
    root_inst: &Shape,
    root_master: &Shape,
    changes: &mut ChangeSet,
) {
    changes.append(shape_to_component(shape, component, root_inst, root_master, page));

    for child_id in &shape.shapes {
        let Some(child) = page.objects.get(child_id) else { continue };
        if child.is_instance_root() {
            sync_inverse_nested(page, component, child, root_inst, root_master, changes);
        } else {
            sync_inverse_normal(page, component, child, root_inst, root_master, changes);
        }
    }
}

/// Generate the pair pushing one page shape into its master. A missing
/// master means the shape is new on the instance side and must be
/// cloned into the component.
fn shape_to_component(
    shape: &Shape,
    component: &Component,
    root_inst: &Shape,
    root_master: &Shape,
    page: &Page,
) -> ChangeSet {
    let master = shape.shape_ref.as_ref().and_then(|shape_ref| component.objects.get(shape_ref));
    let Some(master) = master else {
        return add_shape_to_component(shape, component, page, root_inst, root_master);
    };

    let mut changes = update_attrs(
        master,
        shape,
        root_master,
        root_inst,
        None,
        Some(&component.id),
        SyncOptions { set_touched: true, ..Default::default() },
    );

    if !shape.touched.is_empty() {
        changes.append(mod_obj_pair(
            &shape.id,
            Some(&page.id),
            None,
            vec![Operation::SetTouched { touched: Default::default() }],
            vec![Operation::SetTouched { touched: shape.touched.clone() }],
        ));
    }
    changes
}

/// Inverse path for descendants of a nested component: match the master
/// counterpart inside the enclosing component and propagate the touched
/// flags instead of clearing them.
fn sync_inverse_nested(
    page: &Page,
    component: &Component,
    shape: &Shape,
    root_inst: &Shape,
    root_master: &Shape,
    changes: &mut ChangeSet,
) {
    let Some(master) =
        shape.shape_ref.as_ref().and_then(|shape_ref| component.objects.get(shape_ref))
    else {
        warn!(shape = %shape.name, "no master counterpart for nested shape");
        return;
    };

    let (root_inst, root_master) =
        if shape.is_instance_root() { (shape, master) } else { (root_inst, root_master) };

    changes.append(update_attrs(
        master,
        shape,
        root_master,
        root_inst,
        None,
        Some(&component.id),
        SyncOptions { copy_touched: true, ..Default::default() },
    ));

    for child_id in &shape.shapes {
        if let Some(child) = page.objects.get(child_id) {
            sync_inverse_nested(page, component, child, root_inst, root_master, changes);
        }
    }
}

/// Clone a new instance-side subtree into the component and re-point
/// the originals at their new masters
fn add_shape_to_component(
    shape: &Shape,
    component: &Component,
    page: &Page,
    root_inst: &Shape,
    root_master: &Shape,
) -> ChangeSet {
    let Some(inst_parent) =
        shape.parent_id.as_ref().and_then(|parent_id| page.objects.get(parent_id))
    else {
        warn!(shape = %shape.name, "new instance shape has no parent");
        return ChangeSet::new();
    };
    let Some(master_parent) = get_object_with_children(&root_master.id, &component.objects)
        .into_iter()
        .filter_map(|id| component.objects.get(&id))
        .find(|master| is_master_of(master, inst_parent))
    else {
        warn!(shape = %shape.name, "no master counterpart for instance parent");
        return ChangeSet::new();
    };

    let master_frame_id = master_parent.frame_id.clone();
    let (_, new_shapes, updated_originals) = clone_object(
        shape,
        Some(&master_parent.id),
        &page.objects,
        &mut |new_shape: Shape, _original: &Shape| {
            let mut new_shape = reposition_shape(new_shape, root_inst, root_master);
            new_shape.frame_id = master_frame_id.clone();
            new_shape
        },
        &mut |mut original: Shape, new_shape: &Shape| {
            original.shape_ref = Some(new_shape.id.clone());
            original
        },
    );

    let mut changes = ChangeSet::new();
    for new_shape in &new_shapes {
        changes.redo.push(Change::AddObj {
            id: new_shape.id.clone(),
            page_id: None,
            component_id: Some(component.id.clone()),
            parent_id: new_shape.parent_id.clone(),
            frame_id: new_shape.frame_id.clone(),
            index: None,
            obj: Box::new(new_shape.clone()),
        });
        changes.undo.push(Change::DelObj {
            id: new_shape.id.clone(),
            page_id: None,
            component_id: Some(component.id.clone()),
        });
    }
    for updated in &updated_originals {
        let old_ref = page
            .objects
            .get(&updated.id)
            .and_then(|original| original.shape_ref.clone())
            .map(AttrValue::ShapeRef)
            .unwrap_or(AttrValue::None);
        let new_ref =
            updated.shape_ref.clone().map(AttrValue::ShapeRef).unwrap_or(AttrValue::None);
        changes.redo.push(Change::ModObj {
            id: updated.id.clone(),
            page_id: Some(page.id.clone()),
            component_id: None,
            operations: vec![Operation::Set {
                attr: Attr::ShapeRef,
                val: new_ref,
                ignore_touched: true,
            }],
        });
        changes.undo.push(Change::ModObj {
            id: updated.id.clone(),
            page_id: Some(page.id.clone()),
            component_id: None,
            operations: vec![Operation::Set {
                attr: Attr::ShapeRef,
                val: old_ref,
                ignore_touched: true,
            }],
        });
    }
    changes
}
