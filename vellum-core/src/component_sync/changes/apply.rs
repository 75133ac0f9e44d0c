/*
    apply.rs - In-memory application of change records

    Interprets change records against a file snapshot. The engine itself
    never calls this while generating; it exists for hosts that keep
    their working copy in memory and for the round-trip guarantees of
    the change pairs (applying redo then undo must restore the input).

    Del-obj on an id that is already gone is a no-op: undo lists carry
    one del-obj per cloned shape for symmetry, and deleting the subtree
    root removes the rest.
*/

use std::collections::BTreeMap;

use crate::component_sync::error::{ApplyError, ApplyResult};
use crate::component_sync::model::{
    attr_group, get_object_with_children, ComponentId, FileData, PageId, Shape, ShapeId,
};

use super::change::{Change, Operation};

/// Apply a list of change records to a file, in order
pub fn apply_changes(data: &mut FileData, changes: &[Change]) -> ApplyResult<()> {
    for change in changes {
        apply_change(data, change)?;
    }
    Ok(())
}

fn apply_change(data: &mut FileData, change: &Change) -> ApplyResult<()> {
    match change {
        Change::AddObj { id, page_id, component_id, parent_id, frame_id, index, obj } => {
            let objects = target_objects(data, page_id, component_id)?;
            let mut shape = (**obj).clone();
            shape.id = id.clone();
            shape.parent_id = parent_id.clone();
            shape.frame_id = frame_id.clone();
            objects.insert(id.clone(), shape);

            if let Some(parent_id) = parent_id {
                let parent =
                    objects.get_mut(parent_id).ok_or_else(|| ApplyError::ShapeNotFound(parent_id.clone()))?;
                if !parent.shapes.contains(id) {
                    let position = index.unwrap_or(parent.shapes.len()).min(parent.shapes.len());
                    parent.shapes.insert(position, id.clone());
                }
            }
            Ok(())
        }

        Change::DelObj { id, page_id, component_id } => {
            let objects = target_objects(data, page_id, component_id)?;
            if !objects.contains_key(id) {
                tracing::debug!(shape = %id, "del-obj target already gone");
                return Ok(());
            }
            detach_from_parent(objects, id);
            for subtree_id in get_object_with_children(id, objects) {
                objects.remove(&subtree_id);
            }
            Ok(())
        }

        Change::ModObj { id, page_id, component_id, operations } => {
            let objects = target_objects(data, page_id, component_id)?;
            let shape =
                objects.get_mut(id).ok_or_else(|| ApplyError::ShapeNotFound(id.clone()))?;
            for operation in operations {
                match operation {
                    Operation::Set { attr, val, ignore_touched } => {
                        shape.set_attr(*attr, val.clone());
                        if !ignore_touched {
                            if let Some(group) = attr_group(*attr) {
                                shape.touched.insert(group);
                            }
                        }
                    }
                    Operation::SetTouched { touched } => {
                        shape.touched = touched.clone();
                    }
                }
            }
            Ok(())
        }

        Change::MovObjects { parent_id, shapes, index, page_id, component_id } => {
            let objects = target_objects(data, page_id, component_id)?;
            for id in shapes {
                if !objects.contains_key(id) {
                    return Err(ApplyError::ShapeNotFound(id.clone()));
                }
                detach_from_parent(objects, id);
            }
            let parent = objects
                .get_mut(parent_id)
                .ok_or_else(|| ApplyError::ShapeNotFound(parent_id.clone()))?;
            let mut position = (*index).min(parent.shapes.len());
            for id in shapes {
                parent.shapes.insert(position, id.clone());
                position += 1;
            }
            let parent_id = parent_id.clone();
            for id in shapes {
                if let Some(shape) = objects.get_mut(id) {
                    shape.parent_id = Some(parent_id.clone());
                }
            }
            Ok(())
        }

        // Parent-cache refresh is a host concern; the pure model has
        // nothing to recompute.
        Change::RegObjects { .. } => Ok(()),
    }
}

fn target_objects<'a>(
    data: &'a mut FileData,
    page_id: &Option<PageId>,
    component_id: &Option<ComponentId>,
) -> ApplyResult<&'a mut BTreeMap<ShapeId, Shape>> {
    match (page_id, component_id) {
        (Some(page_id), None) => data
            .pages_index
            .get_mut(page_id)
            .map(|page| &mut page.objects)
            .ok_or_else(|| ApplyError::PageNotFound(page_id.clone())),
        (None, Some(component_id)) => data
            .components
            .get_mut(component_id)
            .map(|component| &mut component.objects)
            .ok_or_else(|| ApplyError::ComponentNotFound(component_id.clone())),
        _ => Err(ApplyError::MissingContainer),
    }
}

fn detach_from_parent(objects: &mut BTreeMap<ShapeId, Shape>, id: &ShapeId) {
    let parent_id = objects.get(id).and_then(|shape| shape.parent_id.clone());
    if let Some(parent_id) = parent_id {
        if let Some(parent) = objects.get_mut(&parent_id) {
            parent.shapes.retain(|child| child != id);
        }
    }
}
