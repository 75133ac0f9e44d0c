/*
    container.rs - Pages, components, and tree accessors

    A container is a page or a component viewed as an objects map with a
    single root. Shapes refer to parents and children by id only, so the
    whole tree is walked by map lookup; cycles are forbidden by the model
    invariants.
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::shape::{Shape, ShapeType};
use super::types::{ComponentId, PageId, ShapeId};

/// A page of a file: a tree of shapes drawn by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub objects: BTreeMap<ShapeId, Shape>,
}

impl Page {
    pub fn new(name: &str) -> Self {
        Page { id: PageId::generate(), name: name.to_string(), objects: BTreeMap::new() }
    }
}

/// A component of a library: a named master subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub objects: BTreeMap<ShapeId, Shape>,
}

impl Component {
    /// The single root shape of the component
    pub fn root(&self) -> Option<&Shape> {
        container_root(&self.objects)
    }
}

/// Borrowed view unifying pages and components for the reconciler.
/// Also records which of page-id / component-id emitted changes must
/// target.
#[derive(Debug, Clone, Copy)]
pub enum Container<'a> {
    Page(&'a Page),
    Component(&'a Component),
}

impl<'a> Container<'a> {
    pub fn objects(&self) -> &'a BTreeMap<ShapeId, Shape> {
        match self {
            Container::Page(page) => &page.objects,
            Container::Component(component) => &component.objects,
        }
    }

    pub fn get_shape(&self, id: &ShapeId) -> Option<&'a Shape> {
        self.objects().get(id)
    }

    pub fn root(&self) -> Option<&'a Shape> {
        container_root(self.objects())
    }

    pub fn page_id(&self) -> Option<&'a PageId> {
        match self {
            Container::Page(page) => Some(&page.id),
            Container::Component(_) => None,
        }
    }

    pub fn component_id(&self) -> Option<&'a ComponentId> {
        match self {
            Container::Page(_) => None,
            Container::Component(component) => Some(&component.id),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Container::Page(page) => &page.name,
            Container::Component(component) => &component.name,
        }
    }
}

/// The shape with no parent. Exactly one exists in a well-formed
/// container.
pub fn container_root(objects: &BTreeMap<ShapeId, Shape>) -> Option<&Shape> {
    objects.values().find(|shape| shape.parent_id.is_none())
}

/// Direct children of a shape, in z-order
pub fn get_children<'a>(id: &ShapeId, objects: &'a BTreeMap<ShapeId, Shape>) -> Vec<&'a Shape> {
    match objects.get(id) {
        Some(shape) => shape.shapes.iter().filter_map(|child| objects.get(child)).collect(),
        None => Vec::new(),
    }
}

/// Ancestors of a shape, nearest first
pub fn get_parents(id: &ShapeId, objects: &BTreeMap<ShapeId, Shape>) -> Vec<ShapeId> {
    let mut parents = Vec::new();
    let mut current = objects.get(id).and_then(|shape| shape.parent_id.clone());
    while let Some(parent_id) = current {
        current = objects.get(&parent_id).and_then(|shape| shape.parent_id.clone());
        parents.push(parent_id);
    }
    parents
}

/// Zero-based position of a shape within its parent's child list
pub fn position_on_parent(id: &ShapeId, objects: &BTreeMap<ShapeId, Shape>) -> usize {
    objects
        .get(id)
        .and_then(|shape| shape.parent_id.as_ref())
        .and_then(|parent_id| objects.get(parent_id))
        .and_then(|parent| parent.shapes.iter().position(|child| child == id))
        .unwrap_or(0)
}

/// Ids of a subtree in order of increasing depth, root first
pub fn get_object_with_children(id: &ShapeId, objects: &BTreeMap<ShapeId, Shape>) -> Vec<ShapeId> {
    let mut result = Vec::new();
    let mut pending = vec![id.clone()];
    while !pending.is_empty() {
        let mut next = Vec::new();
        for current in pending {
            if let Some(shape) = objects.get(&current) {
                next.extend(shape.shapes.iter().cloned());
                result.push(current);
            }
        }
        pending = next;
    }
    result
}

/// Deep clone of the subtree rooted at `root`, with fresh ids, attached
/// under `new_parent_id`.
///
/// `transform_new` is applied to every cloned shape (receiving the
/// original it was cloned from); `transform_original` is applied to a
/// copy of every original shape (receiving its clone) and the results
/// are collected so callers can record follow-up edits to the source
/// tree.
///
/// Returns `(new_root, new_shapes, updated_originals)`; `new_shapes` is
/// ordered parents-first so it can be turned into add-obj records
/// directly.
pub fn clone_object<FN, FO>(
    root: &Shape,
    new_parent_id: Option<&ShapeId>,
    objects: &BTreeMap<ShapeId, Shape>,
    transform_new: &mut FN,
    transform_original: &mut FO,
) -> (Shape, Vec<Shape>, Vec<Shape>)
where
    FN: FnMut(Shape, &Shape) -> Shape,
    FO: FnMut(Shape, &Shape) -> Shape,
{
    let mut new_shapes = Vec::new();
    let mut updated_originals = Vec::new();
    let root_index = clone_rec(
        root,
        new_parent_id.cloned(),
        objects,
        transform_new,
        transform_original,
        &mut new_shapes,
        &mut updated_originals,
    );
    let new_root = new_shapes[root_index].clone();
    (new_root, new_shapes, updated_originals)
}

fn clone_rec<FN, FO>(
    original: &Shape,
    new_parent_id: Option<ShapeId>,
    objects: &BTreeMap<ShapeId, Shape>,
    transform_new: &mut FN,
    transform_original: &mut FO,
    new_shapes: &mut Vec<Shape>,
    updated_originals: &mut Vec<Shape>,
) -> usize
where
    FN: FnMut(Shape, &Shape) -> Shape,
    FO: FnMut(Shape, &Shape) -> Shape,
{
    let mut new_shape = original.clone();
    new_shape.id = ShapeId::generate();
    new_shape.parent_id = new_parent_id;
    new_shape.shapes = Vec::new();
    let new_shape = transform_new(new_shape, original);

    updated_originals.push(transform_original(original.clone(), &new_shape));

    let index = new_shapes.len();
    let new_id = new_shape.id.clone();
    new_shapes.push(new_shape);

    let mut child_ids = Vec::new();
    for child_id in &original.shapes {
        if let Some(child) = objects.get(child_id) {
            let child_index = clone_rec(
                child,
                Some(new_id.clone()),
                objects,
                transform_new,
                transform_original,
                new_shapes,
                updated_originals,
            );
            child_ids.push(new_shapes[child_index].id.clone());
        }
    }
    new_shapes[index].shapes = child_ids;
    index
}

/// Promote the subtree rooted at `root_id` into a master component.
///
/// The component receives clones of the subtree (fresh ids, detached
/// root); the returned originals carry shape_ref pointers at their
/// clones plus component linkage on the root, ready to become the first
/// instance.
pub fn make_component(
    name: &str,
    root_id: &ShapeId,
    objects: &BTreeMap<ShapeId, Shape>,
) -> Option<(Component, Vec<Shape>)> {
    let root = objects.get(root_id)?;
    let component_id = ComponentId::generate();
    let root_is_frame = root.shape_type == ShapeType::Frame;

    let mut new_root_id: Option<ShapeId> = None;
    let (_, new_shapes, mut updated_originals) = clone_object(
        root,
        None,
        objects,
        &mut |mut new_shape: Shape, _original: &Shape| {
            // Nested instances keep their component linkage and
            // shape_ref; the master's copy still mirrors the inner
            // component. Frames of the source page do not exist inside
            // the component, so frame ids are remapped to the new root.
            new_shape.frame_id = match &new_root_id {
                None => None,
                Some(id) if root_is_frame => Some(id.clone()),
                Some(_) => None,
            };
            if new_root_id.is_none() {
                new_root_id = Some(new_shape.id.clone());
            }
            new_shape
        },
        &mut |mut original: Shape, new_shape: &Shape| {
            original.shape_ref = Some(new_shape.id.clone());
            original
        },
    );

    if let Some(instance_root) = updated_originals.first_mut() {
        instance_root.component_id = Some(component_id.clone());
        instance_root.component_file = None;
        instance_root.component_root = true;
    }

    let component = Component {
        id: component_id,
        name: name.to_string(),
        objects: new_shapes.into_iter().map(|shape| (shape.id.clone(), shape)).collect(),
    };
    Some((component, updated_originals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_tree() -> (BTreeMap<ShapeId, Shape>, ShapeId, ShapeId, ShapeId) {
        let mut objects = BTreeMap::new();
        let mut root = Shape::new("root", ShapeType::Frame);
        let mut group = Shape::new("group", ShapeType::Group);
        let mut leaf = Shape::new("leaf", ShapeType::Rect);

        group.parent_id = Some(root.id.clone());
        group.frame_id = Some(root.id.clone());
        leaf.parent_id = Some(group.id.clone());
        leaf.frame_id = Some(root.id.clone());
        root.shapes = vec![group.id.clone()];
        group.shapes = vec![leaf.id.clone()];

        let (root_id, group_id, leaf_id) = (root.id.clone(), group.id.clone(), leaf.id.clone());
        objects.insert(root.id.clone(), root);
        objects.insert(group.id.clone(), group);
        objects.insert(leaf.id.clone(), leaf);
        (objects, root_id, group_id, leaf_id)
    }

    #[test]
    fn test_container_root() {
        let (objects, root_id, _, _) = build_tree();
        assert_eq!(container_root(&objects).map(|shape| shape.id.clone()), Some(root_id));
    }

    #[test]
    fn test_get_parents_nearest_first() {
        let (objects, root_id, group_id, leaf_id) = build_tree();
        assert_eq!(get_parents(&leaf_id, &objects), vec![group_id, root_id]);
    }

    #[test]
    fn test_position_on_parent() {
        let (objects, _, group_id, leaf_id) = build_tree();
        assert_eq!(position_on_parent(&leaf_id, &objects), 0);
        assert_eq!(position_on_parent(&group_id, &objects), 0);
    }

    #[test]
    fn test_subtree_in_depth_order() {
        let (objects, root_id, group_id, leaf_id) = build_tree();
        assert_eq!(get_object_with_children(&root_id, &objects), vec![root_id, group_id, leaf_id]);
    }

    #[test]
    fn test_clone_object_fresh_ids_and_topology() {
        let (objects, _, group_id, _) = build_tree();
        let group = objects.get(&group_id).unwrap();
        let target_parent = ShapeId::generate();

        let (new_root, new_shapes, originals) = clone_object(
            group,
            Some(&target_parent),
            &objects,
            &mut |shape, _| shape,
            &mut |shape, _| shape,
        );

        assert_eq!(new_shapes.len(), 2);
        assert_eq!(originals.len(), 2);
        assert_eq!(new_root.parent_id, Some(target_parent));
        assert_ne!(new_root.id, group_id);
        // Parent-first ordering, children re-linked to the clone
        assert_eq!(new_shapes[0].id, new_root.id);
        assert_eq!(new_shapes[1].parent_id, Some(new_root.id.clone()));
        assert_eq!(new_root.shapes, vec![new_shapes[1].id.clone()]);
    }

    #[test]
    fn test_make_component_links_originals() {
        let (objects, _, group_id, _) = build_tree();
        let (component, originals) = make_component("button", &group_id, &objects).unwrap();

        assert_eq!(component.objects.len(), 2);
        let master_root = component.root().unwrap();
        assert!(master_root.shape_ref.is_none());

        let instance_root = &originals[0];
        assert_eq!(instance_root.component_id, Some(component.id.clone()));
        assert!(instance_root.component_root);
        assert_eq!(instance_root.shape_ref, Some(master_root.id.clone()));
    }
}
