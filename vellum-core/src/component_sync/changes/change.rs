/*
    change.rs - Invertible change records

    The engine never mutates its inputs; it emits change records the
    host serializes, transports, and applies. Every generator returns a
    ChangeSet: a redo list and an undo list with positional inverse
    pairing, so applying redo then undo restores the prior state.

    Exactly one of page_id / component_id is set on each record, naming
    the container the change applies to.
*/

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::component_sync::model::{
    Attr, AttrValue, ComponentId, PageId, Shape, ShapeId, SyncGroup,
};

/// An operation inside a mod-obj record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    /// Assign one attribute. With ignore_touched false the assignment
    /// registers as a user override: applying it marks the attribute's
    /// group as touched on the target shape.
    Set { attr: Attr, val: AttrValue, ignore_touched: bool },
    /// Replace the whole touched set
    SetTouched { touched: BTreeSet<SyncGroup> },
}

/// A single change record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Change {
    AddObj {
        id: ShapeId,
        page_id: Option<PageId>,
        component_id: Option<ComponentId>,
        parent_id: Option<ShapeId>,
        frame_id: Option<ShapeId>,
        index: Option<usize>,
        obj: Box<Shape>,
    },
    /// Deletes the shape and its whole subtree
    DelObj {
        id: ShapeId,
        page_id: Option<PageId>,
        component_id: Option<ComponentId>,
    },
    ModObj {
        id: ShapeId,
        page_id: Option<PageId>,
        component_id: Option<ComponentId>,
        operations: Vec<Operation>,
    },
    MovObjects {
        parent_id: ShapeId,
        shapes: Vec<ShapeId>,
        index: usize,
        page_id: Option<PageId>,
        component_id: Option<ComponentId>,
    },
    /// Ask the host to refresh cached geometry of the listed shapes
    RegObjects {
        page_id: Option<PageId>,
        component_id: Option<ComponentId>,
        shapes: Vec<ShapeId>,
    },
}

/// A (redo, undo) pair of change lists with positional inverse pairing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub redo: Vec<Change>,
    pub undo: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        ChangeSet { redo: Vec::new(), undo: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.redo.is_empty() && self.undo.is_empty()
    }

    /// Append another set, preserving order on both sides
    pub fn append(&mut self, mut other: ChangeSet) {
        self.redo.append(&mut other.redo);
        self.undo.append(&mut other.undo);
    }

    /// Concatenate a sequence of sets in order
    pub fn concat<I>(sets: I) -> ChangeSet
    where
        I: IntoIterator<Item = ChangeSet>,
    {
        let mut result = ChangeSet::new();
        for set in sets {
            result.append(set);
        }
        result
    }
}

/// A mod-obj pair for one shape: paired redo/undo operation lists on the
/// same target. Empty operation lists collapse to the empty set.
pub fn mod_obj_pair(
    id: &ShapeId,
    page_id: Option<&PageId>,
    component_id: Option<&ComponentId>,
    redo_ops: Vec<Operation>,
    undo_ops: Vec<Operation>,
) -> ChangeSet {
    if redo_ops.is_empty() && undo_ops.is_empty() {
        return ChangeSet::new();
    }
    ChangeSet {
        redo: vec![Change::ModObj {
            id: id.clone(),
            page_id: page_id.cloned(),
            component_id: component_id.cloned(),
            operations: redo_ops,
        }],
        undo: vec![Change::ModObj {
            id: id.clone(),
            page_id: page_id.cloned(),
            component_id: component_id.cloned(),
            operations: undo_ops,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_change_set() {
        assert!(ChangeSet::new().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let id = ShapeId::generate();
        let page_id = PageId::generate();
        let first = mod_obj_pair(
            &id,
            Some(&page_id),
            None,
            vec![Operation::Set {
                attr: Attr::X,
                val: AttrValue::Num(1.0),
                ignore_touched: true,
            }],
            vec![Operation::Set {
                attr: Attr::X,
                val: AttrValue::Num(0.0),
                ignore_touched: true,
            }],
        );
        let second = ChangeSet {
            redo: vec![Change::DelObj { id: id.clone(), page_id: Some(page_id.clone()), component_id: None }],
            undo: vec![Change::DelObj { id: id.clone(), page_id: Some(page_id.clone()), component_id: None }],
        };

        let combined = ChangeSet::concat(vec![first.clone(), second]);
        assert_eq!(combined.redo.len(), 2);
        assert_eq!(combined.undo.len(), 2);
        assert_eq!(combined.redo[0], first.redo[0]);
    }

    #[test]
    fn test_mod_obj_pair_collapses_when_empty() {
        let id = ShapeId::generate();
        let page_id = PageId::generate();
        assert!(mod_obj_pair(&id, Some(&page_id), None, vec![], vec![]).is_empty());
    }
}
