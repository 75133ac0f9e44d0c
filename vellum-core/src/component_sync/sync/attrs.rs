/*
    attrs.rs - Attribute updater

    Copies the syncable attribute set from an origin shape onto a dest
    shape, honoring the touched-group policy, and emits the resulting
    mod-obj pair. Positions are not copied verbatim: a shape's offset
    relative to its component root is re-anchored at the destination
    root.
*/

use crate::component_sync::changes::{mod_obj_pair, ChangeSet, Operation};
use crate::component_sync::model::{
    Attr, AttrValue, ComponentId, PageId, Shape, SyncGroup, COMPONENT_SYNC_ATTRS,
};

/// Touched-flag policy for one update_attrs invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Skip attributes whose group the dest shape has overridden
    pub omit_touched: bool,
    /// Clear dest's touched set in the redo, restore it in the undo
    pub reset_touched: bool,
    /// Emit sets with ignore_touched false, so applying them registers
    /// as overrides on the dest shape
    pub set_touched: bool,
    /// Replace dest's touched set with origin's in the redo, restore
    /// dest's in the undo
    pub copy_touched: bool,
}

/// Position of `origin` relative to its root, re-anchored at
/// `dest_root`
pub fn relative_position(origin: &Shape, origin_root: &Shape, dest_root: &Shape) -> (f64, f64) {
    (origin.x - origin_root.x + dest_root.x, origin.y - origin_root.y + dest_root.y)
}

/// Move a shape into the destination root's coordinate space. Used when
/// cloning subtrees across the instance/master boundary.
pub fn reposition_shape(mut shape: Shape, origin_root: &Shape, dest_root: &Shape) -> Shape {
    shape.x += dest_root.x - origin_root.x;
    shape.y += dest_root.y - origin_root.y;
    shape
}

/// Produce the mod-obj pair that copies the syncable attributes of
/// `origin` onto `dest`.
///
/// Positional attributes go first when the re-anchored position differs
/// from dest's current one; the rest of the table is copied value by
/// value, skipping attributes that are equal, absent on dest, or
/// touched (when `omit_touched` is set). Collapses to the empty set
/// when nothing effective remains.
pub fn update_attrs(
    dest: &Shape,
    origin: &Shape,
    dest_root: &Shape,
    origin_root: &Shape,
    page_id: Option<&PageId>,
    component_id: Option<&ComponentId>,
    options: SyncOptions,
) -> ChangeSet {
    let ignore_touched = !options.set_touched;
    let mut redo_ops = Vec::new();
    let mut undo_ops = Vec::new();

    let (new_x, new_y) = relative_position(origin, origin_root, dest_root);
    let position_touched =
        options.omit_touched && dest.is_touched(SyncGroup::GeometryGroup);
    if (new_x != dest.x || new_y != dest.y) && !position_touched {
        redo_ops.push(Operation::Set {
            attr: Attr::X,
            val: AttrValue::Num(new_x),
            ignore_touched,
        });
        undo_ops.push(Operation::Set {
            attr: Attr::X,
            val: AttrValue::Num(dest.x),
            ignore_touched,
        });
        redo_ops.push(Operation::Set {
            attr: Attr::Y,
            val: AttrValue::Num(new_y),
            ignore_touched,
        });
        undo_ops.push(Operation::Set {
            attr: Attr::Y,
            val: AttrValue::Num(dest.y),
            ignore_touched,
        });
    }

    for (attr, group) in COMPONENT_SYNC_ATTRS {
        if matches!(attr, Attr::X | Attr::Y) {
            continue;
        }
        let dest_val = dest.get_attr(*attr);
        if dest_val.is_none() {
            continue;
        }
        let origin_val = origin.get_attr(*attr);
        if origin_val == dest_val {
            continue;
        }
        if options.omit_touched && dest.is_touched(*group) {
            tracing::trace!(shape = %dest.name, ?attr, "attribute override kept");
            continue;
        }
        redo_ops.push(Operation::Set { attr: *attr, val: origin_val, ignore_touched });
        undo_ops.push(Operation::Set { attr: *attr, val: dest_val, ignore_touched });
    }

    if options.reset_touched && !dest.touched.is_empty() {
        redo_ops.push(Operation::SetTouched { touched: Default::default() });
        undo_ops.push(Operation::SetTouched { touched: dest.touched.clone() });
    }

    if options.copy_touched && origin.touched != dest.touched {
        redo_ops.push(Operation::SetTouched { touched: origin.touched.clone() });
        undo_ops.push(Operation::SetTouched { touched: dest.touched.clone() });
    }

    mod_obj_pair(&dest.id, page_id, component_id, redo_ops, undo_ops)
}
