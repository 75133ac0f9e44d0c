/*
    Change records - invertible edits emitted by the sync engine

    Change generation and in-memory application. Generators only build
    records; hosts decide when (and whether) to apply them.
*/

pub mod apply;
pub mod change;

pub use apply::apply_changes;
pub use change::{mod_obj_pair, Change, ChangeSet, Operation};
