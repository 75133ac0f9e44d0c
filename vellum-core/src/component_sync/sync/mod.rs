/*
    Sync subsystem - forward and inverse component synchronization

    Drivers select the shapes referencing a library asset; the
    reconciler and attribute updater turn each of them into invertible
    change pairs.
*/

pub mod attrs;
pub mod forward;
pub mod inverse;
pub mod reconcile;
pub mod refs;

pub use attrs::{relative_position, reposition_shape, update_attrs, SyncOptions};
pub use forward::{generate_sync_file, generate_sync_library};
pub use inverse::generate_sync_shape_inverse;
pub use reconcile::{compare_children, sync_shape_and_children, ChildAction};
pub use refs::uses_asset;
