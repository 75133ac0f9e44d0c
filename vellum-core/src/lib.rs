pub mod component_sync;
pub mod logging;

pub use component_sync::changes::{Change, ChangeSet, Operation};
pub use component_sync::model::{
    AssetKind, ComponentId, FileId, PageId, Shape, ShapeId, SyncGroup, WorkspaceSnapshot,
};
pub use component_sync::sync::{
    generate_sync_file, generate_sync_library, generate_sync_shape_inverse,
    sync_shape_and_children,
};
pub use logging::{init_logging, LogLevel};
