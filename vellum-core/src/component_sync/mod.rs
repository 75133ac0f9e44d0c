/*
    component_sync - Component-library synchronization engine

    The pure core that keeps instances of a reusable component in sync
    with their master definition. Handles:
    - Data model (shapes, pages, components, library assets)
    - Forward sync (library -> instances, preserving user overrides)
    - Inverse sync (instance -> master, clearing/propagating overrides)
    - Invertible change records with positional redo/undo pairing
    - In-memory application of change records

    Every entry point takes an immutable workspace snapshot and returns a
    (redo, undo) change pair; nothing is applied or persisted here.
*/

pub mod changes;
pub mod error;
pub mod model;
pub mod sync;

#[cfg(test)]
pub mod tests;

// Re-export commonly used types
pub use changes::{apply_changes, Change, ChangeSet, Operation};
pub use error::{ApplyError, ApplyResult};
pub use model::{
    AssetKind, ColorId, ComponentId, Container, FileId, MediaId, PageId, Shape, ShapeId,
    SyncGroup, TypographyId, WorkspaceSnapshot,
};
pub use sync::{
    generate_sync_file, generate_sync_library, generate_sync_shape_inverse,
    sync_shape_and_children, SyncOptions,
};
