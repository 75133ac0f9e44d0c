/*
    error.rs - Error types for change application

    The generators never fail: they return a valid change pair or the
    empty pair. Applying change records to a snapshot can fail, though,
    when a record targets something the snapshot does not contain.
*/

use thiserror::Error;

use super::model::{ComponentId, PageId, ShapeId};

/// Errors that can occur while applying change records
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The change targets a page the file does not contain
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    /// The change targets a component the file does not contain
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),

    /// The change targets a shape the container does not contain
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),

    /// The change names neither a page nor a component, or both
    #[error("Change names no container")]
    MissingContainer,
}

/// Result type for change application
pub type ApplyResult<T> = Result<T, ApplyError>;
