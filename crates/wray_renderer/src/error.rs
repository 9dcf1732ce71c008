//! Errors reported when a world is not ready to render.

use thiserror::Error;

/// Configuration problems that make a world unrenderable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("World doesn't have a camera")]
    MissingCamera,

    #[error("World doesn't have a ray tracer")]
    MissingTracer,

    #[error("View plane has no pixels ({hres}x{vres})")]
    EmptyViewPlane { hres: u32, vres: u32 },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, WorldError>;
