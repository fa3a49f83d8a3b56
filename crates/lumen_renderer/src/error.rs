//! Errors raised while turning a scene into a renderable world.

use lumen_core::{NodeKind, SceneError};
use thiserror::Error;

/// Errors that abort a render before any pixel is traced.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Node {node} references {kind:?} #{entity}, which does not exist")]
    MissingEntity {
        node: usize,
        kind: NodeKind,
        entity: usize,
    },

    #[error("Primitive of node {node} uses material #{material} but only {count} exist")]
    MissingMaterial {
        node: usize,
        material: usize,
        count: usize,
    },

    #[error("Area light #{0} has zero area")]
    DegenerateLight(usize),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for world construction and rendering.
pub type BuildResult<T> = Result<T, BuildError>;
