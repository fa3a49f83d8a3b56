//! Scene loading from JSON files.
//!
//! The JSON layout mirrors [`Scene`] field by field. Vectors are written as
//! `[x, y, z]` arrays and tagged enums use snake_case names, e.g.
//! `{ "kind": "sphere", "entity": 0 }`.

use std::path::Path;

use thiserror::Error;

use crate::scene::Scene;

/// Errors that can occur while loading or validating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Load a JSON scene file.
///
/// The scene name defaults to the file stem when the file does not set one.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut scene = load_scene_from_str(&content)?;

    if scene.name.is_empty() {
        scene.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    log::info!(
        "Loaded scene '{}' from {}: {} nodes, {} materials, {} area lights",
        scene.name,
        path.display(),
        scene.nodes.len(),
        scene.materials.len(),
        scene.area_lights.len()
    );
    Ok(scene)
}

/// Parse a scene from a JSON string and validate its references.
pub fn load_scene_from_str(json: &str) -> SceneResult<Scene> {
    let scene: Scene = serde_json::from_str(json)?;
    scene.validate()?;
    Ok(scene)
}
