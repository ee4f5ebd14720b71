pub mod completion;
pub mod config;
pub mod render;
pub mod route;

use anyhow::{Context, Result};
use std::path::Path;

use orthoroute::scene::Scene;

use crate::config::{Config, parse_margin};

/// Read a scene file, picking the parser from its extension.
///
/// A `--margin` override wins over the scene's own margin, which wins over the configured
/// default.
fn load_scene(path: &Path, margin: Option<&str>, config: &Config) -> Result<Scene> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut scene = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Scene::from_json_str(&contents),
        _ => Scene::from_yaml_str(&contents),
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    if let Some(margin) = margin {
        scene.margin = Some(parse_margin(margin)?);
    } else if scene.margin.is_none() {
        scene.margin = config.margin()?;
    }
    Ok(scene)
}
