// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene file export and import.
//!
//! This module writes a single snapshot to, and reads it back from, YAML
//! and JSON files. Files use the same at-rest layout as the session store.

use crate::models::scene::SceneSnapshot;
use anyhow::{Context, Result};
use std::path::Path;

/// Scene file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Json,
    Yaml,
}

impl SceneFormat {
    /// Pick a format from the file extension, if it is one we know.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Some(SceneFormat::Yaml),
            Some("json") => Some(SceneFormat::Json),
            _ => None,
        }
    }
}

/// Export a scene to YAML format.
pub fn export_yaml(scene: &SceneSnapshot, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(scene)?;
    std::fs::write(path, yaml).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Export a scene to JSON format.
pub fn export_json(scene: &SceneSnapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(scene)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Import a scene from YAML format.
pub fn import_yaml(path: &Path) -> Result<SceneSnapshot> {
    let yaml = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let scene = serde_yaml::from_str(&yaml)?;
    Ok(scene)
}

/// Import a scene from JSON format.
pub fn import_json(path: &Path) -> Result<SceneSnapshot> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let scene = serde_json::from_str(&json)?;
    Ok(scene)
}

/// Export using the format implied by the extension.
pub fn export_scene(scene: &SceneSnapshot, path: &Path) -> Result<()> {
    match SceneFormat::from_path(path) {
        Some(SceneFormat::Yaml) => export_yaml(scene, path),
        Some(SceneFormat::Json) => export_json(scene, path),
        None => anyhow::bail!("Unsupported file extension: {}", path.display()),
    }
}

/// Import using the format implied by the extension.
pub fn import_scene(path: &Path) -> Result<SceneSnapshot> {
    match SceneFormat::from_path(path) {
        Some(SceneFormat::Yaml) => import_yaml(path),
        Some(SceneFormat::Json) => import_json(path),
        None => anyhow::bail!("Unsupported file extension: {}", path.display()),
    }
}
