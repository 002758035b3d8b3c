use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use dialectic_core::hash::hash_json;
use dialectic_core::{DialecticError, DialecticResult};
use dialectic_ir::Scene;

use crate::engine::{AnimationEngine, RenderResult, RenderSettings};

/// Version of the manifest layout, bumped on incompatible changes.
pub const MANIFEST_VERSION: u32 = 1;

/// The document handed to an external renderer: the resolved scene plus
/// the output parameters it should honour.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_seconds: f64,
    pub frame_count: u64,
    pub scene: &'a Scene,
}

impl<'a> Manifest<'a> {
    pub fn new(scene: &'a Scene, settings: &RenderSettings) -> Self {
        Self {
            version: MANIFEST_VERSION,
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
            duration_seconds: scene.duration().as_seconds(),
            frame_count: scene.frame_count(settings.fps),
            scene,
        }
    }

    pub fn to_json(&self) -> DialecticResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to the settings' manifest path, creating the directory if needed.
    pub fn write(&self, settings: &RenderSettings) -> DialecticResult<PathBuf> {
        check_file_stem(&self.scene.name)?;
        std::fs::create_dir_all(&settings.output_dir)?;
        let path = settings.manifest_path(&self.scene.name);
        std::fs::write(&path, self.to_json()?)?;
        tracing::debug!("Wrote manifest {}", path.display());
        Ok(path)
    }
}

/// Scene names become file names; keep them to a portable character set.
fn check_file_stem(name: &str) -> DialecticResult<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(DialecticError::validation(
            "scene.name",
            format!("{:?} cannot be used as a file name", name),
        ))
    }
}

/// Engine that writes the plan and stops there. Used for dry runs and by
/// renderers that pick manifests up on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestEngine;

impl ManifestEngine {
    pub fn new() -> Self {
        Self
    }
}

impl AnimationEngine for ManifestEngine {
    fn name(&self) -> &str {
        "manifest"
    }

    fn render(&self, scene: &Scene, settings: &RenderSettings) -> DialecticResult<RenderResult> {
        let path = Manifest::new(scene, settings).write(settings)?;
        Ok(RenderResult {
            job_id: Uuid::new_v4(),
            scene: scene.name.clone(),
            outputs: vec![path],
            step_count: scene.steps.len(),
            duration: scene.duration(),
            plan_hash: hash_json(scene)?,
        })
    }
}
