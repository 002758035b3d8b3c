use std::path::{Path, PathBuf};

use dialectic_core::{ContentHash, DialecticError, DialecticResult, Duration, RenderConfig};
use dialectic_ir::Scene;
use uuid::Uuid;

/// Output parameters passed to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Directory the engine writes into.
    pub output_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
            output_dir: PathBuf::from("media"),
        }
    }
}

impl RenderSettings {
    pub fn from_config(config: &RenderConfig) -> DialecticResult<Self> {
        let (width, height) = config.dimensions()?;
        Ok(Self {
            width,
            height,
            fps: config.fps as f64,
            output_dir: config.output_dir.clone(),
        })
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn validate(&self) -> DialecticResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DialecticError::validation(
                "render.resolution",
                format!("must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        if !(self.fps > 0.0 && self.fps.is_finite()) {
            return Err(DialecticError::validation(
                "render.fps",
                format!("must be positive, got {}", self.fps),
            ));
        }
        Ok(())
    }

    /// Where the plan for `scene` is written.
    pub fn manifest_path(&self, scene: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", scene))
    }
}

/// What an engine produced for one scene.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Identifies this render run in logs.
    pub job_id: Uuid,
    pub scene: String,
    /// Files written, manifest first.
    pub outputs: Vec<PathBuf>,
    pub step_count: usize,
    /// Total scheduled time of the scene.
    pub duration: Duration,
    /// SHA-256 of the serialized plan.
    pub plan_hash: ContentHash,
}

impl RenderResult {
    /// Deterministic hash of the scene plan; equal plans hash equal.
    pub fn content_hash(&self) -> ContentHash {
        self.plan_hash.clone()
    }

    pub fn frame_count(&self, fps: f64) -> u64 {
        self.duration.frame_count(fps)
    }

    pub fn primary_output(&self) -> Option<&Path> {
        self.outputs.first().map(PathBuf::as_path)
    }
}

/// An external collaborator that turns a scene plan into media.
pub trait AnimationEngine {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &str;

    /// Render one scene. Any failure aborts the scene.
    fn render(&self, scene: &Scene, settings: &RenderSettings) -> DialecticResult<RenderResult>;
}
