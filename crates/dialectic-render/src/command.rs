use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use uuid::Uuid;

use dialectic_core::hash::hash_json;
use dialectic_core::{CommandConfig, DialecticError, DialecticResult};
use dialectic_ir::Scene;

use crate::engine::{AnimationEngine, RenderResult, RenderSettings};
use crate::manifest::Manifest;

/// Engine that writes the manifest and then shells out to an external
/// renderer, e.g. a Manim driver that reads the plan.
///
/// Arguments are templates; these placeholders are substituted per scene:
/// `{manifest}`, `{scene}`, `{output_dir}`, `{width}`, `{height}`, `{fps}`.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CommandConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the program can be found, either as a path or on `PATH`.
    pub fn is_available(&self) -> bool {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file();
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
            .unwrap_or(false)
    }

    /// Arguments for one scene with every placeholder filled in.
    pub fn expand_args(&self, scene: &str, manifest: &Path, settings: &RenderSettings) -> Vec<String> {
        let vars = [
            ("{manifest}", manifest.display().to_string()),
            ("{scene}", scene.to_string()),
            ("{output_dir}", settings.output_dir.display().to_string()),
            ("{width}", settings.width.to_string()),
            ("{height}", settings.height.to_string()),
            ("{fps}", settings.fps.to_string()),
        ];
        self.args
            .iter()
            .map(|arg| {
                vars.iter()
                    .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
            })
            .collect()
    }
}

impl AnimationEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    fn render(&self, scene: &Scene, settings: &RenderSettings) -> DialecticResult<RenderResult> {
        if !self.is_available() {
            return Err(DialecticError::Render(format!(
                "renderer '{}' not found in PATH",
                self.program
            )));
        }

        let manifest = Manifest::new(scene, settings).write(settings)?;
        let args = self.expand_args(&scene.name, &manifest, settings);
        tracing::debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                DialecticError::Render(format!("failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DialecticError::Render(format!(
                "{} failed with status {}: {}",
                self.program, output.status, stderr
            )));
        }

        // Renderers report the files they wrote one per line on stdout.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut outputs = vec![manifest];
        outputs.extend(
            stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from)
                .filter(|path| path.is_file()),
        );

        tracing::info!(
            "{} rendered scene '{}' ({} files)",
            self.program,
            scene.name,
            outputs.len()
        );

        Ok(RenderResult {
            job_id: Uuid::new_v4(),
            scene: scene.name.clone(),
            outputs,
            step_count: scene.steps.len(),
            duration: scene.duration(),
            plan_hash: hash_json(scene)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_args() {
        let engine = CommandEngine::new(
            "manim-json",
            vec![
                "{manifest}".into(),
                "--size={width}x{height}@{fps}".into(),
                "-o".into(),
                "{output_dir}/{scene}".into(),
            ],
        );
        let settings = RenderSettings::default().with_output_dir("media");
        let args = engine.expand_args("Overview", Path::new("media/Overview.json"), &settings);
        assert_eq!(
            args,
            vec![
                "media/Overview.json".to_string(),
                "--size=1920x1080@30".to_string(),
                "-o".to_string(),
                "media/Overview".to_string(),
            ]
        );
    }

    #[test]
    fn test_from_config_defaults() {
        let engine = CommandEngine::from_config(&CommandConfig::default());
        assert_eq!(engine.program(), "manim-json");
    }

    #[test]
    fn test_missing_program_is_render_error() {
        let engine = CommandEngine::new("dialectic-no-such-renderer", vec![]);
        assert!(!engine.is_available());
        let scene = Scene::new("Missing");
        let err = engine
            .render(&scene, &RenderSettings::default())
            .unwrap_err();
        assert!(matches!(err, DialecticError::Render(_)));
    }
}
