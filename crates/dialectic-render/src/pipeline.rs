use std::time::Instant;

use dialectic_core::{DialecticError, DialecticResult};
use dialectic_ir::{validate_scene, Scene};

use crate::engine::{AnimationEngine, RenderResult, RenderSettings};

/// Validates scenes and hands them to an engine, one at a time and in order.
pub struct RenderPipeline;

impl RenderPipeline {
    /// Render a single scene. Nothing is handed to the engine unless the
    /// scene and settings are valid.
    pub fn run(
        scene: &Scene,
        engine: &dyn AnimationEngine,
        settings: &RenderSettings,
    ) -> DialecticResult<RenderResult> {
        settings.validate()?;
        validate_scene(scene).map_err(|errors| combine(&scene.name, errors))?;

        tracing::info!(
            "Rendering scene '{}' with {} engine ({} nodes, {} steps, {})",
            scene.name,
            engine.name(),
            scene.nodes.len(),
            scene.steps.len(),
            scene.duration()
        );
        for (i, step) in scene.steps.iter().enumerate() {
            tracing::debug!(
                "  step {}: {} on {:?} for {}",
                i,
                step.effect,
                step.targets,
                step.effective_run_time()
            );
        }

        let start = Instant::now();
        let result = engine.render(scene, settings)?;
        tracing::info!(
            "Scene '{}' done in {:.1}ms, plan {}",
            scene.name,
            start.elapsed().as_secs_f64() * 1000.0,
            result.plan_hash.short()
        );
        Ok(result)
    }

    /// Render scenes in order, stopping at the first failure.
    pub fn run_all<'a>(
        scenes: impl IntoIterator<Item = &'a Scene>,
        engine: &dyn AnimationEngine,
        settings: &RenderSettings,
    ) -> DialecticResult<Vec<RenderResult>> {
        scenes
            .into_iter()
            .map(|scene| Self::run(scene, engine, settings))
            .collect()
    }
}

/// Fold a validation report into one error.
fn combine(scene: &str, mut errors: Vec<DialecticError>) -> DialecticError {
    if errors.len() == 1 {
        return errors.remove(0);
    }
    let message = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    DialecticError::validation(
        format!("scene '{}'", scene),
        format!("{} problems: {}", errors.len(), message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialectic_core::hash::hash_json;
    use dialectic_ir::{AnimationStep, Effect, NodeRef};
    use std::cell::RefCell;
    use uuid::Uuid;

    /// Records which scenes it was asked to render.
    #[derive(Default)]
    struct RecordingEngine {
        seen: RefCell<Vec<String>>,
    }

    impl AnimationEngine for RecordingEngine {
        fn name(&self) -> &str {
            "recording"
        }

        fn render(&self, scene: &Scene, _: &RenderSettings) -> DialecticResult<RenderResult> {
            self.seen.borrow_mut().push(scene.name.clone());
            Ok(RenderResult {
                job_id: Uuid::new_v4(),
                scene: scene.name.clone(),
                outputs: vec![],
                step_count: scene.steps.len(),
                duration: scene.duration(),
                plan_hash: hash_json(scene)?,
            })
        }
    }

    #[test]
    fn test_run_delegates_valid_scene() {
        let engine = RecordingEngine::default();
        let scene = Scene::new("Empty");
        let result = RenderPipeline::run(&scene, &engine, &RenderSettings::default()).unwrap();
        assert_eq!(result.scene, "Empty");
        assert_eq!(*engine.seen.borrow(), vec!["Empty".to_string()]);
    }

    #[test]
    fn test_invalid_scene_never_reaches_engine() {
        let engine = RecordingEngine::default();
        let mut scene = Scene::new("Broken");
        scene
            .steps
            .push(AnimationStep::new(Effect::Draw, vec![NodeRef(3)]));
        let err = RenderPipeline::run(&scene, &engine, &RenderSettings::default()).unwrap_err();
        assert!(matches!(err, DialecticError::Reference { .. }));
        assert!(engine.seen.borrow().is_empty());
    }

    #[test]
    fn test_run_all_stops_at_first_failure() {
        let engine = RecordingEngine::default();
        let scenes = vec![Scene::new("A"), Scene::new(""), Scene::new("C")];
        assert!(RenderPipeline::run_all(&scenes, &engine, &RenderSettings::default()).is_err());
        assert_eq!(*engine.seen.borrow(), vec!["A".to_string()]);
    }

    #[test]
    fn test_combine_many_errors() {
        let err = combine(
            "S",
            vec![
                DialecticError::validation("a", "x"),
                DialecticError::validation("b", "y"),
            ],
        );
        assert!(err.to_string().contains("2 problems"));
    }
}
