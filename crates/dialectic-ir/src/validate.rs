use std::collections::HashSet;

use dialectic_core::DialecticError;

use crate::animation::Effect;
use crate::node::{NodeKind, NodeRef};
use crate::scene::Scene;

/// Validate a finished scene for structural correctness.
///
/// `SceneScript` already enforces these rules as a scene is built; this pass
/// exists for scenes that arrive from elsewhere (a plan file, a hand-edited
/// manifest) and reports every problem rather than stopping at the first.
pub fn validate_scene(scene: &Scene) -> Result<(), Vec<DialecticError>> {
    let mut errors = Vec::new();

    if scene.name.trim().is_empty() {
        errors.push(DialecticError::validation("scene.name", "must not be empty"));
    }

    if !(scene.camera.width > 0.0 && scene.camera.width.is_finite())
        || !scene.camera.center.is_finite()
    {
        errors.push(DialecticError::validation(
            "scene.camera",
            "initial camera needs a finite centre and positive width",
        ));
    }

    for (i, node) in scene.nodes.iter().enumerate() {
        if node.id.index() != i {
            errors.push(DialecticError::validation(
                "node.id",
                format!("node at position {} carries handle {}", i, node.id),
            ));
        }
        if !node.bounds.center.is_finite()
            || !(node.bounds.width.is_finite() && node.bounds.height.is_finite())
        {
            errors.push(DialecticError::validation(
                "node.bounds",
                format!("{} has non-finite bounds", node.id),
            ));
        } else if node.bounds.width < 0.0 || node.bounds.height < 0.0 {
            errors.push(DialecticError::validation(
                "node.bounds",
                format!(
                    "{} has negative extent {}x{}",
                    node.id, node.bounds.width, node.bounds.height
                ),
            ));
        }

        match &node.kind {
            NodeKind::Shape(shape) => {
                if let Err(e) = shape.validate() {
                    errors.push(e);
                }
            }
            NodeKind::Group(group) => {
                let mut seen = HashSet::new();
                for &child in &group.children {
                    if child.index() >= i {
                        // Children must precede their group; this also rules out cycles.
                        errors.push(DialecticError::reference(child, scene.name.clone()));
                    } else if !seen.insert(child) {
                        errors.push(DialecticError::validation(
                            "group.children",
                            format!("{} lists {} more than once", node.id, child),
                        ));
                    }
                }
                let nested: HashSet<NodeRef> = group
                    .children
                    .iter()
                    .filter(|c| c.index() < i)
                    .flat_map(|&c| scene.descendants(c).into_iter().skip(1))
                    .collect();
                for child in group.children.iter().filter(|c| nested.contains(*c)) {
                    errors.push(DialecticError::validation(
                        "group.children",
                        format!("{} lists {} alongside a member that contains it", node.id, child),
                    ));
                }
            }
        }
    }

    let declared = |r: NodeRef| r.index() < scene.nodes.len();
    for (i, step) in scene.steps.iter().enumerate() {
        for r in step.referenced() {
            if !declared(r) {
                errors.push(DialecticError::reference(r, scene.name.clone()));
            }
        }
        if step.effect.requires_targets() && step.targets.is_empty() {
            errors.push(DialecticError::validation(
                "step.targets",
                format!("step {} ({}) has no targets", i, step.effect),
            ));
        }
        let run_time = step.effective_run_time();
        if !run_time.is_finite() {
            errors.push(DialecticError::validation(
                "step.run_time",
                format!("step {} ({}) has an unbounded run time", i, step.effect),
            ));
        } else if step.effect != Effect::Add && run_time.is_zero() {
            errors.push(DialecticError::validation(
                "step.run_time",
                format!("step {} ({}) has zero run time", i, step.effect),
            ));
        }
        match &step.effect {
            Effect::GrowArrow => {
                for t in step.targets.iter().filter(|t| declared(**t)) {
                    if scene.nodes[t.index()].as_arrow().is_none() {
                        errors.push(DialecticError::validation(
                            "step.targets",
                            format!("step {} grows {}, which is not an arrow", i, t),
                        ));
                    }
                }
            }
            Effect::CameraZoom(camera) => {
                if !(camera.width > 0.0 && camera.width.is_finite()) {
                    errors.push(DialecticError::validation(
                        "step.camera",
                        format!("step {} zooms to width {}", i, camera.width),
                    ));
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a set of scenes that will be selected by name.
pub fn validate_catalog(scenes: &[Scene]) -> Result<(), Vec<DialecticError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    for scene in scenes {
        if !names.insert(scene.name.as_str()) {
            errors.push(DialecticError::validation(
                "scene.name",
                format!("duplicate scene name '{}'", scene.name),
            ));
        }
        if let Err(mut scene_errors) = validate_scene(scene) {
            errors.append(&mut scene_errors);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
