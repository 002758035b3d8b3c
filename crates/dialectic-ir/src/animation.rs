use serde::{Deserialize, Serialize};

use dialectic_core::{Duration, Point2D};

use crate::camera::CameraState;
use crate::node::NodeRef;

/// Run time of a step that does not specify one, in seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// The visual effect a step applies to its targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Draw the outline, then fill.
    Draw,
    /// Stroke-by-stroke writing, for text.
    Write,
    /// Fade in, optionally sliding in along `shift`.
    FadeIn { shift: Option<Point2D> },
    FadeOut,
    /// Grow an arrow from its tail.
    GrowArrow,
    /// Trace the path of a shape.
    Create,
    /// Move the camera to the given state.
    CameraZoom(CameraState),
    /// Show instantly, without animation.
    Add,
    /// Hold the current frame.
    Wait,
}

impl Effect {
    /// Whether the step needs at least one target node.
    pub fn requires_targets(&self) -> bool {
        !matches!(self, Effect::CameraZoom(_) | Effect::Wait)
    }

    /// Whether targets are on screen after the step.
    pub fn reveals(&self) -> bool {
        matches!(
            self,
            Effect::Draw
                | Effect::Write
                | Effect::FadeIn { .. }
                | Effect::GrowArrow
                | Effect::Create
                | Effect::Add
        )
    }

    /// Run time when the step does not specify one.
    pub fn default_run_time(&self) -> Duration {
        match self {
            Effect::Add => Duration::zero(),
            _ => Duration::from_seconds(DEFAULT_RUN_TIME),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::Draw => write!(f, "Draw"),
            Effect::Write => write!(f, "Write"),
            Effect::FadeIn { shift: None } => write!(f, "FadeIn"),
            Effect::FadeIn { shift: Some(s) } => write!(f, "FadeIn(shift {}, {})", s.x, s.y),
            Effect::FadeOut => write!(f, "FadeOut"),
            Effect::GrowArrow => write!(f, "GrowArrow"),
            Effect::Create => write!(f, "Create"),
            Effect::CameraZoom(c) => write!(
                f,
                "CameraZoom(center {}, {}; width {:.2}, x{:.2})",
                c.center.x,
                c.center.y,
                c.width,
                c.zoom_factor()
            ),
            Effect::Add => write!(f, "Add"),
            Effect::Wait => write!(f, "Wait"),
        }
    }
}

/// Optional parameters of a step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOptions {
    pub run_time: Option<Duration>,
    /// Labels written at the same time as the main effect.
    pub labels: Vec<NodeRef>,
}

impl StepOptions {
    pub fn run_time(seconds: f64) -> Self {
        Self {
            run_time: Some(Duration::from_seconds(seconds)),
            labels: Vec::new(),
        }
    }

    pub fn with_labels(mut self, labels: impl IntoIterator<Item = NodeRef>) -> Self {
        self.labels.extend(labels);
        self
    }
}

/// One directive in a scene's animation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub effect: Effect,
    pub targets: Vec<NodeRef>,
    /// Nodes written alongside the effect, e.g. the caption of a box.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<NodeRef>,
    pub run_time: Option<Duration>,
}

impl AnimationStep {
    pub fn new(effect: Effect, targets: Vec<NodeRef>) -> Self {
        Self {
            effect,
            targets,
            labels: Vec::new(),
            run_time: None,
        }
    }

    /// Declared run time, or the effect's default.
    pub fn effective_run_time(&self) -> Duration {
        self.run_time
            .unwrap_or_else(|| self.effect.default_run_time())
    }

    /// Every node the step touches, targets first.
    pub fn referenced(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.targets.iter().chain(self.labels.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_run_time_defaults() {
        let step = AnimationStep::new(Effect::Write, vec![NodeRef(0)]);
        assert!((step.effective_run_time().as_seconds() - 1.0).abs() < 1e-9);

        let add = AnimationStep::new(Effect::Add, vec![NodeRef(0)]);
        assert!(add.effective_run_time().is_zero());

        let mut zoom = AnimationStep::new(Effect::CameraZoom(CameraState::default()), vec![]);
        zoom.run_time = Some(Duration::from_seconds(1.5));
        assert!((zoom.effective_run_time().as_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_camera_zoom_display_shows_magnification() {
        let zoom = Effect::CameraZoom(CameraState {
            center: Point2D::new(0.0, -2.0),
            width: 7.2,
        });
        assert_eq!(zoom.to_string(), "CameraZoom(center 0, -2; width 7.20, x1.98)");
    }

    #[test]
    fn test_referenced_includes_labels() {
        let mut step = AnimationStep::new(Effect::Draw, vec![NodeRef(0)]);
        step.labels = vec![NodeRef(1), NodeRef(2)];
        let refs: Vec<_> = step.referenced().collect();
        assert_eq!(refs, vec![NodeRef(0), NodeRef(1), NodeRef(2)]);
    }

    #[test]
    fn test_effect_classification() {
        assert!(!Effect::Wait.requires_targets());
        assert!(Effect::FadeOut.requires_targets());
        assert!(Effect::Add.reveals());
        assert!(!Effect::FadeOut.reveals());
        assert_eq!(Effect::FadeIn { shift: None }.to_string(), "FadeIn");
    }
}
