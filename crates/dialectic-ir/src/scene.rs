use serde::{Deserialize, Serialize};

use dialectic_core::{Color, Duration};

use crate::animation::AnimationStep;
use crate::camera::CameraState;
use crate::node::{Node, NodeRef};

/// A fully described scene: the content graph with resolved layout, plus the
/// ordered animation sequence. This is the plan handed to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Name the scene is selected by.
    pub name: String,
    pub background: Color,
    /// Camera at the start of the scene.
    pub camera: CameraState,
    /// Nodes in declaration order; `nodes[i].id == NodeRef(i)`.
    pub nodes: Vec<Node>,
    /// Steps in playback order.
    pub steps: Vec<AnimationStep>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::BLACK,
            camera: CameraState::default(),
            nodes: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeRef) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a node by its diagnostic name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name.as_deref() == Some(name))
    }

    /// Nodes that belong to no group, in declaration order.
    pub fn roots(&self) -> Vec<&Node> {
        let mut owned = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for child in node.children() {
                if let Some(slot) = owned.get_mut(child.index()) {
                    *slot = true;
                }
            }
        }
        self.nodes
            .iter()
            .zip(owned)
            .filter_map(|(n, is_child)| (!is_child).then_some(n))
            .collect()
    }

    /// `root` and everything below it, each once. Undeclared handles are skipped.
    pub fn descendants(&self, root: NodeRef) -> Vec<NodeRef> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        let mut out = Vec::new();
        while let Some(n) = stack.pop() {
            match seen.get_mut(n.index()) {
                Some(slot) if !*slot => *slot = true,
                _ => continue,
            }
            out.push(n);
            stack.extend(self.nodes[n.index()].children().iter().copied());
        }
        out
    }

    /// Total scheduled time of all steps.
    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|s| s.effective_run_time()).sum()
    }

    /// Number of frames in this scene at the given fps.
    pub fn frame_count(&self, fps: f64) -> u64 {
        self.duration().frame_count(fps)
    }
}
