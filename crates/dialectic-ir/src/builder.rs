use std::collections::HashSet;

use dialectic_core::{Color, DialecticError, DialecticResult, Point2D, TextMetrics};

use crate::animation::{AnimationStep, Effect, StepOptions};
use crate::camera::CameraState;
use crate::layout::{self, Arrangement, Bounds, Direction};
use crate::node::{Arrow, Group, Node, NodeKind, NodeRef, Shape};
use crate::scene::Scene;

/// Builds one named scene: declare nodes, position and group them, then
/// append animation steps that refer to them.
///
/// Positions are resolved eagerly, so every query (`bounds`, `edge_point`)
/// reflects all layout operations issued so far, and a finished [`Scene`]
/// carries final coordinates for every node.
#[derive(Debug)]
pub struct SceneScript {
    scene: Scene,
    metrics: TextMetrics,
    /// Nodes currently on screen, used to flag suspicious steps.
    visible: HashSet<NodeRef>,
    /// Camera after the last zoom step.
    camera: CameraState,
}

impl SceneScript {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_metrics(name, TextMetrics::default())
    }

    pub fn with_metrics(name: impl Into<String>, metrics: TextMetrics) -> Self {
        Self {
            scene: Scene::new(name),
            metrics,
            visible: HashSet::new(),
            camera: CameraState::default(),
        }
    }

    /// Camera as of the last step added.
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn name(&self) -> &str {
        &self.scene.name
    }

    /// The scene as built so far.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn set_background(&mut self, color: Color) -> &mut Self {
        self.scene.background = color;
        self
    }

    /// Replace the initial camera. Only allowed before the first step.
    pub fn set_camera(&mut self, camera: CameraState) -> DialecticResult<&mut Self> {
        if !self.scene.steps.is_empty() {
            return Err(DialecticError::validation(
                "scene.camera",
                "the initial camera must be set before the first step",
            ));
        }
        check_camera(&camera)?;
        self.scene.camera = camera;
        self.camera = camera;
        Ok(self)
    }

    // --- Content ---

    /// Declare a shape. Rectangles and text start centred on the origin;
    /// arrows stay where their endpoints put them.
    pub fn define_shape(&mut self, shape: impl Into<Shape>) -> DialecticResult<NodeRef> {
        let shape = shape.into();
        shape.validate()?;
        let bounds = shape.initial_bounds(&self.metrics);
        if !(bounds.width >= 0.0 && bounds.height >= 0.0 && bounds.center.is_finite()) {
            return Err(DialecticError::validation(
                "shape.bounds",
                format!(
                    "{} measures {}x{}; check the text metrics",
                    shape.kind_name(),
                    bounds.width,
                    bounds.height
                ),
            ));
        }
        Ok(self.push(NodeKind::Shape(shape), bounds))
    }

    /// Collect existing nodes into a group that moves as one.
    pub fn group(&mut self, children: &[NodeRef]) -> DialecticResult<NodeRef> {
        let mut seen = HashSet::new();
        for &child in children {
            self.node(child)?;
            if !seen.insert(child) {
                return Err(DialecticError::validation(
                    "group.children",
                    format!("{} listed more than once", child),
                ));
            }
        }
        // A member must not also sit inside one of its siblings.
        let nested: HashSet<NodeRef> = children
            .iter()
            .flat_map(|&c| self.descendants(c).into_iter().skip(1))
            .collect();
        if let Some(shared) = children.iter().find(|c| nested.contains(*c)) {
            return Err(DialecticError::validation(
                "group.children",
                format!("{} is already inside another member of the group", shared),
            ));
        }
        let bounds = self.union_of(children);
        Ok(self.push(
            NodeKind::Group(Group {
                children: children.to_vec(),
                arrangement: None,
            }),
            bounds,
        ))
    }

    /// Attach a diagnostic name to a node.
    pub fn set_name(&mut self, node: NodeRef, name: impl Into<String>) -> DialecticResult<&mut Self> {
        self.node(node)?;
        self.scene.nodes[node.index()].name = Some(name.into());
        Ok(self)
    }

    // --- Queries ---

    pub fn bounds(&self, node: NodeRef) -> DialecticResult<Bounds> {
        Ok(self.node(node)?.bounds)
    }

    /// Midpoint of the node's edge facing `direction`.
    pub fn edge_point(&self, node: NodeRef, direction: Direction) -> DialecticResult<Point2D> {
        Ok(self.bounds(node)?.edge_point(direction))
    }

    /// A straight arrow from one node's edge to another's. The arrow is not
    /// declared; style it and pass it to [`define_shape`](Self::define_shape).
    pub fn arrow_between(
        &self,
        from: NodeRef,
        from_edge: Direction,
        to: NodeRef,
        to_edge: Direction,
    ) -> DialecticResult<Arrow> {
        Ok(Arrow::new(
            self.edge_point(from, from_edge)?,
            self.edge_point(to, to_edge)?,
        ))
    }

    /// Camera state that frames `node` with `margin` to spare.
    pub fn camera_framing(&self, node: NodeRef, margin: f64) -> DialecticResult<CameraState> {
        if !(margin > 0.0 && margin.is_finite()) {
            return Err(DialecticError::validation(
                "camera.margin",
                format!("must be positive, got {}", margin),
            ));
        }
        Ok(CameraState::framing(&self.bounds(node)?, margin))
    }

    // --- Positioning ---

    pub fn shift(&mut self, node: NodeRef, delta: Point2D) -> DialecticResult<&mut Self> {
        self.node(node)?;
        self.translate(node, delta);
        Ok(self)
    }

    /// Centre `node` on a point.
    pub fn move_to_point(&mut self, node: NodeRef, point: Point2D) -> DialecticResult<&mut Self> {
        let center = self.bounds(node)?.center;
        self.translate(node, point - center);
        Ok(self)
    }

    /// Centre `node` on `target`.
    pub fn move_to(&mut self, node: NodeRef, target: NodeRef) -> DialecticResult<&mut Self> {
        self.check_independent(node, target)?;
        let point = self.bounds(target)?.center;
        self.move_to_point(node, point)
    }

    /// Place `node` beside `anchor` on the `direction` side, `buff` apart,
    /// centred on the anchor along the other axis.
    pub fn next_to(
        &mut self,
        node: NodeRef,
        anchor: NodeRef,
        direction: Direction,
        buff: f64,
    ) -> DialecticResult<&mut Self> {
        check_spacing("next_to.buff", buff)?;
        self.check_independent(node, anchor)?;
        let target = self.bounds(anchor)?;
        let own = self.bounds(node)?;
        let reach = buff + own.extent_along(direction) / 2.0;
        let center = match direction {
            Direction::Up => Point2D::new(target.center.x, target.top() + reach),
            Direction::Down => Point2D::new(target.center.x, target.bottom() - reach),
            Direction::Left => Point2D::new(target.left() - reach, target.center.y),
            Direction::Right => Point2D::new(target.right() + reach, target.center.y),
        };
        self.translate(node, center - own.center);
        Ok(self)
    }

    /// Push `node` against an edge of the initial camera frame, `buff` inside it.
    /// The other coordinate is kept.
    pub fn to_edge(
        &mut self,
        node: NodeRef,
        direction: Direction,
        buff: f64,
    ) -> DialecticResult<&mut Self> {
        check_spacing("to_edge.buff", buff)?;
        let own = self.bounds(node)?;
        let frame = self.scene.camera.viewport();
        let reach = buff + own.extent_along(direction) / 2.0;
        let center = match direction {
            Direction::Up => Point2D::new(own.center.x, frame.top() - reach),
            Direction::Down => Point2D::new(own.center.x, frame.bottom() + reach),
            Direction::Left => Point2D::new(frame.left() + reach, own.center.y),
            Direction::Right => Point2D::new(frame.right() - reach, own.center.y),
        };
        self.translate(node, center - own.center);
        Ok(self)
    }

    /// Stack the children of `group` according to `policy`, keeping the
    /// group's centre where it was. Returns the children's new boxes.
    ///
    /// The group is not pulled back to the origin, as Manim's `arrange`
    /// does by default. A group built from unmoved nodes is centred there
    /// already; otherwise follow with [`move_to_point`](Self::move_to_point).
    pub fn arrange(&mut self, group: NodeRef, policy: Arrangement) -> DialecticResult<Vec<Bounds>> {
        check_spacing("arrange.spacing", policy.spacing)?;
        if let Some(edge) = policy.align {
            if edge.is_vertical() == policy.direction.is_vertical() {
                return Err(DialecticError::validation(
                    "arrange.align",
                    format!(
                        "cannot align on the {} edge when stacking {}",
                        edge, policy.direction
                    ),
                ));
            }
        }

        let children = match &self.node(group)?.kind {
            NodeKind::Group(g) => g.children.clone(),
            NodeKind::Shape(s) => {
                return Err(DialecticError::validation(
                    "arrange.group",
                    format!("{} is a {}, not a group", group, s.kind_name()),
                ))
            }
        };

        let center = self.scene.nodes[group.index()].bounds.center;
        let sizes: Vec<_> = children
            .iter()
            .map(|c| self.scene.nodes[c.index()].bounds.size())
            .collect();
        let slots = layout::arrange(&sizes, &policy);
        for (child, slot) in children.iter().zip(&slots) {
            let current = self.scene.nodes[child.index()].bounds.center;
            self.translate(*child, center + slot.center - current);
        }

        if let NodeKind::Group(g) = &mut self.scene.nodes[group.index()].kind {
            g.arrangement = Some(policy);
        }
        tracing::debug!(
            scene = %self.scene.name,
            group = %group,
            direction = %policy.direction,
            spacing = policy.spacing,
            "arranged {} children",
            children.len()
        );
        Ok(children
            .iter()
            .map(|c| self.scene.nodes[c.index()].bounds)
            .collect())
    }

    // --- Animation ---

    /// Append a step. Every target and label must already be declared.
    pub fn add_step(
        &mut self,
        effect: Effect,
        targets: &[NodeRef],
        options: StepOptions,
    ) -> DialecticResult<&mut Self> {
        for &r in targets.iter().chain(options.labels.iter()) {
            self.node(r)?;
        }
        if effect.requires_targets() && targets.is_empty() {
            return Err(DialecticError::validation(
                "step.targets",
                format!("{} needs at least one target", effect),
            ));
        }
        if let Some(run_time) = options.run_time {
            if !run_time.is_finite() || (run_time.is_zero() && effect != Effect::Add) {
                return Err(DialecticError::validation(
                    "step.run_time",
                    format!("{} needs a finite positive run time, got {}", effect, run_time),
                ));
            }
        }
        match &effect {
            Effect::GrowArrow => {
                if let Some(bad) = targets
                    .iter()
                    .find(|t| self.scene.nodes[t.index()].as_arrow().is_none())
                {
                    return Err(DialecticError::validation(
                        "step.targets",
                        format!("GrowArrow target {} is not an arrow", bad),
                    ));
                }
            }
            Effect::CameraZoom(camera) => {
                check_camera(camera)?;
                if *camera == self.camera {
                    tracing::warn!(
                        scene = %self.scene.name,
                        "CameraZoom does not move the camera"
                    );
                }
                self.camera = *camera;
            }
            _ => {}
        }

        self.track_visibility(&effect, targets, &options.labels);

        let step = AnimationStep {
            effect,
            targets: targets.to_vec(),
            labels: options.labels,
            run_time: options.run_time,
        };
        tracing::debug!(
            scene = %self.scene.name,
            index = self.scene.steps.len(),
            effect = %step.effect,
            run_time = %step.effective_run_time(),
            "step added"
        );
        self.scene.steps.push(step);
        Ok(self)
    }

    /// Append a step with default options.
    pub fn play(&mut self, effect: Effect, targets: &[NodeRef]) -> DialecticResult<&mut Self> {
        self.add_step(effect, targets, StepOptions::default())
    }

    /// Show nodes instantly.
    pub fn add(&mut self, targets: &[NodeRef]) -> DialecticResult<&mut Self> {
        self.add_step(Effect::Add, targets, StepOptions::default())
    }

    /// Hold the frame for `seconds`.
    pub fn wait(&mut self, seconds: f64) -> DialecticResult<&mut Self> {
        self.add_step(Effect::Wait, &[], StepOptions::run_time(seconds))
    }

    /// Move the camera to frame `node`.
    pub fn zoom_to(
        &mut self,
        node: NodeRef,
        margin: f64,
        run_time: f64,
    ) -> DialecticResult<&mut Self> {
        let camera = self.camera_framing(node, margin)?;
        self.add_step(
            Effect::CameraZoom(camera),
            &[node],
            StepOptions::run_time(run_time),
        )
    }

    /// Finish the script.
    pub fn build(self) -> Scene {
        tracing::debug!(
            scene = %self.scene.name,
            nodes = self.scene.nodes.len(),
            steps = self.scene.steps.len(),
            "scene built"
        );
        self.scene
    }

    // --- Internals ---

    fn node(&self, id: NodeRef) -> DialecticResult<&Node> {
        self.scene
            .nodes
            .get(id.index())
            .ok_or_else(|| DialecticError::reference(id, self.scene.name.clone()))
    }

    fn push(&mut self, kind: NodeKind, bounds: Bounds) -> NodeRef {
        let id = NodeRef(self.scene.nodes.len() as u32);
        self.scene.nodes.push(Node {
            id,
            name: None,
            kind,
            bounds,
        });
        id
    }

    fn union_of(&self, nodes: &[NodeRef]) -> Bounds {
        Bounds::union_all(nodes.iter().map(|n| &self.scene.nodes[n.index()].bounds))
    }

    fn descendants(&self, root: NodeRef) -> Vec<NodeRef> {
        self.scene.descendants(root)
    }

    /// Reject positioning a node relative to itself or to one of its own members.
    fn check_independent(&self, node: NodeRef, anchor: NodeRef) -> DialecticResult<()> {
        self.node(node)?;
        self.node(anchor)?;
        if self.descendants(node).contains(&anchor) {
            return Err(DialecticError::validation(
                "position.anchor",
                format!("{} cannot be positioned relative to {}, which it contains", node, anchor),
            ));
        }
        Ok(())
    }

    fn translate(&mut self, root: NodeRef, delta: Point2D) {
        if delta == Point2D::ORIGIN {
            return;
        }
        for n in self.descendants(root) {
            let node = &mut self.scene.nodes[n.index()];
            node.bounds = node.bounds.translated(delta);
            if let NodeKind::Shape(shape) = &mut node.kind {
                shape.translate(delta);
            }
        }
        self.refresh_groups();
    }

    /// Recompute group boxes from their children. Children are always declared
    /// before their group, so one pass in declaration order suffices.
    fn refresh_groups(&mut self) {
        for i in 0..self.scene.nodes.len() {
            let children = self.scene.nodes[i].children();
            if children.is_empty() {
                continue;
            }
            let bounds = Bounds::union_all(
                children
                    .iter()
                    .map(|c| &self.scene.nodes[c.index()].bounds),
            );
            self.scene.nodes[i].bounds = bounds;
        }
    }

    fn track_visibility(&mut self, effect: &Effect, targets: &[NodeRef], labels: &[NodeRef]) {
        let expand = |roots: &[NodeRef]| -> Vec<NodeRef> {
            roots.iter().flat_map(|r| self.descendants(*r)).collect()
        };
        let shown_targets = expand(targets);
        let shown_labels = expand(labels);

        if effect.reveals() {
            for t in targets {
                if self.visible.contains(t) {
                    tracing::warn!(
                        scene = %self.scene.name,
                        "{} reveals {} which is already on screen",
                        effect,
                        self.scene.nodes[t.index()].describe()
                    );
                }
            }
            if *effect == Effect::Write {
                for t in targets {
                    let node = &self.scene.nodes[t.index()];
                    if node.as_text().is_none() && !node.is_group() {
                        tracing::warn!(
                            scene = %self.scene.name,
                            "Write applied to non-text {}",
                            node.describe()
                        );
                    }
                }
            }
            self.visible.extend(shown_targets);
        } else if *effect == Effect::FadeOut {
            for t in targets {
                if !self.visible.contains(t) {
                    tracing::warn!(
                        scene = %self.scene.name,
                        "FadeOut of {} which is not on screen",
                        self.scene.nodes[t.index()].describe()
                    );
                }
            }
            for n in shown_targets {
                self.visible.remove(&n);
            }
        }
        self.visible.extend(shown_labels);
    }
}

fn check_spacing(field: &str, value: f64) -> DialecticResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DialecticError::validation(
            field,
            format!("must be a finite non-negative distance, got {}", value),
        ))
    }
}

fn check_camera(camera: &CameraState) -> DialecticResult<()> {
    if !(camera.width > 0.0 && camera.width.is_finite()) || !camera.center.is_finite() {
        return Err(DialecticError::validation(
            "camera",
            format!(
                "needs a finite centre and positive width, got width {}",
                camera.width
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DEFAULT_BUFF;
    use crate::node::{Rectangle, Text};

    fn rect(s: &mut SceneScript, w: f64, h: f64) -> NodeRef {
        s.define_shape(Rectangle::new(w, h)).unwrap()
    }

    #[test]
    fn test_define_shape_rejects_bad_dimensions() {
        let mut s = SceneScript::new("t");
        let err = s.define_shape(Rectangle::new(6.0, 0.0)).unwrap_err();
        assert!(matches!(err, DialecticError::Validation { .. }));
        assert!(s.scene().nodes.is_empty());
    }

    #[test]
    fn test_handles_are_sequential() {
        let mut s = SceneScript::new("t");
        assert_eq!(rect(&mut s, 1.0, 1.0), NodeRef(0));
        assert_eq!(rect(&mut s, 1.0, 1.0), NodeRef(1));
    }

    #[test]
    fn test_shift_then_edges() {
        let mut s = SceneScript::new("t");
        let r = rect(&mut s, 6.0, 2.0);
        s.shift(r, Point2D::UP * 2.0).unwrap();
        let b = s.bounds(r).unwrap();
        assert!((b.top() - 3.0).abs() < 1e-9);
        assert!((b.bottom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_to_centres_on_target() {
        let mut s = SceneScript::new("t");
        let r = rect(&mut s, 6.0, 2.0);
        s.shift(r, Point2D::DOWN * 2.0).unwrap();
        let label = s.define_shape(Text::new("BASE", 36.0)).unwrap();
        s.move_to(label, r).unwrap();
        assert_eq!(s.bounds(label).unwrap().center, Point2D::new(0.0, -2.0));
    }

    #[test]
    fn test_next_to_below() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 2.0, 1.0);
        let b = rect(&mut s, 1.0, 0.5);
        s.next_to(b, a, Direction::Down, DEFAULT_BUFF).unwrap();
        let bb = s.bounds(b).unwrap();
        assert!((bb.top() - (-0.5 - DEFAULT_BUFF)).abs() < 1e-9);
        assert!(bb.center.x.abs() < 1e-9);
    }

    #[test]
    fn test_next_to_own_member_rejected() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let g = s.group(&[a]).unwrap();
        assert!(s.next_to(g, a, Direction::Right, 0.1).is_err());
        assert!(s.move_to(a, a).is_err());
    }

    #[test]
    fn test_to_edge_up() {
        let mut s = SceneScript::new("t");
        let title = s.define_shape(Text::new("IDEOLOGY & STATE", 48.0)).unwrap();
        s.to_edge(title, Direction::Up, 0.5).unwrap();
        let b = s.bounds(title).unwrap();
        assert!((b.top() - 3.5).abs() < 1e-9);
        assert!(b.center.x.abs() < 1e-9);
    }

    #[test]
    fn test_group_moves_children() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let b = rect(&mut s, 1.0, 1.0);
        s.shift(b, Point2D::RIGHT * 2.0).unwrap();
        let g = s.group(&[a, b]).unwrap();
        assert!((s.bounds(g).unwrap().width - 3.0).abs() < 1e-9);

        s.shift(g, Point2D::UP).unwrap();
        assert_eq!(s.bounds(a).unwrap().center, Point2D::new(0.0, 1.0));
        assert_eq!(s.bounds(b).unwrap().center, Point2D::new(2.0, 1.0));
        assert_eq!(s.bounds(g).unwrap().center, Point2D::new(1.0, 1.0));
    }

    #[test]
    fn test_group_rejects_duplicates_and_unknown() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(matches!(
            s.group(&[a, a]).unwrap_err(),
            DialecticError::Validation { .. }
        ));
        assert!(matches!(
            s.group(&[a, NodeRef(5)]).unwrap_err(),
            DialecticError::Reference { .. }
        ));
    }

    #[test]
    fn test_moving_child_updates_group_bounds() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let g = s.group(&[a]).unwrap();
        s.shift(a, Point2D::LEFT * 3.0).unwrap();
        assert_eq!(s.bounds(g).unwrap().center, Point2D::new(-3.0, 0.0));
    }

    #[test]
    fn test_arrange_requires_group() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(s.arrange(a, Arrangement::column()).is_err());
    }

    #[test]
    fn test_arrange_rejects_parallel_alignment_and_negative_spacing() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let g = s.group(&[a]).unwrap();
        let parallel = Arrangement::new(Direction::Down).aligned(Direction::Up);
        assert!(s.arrange(g, parallel).is_err());
        assert!(s.arrange(g, Arrangement::row(-1.0)).is_err());
    }

    #[test]
    fn test_arrange_keeps_group_centre_and_records_policy() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let b = rect(&mut s, 1.0, 1.0);
        let g = s.group(&[a, b]).unwrap();
        s.shift(g, Point2D::new(2.0, 1.0)).unwrap();
        s.arrange(g, Arrangement::row(0.5)).unwrap();
        let gb = s.bounds(g).unwrap();
        assert!((gb.center.x - 2.0).abs() < 1e-9);
        assert!((gb.center.y - 1.0).abs() < 1e-9);
        assert!((gb.width - 2.5).abs() < 1e-9);
        match &s.scene().nodes[g.index()].kind {
            NodeKind::Group(group) => assert_eq!(group.arrangement, Some(Arrangement::row(0.5))),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_arrow_moves_with_group() {
        let mut s = SceneScript::new("t");
        let arrow = s
            .define_shape(Arrow::new(Point2D::ORIGIN, Point2D::UP))
            .unwrap();
        let g = s.group(&[arrow]).unwrap();
        s.shift(g, Point2D::RIGHT).unwrap();
        let a = s.scene().nodes[arrow.index()].as_arrow().unwrap();
        assert_eq!(a.start, Point2D::new(1.0, 0.0));
        assert_eq!(a.end, Point2D::new(1.0, 1.0));
    }

    #[test]
    fn test_arrow_between_edges() {
        let mut s = SceneScript::new("t");
        let low = rect(&mut s, 6.0, 2.0);
        let high = rect(&mut s, 6.0, 2.0);
        s.shift(low, Point2D::DOWN * 2.0).unwrap();
        s.shift(high, Point2D::UP * 2.0).unwrap();
        let arrow = s
            .arrow_between(low, Direction::Up, high, Direction::Down)
            .unwrap();
        assert_eq!(arrow.start, Point2D::new(0.0, -1.0));
        assert_eq!(arrow.end, Point2D::new(0.0, 1.0));
        assert!(s
            .arrow_between(low, Direction::Up, NodeRef(9), Direction::Down)
            .is_err());
    }

    #[test]
    fn test_add_step_rejects_unknown_target() {
        let mut s = SceneScript::new("Overview");
        let a = rect(&mut s, 1.0, 1.0);
        let err = s.play(Effect::Draw, &[a, NodeRef(3)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "reference error: #3 is not declared in scene 'Overview'"
        );
        assert!(s.scene().steps.is_empty());
    }

    #[test]
    fn test_add_step_rejects_unknown_label() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        let opts = StepOptions::default().with_labels([NodeRef(1)]);
        assert!(matches!(
            s.add_step(Effect::Draw, &[a], opts).unwrap_err(),
            DialecticError::Reference { .. }
        ));
    }

    #[test]
    fn test_add_step_rejects_missing_targets_and_zero_run_time() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(s.play(Effect::FadeOut, &[]).is_err());
        assert!(s
            .add_step(Effect::Draw, &[a], StepOptions::run_time(0.0))
            .is_err());
        assert!(s.wait(0.0).is_err());
        assert!(s.wait(2.0).is_ok());
    }

    #[test]
    fn test_add_step_rejects_unbounded_run_time() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(s.wait(f64::INFINITY).is_err());
        assert!(s.zoom_to(a, 1.2, f64::INFINITY).is_err());
        assert!(s.scene().steps.is_empty());
        assert_eq!(s.camera().width, CameraState::default().width);
    }

    #[test]
    fn test_define_shape_rejects_inverted_text_box() {
        let metrics = TextMetrics {
            units_per_point: -1.0,
            ..TextMetrics::default()
        };
        let mut s = SceneScript::with_metrics("t", metrics);
        assert!(s.define_shape(Text::new("BASE", 36.0)).is_err());
        assert!(s.scene().nodes.is_empty());
    }

    #[test]
    fn test_grow_arrow_requires_arrow() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(s.play(Effect::GrowArrow, &[a]).is_err());
        let arrow = s
            .define_shape(Arrow::new(Point2D::ORIGIN, Point2D::RIGHT))
            .unwrap();
        assert!(s.play(Effect::GrowArrow, &[arrow]).is_ok());
    }

    #[test]
    fn test_zoom_to_frames_node() {
        let mut s = SceneScript::new("ZoomBase");
        let base = rect(&mut s, 6.0, 2.0);
        s.shift(base, Point2D::DOWN * 2.0).unwrap();
        s.zoom_to(base, 1.2, 1.5).unwrap();
        assert!((s.camera().width - 7.2).abs() < 1e-9);
        let scene = s.build();
        match &scene.steps[0].effect {
            Effect::CameraZoom(cam) => {
                assert_eq!(cam.center, Point2D::new(0.0, -2.0));
                assert!((cam.width - 7.2).abs() < 1e-9);
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert_eq!(scene.steps[0].targets, vec![base]);
        // Initial camera is untouched.
        assert_eq!(scene.camera, CameraState::default());
    }

    #[test]
    fn test_set_camera_only_before_steps() {
        let mut s = SceneScript::new("t");
        let a = rect(&mut s, 1.0, 1.0);
        assert!(s.set_camera(CameraState::new(Point2D::ORIGIN, 0.0)).is_err());
        s.set_camera(CameraState::new(Point2D::ORIGIN, 10.0)).unwrap();
        s.add(&[a]).unwrap();
        assert!(s.set_camera(CameraState::default()).is_err());
    }
}
