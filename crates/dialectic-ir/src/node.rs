use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use dialectic_core::{Color, DialecticError, DialecticResult, Point2D, Size2D, TextMetrics};

use crate::layout::{Arrangement, Bounds};

/// Points sampled along a curved arrow when computing its extent.
const ARC_SAMPLES: usize = 24;

/// Handle to a node declared in a scene script. Handles are dense indices in
/// declaration order, so a handle is valid in a scene iff it is below the
/// scene's node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeRef(pub u32);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Font style of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextStyle {
    #[default]
    Normal,
    Italic,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
    pub stroke_color: Color,
    /// Opacity of the fill, painted in the stroke color.
    pub fill_opacity: f64,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            stroke_color: Color::WHITE,
            fill_opacity: 0.0,
        }
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub font_size: f64,
    pub color: Color,
    pub style: TextStyle,
}

impl Text {
    pub fn new(content: impl Into<String>, font_size: f64) -> Self {
        Self {
            content: content.into(),
            font_size,
            color: Color::WHITE,
            style: TextStyle::Normal,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style = TextStyle::Italic;
        self
    }

    pub fn bold(mut self) -> Self {
        self.style = TextStyle::Bold;
        self
    }
}

/// A straight or curved arrow between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub start: Point2D,
    pub end: Point2D,
    pub color: Color,
    pub curved: bool,
    /// Angle swept by a curved arrow, in radians. Positive bends counterclockwise.
    pub arc_angle: f64,
    /// Length trimmed from each end of a straight arrow.
    pub buff: f64,
}

impl Arrow {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self {
            start,
            end,
            color: Color::WHITE,
            curved: false,
            arc_angle: TAU / 4.0,
            buff: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_buff(mut self, buff: f64) -> Self {
        self.buff = buff;
        self
    }

    pub fn curved(mut self, arc_angle: f64) -> Self {
        self.curved = true;
        self.arc_angle = arc_angle;
        self
    }

    /// Tail and tip after trimming `buff` off both ends.
    pub fn endpoints(&self) -> (Point2D, Point2D) {
        if self.curved || self.buff == 0.0 {
            return (self.start, self.end);
        }
        match (self.end - self.start).normalized() {
            Some(dir) => (self.start + dir * self.buff, self.end - dir * self.buff),
            None => (self.start, self.end),
        }
    }

    /// Points along the drawn path, tail first.
    pub fn path_points(&self) -> Vec<Point2D> {
        let (tail, tip) = self.endpoints();
        if !self.curved {
            return vec![tail, tip];
        }

        let chord = tip - tail;
        let length = chord.length();
        let half = self.arc_angle / 2.0;
        // Signed radius: positive when the arc turns counterclockwise.
        let radius = length / (2.0 * half.sin());
        let left = Point2D::new(-chord.y / length, chord.x / length);
        let center = tail.midpoint(&tip) + left * (radius * half.cos());
        let start_angle = (tail.y - center.y).atan2(tail.x - center.x);

        (0..=ARC_SAMPLES)
            .map(|i| {
                let theta = start_angle + self.arc_angle * i as f64 / ARC_SAMPLES as f64;
                center + Point2D::new(theta.cos(), theta.sin()) * radius.abs()
            })
            .collect()
    }
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Text(Text),
    Arrow(Arrow),
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Shape::Rectangle(r)
    }
}

impl From<Text> for Shape {
    fn from(t: Text) -> Self {
        Shape::Text(t)
    }
}

impl From<Arrow> for Shape {
    fn from(a: Arrow) -> Self {
        Shape::Arrow(a)
    }
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Text(_) => "text",
            Shape::Arrow(_) => "arrow",
        }
    }

    /// Reject parameters no renderer could draw.
    pub fn validate(&self) -> DialecticResult<()> {
        match self {
            Shape::Rectangle(r) => {
                positive("rectangle.width", r.width)?;
                positive("rectangle.height", r.height)?;
                unit_interval("rectangle.fill_opacity", r.fill_opacity)
            }
            Shape::Text(t) => {
                positive("text.font_size", t.font_size)?;
                if t.content.trim().is_empty() {
                    return Err(DialecticError::validation("text.content", "must not be empty"));
                }
                Ok(())
            }
            Shape::Arrow(a) => {
                if !a.start.is_finite() || !a.end.is_finite() {
                    return Err(DialecticError::validation(
                        "arrow.start/end",
                        "endpoints must be finite",
                    ));
                }
                let length = a.start.distance(&a.end);
                if length <= f64::EPSILON {
                    return Err(DialecticError::validation(
                        "arrow.start/end",
                        "endpoints must be distinct",
                    ));
                }
                if a.buff.is_nan() || a.buff < 0.0 || (!a.curved && 2.0 * a.buff >= length) {
                    return Err(DialecticError::validation(
                        "arrow.buff",
                        format!("must be in [0, {:.3}), got {}", length / 2.0, a.buff),
                    ));
                }
                if a.curved
                    && (a.arc_angle.is_nan() || a.arc_angle == 0.0 || a.arc_angle.abs() >= TAU)
                {
                    return Err(DialecticError::validation(
                        "arrow.arc_angle",
                        format!("must be non-zero and within one turn, got {}", a.arc_angle),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Extent of the shape as declared, before any positioning.
    pub fn initial_bounds(&self, metrics: &TextMetrics) -> Bounds {
        match self {
            Shape::Rectangle(r) => Bounds::at_origin(Size2D::new(r.width, r.height)),
            Shape::Text(t) => Bounds::at_origin(metrics.measure(&t.content, t.font_size)),
            Shape::Arrow(a) => Bounds::enclosing(a.path_points())
                .unwrap_or_else(|| Bounds::at_origin(Size2D::new(0.0, 0.0))),
        }
    }

    /// Move the shape's own coordinates, if it has any.
    pub(crate) fn translate(&mut self, delta: Point2D) {
        if let Shape::Arrow(a) = self {
            a.start += delta;
            a.end += delta;
        }
    }
}

fn positive(field: &str, value: f64) -> DialecticResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DialecticError::validation(
            field,
            format!("must be positive, got {}", value),
        ))
    }
}

fn unit_interval(field: &str, value: f64) -> DialecticResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DialecticError::validation(
            field,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}

/// An ordered collection of nodes that moves as one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    pub children: Vec<NodeRef>,
    /// Policy last applied with `arrange`, if any.
    pub arrangement: Option<Arrangement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Shape(Shape),
    Group(Group),
}

/// A declared node with its resolved position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeRef,
    /// Optional human-readable name used in diagnostics.
    pub name: Option<String>,
    pub kind: NodeKind,
    pub bounds: Bounds,
}

impl Node {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn children(&self) -> &[NodeRef] {
        match &self.kind {
            NodeKind::Group(g) => &g.children,
            NodeKind::Shape(_) => &[],
        }
    }

    pub fn as_arrow(&self) -> Option<&Arrow> {
        match &self.kind {
            NodeKind::Shape(Shape::Arrow(a)) => Some(a),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Shape(Shape::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Short description for logs and tree printing.
    pub fn describe(&self) -> String {
        let what = match &self.kind {
            NodeKind::Shape(Shape::Rectangle(r)) => {
                format!("Rectangle {}x{}", r.width, r.height)
            }
            NodeKind::Shape(Shape::Text(t)) => format!("Text {:?}", t.content),
            NodeKind::Shape(Shape::Arrow(a)) if a.curved => "CurvedArrow".to_string(),
            NodeKind::Shape(Shape::Arrow(_)) => "Arrow".to_string(),
            NodeKind::Group(g) => format!("Group ({} children)", g.children.len()),
        };
        match &self.name {
            Some(name) => format!("{} '{}' {}", self.id, name, what),
            None => format!("{} {}", self.id, what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_validation() {
        assert!(Shape::from(Rectangle::new(6.0, 2.0)).validate().is_ok());
        assert!(Shape::from(Rectangle::new(0.0, 2.0)).validate().is_err());
        assert!(Shape::from(Rectangle::new(6.0, -2.0)).validate().is_err());
        assert!(Shape::from(Rectangle::new(f64::NAN, 2.0)).validate().is_err());
        assert!(Shape::from(Rectangle::new(6.0, 2.0).with_fill_opacity(1.5))
            .validate()
            .is_err());
    }

    #[test]
    fn test_text_validation() {
        assert!(Shape::from(Text::new("BASE", 36.0)).validate().is_ok());
        assert!(Shape::from(Text::new("  ", 36.0)).validate().is_err());
        assert!(Shape::from(Text::new("BASE", 0.0)).validate().is_err());
    }

    #[test]
    fn test_bold_text_survives_the_plan() {
        let heading = Text::new("Forces of Production", 32.0).bold();
        let json = serde_json::to_value(&heading).unwrap();
        assert_eq!(json["style"], "Bold");
        let back: Text = serde_json::from_value(json).unwrap();
        assert_eq!(back.style, TextStyle::Bold);
        assert_eq!(back, heading);
    }

    #[test]
    fn test_arrow_validation() {
        let p = Point2D::new(1.0, 1.0);
        assert!(Shape::from(Arrow::new(p, p)).validate().is_err());
        let short = Arrow::new(Point2D::ORIGIN, Point2D::new(0.0, 0.3)).with_buff(0.2);
        assert!(Shape::from(short).validate().is_err());
        let flat = Arrow::new(Point2D::ORIGIN, Point2D::UP).curved(0.0);
        assert!(Shape::from(flat).validate().is_err());
    }

    #[test]
    fn test_arrow_buff_trims_both_ends() {
        let a = Arrow::new(Point2D::new(0.0, -1.0), Point2D::new(0.0, 1.0)).with_buff(0.2);
        let (tail, tip) = a.endpoints();
        assert!((tail.y + 0.8).abs() < 1e-9);
        assert!((tip.y - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_curved_arrow_path_ends_at_endpoints() {
        let a = Arrow::new(Point2D::new(-3.5, 2.0), Point2D::new(-3.5, -2.0)).curved(TAU / 4.0);
        let path = a.path_points();
        assert!(path[0].distance(&a.start) < 1e-9);
        assert!(path[path.len() - 1].distance(&a.end) < 1e-9);
    }

    #[test]
    fn test_curved_arrow_bulges_left_of_downward_chord() {
        // Travelling downward with a counterclockwise bend, the arc swings out to -x.
        let a = Arrow::new(Point2D::new(-3.5, 2.0), Point2D::new(-3.5, -2.0)).curved(TAU / 4.0);
        let bounds = Shape::from(a).initial_bounds(&TextMetrics::default());
        assert!(bounds.left() < -3.5 - 0.8);
        assert!((bounds.right() + 3.5).abs() < 1e-6);
        assert!((bounds.height - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_text_bounds_follow_metrics() {
        let bounds = Shape::from(Text::new("Police", 24.0)).initial_bounds(&TextMetrics::default());
        // em = 0.25: 6 chars * 0.6 em = 0.9 wide, 1.2 em = 0.3 tall
        assert!((bounds.width - 0.9).abs() < 1e-9);
        assert!((bounds.height - 0.3).abs() < 1e-9);
        assert_eq!(bounds.center, Point2D::ORIGIN);
    }
}
