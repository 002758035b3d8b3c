use serde::{Deserialize, Serialize};

use dialectic_core::{Point2D, Size2D};

/// Default gap between neighbouring objects (`arrange`, `next_to`).
pub const DEFAULT_BUFF: f64 = 0.25;

/// Default margin between an object and the frame edge (`to_edge`).
pub const DEFAULT_EDGE_BUFF: f64 = 0.5;

/// One of the four screen directions. Also names the edge of a box that
/// faces that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector pointing this way.
    pub fn unit(self) -> Point2D {
        match self {
            Direction::Up => Point2D::UP,
            Direction::Down => Point2D::DOWN,
            Direction::Left => Point2D::LEFT,
            Direction::Right => Point2D::RIGHT,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Axis-aligned bounding box, stored as centre plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Point2D,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(center: Point2D, size: Size2D) -> Self {
        Self {
            center,
            width: size.width,
            height: size.height,
        }
    }

    /// A box of the given size centred on the origin.
    pub fn at_origin(size: Size2D) -> Self {
        Self::new(Point2D::ORIGIN, size)
    }

    /// Smallest box containing every point.
    pub fn enclosing(points: impl IntoIterator<Item = Point2D>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::from_corners(min, max))
    }

    fn from_corners(min: Point2D, max: Point2D) -> Self {
        Self {
            center: min.midpoint(&max),
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    pub fn top(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    /// Midpoint of the edge facing `direction`.
    pub fn edge_point(&self, direction: Direction) -> Point2D {
        match direction {
            Direction::Up => Point2D::new(self.center.x, self.top()),
            Direction::Down => Point2D::new(self.center.x, self.bottom()),
            Direction::Left => Point2D::new(self.left(), self.center.y),
            Direction::Right => Point2D::new(self.right(), self.center.y),
        }
    }

    /// Extent along the axis of `direction`.
    pub fn extent_along(&self, direction: Direction) -> f64 {
        if direction.is_vertical() {
            self.height
        } else {
            self.width
        }
    }

    pub fn translated(&self, delta: Point2D) -> Self {
        Self {
            center: self.center + delta,
            ..*self
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Bounds) -> Self {
        Self::from_corners(
            Point2D::new(self.left().min(other.left()), self.bottom().min(other.bottom())),
            Point2D::new(self.right().max(other.right()), self.top().max(other.top())),
        )
    }

    /// Union of many boxes; a zero-size box at the origin when empty.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Bounds>) -> Self {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_else(|| Bounds::at_origin(Size2D::new(0.0, 0.0)))
    }
}

/// The rule a group uses to place its children: stack them along
/// `direction`, `spacing` units apart, lined up on `align` (centred when `None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub direction: Direction,
    pub align: Option<Direction>,
    pub spacing: f64,
}

impl Arrangement {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            align: None,
            spacing: DEFAULT_BUFF,
        }
    }

    /// A downward column, children left-aligned.
    pub fn column() -> Self {
        Self::new(Direction::Down).aligned(Direction::Left)
    }

    /// A left-to-right row, children centred vertically.
    pub fn row(spacing: f64) -> Self {
        Self::new(Direction::Right).with_spacing(spacing)
    }

    pub fn aligned(mut self, edge: Direction) -> Self {
        self.align = Some(edge);
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }
}

/// Stack boxes of the given sizes according to `policy`.
///
/// Returns one box per input, in order. The stack as a whole is centred on
/// the origin; callers translate it to the group's position. Along the stack
/// axis consecutive boxes are exactly `policy.spacing` apart edge to edge. An
/// alignment edge parallel to the stack axis has no effect.
pub fn arrange(sizes: &[Size2D], policy: &Arrangement) -> Vec<Bounds> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let vertical = policy.direction.is_vertical();
    let main = |s: &Size2D| if vertical { s.height } else { s.width };
    let cross = |s: &Size2D| if vertical { s.width } else { s.height };

    let total: f64 =
        sizes.iter().map(main).sum::<f64>() + policy.spacing * (sizes.len() - 1) as f64;
    let widest = sizes.iter().map(cross).fold(0.0_f64, f64::max);
    let axis = policy.direction.unit();

    let mut cursor = -total / 2.0;
    let mut placed = Vec::with_capacity(sizes.len());
    for size in sizes {
        let along = cursor + main(size) / 2.0;
        cursor += main(size) + policy.spacing;

        let slack = (widest - cross(size)) / 2.0;
        let across = match (vertical, policy.align) {
            (true, Some(Direction::Left)) | (false, Some(Direction::Down)) => -slack,
            (true, Some(Direction::Right)) | (false, Some(Direction::Up)) => slack,
            _ => 0.0,
        };

        let offset = if vertical {
            Point2D::new(across, axis.y * along)
        } else {
            Point2D::new(axis.x * along, across)
        };
        placed.push(Bounds::new(offset, *size));
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> Vec<Size2D> {
        vec![
            Size2D::new(3.0, 0.5),
            Size2D::new(1.0, 0.5),
            Size2D::new(2.0, 1.0),
        ]
    }

    #[test]
    fn test_bounds_edges() {
        let b = Bounds::new(Point2D::new(0.0, 2.0), Size2D::new(6.0, 2.0));
        assert!((b.top() - 3.0).abs() < 1e-9);
        assert!((b.bottom() - 1.0).abs() < 1e-9);
        assert!((b.left() + 3.0).abs() < 1e-9);
        assert!((b.right() - 3.0).abs() < 1e-9);
        assert_eq!(b.edge_point(Direction::Up), Point2D::new(0.0, 3.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(Point2D::new(-2.0, 0.0), Size2D::new(2.0, 2.0));
        let b = Bounds::new(Point2D::new(2.0, 1.0), Size2D::new(2.0, 2.0));
        let u = a.union(&b);
        assert!((u.width - 6.0).abs() < 1e-9);
        assert!((u.height - 3.0).abs() < 1e-9);
        assert_eq!(u.center, Point2D::new(0.0, 0.5));
    }

    #[test]
    fn test_bounds_enclosing() {
        let b = Bounds::enclosing([Point2D::new(0.0, -1.0), Point2D::new(0.0, 1.0)]).unwrap();
        assert_eq!(b.width, 0.0);
        assert!((b.height - 2.0).abs() < 1e-9);
        assert!(Bounds::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_arrange_down_centred() {
        let placed = arrange(&sizes(), &Arrangement::new(Direction::Down).with_spacing(0.5));
        // total height = 0.5 + 0.5 + 1.0 + 2 * 0.5 = 3.0
        assert!((placed[0].top() - 1.5).abs() < 1e-9);
        assert!((placed[2].bottom() + 1.5).abs() < 1e-9);
        for b in &placed {
            assert!(b.center.x.abs() < 1e-9);
        }
    }

    #[test]
    fn test_arrange_down_left_aligned() {
        let placed = arrange(&sizes(), &Arrangement::column().with_spacing(0.0));
        for b in &placed {
            assert!((b.left() + 1.5).abs() < 1e-9);
        }
        assert!(placed[0].center.y > placed[1].center.y);
        assert!(placed[1].center.y > placed[2].center.y);
    }

    #[test]
    fn test_arrange_up_reverses_order() {
        let placed = arrange(&sizes(), &Arrangement::new(Direction::Up));
        assert!(placed[0].center.y < placed[1].center.y);
        assert!(placed[1].center.y < placed[2].center.y);
    }

    #[test]
    fn test_arrange_right_bottom_aligned() {
        let placed = arrange(&sizes(), &Arrangement::row(1.0).aligned(Direction::Down));
        for pair in placed.windows(2) {
            assert!((pair[1].left() - pair[0].right() - 1.0).abs() < 1e-9);
        }
        for b in &placed {
            assert!((b.bottom() + 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_arrange_parallel_alignment_ignored() {
        let centred = arrange(&sizes(), &Arrangement::new(Direction::Down));
        let parallel = arrange(&sizes(), &Arrangement::new(Direction::Down).aligned(Direction::Up));
        assert_eq!(centred, parallel);
    }

    #[test]
    fn test_arrange_empty() {
        assert!(arrange(&[], &Arrangement::column()).is_empty());
    }
}
