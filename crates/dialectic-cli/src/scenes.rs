//! The diagram catalog: the base/superstructure overview, two zooms onto its
//! halves, and a detail scene for each half.

use std::f64::consts::TAU;

use dialectic_core::{Color, DialecticError, DialecticResult, Point2D, TextMetrics};
use dialectic_ir::camera::DEFAULT_ZOOM_MARGIN;
use dialectic_ir::layout::{DEFAULT_BUFF, DEFAULT_EDGE_BUFF};
use dialectic_ir::{
    Arrangement, Arrow, Direction, Effect, NodeRef, Rectangle, Scene, SceneScript, StepOptions,
    Text,
};

/// Colors shared by every scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub base: Color,
    pub superstructure: Color,
    pub text: Color,
    pub muted: Color,
    pub background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color::PURPLE,
            superstructure: Color::RED,
            text: Color::WHITE,
            muted: Color::GRAY,
            background: Color::rgb(26.0 / 255.0, 26.0 / 255.0, 26.0 / 255.0),
        }
    }
}

type BuildFn = fn(&Palette, &TextMetrics) -> DialecticResult<Scene>;

/// A scene that can be selected by name.
pub struct SceneEntry {
    pub name: &'static str,
    pub summary: &'static str,
    build: BuildFn,
}

impl SceneEntry {
    pub fn build(&self, palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
        (self.build)(palette, metrics)
    }
}

pub static CATALOG: [SceneEntry; 5] = [
    SceneEntry {
        name: "Overview",
        summary: "Base and superstructure with determination and reproduction arrows",
        build: overview,
    },
    SceneEntry {
        name: "ZoomBase",
        summary: "Camera moves onto the base",
        build: zoom_base,
    },
    SceneEntry {
        name: "ZoomSuperstructure",
        summary: "Camera moves onto the superstructure",
        build: zoom_superstructure,
    },
    SceneEntry {
        name: "BaseDetail",
        summary: "Relations and forces of production",
        build: base_detail,
    },
    SceneEntry {
        name: "SuperstructureDetail",
        summary: "Repressive and ideological state apparatuses",
        build: superstructure_detail,
    },
];

/// Find a scene by name, ignoring ASCII case.
pub fn lookup(name: &str) -> DialecticResult<&'static SceneEntry> {
    CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| DialecticError::UnknownScene(name.to_string()))
}

pub fn build_all(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Vec<Scene>> {
    CATALOG
        .iter()
        .map(|entry| entry.build(palette, metrics))
        .collect()
}

fn script(name: &str, palette: &Palette, metrics: &TextMetrics) -> SceneScript {
    let mut s = SceneScript::with_metrics(name, *metrics);
    s.set_background(palette.background);
    s
}

/// A captioned 6x2 box, one half of the overview.
struct Block {
    frame: NodeRef,
    title: NodeRef,
    subtitle: Option<NodeRef>,
}

impl Block {
    fn captions(&self) -> Vec<NodeRef> {
        std::iter::once(self.title).chain(self.subtitle).collect()
    }
}

fn block(
    s: &mut SceneScript,
    key: &str,
    color: Color,
    caption: &str,
    subtitle: Option<(&str, Color)>,
    offset: Point2D,
) -> DialecticResult<Block> {
    let frame = s.define_shape(
        Rectangle::new(6.0, 2.0)
            .with_stroke(color)
            .with_fill_opacity(0.2),
    )?;
    s.shift(frame, offset)?.set_name(frame, key)?;

    let title = s.define_shape(Text::new(caption, 36.0).with_color(color))?;
    s.move_to(title, frame)?
        .set_name(title, format!("{}.title", key))?;

    let subtitle = match subtitle {
        Some((text, muted)) => {
            let sub = s.define_shape(Text::new(text, 20.0).with_color(muted))?;
            s.next_to(sub, title, Direction::Down, DEFAULT_BUFF)?
                .set_name(sub, format!("{}.subtitle", key))?;
            Some(sub)
        }
        None => None,
    };

    Ok(Block {
        frame,
        title,
        subtitle,
    })
}

fn overview(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
    let mut s = script("Overview", palette, metrics);

    let superstructure = block(
        &mut s,
        "superstructure",
        palette.superstructure,
        "SUPERSTRUCTURE",
        Some(("(Ideology & Political-Legal)", palette.muted)),
        Point2D::UP * 2.0,
    )?;
    let base = block(
        &mut s,
        "base",
        palette.base,
        "BASE",
        Some(("(Mode of Production)", palette.muted)),
        Point2D::DOWN * 2.0,
    )?;

    // Determination runs up from the base.
    let arrow = s
        .arrow_between(base.frame, Direction::Up, superstructure.frame, Direction::Down)?
        .with_color(palette.text)
        .with_buff(0.2);
    let determines = s.define_shape(arrow)?;
    let determines_label = s.define_shape(Text::new("Determines", 16.0).italic())?;
    s.set_name(determines, "determines")?
        .next_to(determines_label, determines, Direction::Right, DEFAULT_BUFF)?;

    // Reproduction loops back down on the left.
    let start = s.edge_point(superstructure.frame, Direction::Left)? + Point2D::LEFT * 0.5;
    let end = s.edge_point(base.frame, Direction::Left)? + Point2D::LEFT * 0.5;
    let reproduces = s.define_shape(
        Arrow::new(start, end)
            .with_color(palette.text)
            .curved(TAU / 4.0),
    )?;
    let reproduces_label = s.define_shape(Text::new("Reproduces", 16.0).italic())?;
    s.set_name(reproduces, "reproduces")?
        .next_to(reproduces_label, reproduces, Direction::Left, DEFAULT_BUFF)?;

    s.add_step(
        Effect::Draw,
        &[base.frame],
        StepOptions::default().with_labels(base.captions()),
    )?
    .add_step(
        Effect::Draw,
        &[superstructure.frame],
        StepOptions::default().with_labels(superstructure.captions()),
    )?
    .add_step(
        Effect::GrowArrow,
        &[determines],
        StepOptions::default().with_labels([determines_label]),
    )?
    .add_step(
        Effect::Create,
        &[reproduces],
        StepOptions::default().with_labels([reproduces_label]),
    )?
    .wait(2.0)?;

    Ok(s.build())
}

fn zoom_onto(
    name: &str,
    key: &str,
    color: Color,
    caption: &str,
    offset: Point2D,
    palette: &Palette,
    metrics: &TextMetrics,
) -> DialecticResult<Scene> {
    let mut s = script(name, palette, metrics);
    let target = block(&mut s, key, color, caption, None, offset)?;

    s.add(&[target.frame, target.title])?
        .zoom_to(target.frame, DEFAULT_ZOOM_MARGIN, 1.5)?
        .play(Effect::FadeOut, &[target.title])?;

    Ok(s.build())
}

fn zoom_base(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
    zoom_onto(
        "ZoomBase",
        "base",
        palette.base,
        "BASE",
        Point2D::DOWN * 2.0,
        palette,
        metrics,
    )
}

fn zoom_superstructure(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
    zoom_onto(
        "ZoomSuperstructure",
        "superstructure",
        palette.superstructure,
        "SUPERSTRUCTURE",
        Point2D::UP * 2.0,
        palette,
        metrics,
    )
}

/// A heading over a left-aligned list.
struct Column<'a> {
    key: &'a str,
    heading: &'a str,
    color: Color,
    items: &'a [&'a str],
}

fn column(s: &mut SceneScript, def: &Column<'_>, palette: &Palette) -> DialecticResult<NodeRef> {
    let heading = s.define_shape(Text::new(def.heading, 32.0).with_color(def.color))?;
    let items = def
        .items
        .iter()
        .map(|item| s.define_shape(Text::new(*item, 24.0).with_color(palette.text)))
        .collect::<DialecticResult<Vec<_>>>()?;

    let list = s.group(&items)?;
    s.arrange(list, Arrangement::column())?;
    let column = s.group(&[heading, list])?;
    s.arrange(column, Arrangement::column())?;

    s.set_name(list, format!("{}.items", def.key))?
        .set_name(column, def.key)?;
    Ok(column)
}

fn detail(
    name: &str,
    (title, title_color): (&str, Color),
    columns: [Column<'_>; 2],
    reveal_shift: Point2D,
    palette: &Palette,
    metrics: &TextMetrics,
) -> DialecticResult<Scene> {
    let mut s = script(name, palette, metrics);

    let title = s.define_shape(Text::new(title, 48.0).with_color(title_color))?;
    s.to_edge(title, Direction::Up, DEFAULT_EDGE_BUFF)?
        .set_name(title, "title")?;

    let mut placed = Vec::with_capacity(columns.len());
    for def in &columns {
        placed.push(column(&mut s, def, palette)?);
    }
    let content = s.group(&placed)?;
    s.arrange(content, Arrangement::row(2.0))?;
    s.set_name(content, "content")?;

    s.play(Effect::Write, &[title])?
        .play(
            Effect::FadeIn {
                shift: Some(reveal_shift),
            },
            &[content],
        )?
        .wait(2.0)?;

    Ok(s.build())
}

fn base_detail(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
    detail(
        "BaseDetail",
        ("RELATIONS & FORCES", palette.base),
        [
            Column {
                key: "relations",
                heading: "Relations of Production",
                color: Color::PURPLE_A,
                items: &["Bourgeoisie / Proletariat", "Exploitation", "Capital"],
            },
            Column {
                key: "forces",
                heading: "Forces of Production",
                color: Color::BLUE,
                items: &["Labor Power", "Tools & Tech", "Raw Materials"],
            },
        ],
        Point2D::UP,
        palette,
        metrics,
    )
}

fn superstructure_detail(palette: &Palette, metrics: &TextMetrics) -> DialecticResult<Scene> {
    detail(
        "SuperstructureDetail",
        ("IDEOLOGY & STATE", palette.superstructure),
        [
            Column {
                key: "rsa",
                heading: "RSA (Repressive)",
                color: Color::RED_A,
                items: &["Police", "Army", "Courts"],
            },
            Column {
                key: "isa",
                heading: "ISA (Ideological)",
                color: Color::ORANGE,
                items: &["School", "Family", "Media", "Religion"],
            },
        ],
        Point2D::DOWN,
        palette,
        metrics,
    )
}
