mod scenes;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use dialectic_core::{DialecticConfig, EngineKind, CONFIG_FILE_NAME};
use dialectic_ir::{validate_catalog, Node, Scene};
use dialectic_render::{
    AnimationEngine, CommandEngine, Manifest, ManifestEngine, RenderPipeline, RenderSettings,
};

use scenes::{Palette, CATALOG};

#[derive(Parser)]
#[command(
    name = "dialectic",
    version,
    about = "Dialectic: animated diagrams of the base and superstructure",
    long_about = "Builds declarative diagram scenes and hands them to an animation engine.\nScenes are selected by name; run `dialectic list` to see them."
)]
struct Cli {
    /// Configuration file (default: ./dialectic.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available scenes
    List,

    /// Print a scene's node tree and animation steps
    Inspect {
        /// Scene name
        #[arg()]
        scene: String,
    },

    /// Build and validate scenes without rendering
    Check {
        /// Scene name (default: every scene)
        #[arg()]
        scene: Option<String>,
    },

    /// Write a scene's render manifest as JSON
    Plan {
        /// Scene name
        #[arg()]
        scene: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render scenes with the configured engine
    Render {
        /// Scene names, rendered in the order given
        #[arg()]
        scenes: Vec<String>,

        /// Render every scene in the catalog
        #[arg(long, conflicts_with = "scenes")]
        all: bool,

        /// Engine: manifest or command (default: from config)
        #[arg(long)]
        engine: Option<EngineKind>,

        /// Output directory (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version and engine info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `plan` output on stdout stays clean JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Inspect { scene } => cmd_inspect(&scene, &config),
        Commands::Check { scene } => cmd_check(scene.as_deref(), &config),
        Commands::Plan { scene, output } => cmd_plan(&scene, output, &config),
        Commands::Render {
            scenes,
            all,
            engine,
            output,
        } => cmd_render(scenes, all, engine, output, &config),
        Commands::Info => cmd_info(&config),
    }
}

/// An explicit `--config` must load; the default file is best effort.
fn load_config(explicit: Option<&Path>) -> Result<DialecticConfig> {
    if let Some(path) = explicit {
        return DialecticConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()));
    }
    let default_path = Path::new(CONFIG_FILE_NAME);
    if !default_path.exists() {
        return Ok(DialecticConfig::default());
    }
    match DialecticConfig::load_from_file(default_path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
            Ok(DialecticConfig::default())
        }
    }
}

fn build_scene(name: &str, config: &DialecticConfig) -> Result<Scene> {
    let entry = scenes::lookup(name)?;
    entry
        .build(&Palette::default(), &config.text_metrics)
        .with_context(|| format!("failed to build scene '{}'", entry.name))
}

fn cmd_list() -> Result<()> {
    println!("🎬 Scenes ({} total)", CATALOG.len());
    for (i, entry) in CATALOG.iter().enumerate() {
        let prefix = if i == CATALOG.len() - 1 {
            "└──"
        } else {
            "├──"
        };
        println!("{} {:<22} {}", prefix, entry.name, entry.summary);
    }
    Ok(())
}

fn cmd_inspect(name: &str, config: &DialecticConfig) -> Result<()> {
    let scene = build_scene(name, config)?;
    let fps = config.render.fps as f64;

    println!("🔍 Dialectic Scene Inspector");
    println!(
        "🎞️  Scene '{}' [{}, {} frames @ {}fps] background {}",
        scene.name,
        scene.duration(),
        scene.frame_count(fps),
        fps,
        scene.background
    );
    println!(
        "📷 Camera: center ({:.2}, {:.2}), width {:.2}",
        scene.camera.center.x, scene.camera.center.y, scene.camera.width
    );

    let roots = scene.roots();
    println!("├── 📦 Nodes ({} total)", scene.nodes.len());
    for (i, node) in roots.iter().enumerate() {
        print_node(&scene, node, "│   ", i == roots.len() - 1);
    }

    println!("└── ⏱️  Steps ({} total)", scene.steps.len());
    let mut at = 0.0;
    for (i, step) in scene.steps.iter().enumerate() {
        let prefix = if i == scene.steps.len() - 1 {
            "└──"
        } else {
            "├──"
        };
        let run_time = step.effective_run_time();
        let mut line = format!("    {} [{:>5.2}s] {}", prefix, at, step.effect);
        if !step.targets.is_empty() {
            line.push_str(&format!(" → {}", join_refs(&step.targets)));
        }
        if !step.labels.is_empty() {
            line.push_str(&format!(" + labels {}", join_refs(&step.labels)));
        }
        line.push_str(&format!(" ({})", run_time));
        println!("{}", line);
        at += run_time.as_seconds();
    }

    Ok(())
}

fn print_node(scene: &Scene, node: &Node, indent: &str, is_last: bool) {
    let prefix = if is_last { "└──" } else { "├──" };
    let b = node.bounds;
    println!(
        "{}{} {} @ ({:.2}, {:.2}) {:.2}x{:.2}",
        indent,
        prefix,
        node.describe(),
        b.center.x,
        b.center.y,
        b.width,
        b.height
    );

    let child_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        if let Some(child) = scene.node(*child) {
            print_node(scene, child, &child_indent, i == children.len() - 1);
        }
    }
}

fn join_refs(refs: &[dialectic_ir::NodeRef]) -> String {
    refs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_check(name: Option<&str>, config: &DialecticConfig) -> Result<()> {
    let names: Vec<&str> = match name {
        Some(name) => vec![scenes::lookup(name)?.name],
        None => CATALOG.iter().map(|e| e.name).collect(),
    };

    println!("🔍 Checking {} scene(s)", names.len());
    let mut built = Vec::with_capacity(names.len());
    for name in names {
        let scene = build_scene(name, config)?;
        println!(
            "   ✓ {} ({} nodes, {} steps, {})",
            scene.name,
            scene.nodes.len(),
            scene.steps.len(),
            scene.duration()
        );
        built.push(scene);
    }

    validate_catalog(&built).map_err(|errors| {
        let msgs: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Validation errors:\n  {}", msgs.join("\n  "))
    })?;
    println!("   ✓ Validate OK");

    println!();
    println!("   ✅ No errors found.");
    Ok(())
}

fn cmd_plan(name: &str, output: Option<PathBuf>, config: &DialecticConfig) -> Result<()> {
    let scene = build_scene(name, config)?;
    let settings = RenderSettings::from_config(&config.render)?;
    let json = Manifest::new(&scene, &settings).to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write plan: {}", path.display()))?;
            eprintln!("📝 Wrote plan for '{}' to {}", scene.name, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_render(
    names: Vec<String>,
    all: bool,
    engine: Option<EngineKind>,
    output: Option<PathBuf>,
    config: &DialecticConfig,
) -> Result<()> {
    let names: Vec<String> = if all {
        CATALOG.iter().map(|e| e.name.to_string()).collect()
    } else {
        names
    };
    if names.is_empty() {
        anyhow::bail!("no scenes given; name one or more scenes, or pass --all");
    }

    let mut settings = RenderSettings::from_config(&config.render)?;
    if let Some(dir) = output {
        settings = settings.with_output_dir(dir);
    }

    let engine: Box<dyn AnimationEngine> = match engine.unwrap_or(config.render.engine) {
        EngineKind::Manifest => Box::new(ManifestEngine::new()),
        EngineKind::Command => Box::new(CommandEngine::from_config(&config.render.command)),
    };

    println!(
        "🎬 Rendering {} scene(s) with {} engine → {}",
        names.len(),
        engine.name(),
        settings.output_dir.display()
    );

    let start = Instant::now();
    for name in &names {
        let scene = build_scene(name, config)?;
        let result = RenderPipeline::run(&scene, engine.as_ref(), &settings)
            .with_context(|| format!("scene '{}' failed", scene.name))?;
        println!(
            "   ✓ {} [{}, {} frames] plan {}",
            result.scene,
            result.duration,
            result.frame_count(settings.fps),
            result.plan_hash.short()
        );
        for path in &result.outputs {
            println!("     📄 {}", path.display());
        }
    }

    println!();
    println!(
        "   ✅ Done in {:.1}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn cmd_info(config: &DialecticConfig) -> Result<()> {
    let command = CommandEngine::from_config(&config.render.command);
    println!("🎬 Dialectic");
    println!("   Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("   Scenes:     {}", CATALOG.len());
    println!(
        "   Output:     {} @ {}fps → {}",
        config.render.resolution,
        config.render.fps,
        config.render.output_dir.display()
    );
    println!("   Engine:     {:?}", config.render.engine);
    println!(
        "   Renderer:   {} ({})",
        command.program(),
        if command.is_available() {
            "available ✓"
        } else {
            "NOT FOUND ✗"
        }
    );
    println!(
        "   Config:     {}",
        if Path::new(CONFIG_FILE_NAME).exists() {
            CONFIG_FILE_NAME
        } else {
            "defaults"
        }
    );
    Ok(())
}
