use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DialecticError, DialecticResult};
use crate::math::Size2D;

/// Conventional config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "dialectic.toml";

/// Which animation engine receives scene plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Write the JSON plan only.
    #[default]
    Manifest,
    /// Write the JSON plan and hand it to an external renderer process.
    Command,
}

impl std::str::FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manifest" => Ok(EngineKind::Manifest),
            "command" => Ok(EngineKind::Command),
            other => Err(format!(
                "unknown engine '{}', expected 'manifest' or 'command'",
                other
            )),
        }
    }
}

/// External renderer invocation. Arguments may contain the placeholders
/// `{manifest}`, `{scene}`, `{output_dir}`, `{width}`, `{height}` and `{fps}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            program: "manim-json".to_string(),
            args: vec![
                "{manifest}".to_string(),
                "--output".to_string(),
                "{output_dir}".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub resolution: String, // "WIDTHxHEIGHT"
    pub fps: u32,
    pub output_dir: PathBuf,
    pub engine: EngineKind,
    pub command: CommandConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: "1920x1080".to_string(),
            fps: 30,
            output_dir: PathBuf::from("media"),
            engine: EngineKind::Manifest,
            command: CommandConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse `resolution` into `(width, height)` pixels.
    pub fn dimensions(&self) -> DialecticResult<(u32, u32)> {
        let invalid = || {
            DialecticError::validation(
                "render.resolution",
                format!("expected WIDTHxHEIGHT, got {:?}", self.resolution),
            )
        };
        let (w, h) = self.resolution.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok((width, height))
    }
}

/// Text extent estimation. Text is never shaped here, so layout uses a
/// monospace approximation scaled from the font size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextMetrics {
    /// Scene units per typographic point.
    pub units_per_point: f64,
    /// Horizontal advance of one character, in em.
    pub char_advance_em: f64,
    /// Height of one line, in em.
    pub line_height_em: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            units_per_point: 1.0 / 96.0,
            char_advance_em: 0.6,
            line_height_em: 1.2,
        }
    }
}

impl TextMetrics {
    /// Every factor must be finite and positive, or text boxes come out inverted.
    pub fn validate(&self) -> DialecticResult<()> {
        for (field, value) in [
            ("layout.units_per_point", self.units_per_point),
            ("layout.char_advance_em", self.char_advance_em),
            ("layout.line_height_em", self.line_height_em),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(DialecticError::validation(
                    field,
                    format!("must be a finite positive number, got {}", value),
                ));
            }
        }
        Ok(())
    }

    /// Estimated bounding size of `content` set at `font_size`.
    pub fn measure(&self, content: &str, font_size: f64) -> Size2D {
        let em = font_size * self.units_per_point;
        let lines = content.lines().count().max(1);
        let widest = content
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        Size2D::new(
            widest as f64 * self.char_advance_em * em,
            lines as f64 * self.line_height_em * em,
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DialecticConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default, rename = "layout")]
    pub text_metrics: TextMetrics,
}

impl DialecticConfig {
    pub fn load_from_file(path: &Path) -> DialecticResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents).map_err(|e| match e {
            DialecticError::Config { message, .. } => DialecticError::config(message, path),
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> DialecticResult<Self> {
        let config: DialecticConfig = toml::from_str(contents)
            .map_err(|e| DialecticError::config(e.to_string(), CONFIG_FILE_NAME))?;
        config.render.dimensions()?;
        if config.render.fps == 0 {
            return Err(DialecticError::validation("render.fps", "must be positive"));
        }
        config.text_metrics.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DialecticConfig::default();
        assert_eq!(config.render.dimensions().unwrap(), (1920, 1080));
        assert_eq!(config.render.engine, EngineKind::Manifest);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = DialecticConfig::from_toml(
            r#"
            [render]
            resolution = "1280x720"
            fps = 60
            output_dir = "out"
            engine = "command"

            [render.command]
            program = "my-renderer"
            args = ["{manifest}"]
            "#,
        )
        .unwrap();
        assert_eq!(config.render.dimensions().unwrap(), (1280, 720));
        assert_eq!(config.render.engine, EngineKind::Command);
        assert_eq!(config.render.command.program, "my-renderer");
        assert_eq!(config.text_metrics, TextMetrics::default());
    }

    #[test]
    fn test_reject_bad_resolution() {
        let err = DialecticConfig::from_toml(
            "[render]\nresolution = \"wide\"\nfps = 30\noutput_dir = \"media\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, DialecticError::Validation { .. }));
    }

    #[test]
    fn test_reject_zero_fps() {
        let err = DialecticConfig::from_toml(
            "[render]\nresolution = \"640x480\"\nfps = 0\noutput_dir = \"media\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("render.fps"));
    }

    #[test]
    fn test_text_metrics_measure() {
        let m = TextMetrics::default();
        let size = m.measure("BASE", 48.0);
        // em = 0.5 units: 4 chars * 0.6 em, 1 line * 1.2 em
        assert!((size.width - 1.2).abs() < 1e-9);
        assert!((size.height - 0.6).abs() < 1e-9);

        let two_lines = m.measure("Labor\nPower", 48.0);
        assert!((two_lines.height - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_reject_bad_text_metrics() {
        for layout in [
            "units_per_point = -1.0",
            "char_advance_em = 0.0",
            "line_height_em = nan",
        ] {
            let err = DialecticConfig::from_toml(&format!("[layout]\n{}\n", layout)).unwrap_err();
            assert!(err.to_string().contains("layout."), "{}", err);
        }
        assert!(DialecticConfig::from_toml("[layout]\nunits_per_point = 0.02\n").is_ok());
    }

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!("command".parse::<EngineKind>().unwrap(), EngineKind::Command);
        assert!("ffmpeg".parse::<EngineKind>().is_err());
    }
}
