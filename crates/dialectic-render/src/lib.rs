//! # dialectic-render
//!
//! Hands built scenes to an animation engine. Interpolation, text shaping and
//! encoding all happen inside the engine; this crate only prepares the plan,
//! invokes the engine and reports what it produced.

pub mod command;
pub mod engine;
pub mod manifest;
pub mod pipeline;

pub use command::CommandEngine;
pub use engine::{AnimationEngine, RenderResult, RenderSettings};
pub use manifest::{Manifest, ManifestEngine};
pub use pipeline::RenderPipeline;
