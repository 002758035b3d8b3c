//! # dialectic-ir
//!
//! The scene description layer: a flat arena of shapes and groups with
//! resolved positions, plus the ordered animation steps that reveal them.
//!
//! Scenes are written with [`SceneScript`], which resolves layout as each
//! operation is issued, and handed to a renderer as a plain [`Scene`] value.

pub mod animation;
pub mod builder;
pub mod camera;
pub mod layout;
pub mod node;
pub mod scene;
pub mod validate;

pub use animation::{AnimationStep, Effect, StepOptions};
pub use builder::SceneScript;
pub use camera::CameraState;
pub use layout::{arrange, Arrangement, Bounds, Direction};
pub use node::{Arrow, Group, Node, NodeKind, NodeRef, Rectangle, Shape, Text, TextStyle};
pub use scene::Scene;
pub use validate::{validate_catalog, validate_scene};
