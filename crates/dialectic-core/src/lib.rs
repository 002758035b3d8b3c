//! # dialectic-core
//!
//! Core types and primitives for dialectic diagram scenes.
//! This crate contains foundational types shared across all dialectic crates:
//! colors, scene-unit vectors, durations, configuration, hashing and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod hash;
pub mod math;
pub mod time;

pub use config::*;

pub use color::Color;
pub use error::{DialecticError, DialecticResult};
pub use hash::ContentHash;
pub use math::{Point2D, Size2D};
pub use time::Duration;
