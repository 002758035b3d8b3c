use serde::{Deserialize, Serialize};

use dialectic_core::Point2D;

use crate::layout::Bounds;

/// Height of the default camera frame in scene units.
pub const FRAME_HEIGHT: f64 = 8.0;

/// Width of the default camera frame in scene units (16:9).
pub const FRAME_WIDTH: f64 = FRAME_HEIGHT * 16.0 / 9.0;

/// Margin factor used when zooming onto a node.
pub const DEFAULT_ZOOM_MARGIN: f64 = 1.2;

/// Where the camera looks and how much of the scene it shows.
///
/// Camera moves are explicit values carried by `Effect::CameraZoom`; nothing
/// mutates a shared camera while a scene is being described.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: Point2D,
    /// Visible width in scene units. Height follows from the 16:9 frame.
    pub width: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center: Point2D::ORIGIN,
            width: FRAME_WIDTH,
        }
    }
}

impl CameraState {
    pub fn new(center: Point2D, width: f64) -> Self {
        Self { center, width }
    }

    pub fn height(&self) -> f64 {
        self.width * FRAME_HEIGHT / FRAME_WIDTH
    }

    /// Visible region.
    pub fn viewport(&self) -> Bounds {
        Bounds {
            center: self.center,
            width: self.width,
            height: self.height(),
        }
    }

    /// Magnification relative to the default frame.
    pub fn zoom_factor(&self) -> f64 {
        FRAME_WIDTH / self.width
    }

    /// A camera centred on `target` that fits it with `margin` to spare.
    pub fn framing(target: &Bounds, margin: f64) -> Self {
        let fit_width = target.width.max(target.height * FRAME_WIDTH / FRAME_HEIGHT);
        Self {
            center: target.center,
            width: fit_width * margin,
        }
    }
}
