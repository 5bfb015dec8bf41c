//! Orientation transforms for placed components.
//!
//! Components rotate in quadrant steps and may be mirrored; pin offsets are
//! pushed through the owner's transform before any branch is emitted. The
//! quadrant matrices are exact integer matrices, so an offset component that
//! is zero stays exactly zero after transformation — the shorts detection in
//! discovery depends on that.

use nalgebra::{Matrix2, Vector2};

/// Quadrant rotation, counterclockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// The exact rotation matrix.
    pub fn matrix(self) -> Matrix2<f64> {
        match self {
            Rotation::R0 => Matrix2::new(1.0, 0.0, 0.0, 1.0),
            Rotation::R90 => Matrix2::new(0.0, -1.0, 1.0, 0.0),
            Rotation::R180 => Matrix2::new(-1.0, 0.0, 0.0, -1.0),
            Rotation::R270 => Matrix2::new(0.0, 1.0, -1.0, 0.0),
        }
    }
}

/// A component's active rotation, mirror and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Rotation,
    /// Mirror across the local X axis, applied before rotation.
    pub mirrored: bool,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Rotation::R0,
            mirrored: false,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// The combined transform matrix.
    pub fn matrix(&self) -> Matrix2<f64> {
        let mirror = if self.mirrored {
            Matrix2::new(1.0, 0.0, 0.0, -1.0)
        } else {
            Matrix2::identity()
        };
        self.rotation.matrix() * mirror * self.scale
    }

    /// Transform a local offset into the global frame.
    pub fn apply(&self, local: Vector2<f64>) -> Vector2<f64> {
        self.matrix() * local
    }
}
