//! Spatially varying colors for textured materials.

use crate::{Color, ShadeRec};

/// A color that varies over a surface.
pub trait Texture: Send + Sync {
    /// Color at the hit point in `sr`.
    fn color(&self, sr: &ShadeRec) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct ConstantColor(pub Color);

impl Texture for ConstantColor {
    fn color(&self, _sr: &ShadeRec) -> Color {
        self.0
    }
}

/// Solid 3D checkerboard of cubes with edge `size`.
#[derive(Debug, Clone, Copy)]
pub struct Checker3D {
    pub size: f32,
    pub color1: Color,
    pub color2: Color,
}

impl Checker3D {
    /// Small offset so that axis-aligned surfaces lying exactly on a cell
    /// boundary (a ground plane at y = 0) do not alternate from noise.
    const BOUNDARY_OFFSET: f32 = -0.000_187_453_74;

    pub fn new(size: f32, color1: Color, color2: Color) -> Self {
        Self { size, color1, color2 }
    }

    /// Checker color at a world-space point.
    pub fn color_at(&self, p: wray_math::Vec3) -> Color {
        let cell = ((p + Self::BOUNDARY_OFFSET) / self.size).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.color1
        } else {
            self.color2
        }
    }
}

impl Texture for Checker3D {
    fn color(&self, sr: &ShadeRec) -> Color {
        self.color_at(sr.hit_point)
    }
}
