//! Directional light: an infinitely distant source placed by position and
//! shining toward a target.
//!
//! [`DirectionalLight`] is the scene-side description; [`DirectionalLightUniform`]
//! is what the Lambert shader reads.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::color::Color;

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    /// Where the light sits. Only the direction toward `target` matters.
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Color::WHITE, 1.0)
    }
}

impl DirectionalLight {
    /// A light straight above the origin.
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            position: Vec3::Y,
            target: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Unit vector pointing from the light toward its target.
    ///
    /// Falls back to straight down when position and target coincide.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Y)
    }

    pub fn to_uniform(&self) -> DirectionalLightUniform {
        let d = self.direction();
        let [r, g, b] = self.color.to_linear();
        DirectionalLightUniform {
            direction_intensity: [d.x, d.y, d.z, self.intensity],
            color_padding: [r, g, b, 0.0],
        }
    }

    /// Uniform for a scene without lights: zero intensity.
    pub fn unlit_uniform() -> DirectionalLightUniform {
        DirectionalLightUniform {
            direction_intensity: [0.0, -1.0, 0.0, 0.0],
            color_padding: [0.0; 4],
        }
    }
}

/// GPU-side representation, 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    /// xyz = direction, w = intensity.
    pub direction_intensity: [f32; 4],
    /// xyz = linear colour, w = padding.
    pub color_padding: [f32; 4],
}
