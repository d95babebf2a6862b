//! Perspective camera producing reverse-Z view and projection matrices.

use glam::{Mat4, Quat, Vec3};

use crate::pipeline::CameraUniform;

/// Vertical field of view, in degrees, at which a plane `camera_z` units away
/// spans exactly `client_height` units top to bottom.
pub fn vertical_fov_degrees(client_height: f32, camera_z: f32) -> f32 {
    (2.0 * (client_height / 2.0 / camera_z).atan()).to_degrees()
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Identity looks down -Z with +Y up.
    pub rotation: Quat,
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width / height.
        aspect_ratio: f32,
    },
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: fov_y_degrees.to_radians(),
                aspect_ratio,
            },
            near,
            far,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn fov_y_degrees(&self) -> f32 {
        match self.projection {
            Projection::Perspective { fov_y, .. } => fov_y.to_degrees(),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        match self.projection {
            Projection::Perspective { aspect_ratio, .. } => aspect_ratio,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Projection with reverse-Z: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => Mat4::perspective_rh(fov_y, aspect_ratio, self.far, self.near),
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Uniform for GPU upload; `viewport` is the render target size in pixels.
    pub fn to_uniform(&self, viewport: (u32, u32)) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [self.position.x, self.position.y, self.position.z, 0.0],
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32, 0.0, 0.0],
        }
    }
}
