//! Surface descriptions attached to scene objects.

use std::sync::Arc;

use crate::color::Color;

/// Which faces of a primitive are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl Side {
    /// Face culled by the pipeline, assuming counter-clockwise front faces.
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }
}

/// How fragments combine with what is already in the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Blending {
    /// Source-over alpha blending.
    #[default]
    Normal,
    /// `src * src_alpha + dst`.
    Additive,
}

impl Blending {
    pub fn blend_state(self) -> wgpu::BlendState {
        match self {
            Blending::Normal => wgpu::BlendState::ALPHA_BLENDING,
            Blending::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

/// Diffuse-only material lit by the scene's directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LambertMaterial {
    pub color: Color,
    pub side: Side,
}

impl LambertMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            side: Side::Front,
        }
    }
}

/// CPU-side RGBA8 image used as a point sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Material for camera-facing point sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct PointsMaterial {
    /// World-space size, attenuated with distance.
    pub size: f32,
    pub color: Color,
    /// Sprite modulating each point; `None` draws solid squares.
    pub map: Option<Arc<SpriteImage>>,
    pub depth_write: bool,
    pub transparent: bool,
    pub opacity: f32,
    pub side: Side,
    pub blending: Blending,
    /// Read per-point sizes from the geometry instead of using `size` for every point.
    pub vertex_sizes: bool,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: Color::WHITE,
            map: None,
            depth_write: true,
            transparent: false,
            opacity: 1.0,
            side: Side::Front,
            blending: Blending::Normal,
            vertex_sizes: false,
        }
    }
}

impl PointsMaterial {
    /// Alpha written by the fragment shader before the sprite is applied.
    pub fn effective_opacity(&self) -> f32 {
        if self.transparent { self.opacity } else { 1.0 }
    }
}
