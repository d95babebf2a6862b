//! Render pipelines: Lambert-shaded meshes and camera-facing point sprites.
//!
//! Both pipelines share the camera uniform at `@group(0)`. The Lambert
//! pipeline reads the directional light at `@group(1)` and its material at
//! `@group(2)`; the points pipeline reads material, sprite and sampler at
//! `@group(1)`.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::buffer::{PointInstance, VertexPositionNormalUv};
use crate::depth::DepthBuffer;
use crate::material::{Blending, LambertMaterial, PointsMaterial};

/// Camera data shared by every pipeline, 96 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// xy = render target size in pixels.
    pub viewport: [f32; 4],
}

/// Lambert material colour (linear rgb, w unused).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LambertMaterialUniform {
    pub color: [f32; 4],
}

impl From<&LambertMaterial> for LambertMaterialUniform {
    fn from(material: &LambertMaterial) -> Self {
        let [r, g, b] = material.color.to_linear();
        Self {
            color: [r, g, b, 1.0],
        }
    }
}

/// Point material colour (linear rgb) and opacity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointsMaterialUniform {
    pub color_opacity: [f32; 4],
}

impl From<&PointsMaterial> for PointsMaterialUniform {
    fn from(material: &PointsMaterial) -> Self {
        let [r, g, b] = material.color.to_linear();
        Self {
            color_opacity: [r, g, b, material.effective_opacity()],
        }
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size),
        },
        count: None,
    }
}

/// Bind group layouts shared by every pipeline, created once per device.
pub struct BindGroupLayouts {
    /// `@group(0)`: camera uniform.
    pub camera: wgpu::BindGroupLayout,
    /// Lambert `@group(1)`: directional light uniform.
    pub light: wgpu::BindGroupLayout,
    /// Lambert `@group(2)`: material uniform.
    pub lambert_material: wgpu::BindGroupLayout,
    /// Points `@group(1)`: material uniform, sprite texture, sampler.
    pub points_material: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<CameraUniform>() as u64,
            )],
        });
        let light = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lambert-light-bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT, 32)],
        });
        let lambert_material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lambert-material-bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT, 16)],
        });
        let points_material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points-material-bgl"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT, 16),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        Self {
            camera,
            light,
            lambert_material,
            points_material,
        }
    }
}

fn primitive(cull_mode: Option<wgpu::Face>) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode,
        unclipped_depth: false,
        polygon_mode: wgpu::PolygonMode::Fill,
        conservative: false,
    }
}

/// Diffuse shading against a single directional light.
pub struct LambertPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub cull_mode: Option<wgpu::Face>,
}

impl LambertPipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        cull_mode: Option<wgpu::Face>,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lambert-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.light, &layouts.lambert_material],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lambert-shader"),
            source: wgpu::ShaderSource::Wgsl(LAMBERT_SHADER_SOURCE.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lambert-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: primitive(cull_mode),
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            cull_mode,
        }
    }
}

/// Render state a points pipeline is specialised for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointsPipelineKey {
    pub blending: Blending,
    pub depth_write: bool,
    pub cull_mode: Option<wgpu::Face>,
}

impl From<&PointsMaterial> for PointsPipelineKey {
    fn from(material: &PointsMaterial) -> Self {
        Self {
            blending: material.blending,
            depth_write: material.depth_write,
            cull_mode: material.side.cull_mode(),
        }
    }
}

/// Instanced sprite quads sized in world units and attenuated with depth.
pub struct PointsPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub key: PointsPipelineKey,
}

impl PointsPipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        key: PointsPipelineKey,
    ) -> Self {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points-pipeline-layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.points_material],
            immediate_size: 0,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points-shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_SHADER_SOURCE.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[PointInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: primitive(key.cull_mode),
            depth_stencil: Some(DepthBuffer::stencil_state(key.depth_write)),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(key.blending.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline, key }
    }
}

pub const LAMBERT_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct LightUniform {
    direction_intensity: vec4<f32>,
    color: vec4<f32>,
};

struct MaterialUniform {
    color: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> light: LightUniform;
@group(2) @binding(0) var<uniform> material: MaterialUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.normal = in.normal;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var n = normalize(in.normal);
    if (!front) {
        n = -n;
    }
    let to_light = -light.direction_intensity.xyz;
    let ndl = max(dot(n, to_light), 0.0);
    let irradiance = light.color.rgb * light.direction_intensity.w * ndl;
    return vec4<f32>(material.color.rgb * irradiance, 1.0);
}
"#;

pub const POINTS_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct MaterialUniform {
    color_opacity: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> material: MaterialUniform;
@group(1) @binding(1) var sprite: texture_2d<f32>;
@group(1) @binding(2) var sprite_sampler: sampler;

struct InstanceInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, in: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    // Offsetting in clip space scales the quad by 1/w, so the sprite
    // shrinks with distance. Half-height in clip units is size / 2.
    var clip = camera.view_proj * vec4<f32>(in.position, 1.0);
    let aspect = camera.viewport.y / camera.viewport.x;
    clip.x += corner.x * 0.5 * in.size * aspect;
    clip.y += corner.y * 0.5 * in.size;

    var out: VertexOutput;
    out.clip_position = clip;
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(sprite, sprite_sampler, in.uv);
    return vec4<f32>(material.color_opacity.rgb * texel.rgb, material.color_opacity.a * texel.a);
}
"#;
