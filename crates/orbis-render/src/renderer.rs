//! Draws a [`Scene`] through a [`Camera`] into the window surface.
//!
//! GPU copies of scene objects are cached and rebuilt whenever the scene's
//! identity or revision changes. Opaque objects draw before transparent ones.

use crate::buffer::{BufferAllocator, MeshBuffer, PointBuffer, PointInstance};
use crate::camera::Camera;
use crate::color::Color;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::light::DirectionalLight;
use crate::material::PointsMaterial;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{
    BindGroupLayouts, LambertMaterialUniform, LambertPipeline, PointsMaterialUniform, PointsPipeline,
    PointsPipelineKey,
};
use crate::scene::{Mesh, PointGeometry, Points, Scene, SceneObject};
use crate::texture::{SpriteTexture, TextureError};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("failed to upload scene texture: {0}")]
    Texture(#[from] TextureError),
}

enum GpuDrawable {
    Mesh {
        buffer: MeshBuffer,
        material: wgpu::BindGroup,
        pipeline: usize,
    },
    Points {
        buffer: PointBuffer,
        material: wgpu::BindGroup,
        pipeline: usize,
    },
}

/// Instance data for a point set; per-point sizes only when the material asks for them.
pub fn point_instances(geometry: &PointGeometry, material: &PointsMaterial) -> Vec<PointInstance> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| PointInstance {
            position: p.to_array(),
            size: if material.vertex_sizes {
                geometry.size_at(i, material.size)
            } else {
                material.size
            },
        })
        .collect()
}

/// Multisampled colour target resolved into the surface each frame.
struct MsaaTarget {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl MsaaTarget {
    fn new(context: &RenderContext, sample_count: u32) -> Self {
        let (width, height) = context.surface_size();
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: context.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size: (width, height),
        }
    }
}

/// Sample count used when antialiasing is requested.
pub const MSAA_SAMPLES: u32 = 4;

pub struct Renderer {
    context: RenderContext,
    depth: DepthBuffer,
    sample_count: u32,
    msaa: Option<MsaaTarget>,
    layouts: BindGroupLayouts,
    clear_color: Color,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    white_sprite: SpriteTexture,
    lambert_pipelines: Vec<LambertPipeline>,
    points_pipelines: Vec<PointsPipeline>,
    drawables: Vec<GpuDrawable>,
    uploaded: Option<(u64, u64)>,
    frames_rendered: u64,
}

impl Renderer {
    /// Bind a renderer to an initialised context. Clears to white.
    pub fn new(context: RenderContext, antialias: bool) -> Result<Self, TextureError> {
        let sample_count = if antialias { MSAA_SAMPLES } else { 1 };
        let msaa = antialias.then(|| MsaaTarget::new(&context, sample_count));
        let device = &context.device;
        let (width, height) = context.surface_size();
        let depth = DepthBuffer::new(device, width, height, sample_count);
        let layouts = BindGroupLayouts::new(device);
        let alloc = BufferAllocator::new(device);

        let camera_buffer = alloc.create_uniform(
            "camera-uniform",
            &Camera::perspective(45.0, 2.0, 0.1, 2000.0).to_uniform((width, height)),
        );
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let light_buffer = alloc.create_uniform("light-uniform", &DirectionalLight::unlit_uniform());
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("light-bind-group"),
            layout: &layouts.light,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
        });

        let white_sprite = SpriteTexture::white(device, &context.queue)?;

        Ok(Self {
            depth,
            sample_count,
            msaa,
            layouts,
            clear_color: Color::WHITE,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            light_bind_group,
            white_sprite,
            lambert_pipelines: Vec::new(),
            points_pipelines: Vec::new(),
            drawables: Vec::new(),
            uploaded: None,
            frames_rendered: 0,
            context,
        })
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Resize the surface and depth buffer to the window's new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let (width, height) = self.context.surface_size();
        self.depth.resize(&self.context.device, width, height);
        if self.msaa.as_ref().is_some_and(|m| m.size != (width, height)) {
            self.msaa = Some(MsaaTarget::new(&self.context, self.sample_count));
        }
    }

    /// Draw one frame and present it.
    ///
    /// A surface timeout skips the frame and returns `Ok`.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        self.sync_scene(scene)?;

        let surface_texture = match self.context.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                log::debug!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let queue = &self.context.queue;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&camera.to_uniform(self.context.surface_size())),
        );
        let light = scene
            .lights()
            .first()
            .map(DirectionalLight::to_uniform)
            .unwrap_or_else(DirectionalLight::unlit_uniform);
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&light));

        let mut frame = FrameEncoder::new(
            &self.context.device,
            self.context.queue.clone(),
            surface_texture,
        );
        let mut builder = RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa(&msaa.view);
        }
        {
            let mut pass = frame.begin_render_pass(&builder);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            for drawable in &self.drawables {
                match drawable {
                    GpuDrawable::Mesh {
                        buffer,
                        material,
                        pipeline,
                    } => {
                        pass.set_pipeline(&self.lambert_pipelines[*pipeline].pipeline);
                        pass.set_bind_group(1, &self.light_bind_group, &[]);
                        pass.set_bind_group(2, material, &[]);
                        buffer.bind(&mut pass);
                        buffer.draw(&mut pass);
                    }
                    GpuDrawable::Points {
                        buffer,
                        material,
                        pipeline,
                    } => {
                        pass.set_pipeline(&self.points_pipelines[*pipeline].pipeline);
                        pass.set_bind_group(1, material, &[]);
                        buffer.draw(&mut pass);
                    }
                }
            }
        }
        frame.submit();
        self.frames_rendered += 1;
        Ok(())
    }

    fn sync_scene(&mut self, scene: &Scene) -> Result<(), TextureError> {
        let stamp = (scene.id(), scene.revision());
        if self.uploaded == Some(stamp) {
            return Ok(());
        }

        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for object in scene.drawables() {
            match object {
                SceneObject::Mesh(mesh) => opaque.push(self.upload_mesh(mesh)),
                SceneObject::Points(points) => {
                    let drawable = self.upload_points(points)?;
                    if points.material.transparent {
                        transparent.push(drawable);
                    } else {
                        opaque.push(drawable);
                    }
                }
                SceneObject::Group { .. } => {}
            }
        }
        opaque.extend(transparent);

        log::debug!(
            "Uploaded scene {} rev {}: {} drawables",
            stamp.0,
            stamp.1,
            opaque.len()
        );
        self.drawables = opaque;
        self.uploaded = Some(stamp);
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &Mesh) -> GpuDrawable {
        let device = &self.context.device;
        let alloc = BufferAllocator::new(device);
        let buffer = alloc.create_mesh(&mesh.name, &mesh.geometry.vertices, &mesh.geometry.indices);
        let uniform = alloc.create_uniform(
            "lambert-material",
            &LambertMaterialUniform::from(&mesh.material),
        );
        let material = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lambert-material-bind-group"),
            layout: &self.layouts.lambert_material,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.as_entire_binding(),
            }],
        });

        let cull_mode = mesh.material.side.cull_mode();
        let pipeline = match self
            .lambert_pipelines
            .iter()
            .position(|p| p.cull_mode == cull_mode)
        {
            Some(index) => index,
            None => {
                self.lambert_pipelines.push(LambertPipeline::new(
                    &self.context.device,
                    &self.layouts,
                    self.context.surface_format,
                    self.sample_count,
                    cull_mode,
                ));
                self.lambert_pipelines.len() - 1
            }
        };

        GpuDrawable::Mesh {
            buffer,
            material,
            pipeline,
        }
    }

    fn upload_points(&mut self, points: &Points) -> Result<GpuDrawable, TextureError> {
        let device = &self.context.device;
        let alloc = BufferAllocator::new(device);
        let buffer = alloc.create_points(
            &points.name,
            &point_instances(&points.geometry, &points.material),
        );
        let uniform = alloc.create_uniform(
            "points-material",
            &PointsMaterialUniform::from(points.material.as_ref()),
        );

        let sprite = points
            .material
            .map
            .as_deref()
            .map(|image| SpriteTexture::from_image(device, &self.context.queue, "point-sprite", image))
            .transpose()?;
        let sprite = sprite.as_ref().unwrap_or(&self.white_sprite);

        let material = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points-material-bind-group"),
            layout: &self.layouts.points_material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&sprite.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sprite.sampler),
                },
            ],
        });

        let key = PointsPipelineKey::from(points.material.as_ref());
        let pipeline = match self.points_pipelines.iter().position(|p| p.key == key) {
            Some(index) => index,
            None => {
                self.points_pipelines.push(PointsPipeline::new(
                    &self.context.device,
                    &self.layouts,
                    self.context.surface_format,
                    self.sample_count,
                    key,
                ));
                self.points_pipelines.len() - 1
            }
        };

        Ok(GpuDrawable::Points {
            buffer,
            material,
            pipeline,
        })
    }
}
