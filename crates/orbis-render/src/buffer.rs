//! Vertex, index and instance buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Indexed triangle mesh resident on the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Camera-facing point sprites, one instance per point.
pub struct PointBuffer {
    pub instance_buffer: Option<wgpu::Buffer>,
    pub instance_count: u32,
}

impl PointBuffer {
    /// Six vertices per instance form the sprite quad.
    pub const VERTICES_PER_POINT: u32 = 6;

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let Some(buffer) = &self.instance_buffer else {
            return;
        };
        render_pass.set_vertex_buffer(0, buffer.slice(..));
        render_pass.draw(0..Self::VERTICES_PER_POINT, 0..self.instance_count);
    }
}

/// Creates GPU buffers initialised with data.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a mesh. Index format is `Uint32`.
    pub fn create_mesh(
        &self,
        label: &str,
        vertices: &[VertexPositionNormalUv],
        indices: &[u32],
    ) -> MeshBuffer {
        MeshBuffer {
            vertex_buffer: self.create_buffer(
                &format!("{label}-vertices"),
                bytemuck::cast_slice(vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: self.create_buffer(
                &format!("{label}-indices"),
                bytemuck::cast_slice(indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: indices.len() as u32,
            index_format: wgpu::IndexFormat::Uint32,
        }
    }

    /// Upload point instances. An empty slice produces no buffer.
    pub fn create_points(&self, label: &str, instances: &[PointInstance]) -> PointBuffer {
        let instance_buffer = (!instances.is_empty()).then(|| {
            self.create_buffer(
                &format!("{label}-instances"),
                bytemuck::cast_slice(instances),
                wgpu::BufferUsages::VERTEX,
            )
        });
        PointBuffer {
            instance_buffer,
            instance_count: instances.len() as u32,
        }
    }

    pub fn create_uniform<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.create_buffer(
            label,
            bytemuck::bytes_of(value),
            wgpu::BufferUsages::UNIFORM,
        )
    }

    fn create_buffer(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Mesh vertex with position, normal and texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-point instance data: world position and world-space size.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
}

impl PointInstance {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        use wgpu::{VertexAttribute, VertexFormat};

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: VertexFormat::Float32x3,
                },
                VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: VertexFormat::Float32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_position_normal_uv_size() {
        assert_eq!(std::mem::size_of::<VertexPositionNormalUv>(), 32);
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 24);
    }

    #[test]
    fn test_point_instance_is_per_instance() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 16);
        let layout = PointInstance::layout();
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn test_point_instance_bytes() {
        let instances = [PointInstance {
            position: [1.0, 2.0, 3.0],
            size: 6.0,
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 16);
        let back: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(back, &[1.0, 2.0, 3.0, 6.0]);
    }
}
