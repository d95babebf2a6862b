//! wgpu rendering for the globe: scene model, materials, camera, directional
//! light and the renderer that draws them into a window surface.

pub mod buffer;
pub mod camera;
pub mod color;
pub mod depth;
pub mod gpu;
pub mod light;
pub mod material;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod scene;
pub mod surface;
pub mod texture;

pub use buffer::{BufferAllocator, MeshBuffer, PointBuffer, PointInstance, VertexPositionNormalUv};
pub use camera::{Camera, Projection, vertical_fov_degrees};
pub use color::Color;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use light::{DirectionalLight, DirectionalLightUniform};
pub use material::{Blending, LambertMaterial, PointsMaterial, Side, SpriteImage};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use pipeline::{BindGroupLayouts, CameraUniform, LambertPipeline, PointsPipeline};
pub use renderer::{MSAA_SAMPLES, RenderError, Renderer, point_instances};
pub use scene::{Mesh, MeshGeometry, PointGeometry, Points, Scene, SceneObject};
pub use surface::CanvasMetrics;
pub use texture::{SpriteTexture, TextureError};

#[cfg(test)]
pub(crate) mod test_support {
    /// Headless device for GPU tests; `None` when no adapter is available.
    pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    force_fallback_adapter: false,
                    compatible_surface: None,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }
}
