//! Flat scene description: meshes, point sets and one-level groups, plus lights.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::buffer::VertexPositionNormalUv;
use crate::light::DirectionalLight;
use crate::material::{LambertMaterial, PointsMaterial};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Indexed triangle geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGeometry {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Arc<MeshGeometry>,
    pub material: LambertMaterial,
}

/// Point positions with optional per-point sizes.
///
/// `sizes` may be shorter than `positions`; missing entries use the material size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointGeometry {
    pub positions: Vec<Vec3>,
    pub sizes: Vec<f32>,
}

impl PointGeometry {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn size_at(&self, index: usize, fallback: f32) -> f32 {
        self.sizes.get(index).copied().unwrap_or(fallback)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Points {
    pub name: String,
    pub geometry: Arc<PointGeometry>,
    pub material: Arc<PointsMaterial>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneObject {
    Mesh(Mesh),
    Points(Points),
    /// Objects added and drawn together; groups do not nest transforms.
    Group {
        name: String,
        children: Vec<SceneObject>,
    },
}

impl SceneObject {
    pub fn name(&self) -> &str {
        match self {
            SceneObject::Mesh(m) => &m.name,
            SceneObject::Points(p) => &p.name,
            SceneObject::Group { name, .. } => name,
        }
    }

    /// Visit this object and every descendant, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a SceneObject)) {
        f(self);
        if let SceneObject::Group { children, .. } = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

/// Objects and lights to draw.
///
/// Every mutation bumps a revision so renderers know when cached GPU data is stale.
#[derive(Debug)]
pub struct Scene {
    id: u64,
    revision: u64,
    objects: Vec<SceneObject>,
    lights: Vec<DirectionalLight>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            revision: 0,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Process-unique identity of this scene.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
        self.revision += 1;
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
        self.revision += 1;
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[DirectionalLight] {
        &self.lights
    }

    /// Meshes and point sets reachable from the top level, in draw order.
    pub fn drawables(&self) -> Vec<&SceneObject> {
        let mut out = Vec::new();
        for object in &self.objects {
            object.visit(&mut |o| {
                if !matches!(o, SceneObject::Group { .. }) {
                    out.push(o);
                }
            });
        }
        out
    }
}
