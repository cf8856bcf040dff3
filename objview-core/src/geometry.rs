//! Mesh primitives produced by the model loader

use nalgebra::{Point3, Vector3};

/// A mesh vertex with position and shading normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order, zero for degenerate faces
    pub fn face_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Average of the three vertex normals, used for shading
    pub fn shading_normal(&self) -> Vector3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.normal).sum();
        sum.try_normalize(f32::EPSILON)
            .unwrap_or_else(|| self.face_normal())
    }
}

/// Axis-aligned bounds of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A renderable triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        });
        Some(Bounds { min, max })
    }
}
