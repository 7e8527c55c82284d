// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Mesh representation and utilities

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Recompute vertex normals from triangle geometry.
    /// Face normals are accumulated at shared vertices, weighted by area.
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f32>> = vec![Vector3::zeros(); self.vertices.len()];
        let mut normal_counts: Vec<u32> = vec![0; self.vertices.len()];

        for triangle in &self.triangles {
            let v0 = &self.vertices[triangle.indices[0]];
            let v1 = &self.vertices[triangle.indices[1]];
            let v2 = &self.vertices[triangle.indices[2]];

            let face_normal =
                crate::utils::math::face_normal(&v0.position, &v1.position, &v2.position);

            // Skip zero-area faces
            if face_normal.norm() > 1e-10 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                    normal_counts[idx] += 1;
                }
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            if normal_counts[i] > 0 {
                vertex.normal = normal_sums[i].normalize();
            } else {
                // Vertex not referenced by any non-degenerate triangle
                vertex.normal = Vector3::new(0.0, 0.0, 1.0);
            }
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
