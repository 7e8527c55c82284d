// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Primitive mesh generators for building demo and test pieces

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

/// Generate an axis-aligned cube mesh of 12 triangles.
/// With `center` the cube is centered on the origin, otherwise it spans
/// from the origin to `size`.
pub fn cube(size: Vector3<f32>, center: bool) -> Mesh {
    let mut mesh = Mesh::with_capacity(36, 12);

    let (min_x, max_x) = if center {
        (-size.x / 2.0, size.x / 2.0)
    } else {
        (0.0, size.x)
    };
    let (min_y, max_y) = if center {
        (-size.y / 2.0, size.y / 2.0)
    } else {
        (0.0, size.y)
    };
    let (min_z, max_z) = if center {
        (-size.z / 2.0, size.z / 2.0)
    } else {
        (0.0, size.z)
    };

    // 8 corners of the cube
    let positions = [
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, min_y, min_z),
        Point3::new(max_x, max_y, min_z),
        Point3::new(min_x, max_y, min_z),
        Point3::new(min_x, min_y, max_z),
        Point3::new(max_x, min_y, max_z),
        Point3::new(max_x, max_y, max_z),
        Point3::new(min_x, max_y, max_z),
    ];

    // 6 faces, two triangles each, wound so normals point outward
    let faces = [
        // Front (z+)
        ([4, 5, 6], Vector3::new(0.0, 0.0, 1.0)),
        ([4, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
        // Back (z-)
        ([1, 0, 3], Vector3::new(0.0, 0.0, -1.0)),
        ([1, 3, 2], Vector3::new(0.0, 0.0, -1.0)),
        // Right (x+)
        ([5, 1, 2], Vector3::new(1.0, 0.0, 0.0)),
        ([5, 2, 6], Vector3::new(1.0, 0.0, 0.0)),
        // Left (x-)
        ([0, 4, 7], Vector3::new(-1.0, 0.0, 0.0)),
        ([0, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        // Top (y+)
        ([7, 6, 2], Vector3::new(0.0, 1.0, 0.0)),
        ([7, 2, 3], Vector3::new(0.0, 1.0, 0.0)),
        // Bottom (y-)
        ([0, 1, 5], Vector3::new(0.0, -1.0, 0.0)),
        ([0, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
    ];

    for (indices, normal) in faces {
        let v0 = mesh.add_vertex(Vertex::new(positions[indices[0]], normal));
        let v1 = mesh.add_vertex(Vertex::new(positions[indices[1]], normal));
        let v2 = mesh.add_vertex(Vertex::new(positions[indices[2]], normal));
        mesh.add_triangle(Triangle::new([v0, v1, v2]));
    }

    mesh
}

/// A unit cube centered on the origin
pub fn unit_cube() -> Mesh {
    cube(Vector3::new(1.0, 1.0, 1.0), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = unit_cube();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 36);
    }

    #[test]
    fn test_cube_bounds() {
        let mesh = cube(Vector3::new(2.0, 4.0, 6.0), true);
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bbox.max, Point3::new(1.0, 2.0, 3.0));
    }
}
