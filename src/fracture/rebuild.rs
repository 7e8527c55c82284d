// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Mesh reassembly: weld broken vertices to the contact seam and emit a
//! single combined mesh

use super::Piece;
use crate::error::WeldError;
use crate::geometry::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Rebuild one combined mesh from the surviving triangles of all pieces.
///
/// Fully-broken triangles are dropped, broken vertices are welded to their
/// nearest contact point, and the output vertex buffer is deduplicated by
/// exact position. Normals are recomputed from the final topology. Source
/// pieces are never mutated.
///
/// A broken vertex with no contact point to weld to is a fatal precondition
/// violation for the whole call: welding cannot be skipped silently without
/// corrupting the triangle.
pub fn combine(pieces: &[Piece], contacts: &[Point3<f32>]) -> Result<Mesh, WeldError> {
    let mut mesh = Mesh::new();
    let mut slots: HashMap<[u32; 3], usize> = HashMap::new();

    for piece in pieces {
        for (triangle_index, tri) in piece.triangles().iter().enumerate() {
            if tri.is_fully_broken() {
                continue;
            }
            let verts = tri.vertices();
            if verts.len() != 3 {
                log::warn!(
                    "piece {:?}: skipping partially built triangle {triangle_index}",
                    piece.id()
                );
                continue;
            }

            let mut indices = [0usize; 3];
            for (vertex_index, local) in verts.iter().enumerate() {
                let mut position = piece.to_world(local);

                if tri.is_vertex_broken(vertex_index) {
                    if contacts.is_empty() {
                        return Err(WeldError::MissingWeldTarget {
                            piece: piece.id(),
                            triangle: triangle_index,
                        });
                    }
                    let nearest = nearest_contact(contacts, &position);
                    match contacts.get(nearest) {
                        Some(contact) => position = *contact,
                        None => {
                            // Stale index from an earlier pass; keep the
                            // vertex where it is rather than crash
                            log::warn!(
                                "piece {:?}: contact index {nearest} out of bounds, vertex kept",
                                piece.id()
                            );
                        }
                    }
                }

                indices[vertex_index] = output_slot(&mut mesh, &mut slots, position);
            }
            mesh.add_triangle(Triangle::new(indices));
        }
    }

    mesh.recompute_normals();
    Ok(mesh)
}

/// Index of the contact point nearest to `position`; ties keep the first
/// one found (strictly-less comparison).
fn nearest_contact(contacts: &[Point3<f32>], position: &Point3<f32>) -> usize {
    let mut best = 0;
    let mut best_dist = (contacts[0] - position).norm_squared();
    for (i, contact) in contacts.iter().enumerate().skip(1) {
        let dist = (contact - position).norm_squared();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Output vertex slot for a position, deduplicated by exact equality.
fn output_slot(mesh: &mut Mesh, slots: &mut HashMap<[u32; 3], usize>, position: Point3<f32>) -> usize {
    // Positional equality, not bit equality: -0.0 == 0.0 shares a slot
    fn canon(v: f32) -> u32 {
        (if v == 0.0 { 0.0f32 } else { v }).to_bits()
    }
    let key = [canon(position.x), canon(position.y), canon(position.z)];
    *slots.entry(key).or_insert_with(|| {
        // Normal is recomputed once the full topology is known
        mesh.add_vertex(Vertex::new(position, Vector3::zeros()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fracture::PieceId;
    use crate::geometry::primitives;

    fn single_triangle_piece(id: u32) -> Piece {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vertex::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let b = mesh.add_vertex(Vertex::new(
            Point3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let c = mesh.add_vertex(Vertex::new(
            Point3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new([a, b, c]));
        Piece::from_mesh(PieceId(id), &mesh, Vector3::zeros())
    }

    #[test]
    fn test_unbroken_triangles_pass_through_in_world_space() {
        let mesh = primitives::unit_cube();
        let piece = Piece::from_mesh(PieceId(0), &mesh, Vector3::new(10.0, 0.0, 0.0));

        let combined = combine(&[piece], &[]).unwrap();
        assert_eq!(combined.triangle_count(), 12);
        // Deduplication collapses the 36 per-face vertices to 8 corners
        assert_eq!(combined.vertex_count(), 8);
        assert!(combined.vertices.iter().all(|v| v.position.x >= 9.5));
    }

    #[test]
    fn test_weld_replaces_broken_vertex_with_nearest_contact() {
        let mut piece = single_triangle_piece(0);
        piece.triangles_mut()[0].mark_broken(0).unwrap();

        let near = Point3::new(0.05, 0.05, 0.0);
        let far = Point3::new(3.0, 3.0, 3.0);
        let combined = combine(&[piece], &[far, near]).unwrap();

        assert!(combined
            .vertices
            .iter()
            .any(|v| v.position == near));
        assert!(!combined
            .vertices
            .iter()
            .any(|v| v.position == Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_output_slot_merges_negative_zero() {
        let mut mesh = Mesh::new();
        let mut slots = HashMap::new();
        let a = output_slot(&mut mesh, &mut slots, Point3::new(0.0, 1.0, 2.0));
        let b = output_slot(&mut mesh, &mut slots, Point3::new(-0.0, 1.0, 2.0));
        assert_eq!(a, b);
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn test_nearest_contact_tie_keeps_first() {
        let contacts = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        // Equidistant from the origin
        assert_eq!(nearest_contact(&contacts, &Point3::new(0.0, 0.0, 0.0)), 0);
    }

    #[test]
    fn test_fully_broken_triangle_contributes_nothing() {
        let mut piece = single_triangle_piece(0);
        for i in 0..3 {
            piece.triangles_mut()[0].mark_broken(i).unwrap();
        }

        let combined = combine(&[piece], &[Point3::new(0.0, 0.0, 0.0)]).unwrap();
        assert_eq!(combined.vertex_count(), 0);
        assert_eq!(combined.triangle_count(), 0);
    }

    #[test]
    fn test_missing_weld_target_is_fatal() {
        let mut piece = single_triangle_piece(3);
        piece.triangles_mut()[0].mark_broken(1).unwrap();

        let err = combine(&[piece], &[]).unwrap_err();
        assert_eq!(
            err,
            WeldError::MissingWeldTarget {
                piece: PieceId(3),
                triangle: 0
            }
        );
    }

    #[test]
    fn test_shared_positions_are_deduplicated_across_pieces() {
        // Two single-triangle pieces sharing an edge in world space
        let first = single_triangle_piece(0);
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vertex::new(
            Point3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let b = mesh.add_vertex(Vertex::new(
            Point3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        let c = mesh.add_vertex(Vertex::new(
            Point3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new([a, b, c]));
        let second = Piece::from_mesh(PieceId(1), &mesh, Vector3::zeros());

        let combined = combine(&[first, second], &[]).unwrap();
        // 6 input vertices, 2 shared positions
        assert_eq!(combined.triangle_count(), 2);
        assert_eq!(combined.vertex_count(), 4);
    }

    #[test]
    fn test_winding_order_is_preserved() {
        let piece = single_triangle_piece(0);
        let combined = combine(&[piece], &[]).unwrap();

        let tri = combined.triangles[0];
        let p0 = combined.vertices[tri.indices[0]].position;
        let p1 = combined.vertices[tri.indices[1]].position;
        let p2 = combined.vertices[tri.indices[2]].position;
        let normal = crate::utils::math::face_normal(&p0, &p1, &p2);
        // Input winding faces +z; the output must too
        assert!(normal.z > 0.0);
    }

    #[test]
    fn test_normals_recomputed_from_final_topology() {
        let piece = single_triangle_piece(0);
        let combined = combine(&[piece], &[]).unwrap();
        for v in &combined.vertices {
            assert!((v.normal.norm() - 1.0).abs() < 1e-5);
            assert!(v.normal.z > 0.9);
        }
    }
}
