// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Pieces and their triangles
//!
//! A `Piece` is one rigid fragment of a fractured object: an identifier, a
//! world translation and the fragment's triangle list in local space. The
//! triangles carry the broken-vertex state the classifier recomputes every
//! detection pass.

use crate::error::WeldError;
use crate::geometry::Mesh;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Identifier of a piece within the tool's scene snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u32);

/// A triangle of a piece: exactly three ordered vertices (insertion order is
/// winding order) plus the set of vertex indices classified as broken.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PieceTriangle {
    vertices: Vec<Point3<f32>>,
    broken: Vec<usize>,
}

impl PieceTriangle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: [Point3<f32>; 3]) -> Self {
        Self {
            vertices: points.to_vec(),
            broken: Vec::new(),
        }
    }

    /// Append a vertex. A triangle holds exactly three; a fourth is
    /// rejected without mutating the triangle.
    pub fn add_vertex(&mut self, vertex: Point3<f32>) -> Result<(), WeldError> {
        if self.vertices.len() >= 3 {
            return Err(WeldError::StructuralViolation(
                "triangle already has 3 vertices",
            ));
        }
        self.vertices.push(vertex);
        Ok(())
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Mark a vertex index as broken. Duplicates are ignored, indices
    /// outside 0..3 are rejected.
    pub fn mark_broken(&mut self, index: usize) -> Result<(), WeldError> {
        if index >= 3 {
            return Err(WeldError::StructuralViolation(
                "broken vertex index outside 0..3",
            ));
        }
        if !self.broken.contains(&index) {
            self.broken.push(index);
        }
        Ok(())
    }

    pub fn clear_broken(&mut self) {
        self.broken.clear();
    }

    pub fn broken(&self) -> &[usize] {
        &self.broken
    }

    pub fn is_vertex_broken(&self, index: usize) -> bool {
        self.broken.contains(&index)
    }

    /// At least one vertex is broken
    pub fn is_broken(&self) -> bool {
        !self.broken.is_empty()
    }

    /// Every vertex is broken; the triangle no longer contributes valid
    /// boundary geometry
    pub fn is_fully_broken(&self) -> bool {
        self.broken.len() >= 3
    }
}

/// One rigid fragment of a fractured object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    position: Vector3<f32>,
    last_known_position: Vector3<f32>,
    triangles: Vec<PieceTriangle>,
}

impl Piece {
    /// Build a piece by walking the base mesh's triangle list. Triangles
    /// referencing out-of-range vertices are skipped.
    pub fn from_mesh(id: PieceId, mesh: &Mesh, position: Vector3<f32>) -> Self {
        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        for tri in &mesh.triangles {
            let points: Option<Vec<Point3<f32>>> = tri
                .indices
                .iter()
                .map(|&i| mesh.vertices.get(i).map(|v| v.position))
                .collect();
            match points {
                Some(p) => triangles.push(PieceTriangle::from_points([p[0], p[1], p[2]])),
                None => {
                    log::warn!("piece {id:?}: skipping triangle with out-of-range vertex index");
                }
            }
        }
        Self {
            id,
            position,
            last_known_position: position,
            triangles,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Move the piece. Detection picks the movement up on the next tick.
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    /// True when the piece moved since the last completed detection pass
    pub fn has_moved(&self) -> bool {
        self.position != self.last_known_position
    }

    /// Reset the movement trigger after a completed detection pass
    pub fn record_position(&mut self) {
        self.last_known_position = self.position;
    }

    pub fn triangles(&self) -> &[PieceTriangle] {
        &self.triangles
    }

    pub fn triangles_mut(&mut self) -> &mut [PieceTriangle] {
        &mut self.triangles
    }

    /// Translate a local vertex into world space
    pub fn to_world(&self, local: &Point3<f32>) -> Point3<f32> {
        local + self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;

    #[test]
    fn test_triangle_rejects_fourth_vertex() {
        let mut tri = PieceTriangle::new();
        for i in 0..3 {
            tri.add_vertex(Point3::new(i as f32, 0.0, 0.0)).unwrap();
        }
        let err = tri.add_vertex(Point3::new(9.0, 9.0, 9.0)).unwrap_err();
        assert!(matches!(err, WeldError::StructuralViolation(_)));
        // State unchanged
        assert_eq!(tri.vertices().len(), 3);
        assert_eq!(tri.vertices()[2], Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_broken_flags() {
        let mut tri = PieceTriangle::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        assert!(!tri.is_broken());
        assert!(!tri.is_fully_broken());

        tri.mark_broken(0).unwrap();
        tri.mark_broken(0).unwrap(); // duplicate ignored
        assert!(tri.is_broken());
        assert!(!tri.is_fully_broken());
        assert_eq!(tri.broken(), &[0]);

        tri.mark_broken(1).unwrap();
        tri.mark_broken(2).unwrap();
        assert!(tri.is_fully_broken());
        // fully broken implies broken
        assert!(tri.is_broken());

        tri.clear_broken();
        assert!(!tri.is_broken());
    }

    #[test]
    fn test_mark_broken_rejects_out_of_range_index() {
        let mut tri = PieceTriangle::new();
        let err = tri.mark_broken(3).unwrap_err();
        assert!(matches!(err, WeldError::StructuralViolation(_)));
        assert!(tri.broken().is_empty());
    }

    #[test]
    fn test_piece_from_mesh_walks_triangle_list() {
        let mesh = primitives::unit_cube();
        let piece = Piece::from_mesh(PieceId(7), &mesh, Vector3::new(1.0, 2.0, 3.0));

        assert_eq!(piece.id(), PieceId(7));
        assert_eq!(piece.triangles().len(), 12);
        assert!(piece
            .triangles()
            .iter()
            .all(|t| t.vertices().len() == 3 && !t.is_broken()));
    }

    #[test]
    fn test_movement_trigger() {
        let mesh = primitives::unit_cube();
        let mut piece = Piece::from_mesh(PieceId(0), &mesh, Vector3::zeros());
        assert!(!piece.has_moved());

        piece.set_position(Vector3::new(0.5, 0.0, 0.0));
        assert!(piece.has_moved());

        piece.record_position();
        assert!(!piece.has_moved());
    }

    #[test]
    fn test_to_world_applies_translation() {
        let mesh = primitives::unit_cube();
        let piece = Piece::from_mesh(PieceId(0), &mesh, Vector3::new(10.0, 0.0, 0.0));
        let world = piece.to_world(&Point3::new(0.5, 0.5, 0.5));
        assert_eq!(world, Point3::new(10.5, 0.5, 0.5));
    }
}
