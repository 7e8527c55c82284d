// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Broken-vertex classification via parity-counted vertical probes
//!
//! A vertex that ended up inside another piece's volume crosses that
//! piece's surface an odd number of times along a vertical probe. The
//! probe is anchored above the whole scene so no geometry is ever missed
//! above the vertex, and it is cast in both directions: with one-sided
//! raycasts the down cast counts the up-facing crossings and the up cast
//! the down-facing ones, so each crossing is counted exactly once.

use super::Piece;
use crate::geometry::BoundingBox;
use crate::spatial::SceneRaycaster;
use nalgebra::{Point3, Vector3};

/// One vertex classified as broken, addressed by position in the piece set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenMark {
    pub piece: usize,
    pub triangle: usize,
    pub vertex: usize,
}

/// Result of a classification pass: the marks to apply to the triangles'
/// broken sets plus the deduplicated world positions of all broken
/// vertices (debug telemetry).
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub marks: Vec<BrokenMark>,
    pub points: Vec<Point3<f32>>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Classify every piece vertex against the rest of the scene.
///
/// No-op when the contact set is empty: with nothing to weld against there
/// is no point probing, and the previous broken state stays untouched.
pub fn classify(
    pieces: &[Piece],
    contacts: &[Point3<f32>],
    scene: &dyn SceneRaycaster,
) -> Classification {
    if contacts.is_empty() {
        return Classification::default();
    }

    let top_y = probe_anchor_height(pieces);
    let mut result = Classification::default();

    for (piece_index, piece) in pieces.iter().enumerate() {
        for (triangle_index, tri) in piece.triangles().iter().enumerate() {
            for (vertex_index, local) in tri.vertices().iter().enumerate() {
                let vertex = piece.to_world(local);
                if probe_parity_is_odd(scene, piece, vertex, top_y) {
                    result.marks.push(BrokenMark {
                        piece: piece_index,
                        triangle: triangle_index,
                        vertex: vertex_index,
                    });
                    if !result.points.contains(&vertex) {
                        result.points.push(vertex);
                    }
                }
            }
        }
    }

    result
}

/// Count surface crossings of other pieces along the vertical probe above
/// `vertex`; odd parity means the vertex is enclosed.
fn probe_parity_is_odd(
    scene: &dyn SceneRaycaster,
    own: &Piece,
    vertex: Point3<f32>,
    top_y: f32,
) -> bool {
    let top = Point3::new(vertex.x, top_y, vertex.z);
    let length = top.y - vertex.y;

    let down = scene.raycast_all(top, Vector3::new(0.0, -1.0, 0.0), length);
    let up = scene.raycast_all(vertex, Vector3::new(0.0, 1.0, 0.0), length);

    let hits = down
        .iter()
        .chain(up.iter())
        .filter(|hit| hit.piece != own.id())
        .count();

    hits % 2 == 1
}

/// Anchor height for the vertical probes: above the whole scene by a
/// margin scaled to the scene itself, so probes always clear all geometry.
fn probe_anchor_height(pieces: &[Piece]) -> f32 {
    let mut bounds = BoundingBox::empty();
    for piece in pieces {
        for tri in piece.triangles() {
            for v in tri.vertices() {
                bounds.expand_to_include(&piece.to_world(v));
            }
        }
    }
    if bounds.is_empty() {
        return 1.0;
    }
    bounds.max.y + bounds.size().y.max(1.0)
}
