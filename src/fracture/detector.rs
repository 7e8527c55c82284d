// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Contact detection between piece boundaries
//!
//! Every triangle edge of every piece is probed with a ray in both
//! directions. A single direction is not enough: when the contact region is
//! concave the far endpoint can be occluded from the near endpoint's side,
//! so the reverse cast is what finds the second seam crossing.

use super::{Piece, PieceId};
use crate::spatial::SceneRaycaster;
use nalgebra::Point3;

const MIN_EDGE_LENGTH: f32 = 1e-6;

/// Scan every piece edge against the rest of the scene and return the full
/// set of world-space contact points found this pass.
///
/// The returned set is a fresh value accumulated across all pieces; it is
/// never reused between passes.
pub fn detect_contacts(pieces: &[Piece], scene: &dyn SceneRaycaster) -> Vec<Point3<f32>> {
    let mut contacts = Vec::new();

    for piece in pieces {
        for tri in piece.triangles() {
            let verts = tri.vertices();
            for i in 0..verts.len() {
                let start = piece.to_world(&verts[i]);
                let end = piece.to_world(&verts[(i + 1) % verts.len()]);

                edge_contact(scene, piece.id(), start, end, &mut contacts);
                edge_contact(scene, piece.id(), end, start, &mut contacts);
            }
        }
    }

    contacts
}

/// Cast one edge ray; the nearest hit contributes a contact point when the
/// struck triangle belongs to another piece.
fn edge_contact(
    scene: &dyn SceneRaycaster,
    own: PieceId,
    from: Point3<f32>,
    to: Point3<f32>,
    contacts: &mut Vec<Point3<f32>>,
) {
    let dir = to - from;
    let length = dir.norm();
    if length < MIN_EDGE_LENGTH {
        return;
    }
    if let Some(hit) = scene.raycast(from, dir, length) {
        if hit.piece != own {
            contacts.push(hit.point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;
    use crate::spatial::SceneIndex;
    use nalgebra::Vector3;

    fn cube_piece(id: u32, position: Vector3<f32>) -> Piece {
        Piece::from_mesh(PieceId(id), &primitives::unit_cube(), position)
    }

    #[test]
    fn test_separated_pieces_produce_no_contacts() {
        let pieces = vec![
            cube_piece(0, Vector3::zeros()),
            cube_piece(1, Vector3::new(5.0, 0.0, 0.0)),
        ];
        let scene = SceneIndex::new(&pieces);
        assert!(detect_contacts(&pieces, &scene).is_empty());
    }

    #[test]
    fn test_overlapping_pieces_produce_contacts_on_the_seam() {
        let pieces = vec![
            cube_piece(0, Vector3::zeros()),
            cube_piece(1, Vector3::new(0.9, 0.0, 0.0)),
        ];
        let scene = SceneIndex::new(&pieces);
        let contacts = detect_contacts(&pieces, &scene);

        assert!(!contacts.is_empty());
        // Every contact lies inside the 0.1-wide overlap band on x
        for c in &contacts {
            assert!(
                c.x > 0.39 && c.x < 0.51,
                "contact {c:?} outside overlap band"
            );
        }
    }

    #[test]
    fn test_contacts_accumulate_across_pieces() {
        // Three cubes in a row, both outer ones overlapping the middle one.
        // The full pass must keep contacts from every piece, not only the
        // last piece scanned.
        let pieces = vec![
            cube_piece(0, Vector3::zeros()),
            cube_piece(1, Vector3::new(0.9, 0.0, 0.0)),
            cube_piece(2, Vector3::new(1.8, 0.0, 0.0)),
        ];
        let scene = SceneIndex::new(&pieces);
        let contacts = detect_contacts(&pieces, &scene);

        let left_seam = contacts.iter().any(|c| c.x > 0.3 && c.x < 0.6);
        let right_seam = contacts.iter().any(|c| c.x > 1.2 && c.x < 1.5);
        assert!(left_seam, "no contacts from the left seam");
        assert!(right_seam, "no contacts from the right seam");
    }

    #[test]
    fn test_single_piece_never_contacts_itself() {
        let pieces = vec![cube_piece(0, Vector3::zeros())];
        let scene = SceneIndex::new(&pieces);
        assert!(detect_contacts(&pieces, &scene).is_empty());
    }
}
