// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Meshweld fracture/reassembly kernel
//!
//! An editor-time tool core for reassembling fractured meshes. Detects when
//! rigid pieces of a fractured object have been pushed into contact, marks
//! the triangle vertices that ended up inside neighboring pieces as broken,
//! and rebuilds a single combined mesh by welding those vertices to the
//! detected contact seam.

pub mod error;
pub mod fracture;
pub mod geometry;
pub mod io;
pub mod spatial;
pub mod utils;

pub use error::WeldError;
pub use fracture::{Combiner, Piece, PieceId, PieceTriangle, TickOutcome};
pub use geometry::{Mesh, Triangle, Vertex};
pub use spatial::{RayHit, SceneIndex, SceneRaycaster};

/// One-shot convenience: run a full detection and classification pass over
/// the given pieces and combine the survivors into a single mesh.
pub fn weld(pieces: Vec<Piece>) -> Result<Mesh, WeldError> {
    let mut combiner = Combiner::new(pieces);
    combiner.refresh()?;
    combiner.combine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_weld_two_overlapping_cubes() {
        let cube = geometry::primitives::cube(Vector3::new(1.0, 1.0, 1.0), true);
        let pieces = vec![
            Piece::from_mesh(PieceId(0), &cube, Vector3::new(0.0, 0.0, 0.0)),
            Piece::from_mesh(PieceId(1), &cube, Vector3::new(0.9, 0.0, 0.0)),
        ];
        let mesh = weld(pieces).unwrap();
        assert!(mesh.vertex_count() > 0);
        assert!(mesh.triangle_count() > 0);
    }
}
