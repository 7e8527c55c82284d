// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Frame-driven combiner: movement-gated detection plus the explicit
//! combine trigger

use super::{classifier, detector, rebuild, Piece, PieceId};
use crate::error::WeldError;
use crate::geometry::Mesh;
use crate::spatial::SceneIndex;
use nalgebra::{Point3, Vector3};

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No piece moved since the last pass; nothing recomputed
    Idle,
    /// A full detection + classification pass ran
    Recomputed {
        contacts: usize,
        broken_vertices: usize,
    },
}

/// Single-threaded driver for the fracture tool.
///
/// Holds the registered pieces (an explicit snapshot handed in at
/// construction, there is no scene discovery here), the latest contact set
/// and the broken-vertex telemetry. `tick` is called once per editor frame
/// and is cheap while nothing moves; `combine` is the explicit rebuild
/// trigger.
pub struct Combiner {
    pieces: Vec<Piece>,
    contacts: Vec<Point3<f32>>,
    broken_points: Vec<Point3<f32>>,
}

impl Combiner {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self {
            pieces,
            contacts: Vec::new(),
            broken_points: Vec::new(),
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Move a piece; the next `tick` picks the movement up. Returns false
    /// when no piece has that id.
    pub fn move_piece(&mut self, id: PieceId, position: Vector3<f32>) -> bool {
        match self.pieces.iter_mut().find(|p| p.id() == id) {
            Some(piece) => {
                piece.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Per-frame entry point: runs a full detection + classification pass,
    /// but only when some piece moved since the last pass.
    pub fn tick(&mut self) -> Result<TickOutcome, WeldError> {
        if !self.pieces.iter().any(Piece::has_moved) {
            return Ok(TickOutcome::Idle);
        }
        self.refresh()
    }

    /// Unconditional detection + classification pass.
    pub fn refresh(&mut self) -> Result<TickOutcome, WeldError> {
        let scene = SceneIndex::new(&self.pieces);
        let contacts = detector::detect_contacts(&self.pieces, &scene);
        let classification = classifier::classify(&self.pieces, &contacts, &scene);

        for piece in &mut self.pieces {
            piece.record_position();
        }

        // An empty contact set leaves the previous broken state untouched,
        // mirroring the classifier's no-op
        if !contacts.is_empty() {
            for piece in &mut self.pieces {
                for tri in piece.triangles_mut() {
                    tri.clear_broken();
                }
            }
            for mark in &classification.marks {
                self.pieces[mark.piece].triangles_mut()[mark.triangle].mark_broken(mark.vertex)?;
            }
            self.broken_points = classification.points;
        }

        log::debug!(
            "detection pass: {} contacts, {} broken vertices",
            contacts.len(),
            classification.marks.len()
        );

        let outcome = TickOutcome::Recomputed {
            contacts: contacts.len(),
            broken_vertices: classification.marks.len(),
        };
        self.contacts = contacts;
        Ok(outcome)
    }

    /// Explicit combine trigger: rebuild one mesh from the current piece,
    /// broken-vertex and contact state. Movement alone never triggers this.
    pub fn combine(&self) -> Result<Mesh, WeldError> {
        rebuild::combine(&self.pieces, &self.contacts)
    }

    /// Read-only telemetry: the latest detected contact points.
    pub fn contact_points(&self) -> &[Point3<f32>] {
        &self.contacts
    }

    /// Read-only telemetry: the latest broken-vertex world positions.
    pub fn broken_points(&self) -> &[Point3<f32>] {
        &self.broken_points
    }
}
