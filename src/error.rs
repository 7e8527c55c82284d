// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Error taxonomy for the fracture/reassembly kernel

use crate::fracture::PieceId;
use thiserror::Error;

/// Errors surfaced by the fracture core.
///
/// Every variant is fatal only to the single operation that raised it; the
/// tool itself keeps running. Recoverable anomalies (a stale nearest-contact
/// index at combine time) are skipped in place and logged instead of being
/// turned into error values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeldError {
    /// A structural invariant of the triangle data model was violated, e.g.
    /// adding a 4th vertex or marking a broken-vertex index outside 0..3.
    /// The offending operation is rejected without mutating state.
    #[error("structural violation: {0}")]
    StructuralViolation(&'static str),

    /// A broken vertex had no contact point to weld to. Combining in this
    /// state would silently corrupt the triangle, so the whole combine call
    /// aborts.
    #[error("no contact points available to weld broken vertex of triangle {triangle} on piece {piece:?}")]
    MissingWeldTarget { piece: PieceId, triangle: usize },
}
