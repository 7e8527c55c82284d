// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Fracture core - contact detection, broken-vertex classification and
//! mesh reassembly

mod classifier;
mod combiner;
mod detector;
mod piece;
mod rebuild;

pub use classifier::{classify, BrokenMark, Classification};
pub use combiner::{Combiner, TickOutcome};
pub use detector::detect_contacts;
pub use piece::{Piece, PieceId, PieceTriangle};
pub use rebuild::combine;
