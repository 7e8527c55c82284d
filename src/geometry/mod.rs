// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Geometry module - mesh representation and bounds

mod bbox;
mod mesh;
pub mod primitives;

pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
