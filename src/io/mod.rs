// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! I/O module - persisting combined meshes
//!
//! The fracture core itself never touches files; callers hand the combined
//! mesh to these exporters.

mod exporter;

pub use exporter::export_stl;
