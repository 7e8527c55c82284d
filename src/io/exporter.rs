// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Mesh exporters

use crate::geometry::Mesh;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export a mesh to STL. A `.stl` extension selects the binary format,
/// anything else gets ASCII.
pub fn export_stl(mesh: &Mesh, path: &str) -> Result<()> {
    let file_path = Path::new(path);

    if path.ends_with(".stl") {
        export_stl_binary(mesh, file_path)
    } else {
        export_stl_ascii(mesh, file_path)
    }
}

fn export_stl_binary(mesh: &Mesh, path: &Path) -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let triangles: Vec<StlTriangle> = mesh
        .triangles
        .iter()
        .map(|tri| {
            let v0 = &mesh.vertices[tri.indices[0]];
            let v1 = &mesh.vertices[tri.indices[1]];
            let v2 = &mesh.vertices[tri.indices[2]];

            let normal = (v0.normal + v1.normal + v2.normal) / 3.0;

            StlTriangle {
                normal: Normal::new([normal.x, normal.y, normal.z]),
                vertices: [
                    StlVertex::new([v0.position.x, v0.position.y, v0.position.z]),
                    StlVertex::new([v1.position.x, v1.position.y, v1.position.z]),
                    StlVertex::new([v2.position.x, v2.position.y, v2.position.z]),
                ],
            }
        })
        .collect();

    let mut file = File::create(path).context("Failed to create STL file")?;
    stl_io::write_stl(&mut file, triangles.iter()).context("Failed to write STL file")?;

    Ok(())
}

fn export_stl_ascii(mesh: &Mesh, path: &Path) -> Result<()> {
    let mut file = File::create(path).context("Failed to create STL file")?;

    writeln!(file, "solid mesh")?;

    for tri in &mesh.triangles {
        let v0 = &mesh.vertices[tri.indices[0]];
        let v1 = &mesh.vertices[tri.indices[1]];
        let v2 = &mesh.vertices[tri.indices[2]];

        let normal = (v0.normal + v1.normal + v2.normal) / 3.0;

        writeln!(file, "  facet normal {} {} {}", normal.x, normal.y, normal.z)?;
        writeln!(file, "    outer loop")?;
        for v in [v0, v1, v2] {
            writeln!(
                file,
                "      vertex {} {} {}",
                v.position.x, v.position.y, v.position.z
            )?;
        }
        writeln!(file, "    endloop")?;
        writeln!(file, "  endfacet")?;
    }

    writeln!(file, "endsolid mesh")?;

    Ok(())
}
