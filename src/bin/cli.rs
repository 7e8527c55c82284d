// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Meshweld CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use meshweld::geometry::primitives;
use meshweld::{io, Combiner, Piece, PieceId, TickOutcome};
use nalgebra::{Point3, Vector3};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "meshweld")]
#[command(about = "Meshweld - fracture/reassembly mesh editor kernel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Push two cube pieces into overlap, weld them, export the result
    Demo {
        /// Overlap depth along the x axis
        #[arg(long, default_value = "0.1")]
        overlap: f32,

        /// Output STL file
        #[arg(short, long, default_value = "combined.stl")]
        output: String,

        /// Optional JSON dump of the contact/broken-point telemetry
        #[arg(long)]
        telemetry: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Serialize)]
struct Telemetry<'a> {
    contact_points: &'a [Point3<f32>],
    broken_points: &'a [Point3<f32>],
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Demo {
            overlap,
            output,
            telemetry,
        } => demo_command(*overlap, output, telemetry.as_deref(), cli.verbose),
        Commands::Version => {
            println!("meshweld {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn demo_command(
    overlap: f32,
    output: &str,
    telemetry: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let cube = primitives::unit_cube();
    let mut combiner = Combiner::new(vec![
        Piece::from_mesh(PieceId(0), &cube, Vector3::zeros()),
        Piece::from_mesh(PieceId(1), &cube, Vector3::new(2.0, 0.0, 0.0)),
    ]);

    // Push the second piece into the first, then let the tick pick the
    // movement up
    combiner.move_piece(PieceId(1), Vector3::new(1.0 - overlap, 0.0, 0.0));
    match combiner.tick()? {
        TickOutcome::Recomputed {
            contacts,
            broken_vertices,
        } => {
            if verbose {
                println!("  contacts: {contacts}");
                println!("  broken vertices: {broken_vertices}");
            }
        }
        TickOutcome::Idle => {
            println!("{}", "No movement detected, nothing to do".yellow());
            return Ok(());
        }
    }

    let mesh = combiner.combine().context("Combine failed")?;
    io::export_stl(&mesh, output)?;

    if let Some(path) = telemetry {
        let dump = Telemetry {
            contact_points: combiner.contact_points(),
            broken_points: combiner.broken_points(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&dump)?)
            .context("Failed to write telemetry")?;
    }

    println!(
        "{} {} ({} vertices, {} triangles)",
        "Combined mesh written to".green(),
        output,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(())
}
