// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Spatial queries - ray intersection against scene geometry
//!
//! The fracture core never does broad-phase work itself; it asks a
//! `SceneRaycaster` for hits along a segment. `SceneIndex` is the shipped
//! implementation: a per-pass snapshot of every piece's world-space
//! triangles behind a per-piece AABB quick-reject.
//!
//! All casts are one-sided: a triangle is hit only when the ray runs
//! against its winding normal. The classifier's two-direction parity rule
//! depends on this, because it makes each surface crossing count exactly
//! once across the down and up probes. Triangle boundaries are
//! epsilon-inclusive and hits at the ray origin are excluded, so rays that
//! graze a seam edge or start exactly on a surface stay deterministic.
//! Coincident hits on the same piece merge into one, so a ray crossing the
//! shared edge of two coplanar triangles still reports one crossing.
//! Distance tolerances scale with the scene extent, keeping the origin
//! exclusion window meaningful for scenes much smaller or larger than a
//! unit cube.

use crate::fracture::{Piece, PieceId};
use crate::geometry::BoundingBox;
use nalgebra::{Point3, Vector3};
use parry3d::bounding_volume::Aabb;
use parry3d::query::{Ray, RayCast};
use std::ops::Range;

const DEGENERATE_EPS: f32 = 1e-12;
/// Inclusive margin on barycentric coordinates; seam-grazing rays must hit
const BARY_EPS: f32 = 1e-5;
/// Distance tolerance per unit of scene extent. Sizes the origin exclusion
/// window, the segment-end inclusion and the coincident-hit merge.
const RELATIVE_DISTANCE_EPS: f32 = 1e-5;

/// A single ray/surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space intersection point
    pub point: Point3<f32>,
    /// Piece owning the struck triangle
    pub piece: PieceId,
    /// Distance from the ray origin to the hit
    pub toi: f32,
}

/// Synchronous ray intersection against the scene's piece geometry.
pub trait SceneRaycaster {
    /// Nearest hit along the segment, if any.
    fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit>;

    /// Every surface crossing along the segment, ordered by distance from
    /// the origin. One crossing is one hit, even where the ray passes over
    /// an edge shared by coplanar triangles.
    fn raycast_all(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Vec<RayHit>;
}

/// Front-face Moller-Trumbore ray/triangle intersection.
///
/// `dir` must be unit length; the returned time of impact is a distance.
/// Back faces and near-parallel rays return `None`. Hits closer to the
/// origin than `tolerance` are the origin's own surface and are excluded.
fn cast_front_face(
    origin: &Point3<f32>,
    dir: &Vector3<f32>,
    tri: &[Point3<f32>; 3],
    max_distance: f32,
    tolerance: f32,
) -> Option<f32> {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let pvec = dir.cross(&e2);
    // det > 0 exactly when the ray runs against the winding normal
    let det = e1.dot(&pvec);
    if det < DEGENERATE_EPS {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - tri[0];
    let u = tvec.dot(&pvec) * inv_det;
    if u < -BARY_EPS || u > 1.0 + BARY_EPS {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = dir.dot(&qvec) * inv_det;
    if v < -BARY_EPS || u + v > 1.0 + BARY_EPS {
        return None;
    }

    // The segment end is inclusive within the same tolerance as the
    // origin, so crossings exactly at the far endpoint still count
    let toi = e2.dot(&qvec) * inv_det;
    (toi > tolerance && toi <= max_distance + tolerance).then_some(toi)
}

struct PieceGeometry {
    piece: PieceId,
    bounds: Aabb,
    triangles: Range<usize>,
}

/// Snapshot raycaster over the current world-space piece geometry.
///
/// Built once per detection pass; pieces that move afterwards are not
/// tracked, rebuild the index instead.
pub struct SceneIndex {
    groups: Vec<PieceGeometry>,
    /// Flat world-space triangle list, grouped by piece
    triangles: Vec<[Point3<f32>; 3]>,
    /// Scene-scaled distance tolerance shared by every cast
    tolerance: f32,
}

impl SceneIndex {
    pub fn new(pieces: &[Piece]) -> Self {
        let mut raw_groups = Vec::with_capacity(pieces.len());
        let mut triangles = Vec::new();
        let mut scene_bounds = BoundingBox::empty();

        for piece in pieces {
            let start = triangles.len();
            let mut bounds = BoundingBox::empty();

            for tri in piece.triangles() {
                let verts = tri.vertices();
                if verts.len() != 3 {
                    continue;
                }
                let world = [
                    piece.to_world(&verts[0]),
                    piece.to_world(&verts[1]),
                    piece.to_world(&verts[2]),
                ];
                for p in &world {
                    bounds.expand_to_include(p);
                }
                triangles.push(world);
            }

            if triangles.len() > start {
                scene_bounds.expand_to_include(&bounds.min);
                scene_bounds.expand_to_include(&bounds.max);
                raw_groups.push((piece.id(), bounds, start..triangles.len()));
            }
        }

        let extent = if scene_bounds.is_empty() {
            1.0
        } else {
            scene_bounds.size().max()
        };
        let tolerance = (extent * RELATIVE_DISTANCE_EPS).max(f32::EPSILON);

        // Loosen the boxes so grazing rays are not rejected early
        let margin = Vector3::repeat(tolerance.max(BARY_EPS));
        let groups = raw_groups
            .into_iter()
            .map(|(piece, bounds, range)| PieceGeometry {
                piece,
                bounds: Aabb::new(bounds.min - margin, bounds.max + margin),
                triangles: range,
            })
            .collect();

        Self {
            groups,
            triangles,
            tolerance,
        }
    }

    fn collect_hits(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
        first_only: bool,
    ) -> Vec<RayHit> {
        let length = direction.norm();
        if length < DEGENERATE_EPS || max_distance <= 0.0 {
            return Vec::new();
        }
        let dir = direction / length;
        let ray = Ray::new(origin, dir);

        let mut hits = Vec::new();
        for group in &self.groups {
            if group
                .bounds
                .cast_local_ray(&ray, max_distance, true)
                .is_none()
            {
                continue;
            }
            for tri in &self.triangles[group.triangles.clone()] {
                if let Some(toi) = cast_front_face(&origin, &dir, tri, max_distance, self.tolerance)
                {
                    hits.push(RayHit {
                        point: ray.point_at(toi),
                        piece: group.piece,
                        toi,
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.toi.total_cmp(&b.toi));

        // A ray over the shared edge of two coplanar triangles strikes
        // both; hits of the same piece at coincident distances are one
        // physical surface crossing and merge into the nearest
        let mut merged: Vec<RayHit> = Vec::with_capacity(hits.len());
        for hit in hits {
            let coincident = merged
                .iter()
                .any(|kept| kept.piece == hit.piece && hit.toi - kept.toi <= self.tolerance);
            if !coincident {
                merged.push(hit);
            }
        }

        if first_only {
            merged.truncate(1);
        }
        merged
    }
}

impl SceneRaycaster for SceneIndex {
    fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.collect_hits(origin, direction, max_distance, true)
            .into_iter()
            .next()
    }

    fn raycast_all(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Vec<RayHit> {
        self.collect_hits(origin, direction, max_distance, false)
    }
}
