// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshweld Team.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Unnormalized face normal of a triangle from its winding order.
/// The magnitude is twice the triangle's area.
pub fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    v1.cross(&v2)
}
