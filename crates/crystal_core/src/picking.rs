//! Ray hit testing against the live crystal.

use crate::mesh::Face;
use crate::scene::{Ray, Scene};
use nalgebra::Point3;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    pub face: &'a Face,
    pub distance: f64,
    pub point: Point3<f64>,
}

/// Distance along `ray` to the front side of triangle `abc`, if it is hit.
///
/// Triangles facing away from the ray are culled, matching what is drawn.
pub fn intersect_triangle(ray: &Ray, [a, b, c]: [Point3<f64>; 3]) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);
    if det < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(&q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nearest face under the normalized pointer position, if any.
pub fn pick(scene: &Scene, ndc_x: f64, ndc_y: f64) -> Option<Hit<'_>> {
    let crystal = scene.crystal()?;
    let ray = scene.camera().ray_through(ndc_x, ndc_y);
    crystal
        .faces()
        .iter()
        .filter_map(|face| {
            let distance = intersect_triangle(&ray, crystal.world_vertices(face))?;
            Some(Hit {
                face,
                distance,
                point: ray.origin + ray.direction * distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
