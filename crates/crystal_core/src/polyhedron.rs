//! The fixed base shape faces are carved from.
//!
//! A regular icosahedron with no subdivision: 12 vertices on the golden-ratio
//! rectangles, projected onto a sphere of [`BASE_RADIUS`], and 20 triangles
//! wound counter-clockwise when seen from outside.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub const BASE_RADIUS: f64 = 2.0;
pub const FACE_COUNT: usize = 20;

const FACE_INDICES: [[usize; 3]; FACE_COUNT] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// One flat triangle in crystal-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
    pub normal: Vector3<f64>,
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        let normal = (b - a).cross(&(c - a));
        let norm = normal.norm();
        let normal = if norm > 0.0 { normal / norm } else { Vector3::zeros() };
        Self {
            vertices: [a, b, c],
            normal,
        }
    }

    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icosahedron {
    vertices: Vec<Point3<f64>>,
}

impl Icosahedron {
    pub fn new(radius: f64) -> Self {
        let t = (1.0 + 5.0_f64.sqrt()) / 2.0;
        let raw = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        let vertices = raw
            .iter()
            .map(|[x, y, z]| Point3::from(Vector3::new(*x, *y, *z).normalize() * radius))
            .collect();
        Self { vertices }
    }

    pub fn face_count(&self) -> usize {
        FACE_COUNT
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let [a, b, c] = *FACE_INDICES.get(index)?;
        Some(Triangle::new(
            self.vertices[a],
            self.vertices[b],
            self.vertices[c],
        ))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..FACE_COUNT).filter_map(move |idx| self.triangle(idx))
    }
}

impl Default for Icosahedron {
    fn default() -> Self {
        Self::new(BASE_RADIUS)
    }
}

#[cfg(test)]
mod tests {
    use super::{Icosahedron, BASE_RADIUS, FACE_COUNT};

    #[test]
    fn has_twenty_faces_and_twelve_vertices() {
        let ico = Icosahedron::default();
        assert_eq!(ico.face_count(), FACE_COUNT);
        assert_eq!(ico.vertices().len(), 12);
        assert_eq!(ico.triangles().count(), FACE_COUNT);
        assert!(ico.triangle(FACE_COUNT).is_none());
    }

    #[test]
    fn vertices_lie_on_the_base_sphere() {
        let ico = Icosahedron::default();
        for v in ico.vertices() {
            assert!((v.coords.norm() - BASE_RADIUS).abs() < 1e-12);
        }
    }

    #[test]
    fn every_face_is_wound_outward() {
        let ico = Icosahedron::default();
        for (idx, tri) in ico.triangles().enumerate() {
            let outward = tri.centroid().coords.dot(&tri.normal);
            assert!(outward > 0.0, "face {idx} points inward");
            assert!((tri.normal.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn faces_are_equilateral() {
        let ico = Icosahedron::default();
        let edge = {
            let [a, b, _] = ico.triangle(0).expect("face 0").vertices;
            (b - a).norm()
        };
        for tri in ico.triangles() {
            let [a, b, c] = tri.vertices;
            for len in [(b - a).norm(), (c - b).norm(), (a - c).norm()] {
                assert!((len - edge).abs() < 1e-9);
            }
        }
    }
}
