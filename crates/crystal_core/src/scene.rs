//! Camera, lights and the single live crystal group.

use crate::error::CrystalError;
use crate::mesh::Face;
use crate::palette::Rgb;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, UnitQuaternion, Vector3};

pub const CAMERA_FOV_DEG: f64 = 75.0;
pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 1000.0;
pub const CAMERA_DISTANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, CrystalError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(CrystalError::MissingRenderTarget { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// A ray in world space with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    aspect: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Point3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: Point3::origin(),
            aspect,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    pub fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
    }

    pub fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.position, &self.target, &Vector3::y())
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection().as_matrix() * self.view().to_homogeneous()
    }

    /// Ray from the camera through a point in normalized device coordinates.
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        let on_plane = self
            .projection()
            .unproject_point(&Point3::new(ndc_x, ndc_y, 0.5));
        let world = self.view().inverse_transform_point(&on_plane);
        Ray {
            origin: self.position,
            direction: (world - self.position).normalize(),
        }
    }

    /// Projects a world point to normalized device coordinates.
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        let eye = self.view().transform_point(point);
        self.projection().project_point(&eye)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub point: PointLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::from_hex(0xffffff),
                intensity: 0.5,
            },
            point: PointLight {
                color: Rgb::from_hex(0xffffff),
                intensity: 1.0,
                position: Point3::new(5.0, 5.0, 5.0),
            },
        }
    }
}

/// The faces currently on screen and their shared orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalGroup {
    faces: Vec<Face>,
    orientation: UnitQuaternion<f64>,
}

impl CrystalGroup {
    pub fn new(faces: Vec<Face>) -> Self {
        Self {
            faces,
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: UnitQuaternion<f64>) {
        self.orientation = orientation;
    }

    /// Applies `rotation` in world space, on top of the current orientation.
    pub fn rotate_world(&mut self, rotation: UnitQuaternion<f64>) {
        self.orientation = rotation * self.orientation;
    }

    /// Applies `rotation` about the crystal's own axes.
    pub fn rotate_local(&mut self, rotation: UnitQuaternion<f64>) {
        self.orientation = self.orientation * rotation;
    }

    pub fn model_matrix(&self) -> Matrix4<f64> {
        self.orientation.to_homogeneous()
    }

    pub fn world_vertices(&self, face: &Face) -> [Point3<f64>; 3] {
        face.triangle.vertices.map(|v| self.orientation * v)
    }

    pub fn world_normal(&self, face: &Face) -> Vector3<f64> {
        self.orientation * face.triangle.normal
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    lighting: Lighting,
    viewport: Viewport,
    crystal: Option<CrystalGroup>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Result<Self, CrystalError> {
        let viewport = Viewport::new(width, height)?;
        Ok(Self {
            camera: Camera::new(viewport.aspect()),
            lighting: Lighting::default(),
            viewport,
            crystal: None,
        })
    }

    /// Swaps in a new crystal built from `faces`. The previous group is
    /// dropped in the same assignment, so nothing can observe a mix of old
    /// and new faces. No faces means no crystal.
    pub fn rebuild(&mut self, faces: Vec<Face>) {
        log::debug!("rebuilding crystal with {} faces", faces.len());
        self.crystal = if faces.is_empty() {
            None
        } else {
            Some(CrystalGroup::new(faces))
        };
    }

    /// Returns `false` when the new size is unusable and was ignored.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        match Viewport::new(width, height) {
            Ok(viewport) => {
                self.viewport = viewport;
                self.camera.set_aspect(viewport.aspect());
                true
            }
            Err(err) => {
                log::warn!("ignoring resize: {err}");
                false
            }
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn crystal(&self) -> Option<&CrystalGroup> {
        self.crystal.as_ref()
    }

    pub fn crystal_mut(&mut self) -> Option<&mut CrystalGroup> {
        self.crystal.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, Scene};
    use crate::aggregate::CategoryTotal;
    use crate::config::OverflowPolicy;
    use crate::error::CrystalError;
    use crate::mesh::build_faces;
    use nalgebra::{Point3, UnitQuaternion, Vector3};

    fn sample_faces() -> Vec<crate::mesh::Face> {
        let totals = vec![
            CategoryTotal {
                category: "Food".to_string(),
                amount: 5500,
            },
            CategoryTotal {
                category: "Transport".to_string(),
                amount: 3000,
            },
        ];
        build_faces(&totals, 8500, OverflowPolicy::Truncate)
    }

    #[test]
    fn rejects_zero_sized_target() {
        let err = Scene::new(0.0, 300.0).expect_err("zero width should fail");
        assert!(matches!(err, CrystalError::MissingRenderTarget { .. }));
        assert!(Scene::new(300.0, f64::NAN).is_err());
    }

    #[test]
    fn rebuild_replaces_group_and_empty_removes_it() {
        let mut scene = Scene::new(800.0, 600.0).expect("scene");
        assert!(scene.crystal().is_none());

        scene.rebuild(sample_faces());
        assert_eq!(scene.crystal().expect("crystal").faces().len(), 2);

        scene.rebuild(Vec::new());
        assert!(scene.crystal().is_none());
    }

    #[test]
    fn rebuild_twice_gives_content_equal_faces() {
        let mut scene = Scene::new(800.0, 600.0).expect("scene");
        scene.rebuild(sample_faces());
        let first = scene.crystal().expect("crystal").faces().to_vec();
        scene.rebuild(sample_faces());
        let second = scene.crystal().expect("crystal").faces().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn resize_updates_aspect_without_touching_orientation() {
        let mut scene = Scene::new(800.0, 600.0).expect("scene");
        scene.rebuild(sample_faces());
        let turn = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7);
        scene.crystal_mut().expect("crystal").rotate_world(turn);

        assert!(scene.resize(400.0, 400.0));
        assert!(scene.resize(400.0, 400.0));
        assert!((scene.camera().aspect() - 1.0).abs() < 1e-12);
        assert_eq!(scene.viewport().width, 400.0);
        assert_eq!(scene.crystal().expect("crystal").orientation(), turn);

        assert!(!scene.resize(0.0, 0.0));
        assert!((scene.camera().aspect() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn center_ray_points_at_origin() {
        let camera = Camera::new(4.0 / 3.0);
        let ray = camera.ray_through(0.0, 0.0);
        assert_eq!(ray.origin, Point3::new(0.0, 0.0, 5.0));
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-9);
    }

    #[test]
    fn projection_and_ray_agree() {
        let camera = Camera::new(16.0 / 9.0);
        let point = Point3::new(0.8, -0.4, 1.2);
        let ndc = camera.project(&point);
        let ray = camera.ray_through(ndc.x, ndc.y);
        let to_point = (point - ray.origin).normalize();
        assert!((to_point - ray.direction).norm() < 1e-9);
    }
}
