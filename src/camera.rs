use std::f32::consts::PI;

use glam::{Mat4, Vec2, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::config::CameraConfig;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            eye: config.eye,
            target: config.target,
            up: Vec3::Y,
            fovy: config.fovy,
            near: config.near,
            far: config.far,
        }
    }

    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let aspect = resolution.x / resolution.y.max(1.0);
        let projection = Mat4::perspective_rh(self.fovy.to_radians(), aspect, self.near, self.far);
        projection * view
    }
}

// Keeps the polar angle off the poles, where the view's up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Orbits a camera around its target. Left drag rotates, right drag pans, the wheel dollies.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub camera: Camera,
    /// Angle around the Y axis, measured from +Z.
    azimuth: f32,
    /// Angle from +Y.
    polar: f32,
    distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new(camera: Camera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length();
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / distance)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let mut controls = Self {
            max_distance: camera.far,
            camera,
            azimuth,
            polar,
            distance,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.5,
        };
        controls.update_camera();
        controls
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    fn update_camera(&mut self) {
        let sin_polar = self.polar.sin();
        let offset = Vec3::new(
            sin_polar * self.azimuth.sin(),
            self.polar.cos(),
            sin_polar * self.azimuth.cos(),
        ) * self.distance;

        self.camera.eye = self.camera.target + offset;
        self.camera.up = Vec3::Y;
    }

    /// `delta` is the cursor movement in pixels; a drag across the full viewport height turns
    /// the camera by one full revolution.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let scale = 2.0 * PI * self.rotate_speed / viewport_height.max(1.0);

        self.azimuth -= delta.x * scale;
        self.polar = (self.polar - delta.y * scale).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        self.update_camera();
    }

    /// Moves the target in the view plane so the point under the cursor follows it.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32) {
        let forward = (self.camera.target - self.camera.eye).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);

        let visible_height = 2.0 * self.distance * (self.camera.fovy.to_radians() * 0.5).tan();
        let world_per_pixel = visible_height / viewport_height.max(1.0);

        self.camera.target += (up * delta.y - right * delta.x) * world_per_pixel;
        self.update_camera();
    }

    /// Positive `scroll` moves the camera toward the target.
    pub fn zoom(&mut self, scroll: f32) {
        let scale = 0.95_f32.powf(scroll * self.zoom_speed);
        self.distance = (self.distance * scale).clamp(self.min_distance, self.max_distance);
        self.update_camera();
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
    eye: Vec4,
}

impl CameraUniform {
    pub fn update(&mut self, resolution: winit::dpi::PhysicalSize<u32>, camera: &Camera) {
        self.view_proj =
            camera.get_vp_matrix(Vec2::new(resolution.width as f32, resolution.height as f32));
        self.eye = camera.eye.extend(1.0);
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_controls() -> OrbitControls {
        OrbitControls::new(Camera::from_config(&CameraConfig::default()))
    }

    #[test]
    fn starts_where_the_camera_was_placed() {
        let controls = default_controls();
        assert!(controls.camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 11.0), 1e-4));
        assert!((controls.distance() - 11.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_keeps_distance_to_target() {
        let mut controls = default_controls();
        controls.rotate(Vec2::new(120.0, -45.0), 600.0);

        let distance = controls.camera.eye.distance(controls.camera.target);
        assert!((distance - 11.0).abs() < 1e-4);
        assert!(!controls.camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 11.0), 1e-2));
    }

    #[test]
    fn polar_angle_never_reaches_the_pole() {
        let mut controls = default_controls();
        controls.rotate(Vec2::new(0.0, 10_000.0), 600.0);

        let direction = (controls.camera.eye - controls.camera.target).normalize();
        assert!(direction.y < 1.0);
        assert!(direction.cross(Vec3::Y).length() > 0.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut controls = default_controls();

        controls.zoom(1_000.0);
        assert_eq!(controls.distance(), controls.min_distance);

        controls.zoom(-1_000.0);
        assert_eq!(controls.distance(), controls.max_distance);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut controls = default_controls();
        let offset_before = controls.camera.eye - controls.camera.target;

        controls.pan(Vec2::new(30.0, 0.0), 600.0);

        // Dragging right moves the scene right, so the target moves left.
        assert!(controls.camera.target.x < 0.0);
        let offset_after = controls.camera.eye - controls.camera.target;
        assert!(offset_before.abs_diff_eq(offset_after, 1e-4));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::from_config(&CameraConfig::default());
        let clip = camera.get_vp_matrix(Vec2::new(800.0, 600.0)) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
