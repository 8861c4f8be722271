use glam::Vec3;

#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            near: 0.1,
            far: 50.0,
            eye: Vec3::new(0.0, 0.0, 11.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// sRGB hex colour the frame is cleared to.
    pub clear_color: u32,
    /// 1 disables MSAA. Falls back to 1 when the surface format doesn't support 4x.
    pub msaa_samples: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: 0x212121,
            msaa_samples: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightingConfig {
    pub directional_color: u32,
    pub directional_intensity: f32,
    /// The directional light shines from here toward the origin.
    pub directional_position: Vec3,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            directional_color: 0xffffff,
            directional_intensity: 1.0,
            directional_position: Vec3::new(0.0, 0.0, 5.0),
            ambient_color: 0xffffff,
            ambient_intensity: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaterialConfig {
    pub color: u32,
    pub roughness: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: 0xab987a,
            roughness: 0.45,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoxFieldConfig {
    pub count: usize,
    /// Each box dimension is sampled uniformly from `min_size..=max_size`.
    pub min_size: f32,
    pub max_size: f32,
    /// Half extents of the volume initial positions are sampled from.
    pub position_extent: Vec3,
}

impl Default for BoxFieldConfig {
    fn default() -> Self {
        Self {
            count: 100,
            min_size: 0.1,
            max_size: 1.6,
            position_extent: Vec3::new(10.0, 10.0, 5.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationConfig {
    pub duration: f32,
    /// Time added per frame.
    pub step: f32,
    pub sphere_radius: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            step: 0.02,
            sphere_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DemoConfig {
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub lighting: LightingConfig,
    pub material: MaterialConfig,
    pub boxes: BoxFieldConfig,
    pub animation: AnimationConfig,
}

impl DemoConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let camera = &self.camera;
        anyhow::ensure!(
            camera.fovy > 0.0 && camera.fovy < 180.0,
            "Camera field of view must be in (0, 180) degrees, got {}",
            camera.fovy
        );
        anyhow::ensure!(
            camera.near > 0.0 && camera.far > camera.near,
            "Camera clip planes must satisfy 0 < near < far, got near={} far={}",
            camera.near,
            camera.far
        );
        anyhow::ensure!(
            camera.eye != camera.target,
            "Camera eye and target must differ"
        );

        anyhow::ensure!(
            matches!(self.render.msaa_samples, 1 | 4),
            "MSAA sample count must be 1 or 4, got {}",
            self.render.msaa_samples
        );

        anyhow::ensure!(
            self.material.roughness.is_finite() && (0.0..=1.0).contains(&self.material.roughness),
            "Material roughness must be in [0, 1], got {}",
            self.material.roughness
        );

        let animation = &self.animation;
        anyhow::ensure!(
            animation.duration.is_finite() && animation.duration > 0.0,
            "Animation duration must be positive, got {}",
            animation.duration
        );
        anyhow::ensure!(
            animation.step.is_finite() && animation.step > 0.0,
            "Animation step must be positive, got {}",
            animation.step
        );
        anyhow::ensure!(
            animation.sphere_radius.is_finite() && animation.sphere_radius > 0.0,
            "Sphere radius must be positive, got {}",
            animation.sphere_radius
        );

        Ok(())
    }
}
