use glam::Vec3;

use crate::{config::LightingConfig, math::color::linear_from_hex};

/// A light infinitely far away, shining from `position` toward the origin.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from a lit surface toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Z)
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

#[derive(Debug, Clone)]
pub struct AmbientLight {
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

#[derive(Debug, Clone)]
pub struct Lighting {
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
}

impl Lighting {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            directional: DirectionalLight {
                color: linear_from_hex(config.directional_color),
                intensity: config.directional_intensity,
                position: config.directional_position,
            },
            ambient: AmbientLight {
                color: linear_from_hex(config.ambient_color),
                intensity: config.ambient_intensity,
            },
        }
    }
}
